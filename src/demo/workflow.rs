// src/demo/workflow.rs
//! State machine behind the demo lab:
//! `Idle -> Ready -> Processing -> Done -> (select) -> Ready`.

use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::engine::{InferenceEngine, InferenceOutput};
use super::image::SelectedImage;
use super::DemoError;
use crate::models::demo::{DemoPhase, DemoSnapshot, ImageInfo, SimulationResult};

#[derive(Debug, Clone)]
enum DemoState {
    Idle,
    Ready { image: SelectedImage },
    Processing { image: SelectedImage },
    Done { image: SelectedImage, output: InferenceOutput },
}

impl DemoState {
    fn phase(&self) -> DemoPhase {
        match self {
            DemoState::Idle => DemoPhase::Idle,
            DemoState::Ready { .. } => DemoPhase::Ready,
            DemoState::Processing { .. } => DemoPhase::Processing,
            DemoState::Done { .. } => DemoPhase::Done,
        }
    }

    fn image(&self) -> Option<&SelectedImage> {
        match self {
            DemoState::Idle => None,
            DemoState::Ready { image }
            | DemoState::Processing { image }
            | DemoState::Done { image, .. } => Some(image),
        }
    }
}

pub struct DemoWorkflow {
    state: RwLock<DemoState>,
    engine: Arc<dyn InferenceEngine>,
}

impl DemoWorkflow {
    pub fn new(engine: Arc<dyn InferenceEngine>) -> Self {
        Self {
            state: RwLock::new(DemoState::Idle),
            engine,
        }
    }

    /// Replace the current image. Any result, or run still in flight, for the
    /// previous image is dropped in the same step.
    pub async fn select_image(
        &self,
        file_name: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Result<ImageInfo, DemoError> {
        let image = SelectedImage::from_upload(file_name, bytes)?;
        let info = image.info();

        let mut state = self.state.write().await;
        match &*state {
            DemoState::Processing { image: previous } => {
                tracing::info!(
                    "Image {} replaced while processing; its run will be discarded",
                    previous.id
                );
            }
            DemoState::Done { image: previous, .. } => {
                tracing::debug!("Clearing result for image {}", previous.id);
            }
            _ => {}
        }
        *state = DemoState::Ready { image };

        tracing::info!(
            "🖼️ Selected image {} '{}' ({}, {}x{}, {} bytes)",
            info.id,
            info.file_name,
            info.mime_type,
            info.width,
            info.height,
            info.size_bytes
        );
        Ok(info)
    }

    /// Move into `Processing`, clearing any previous result.
    async fn begin_run(&self) -> Result<SelectedImage, DemoError> {
        let mut state = self.state.write().await;
        let image = match &*state {
            DemoState::Idle => return Err(DemoError::NoImageSelected),
            DemoState::Processing { .. } => return Err(DemoError::AlreadyProcessing),
            DemoState::Ready { image } | DemoState::Done { image, .. } => image.clone(),
        };
        *state = DemoState::Processing {
            image: image.clone(),
        };
        tracing::info!(
            "▶️ Starting {} run for image {}",
            self.engine.name(),
            image.id
        );
        Ok(image)
    }

    async fn finish_run(
        &self,
        image_id: Uuid,
        outcome: Result<InferenceOutput, DemoError>,
    ) -> Result<SimulationResult, DemoError> {
        let mut state = self.state.write().await;
        let image = match &*state {
            DemoState::Processing { image } if image.id == image_id => image.clone(),
            _ => {
                tracing::info!("Discarding result for superseded image {}", image_id);
                return Err(DemoError::Superseded);
            }
        };

        match outcome {
            Ok(output) => {
                let result = output.result;
                tracing::info!(
                    "✅ Run finished for image {}: IoU={:.4} Dice={:.4} F1={:.4} time={}ms",
                    image_id,
                    result.iou,
                    result.dice,
                    result.f1,
                    result.processing_time_ms
                );
                *state = DemoState::Done { image, output };
                Ok(result)
            }
            Err(e) => {
                tracing::error!("Inference failed for image {}: {}", image_id, e);
                *state = DemoState::Ready { image };
                Err(e)
            }
        }
    }

    /// Run inference on the current image and wait for the result.
    pub async fn run(&self) -> Result<SimulationResult, DemoError> {
        let image = self.begin_run().await?;
        let outcome = self.engine.infer(&image).await;
        self.finish_run(image.id, outcome).await
    }

    /// Like `run`, but only waits for the transition into `Processing`;
    /// the delay and result happen on a background task.
    pub async fn start_run(self: &Arc<Self>) -> Result<ImageInfo, DemoError> {
        let image = self.begin_run().await?;
        let info = image.info();
        let workflow = Arc::clone(self);
        tokio::spawn(async move {
            let outcome = workflow.engine.infer(&image).await;
            // the outcome is already logged and stored in the state
            let _ = workflow.finish_run(image.id, outcome).await;
        });
        Ok(info)
    }

    pub async fn snapshot(&self) -> DemoSnapshot {
        let state = self.state.read().await;
        let (result, mask) = match &*state {
            DemoState::Done { output, .. } => (Some(output.result), Some(output.mask.clone())),
            _ => (None, None),
        };
        DemoSnapshot {
            phase: state.phase(),
            image: state.image().map(SelectedImage::info),
            metrics: result.map(|r| r.metric_cards()).unwrap_or_default(),
            result,
            mask,
        }
    }

    /// The current image, if its id matches. Older images are gone.
    pub async fn image(&self, id: Uuid) -> Option<SelectedImage> {
        let state = self.state.read().await;
        state.image().filter(|image| image.id == id).cloned()
    }
}
