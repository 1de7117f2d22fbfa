// src/demo/engine.rs
//! Inference strategies for the demo lab.
//!
//! The lab never runs a model: `SimulatedEngine` waits a fixed delay and
//! fabricates scores. A real backend can be plugged in by implementing
//! `InferenceEngine`.

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;
use std::time::Duration;

use super::image::SelectedImage;
use super::DemoError;
use crate::models::demo::{MaskPreview, SimulationResult};

pub const DEFAULT_DELAY: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone, PartialEq)]
pub struct InferenceOutput {
    pub result: SimulationResult,
    pub mask: MaskPreview,
}

/// Produce a segmentation result from an image after some latency.
#[async_trait]
pub trait InferenceEngine: Send + Sync {
    fn name(&self) -> &str;

    async fn infer(&self, image: &SelectedImage) -> Result<InferenceOutput, DemoError>;
}

pub struct SimulatedEngine {
    delay: Duration,
    rng: Mutex<StdRng>,
}

impl SimulatedEngine {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Deterministic draws, for tests.
    pub fn seeded(delay: Duration, seed: u64) -> Self {
        Self {
            delay,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn draw(&self) -> SimulationResult {
        // a poisoned lock only means another draw panicked; the rng is still usable
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        SimulationResult::from_draws(rng.gen(), rng.gen(), rng.gen(), rng.gen())
    }
}

#[async_trait]
impl InferenceEngine for SimulatedEngine {
    fn name(&self) -> &str {
        "simulated-unet"
    }

    async fn infer(&self, image: &SelectedImage) -> Result<InferenceOutput, DemoError> {
        tracing::debug!(
            "Simulating U-Net inference for '{}' ({}ms delay)",
            image.file_name,
            self.delay.as_millis()
        );
        tokio::time::sleep(self.delay).await;

        Ok(InferenceOutput {
            result: self.draw(),
            mask: MaskPreview::for_image(image.id, image.preview_url()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo::image::tests::png_bytes;
    use crate::models::demo::MASK_FILTER_CSS;

    #[test]
    fn test_generated_metrics_stay_in_range() {
        let engine = SimulatedEngine::seeded(Duration::ZERO, 7);
        for _ in 0..1000 {
            let r = engine.draw();
            assert!((0.78..=0.88).contains(&r.iou), "iou out of range: {}", r.iou);
            assert!((0.82..=0.90).contains(&r.dice), "dice out of range: {}", r.dice);
            assert!((0.81..=0.90).contains(&r.f1), "f1 out of range: {}", r.f1);
            assert!((45..=94).contains(&r.processing_time_ms));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_infer_waits_for_delay_and_masks_same_image() {
        let engine = SimulatedEngine::seeded(Duration::from_millis(2000), 1);
        let image = SelectedImage::from_upload("a.png", png_bytes()).unwrap();

        let started = tokio::time::Instant::now();
        let output = engine.infer(&image).await.unwrap();

        assert!(started.elapsed() >= Duration::from_millis(2000));
        assert_eq!(output.mask.source_image_id, image.id);
        assert_eq!(output.mask.url, image.preview_url());
        assert_eq!(output.mask.css_filter, MASK_FILTER_CSS);
    }
}
