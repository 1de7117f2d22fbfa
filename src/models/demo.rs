// src/models/demo.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Synthetic segmentation scores shown in the demo lab.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub iou: f64,
    pub dice: f64,
    pub f1: f64,
    pub processing_time_ms: u32,
}

impl SimulationResult {
    pub const IOU_BASE: f64 = 0.78;
    pub const IOU_SPAN: f64 = 0.10;
    pub const DICE_BASE: f64 = 0.82;
    pub const DICE_SPAN: f64 = 0.08;
    pub const F1_BASE: f64 = 0.81;
    pub const F1_SPAN: f64 = 0.09;
    pub const TIME_BASE_MS: u32 = 45;
    pub const TIME_SPAN_MS: u32 = 50;

    /// Builds a result from four uniform draws in `[0, 1)`.
    pub fn from_draws(r1: f64, r2: f64, r3: f64, r4: f64) -> Self {
        let jitter = (r4 * Self::TIME_SPAN_MS as f64).floor() as u32;
        Self {
            iou: Self::IOU_BASE + r1 * Self::IOU_SPAN,
            dice: Self::DICE_BASE + r2 * Self::DICE_SPAN,
            f1: Self::F1_BASE + r3 * Self::F1_SPAN,
            // a draw of exactly 1.0 would overshoot the range
            processing_time_ms: Self::TIME_BASE_MS + jitter.min(Self::TIME_SPAN_MS - 1),
        }
    }

    pub fn metric_cards(&self) -> Vec<MetricCard> {
        vec![
            MetricCard::new("IoU (交并比)", format_percent(self.iou)),
            MetricCard::new("Dice 系数", format_percent(self.dice)),
            MetricCard::new("F1 Score", format_percent(self.f1)),
            MetricCard::new("推理耗时", format!("{}ms", self.processing_time_ms)),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricCard {
    pub label: String,
    pub value: String,
}

impl MetricCard {
    fn new(label: &str, value: String) -> Self {
        Self {
            label: label.to_string(),
            value,
        }
    }
}

pub fn format_percent(fraction: f64) -> String {
    format!("{:.2}%", fraction * 100.0)
}

/// Fixed filter that makes the source photo look like a binary crack mask.
pub const MASK_FILTER_CSS: &str = "grayscale(100%) contrast(2.5) brightness(1.5) invert(100%)";

/// The "segmentation output": the source image with a cosmetic filter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaskPreview {
    pub source_image_id: Uuid,
    pub url: String,
    pub css_filter: String,
}

impl MaskPreview {
    pub fn for_image(image_id: Uuid, url: String) -> Self {
        Self {
            source_image_id: image_id,
            url,
            css_filter: MASK_FILTER_CSS.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ImageInfo {
    pub id: Uuid,
    pub file_name: String,
    pub mime_type: String,
    pub size_bytes: usize,
    pub width: u32,
    pub height: u32,
    pub preview_url: String,
    pub selected_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DemoPhase {
    Idle,
    Ready,
    Processing,
    Done,
}

/// Read-only view of the workflow handed to the page.
#[derive(Debug, Clone, Serialize)]
pub struct DemoSnapshot {
    pub phase: DemoPhase,
    pub image: Option<ImageInfo>,
    pub result: Option<SimulationResult>,
    pub metrics: Vec<MetricCard>,
    pub mask: Option<MaskPreview>,
}
