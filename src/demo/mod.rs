// src/demo/mod.rs
//! Demo lab: a simulated crack-segmentation run over an uploaded image.

use thiserror::Error;

pub mod engine;
pub mod image;
pub mod workflow;

pub use engine::{InferenceEngine, InferenceOutput, SimulatedEngine};
pub use image::SelectedImage;
pub use workflow::DemoWorkflow;

#[derive(Error, Debug)]
pub enum DemoError {
    #[error("'{0}' is not a supported image (expected JPEG, PNG, GIF, WebP or BMP)")]
    UnsupportedImage(String),
    #[error("No image selected")]
    NoImageSelected,
    #[error("A run is already in progress")]
    AlreadyProcessing,
    #[error("The image was replaced before the run finished")]
    Superseded,
    #[error("Inference engine error: {0}")]
    Engine(String),
}
