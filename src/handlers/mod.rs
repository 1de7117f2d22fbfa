// src/handlers/mod.rs
pub mod assistant;
pub mod demo;
pub mod ui;
pub mod status;
