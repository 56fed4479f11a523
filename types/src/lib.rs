//! Shared types for the death recap workspace.

pub mod config;
pub mod formatting;

pub use config::{CaptureConfig, RecapConfig};
