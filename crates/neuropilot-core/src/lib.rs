//! # neuropilot-core
//!
//! Foundation crate for the Neuropilot hesitation-prediction service.
//! Defines the shared types, traits, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::NeuropilotConfig;
pub use errors::{NeuropilotError, NeuropilotResult};
pub use models::{PredictionOutcome, PredictionResult, Telemetry};
