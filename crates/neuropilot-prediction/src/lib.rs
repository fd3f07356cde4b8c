//! # neuropilot-prediction
//!
//! Turns raw telemetry into a hesitation prediction against the live model.
//!
//! Pipeline: parse telemetry → feature vector → forward pass → formatted
//! result. Any failure along the way yields the neutral result; the caller
//! never sees an error.

pub mod engine;
pub mod features;
pub mod formatting;
mod history;

pub use engine::PredictionEngine;
pub use features::FeatureVector;
