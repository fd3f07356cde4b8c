//! # neuropilot-observability
//!
//! Tracing subscriber setup, span definitions per operation, and tracking of
//! degradation events (predictions served from the neutral fallback).

pub mod degradation;
pub mod tracing_setup;

pub use degradation::DegradationTracker;
pub use tracing_setup::init_tracing;
