//! Degradation tracking: when and why predictions were served from the fallback.

pub mod tracker;

pub use tracker::DegradationTracker;
