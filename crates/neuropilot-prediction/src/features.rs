//! Feature extraction: telemetry payload → fixed-width network input.

use neuropilot_core::constants::FEATURE_COUNT;
use neuropilot_core::errors::PredictionError;
use neuropilot_core::models::Telemetry;
use serde_json::Value;

/// The four numeric inputs of the network, in input-layer order:
/// inactivity time, cursor velocity, click frequency, session duration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f32; FEATURE_COUNT]);

impl FeatureVector {
    /// Extract features from a raw telemetry payload.
    pub fn from_payload(payload: &Value) -> Result<Self, PredictionError> {
        Telemetry::from_json(payload).map(|t| Self::from_telemetry(&t))
    }

    pub fn from_telemetry(telemetry: &Telemetry) -> Self {
        Self(telemetry.feature_values().map(|v| v as f32))
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn values(&self) -> [f32; FEATURE_COUNT] {
        self.0
    }
}
