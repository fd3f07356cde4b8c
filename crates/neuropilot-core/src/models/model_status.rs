use serde::{Deserialize, Serialize};

/// Snapshot returned by the status endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelStatus {
    pub model_loaded: bool,
    /// Number of predictions currently held in the bounded history.
    pub predictions_processed: usize,
    /// Resolved version of the live model, when one is loaded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_version: Option<String>,
    /// Set while predictions are being served from the neutral fallback.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub degraded: bool,
}
