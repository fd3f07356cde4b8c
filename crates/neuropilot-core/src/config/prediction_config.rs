use serde::{Deserialize, Serialize};

use super::defaults;

/// Prediction engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictionConfig {
    /// Number of recent predictions retained for status reporting.
    pub history_capacity: usize,
    /// Hesitation is flagged when the head probability is strictly above this.
    pub hesitation_threshold: f32,
    /// Maximum number of suggested commands returned per prediction.
    pub max_suggestions: usize,
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            history_capacity: defaults::DEFAULT_HISTORY_CAPACITY,
            hesitation_threshold: defaults::DEFAULT_HESITATION_THRESHOLD,
            max_suggestions: defaults::DEFAULT_MAX_SUGGESTIONS,
        }
    }
}
