use serde::{Deserialize, Serialize};

use super::defaults;

/// Training command configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    pub epochs: usize,
    pub learning_rate: f64,
    /// Version label the trained parameters are saved under.
    pub model_version: String,
    pub batch_size: usize,
    /// Number of synthetic samples generated per run.
    pub num_samples: usize,
    /// Average loss is reported every this many epochs.
    pub report_every: usize,
    /// A sample is labeled hesitant when its first feature exceeds this.
    pub label_threshold: f32,
    /// Fixes data generation and shuffling when set.
    pub seed: Option<u64>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            epochs: defaults::DEFAULT_EPOCHS,
            learning_rate: defaults::DEFAULT_LEARNING_RATE,
            model_version: defaults::DEFAULT_MODEL_VERSION.to_string(),
            batch_size: defaults::DEFAULT_BATCH_SIZE,
            num_samples: defaults::DEFAULT_NUM_SAMPLES,
            report_every: defaults::DEFAULT_REPORT_EVERY,
            label_threshold: defaults::DEFAULT_LABEL_THRESHOLD,
            seed: None,
        }
    }
}
