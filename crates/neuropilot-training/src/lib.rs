//! # neuropilot-training
//!
//! One-shot offline training: generate a synthetic dataset, fit the
//! hesitation head with AdamW on binary cross-entropy, and hand the
//! parameters to the model manager for saving.

pub mod command;
pub mod dataset;
pub mod trainer;

pub use command::{run_training, TrainingReport};
pub use dataset::SyntheticDataset;
pub use trainer::{EpochReport, Trainer};

use neuropilot_core::errors::TrainingError;

/// Result type for training operations.
pub type TrainingResult<T> = Result<T, TrainingError>;

pub(crate) fn tensor_error(e: candle_core::Error) -> TrainingError {
    TrainingError::Tensor {
        reason: e.to_string(),
    }
}
