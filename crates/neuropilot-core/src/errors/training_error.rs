/// Training command errors.
#[derive(Debug, thiserror::Error)]
pub enum TrainingError {
    #[error("dataset is empty")]
    EmptyDataset,

    #[error("tensor operation failed: {reason}")]
    Tensor { reason: String },

    #[error("optimizer step failed at epoch {epoch}: {reason}")]
    OptimizerStep { epoch: usize, reason: String },

    #[error("loss diverged at epoch {epoch}")]
    Diverged { epoch: usize },

    #[error("model error: {0}")]
    Model(#[from] super::ModelError),
}
