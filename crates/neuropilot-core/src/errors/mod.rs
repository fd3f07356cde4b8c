//! Error handling for Neuropilot.
//! One error enum per subsystem, `thiserror` only, aggregated by [`NeuropilotError`].

pub mod config_error;
pub mod model_error;
pub mod prediction_error;
pub mod store_error;
pub mod training_error;

pub use config_error::ConfigError;
pub use model_error::ModelError;
pub use prediction_error::PredictionError;
pub use store_error::StoreError;
pub use training_error::TrainingError;

/// Top-level error type. Every subsystem error converts into it via `From`.
#[derive(Debug, thiserror::Error)]
pub enum NeuropilotError {
    #[error("model error: {0}")]
    Model(#[from] ModelError),

    #[error("parameter store error: {0}")]
    Store(#[from] StoreError),

    #[error("prediction error: {0}")]
    Prediction(#[from] PredictionError),

    #[error("training error: {0}")]
    Training(#[from] TrainingError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience alias used throughout the workspace.
pub type NeuropilotResult<T> = Result<T, NeuropilotError>;
