use serde_json::Value;

use crate::models::{ModelStatus, PredictionOutcome};

/// Hesitation prediction over raw telemetry payloads.
///
/// Implementations never fail outward: a prediction that cannot be made
/// yields the neutral result with a diagnostic attached.
pub trait IPredictor: Send + Sync {
    /// Predict hesitation for one telemetry payload.
    fn predict(&self, telemetry: &Value) -> PredictionOutcome;

    /// Whether a model is currently live.
    fn is_loaded(&self) -> bool;

    /// Current status snapshot.
    fn status(&self) -> ModelStatus;
}
