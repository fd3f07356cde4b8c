/// Errors raised while turning telemetry into a prediction.
///
/// None of these reach the HTTP caller: the engine converts them into the
/// default result and keeps the error as a diagnostic.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PredictionError {
    #[error("telemetry must be a JSON object, got {kind}")]
    InvalidTelemetry { kind: String },

    #[error("telemetry field '{field}' is not numeric: {reason}")]
    InvalidField { field: String, reason: String },

    #[error("no model available")]
    ModelUnavailable,

    #[error("inference failed: {reason}")]
    InferenceFailed { reason: String },

    #[error("head '{head}' produced a non-finite or out-of-range value")]
    InvalidOutput { head: String },
}
