use serde::{Deserialize, Serialize};

use crate::errors::PredictionError;

/// Plain-data result of one hesitation prediction.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PredictionResult {
    /// True iff the hesitation probability is strictly above the threshold.
    pub hesitation: bool,
    /// Output of the confidence head, in [0, 1].
    pub confidence: f64,
    /// Command class indices, most likely first.
    pub suggested_commands: Vec<usize>,
}

impl PredictionResult {
    /// The neutral result served whenever no real prediction can be made.
    pub fn neutral() -> Self {
        Self::default()
    }

    pub fn is_neutral(&self) -> bool {
        *self == Self::neutral()
    }
}

/// A prediction together with the error that forced a fallback, if any.
///
/// Callers outside the service only ever see `result`; `diagnostic` keeps
/// the failure available for logging and degradation tracking.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionOutcome {
    pub result: PredictionResult,
    pub diagnostic: Option<PredictionError>,
}

impl PredictionOutcome {
    pub fn success(result: PredictionResult) -> Self {
        Self {
            result,
            diagnostic: None,
        }
    }

    pub fn degraded(error: PredictionError) -> Self {
        Self {
            result: PredictionResult::neutral(),
            diagnostic: Some(error),
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.diagnostic.is_some()
    }
}
