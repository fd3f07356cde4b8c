//! PredictionEngine: telemetry in, hesitation prediction out.
//!
//! Implements `IPredictor` from neuropilot-core. The engine never owns
//! weights: each call asks the [`ModelManager`] for the live model, so a
//! reload is picked up by the next prediction.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;
use neuropilot_core::config::PredictionConfig;
use neuropilot_core::constants::{CURRENT_ALIAS, PREDICTION_COMPONENT};
use neuropilot_core::errors::PredictionError;
use neuropilot_core::models::{DegradationEvent, ModelStatus, PredictionOutcome, PredictionResult};
use neuropilot_core::traits::IPredictor;
use neuropilot_model::{LoadedModel, ModelManager};
use neuropilot_observability::{prediction_span, DegradationTracker};
use serde_json::Value;
use tracing::debug;

use crate::features::FeatureVector;
use crate::formatting::format_outputs;
use crate::history::PredictionHistory;

const FALLBACK: &str = "neutral_prediction";

/// Prediction engine over the manager's live model.
pub struct PredictionEngine {
    manager: Arc<ModelManager>,
    config: PredictionConfig,
    history: Mutex<PredictionHistory>,
    degradation: Mutex<DegradationTracker>,
}

impl PredictionEngine {
    /// Create the engine and attempt to load the "current" model once.
    pub fn new(manager: Arc<ModelManager>, config: PredictionConfig) -> Self {
        if !manager.is_loaded() {
            manager.load(CURRENT_ALIAS);
        }
        Self {
            history: Mutex::new(PredictionHistory::new(config.history_capacity)),
            degradation: Mutex::new(DegradationTracker::new()),
            manager,
            config,
        }
    }

    /// Number of predictions currently held in the history.
    pub fn predictions_processed(&self) -> usize {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether the last prediction fell back to the neutral result.
    pub fn is_degraded(&self) -> bool {
        self.degradation
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_degraded(PREDICTION_COMPONENT)
    }

    /// The live model, reloading "current" once if none is loaded.
    fn live_model(&self) -> Option<Arc<LoadedModel>> {
        if let Some(model) = self.manager.get() {
            return Some(model);
        }
        debug!("no model loaded, attempting reload of current");
        self.manager.load(CURRENT_ALIAS);
        self.manager.get()
    }

    fn run(&self, model: &LoadedModel, telemetry: &Value) -> Result<PredictionResult, PredictionError> {
        let features = FeatureVector::from_payload(telemetry)?;
        let outputs = model
            .network()
            .infer(features.as_slice())
            .map_err(|e| PredictionError::InferenceFailed {
                reason: e.to_string(),
            })?;
        format_outputs(
            &outputs,
            self.config.hesitation_threshold,
            self.config.max_suggestions,
        )
    }

    fn record(&self, outcome: &PredictionOutcome) {
        {
            let mut tracker = self
                .degradation
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            match &outcome.diagnostic {
                Some(error) => tracker.record(DegradationEvent {
                    component: PREDICTION_COMPONENT.to_string(),
                    failure: error.to_string(),
                    fallback_used: FALLBACK.to_string(),
                    timestamp: Utc::now(),
                }),
                None => {
                    tracker.mark_recovered(PREDICTION_COMPONENT);
                }
            }
        }

        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(outcome.result.clone());
    }
}

impl IPredictor for PredictionEngine {
    fn predict(&self, telemetry: &Value) -> PredictionOutcome {
        let model = self.live_model();
        let _span = prediction_span!(model.as_ref().map(|m| m.version())).entered();

        let outcome = match model {
            None => PredictionOutcome::degraded(PredictionError::ModelUnavailable),
            Some(model) => match self.run(&model, telemetry) {
                Ok(result) => PredictionOutcome::success(result),
                Err(error) => PredictionOutcome::degraded(error),
            },
        };

        if let Some(error) = &outcome.diagnostic {
            debug!(error = %error, "prediction fell back to neutral result");
        } else {
            debug!(
                hesitation = outcome.result.hesitation,
                confidence = outcome.result.confidence,
                "prediction served"
            );
        }
        self.record(&outcome);
        outcome
    }

    fn is_loaded(&self) -> bool {
        self.manager.is_loaded()
    }

    fn status(&self) -> ModelStatus {
        ModelStatus {
            model_loaded: self.manager.is_loaded(),
            predictions_processed: self.predictions_processed(),
            model_version: self.manager.current_version(),
            degraded: self.is_degraded(),
        }
    }
}
