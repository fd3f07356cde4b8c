//! NeuropilotRuntime owns the model manager and prediction engine.
//!
//! Built once at startup and shared with every connection by `Arc`.

use std::sync::Arc;

use neuropilot_core::config::NeuropilotConfig;
use neuropilot_core::NeuropilotResult;
use neuropilot_model::ModelManager;
use neuropilot_prediction::PredictionEngine;
use tracing::info;

/// The services behind the HTTP endpoints.
pub struct NeuropilotRuntime {
    pub manager: Arc<ModelManager>,
    pub engine: PredictionEngine,
    pub config: NeuropilotConfig,
}

impl NeuropilotRuntime {
    /// Validate `config`, then construct the manager and engine; the engine
    /// loads "current" once.
    pub fn new(config: NeuropilotConfig) -> NeuropilotResult<Arc<Self>> {
        config.validate()?;
        let manager = Arc::new(ModelManager::new(&config.store, config.model.clone()));
        let engine = PredictionEngine::new(Arc::clone(&manager), config.prediction.clone());

        match manager.current_version() {
            Some(version) => info!(%version, "serving trained model"),
            None => info!(
                store = %manager.store().root().display(),
                "no trained model found; run `neuropilot train` to create one"
            ),
        }

        Ok(Arc::new(Self {
            manager,
            engine,
            config,
        }))
    }
}
