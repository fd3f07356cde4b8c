//! Configuration for every Neuropilot subsystem.
//!
//! Resolution order (highest priority first):
//! 1. CLI flags (applied by the binary after loading)
//! 2. Environment variables (`NEUROPILOT_*`)
//! 3. Config file (`--config` path, or `neuropilot.toml` in the working directory)
//! 4. Compiled defaults

pub mod defaults;
pub mod model_config;
pub mod observability_config;
pub mod prediction_config;
pub mod server_config;
pub mod store_config;
pub mod training_config;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use model_config::ModelConfig;
pub use observability_config::ObservabilityConfig;
pub use prediction_config::PredictionConfig;
pub use server_config::ServerConfig;
pub use store_config::StoreConfig;
pub use training_config::TrainingConfig;

use crate::constants::FEATURE_COUNT;
use crate::errors::ConfigError;

/// Config file looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILENAME: &str = "neuropilot.toml";

/// Environment variable overriding `store.root`.
pub const ENV_STORE_ROOT: &str = "NEUROPILOT_STORE_ROOT";
/// Environment variable overriding `server.bind_addr`.
pub const ENV_BIND_ADDR: &str = "NEUROPILOT_BIND_ADDR";
/// Environment variable overriding `observability.log_level`.
pub const ENV_LOG_LEVEL: &str = "NEUROPILOT_LOG_LEVEL";

/// Top-level configuration aggregating all sub-configs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NeuropilotConfig {
    pub model: ModelConfig,
    pub store: StoreConfig,
    pub prediction: PredictionConfig,
    pub training: TrainingConfig,
    pub server: ServerConfig,
    pub observability: ObservabilityConfig,
}

impl NeuropilotConfig {
    /// Load configuration from an optional file plus environment overrides.
    ///
    /// An explicit `path` must exist. Without one, `neuropilot.toml` in the
    /// working directory is used when present.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILENAME);
                if fallback.exists() {
                    Self::from_file(fallback)?
                } else {
                    Self::default()
                }
            }
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Load configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Apply `NEUROPILOT_*` overrides using the given variable lookup.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(root) = lookup(ENV_STORE_ROOT).filter(|v| !v.is_empty()) {
            self.store.root = root;
        }
        if let Some(addr) = lookup(ENV_BIND_ADDR).filter(|v| !v.is_empty()) {
            self.server.bind_addr = addr;
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL).filter(|v| !v.is_empty()) {
            self.observability.log_level = level;
        }
    }

    /// Validate the configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let model = &self.model;
        if model.input_size != FEATURE_COUNT {
            return Err(invalid(
                "model.input_size",
                format!("must equal the feature count ({FEATURE_COUNT})"),
            ));
        }
        for (field, size) in [
            ("model.trunk_size", model.trunk_size),
            ("model.hidden_size", model.hidden_size),
            ("model.num_commands", model.num_commands),
        ] {
            if size == 0 {
                return Err(invalid(field, "must be greater than 0"));
            }
        }
        for (field, p) in [
            ("model.trunk_dropout", model.trunk_dropout),
            ("model.hidden_dropout", model.hidden_dropout),
        ] {
            if !(0.0..1.0).contains(&p) {
                return Err(invalid(field, "must be in [0.0, 1.0)"));
            }
        }

        if self.store.root.trim().is_empty() {
            return Err(invalid("store.root", "must not be empty"));
        }

        let prediction = &self.prediction;
        if prediction.history_capacity == 0 {
            return Err(invalid("prediction.history_capacity", "must be greater than 0"));
        }
        if !(0.0..=1.0).contains(&prediction.hesitation_threshold) {
            return Err(invalid(
                "prediction.hesitation_threshold",
                "must be between 0.0 and 1.0",
            ));
        }

        let training = &self.training;
        if training.epochs == 0 {
            return Err(invalid("training.epochs", "must be greater than 0"));
        }
        if !(training.learning_rate > 0.0 && training.learning_rate.is_finite()) {
            return Err(invalid("training.learning_rate", "must be a positive number"));
        }
        if training.batch_size == 0 {
            return Err(invalid("training.batch_size", "must be greater than 0"));
        }
        if training.num_samples == 0 {
            return Err(invalid("training.num_samples", "must be greater than 0"));
        }
        if training.report_every == 0 {
            return Err(invalid("training.report_every", "must be greater than 0"));
        }

        if self.server.max_body_bytes == 0 {
            return Err(invalid("server.max_body_bytes", "must be greater than 0"));
        }
        if self.server.read_timeout_secs == 0 {
            return Err(invalid("server.read_timeout_secs", "must be greater than 0"));
        }
        Ok(())
    }
}

fn invalid(field: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationFailed {
        field: field.to_string(),
        message: message.into(),
    }
}
