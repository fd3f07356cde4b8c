//! ModelManager: the one live model of the process.
//!
//! State machine: Unloaded → (load ok) → Loaded(v) → (load ok) → Loaded(v').
//! A failed load never touches the live model: the replacement network is
//! fully built and restored before the write lock is taken for the swap.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use chrono::Utc;
use neuropilot_core::config::{ModelConfig, StoreConfig};
use neuropilot_core::constants::CURRENT_ALIAS;
use neuropilot_core::errors::ModelError;
use neuropilot_core::models::ActiveVersion;
use neuropilot_observability::model_load_span;
use tracing::{info, warn};

use crate::network::HesitationNetwork;
use crate::store::ParameterStore;
use crate::ModelResult;

/// A network restored from an artifact, tagged with its resolved version.
pub struct LoadedModel {
    version: String,
    network: HesitationNetwork,
}

impl LoadedModel {
    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn network(&self) -> &HesitationNetwork {
        &self.network
    }
}

/// Single source of truth for which trained parameters are active.
///
/// Readers get an `Arc` to the live model and release the lock before
/// running inference, so a reload never blocks on in-flight predictions.
pub struct ModelManager {
    store: ParameterStore,
    config: ModelConfig,
    live: RwLock<Option<Arc<LoadedModel>>>,
    /// Serializes artifact commit and alias update within the process.
    save_lock: Mutex<()>,
}

impl ModelManager {
    /// Create an unloaded manager over the configured store.
    pub fn new(store_config: &StoreConfig, config: ModelConfig) -> Self {
        Self::with_store(ParameterStore::new(&store_config.root), config)
    }

    pub fn with_store(store: ParameterStore, config: ModelConfig) -> Self {
        Self {
            store,
            config,
            live: RwLock::new(None),
            save_lock: Mutex::new(()),
        }
    }

    /// Load `version` (or the version "current" resolves to) and make it live.
    ///
    /// Returns `false` on any failure; the error is logged and the previous
    /// model, if any, stays live.
    pub fn load(&self, version: &str) -> bool {
        match self.try_load(version) {
            Ok(_) => true,
            Err(e) => {
                warn!(requested = version, error = %e, "model load failed");
                false
            }
        }
    }

    /// Typed-error variant of [`load`](Self::load).
    pub fn try_load(&self, version: &str) -> ModelResult<Arc<LoadedModel>> {
        let _span = model_load_span!(version).entered();

        let (resolved, expected_checksum) = self.resolve(version)?;
        let path = self.store.artifact_path(&resolved)?;
        if !path.exists() {
            return Err(ModelError::ArtifactNotFound {
                version: resolved,
                path: path.display().to_string(),
            });
        }

        if let Some(expected) = expected_checksum {
            let actual = ParameterStore::checksum(&path)?;
            if actual != expected {
                return Err(ModelError::ChecksumMismatch {
                    version: resolved,
                    expected,
                    actual,
                });
            }
        }

        let network = HesitationNetwork::load(&self.config, &path)?;
        let loaded = Arc::new(LoadedModel {
            version: resolved,
            network,
        });

        let previous = self
            .live
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(Arc::clone(&loaded));

        info!(
            version = %loaded.version,
            previous = ?previous.as_ref().map(|m| m.version.as_str()),
            parameters = loaded.network.parameter_count(),
            "model loaded"
        );
        Ok(loaded)
    }

    /// Resolve a requested version to a concrete label plus the checksum the
    /// alias recorded for it, when the alias points at that version.
    fn resolve(&self, requested: &str) -> ModelResult<(String, Option<String>)> {
        if requested == CURRENT_ALIAS {
            let record = self
                .store
                .read_alias()?
                .ok_or_else(|| ModelError::AliasUnresolved {
                    alias: CURRENT_ALIAS.to_string(),
                })?;
            return Ok((record.active_version, Some(record.checksum)));
        }

        ParameterStore::validate_version(requested)?;
        // A corrupted alias must not block explicit loads.
        let checksum = self
            .store
            .read_alias()
            .ok()
            .flatten()
            .filter(|record| record.active_version == requested)
            .map(|record| record.checksum);
        Ok((requested.to_string(), checksum))
    }

    /// Persist a network under `version` and point the alias at it.
    ///
    /// The live model is not changed; call [`load`](Self::load) to serve the
    /// saved version. Saving the same parameters under the same version
    /// again produces the same artifact.
    pub fn save(&self, network: &HesitationNetwork, version: &str) -> ModelResult<PathBuf> {
        let path = self.store.artifact_path(version)?;

        let staging = self.store.stage()?;
        network
            .save(staging.path())
            .map_err(|e| ModelError::SaveFailed {
                version: version.to_string(),
                reason: e.to_string(),
            })?;
        let checksum = ParameterStore::checksum(staging.path())?;

        let _guard = self.save_lock.lock().unwrap_or_else(PoisonError::into_inner);
        ParameterStore::commit(staging, &path)?;
        self.store.write_alias(&ActiveVersion {
            active_version: version.to_string(),
            checksum,
            updated_at: Utc::now(),
        })?;

        info!(version, path = %path.display(), "model saved and marked current");
        Ok(path)
    }

    /// The live model, if any.
    pub fn get(&self) -> Option<Arc<LoadedModel>> {
        self.live
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_loaded(&self) -> bool {
        self.live
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Resolved version of the live model.
    pub fn current_version(&self) -> Option<String> {
        self.get().map(|m| m.version.clone())
    }

    pub fn store(&self) -> &ParameterStore {
        &self.store
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }
}
