//! Versioned parameter store.
//!
//! Layout under the root directory:
//! - `<version>_model.safetensors`, one per saved version, never deleted
//! - `current.json`, the alias record naming the active version
//!
//! Every file is written to a uniquely named staging file in the root and
//! renamed into place, so readers never observe a half-written artifact or
//! alias and concurrent writers never share a staging file.

use std::io::Write;
use std::path::{Path, PathBuf};

use neuropilot_core::constants::{ALIAS_RECORD_FILENAME, ARTIFACT_SUFFIX, CURRENT_ALIAS};
use neuropilot_core::errors::StoreError;
use neuropilot_core::models::ActiveVersion;
use tempfile::NamedTempFile;
use tracing::debug;

/// Prefix of in-progress writes inside the root.
const STAGING_PREFIX: &str = ".staging-";

/// Directory of versioned artifacts plus the alias record.
#[derive(Debug, Clone)]
pub struct ParameterStore {
    root: PathBuf,
}

impl ParameterStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Check that a version label is usable as a file-name component.
    pub fn validate_version(version: &str) -> Result<(), StoreError> {
        let reject = |reason: &str| {
            Err(StoreError::InvalidVersion {
                version: version.to_string(),
                reason: reason.to_string(),
            })
        };
        if version.is_empty() {
            return reject("must not be empty");
        }
        if version == CURRENT_ALIAS {
            return reject("reserved for the alias");
        }
        if version.starts_with('.') {
            return reject("must not start with '.'");
        }
        if !version
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        {
            return reject("only ASCII letters, digits, '.', '_' and '-' are allowed");
        }
        Ok(())
    }

    /// Path of the artifact for `version`.
    pub fn artifact_path(&self, version: &str) -> Result<PathBuf, StoreError> {
        Self::validate_version(version)?;
        Ok(self.root.join(format!("{version}{ARTIFACT_SUFFIX}")))
    }

    pub fn alias_path(&self) -> PathBuf {
        self.root.join(ALIAS_RECORD_FILENAME)
    }

    /// Create the root directory if absent.
    pub fn ensure_root(&self) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.root).map_err(|e| io_error(&self.root, e))
    }

    /// Create a fresh staging file in the root.
    ///
    /// The file is removed on drop unless it is committed.
    pub fn stage(&self) -> Result<NamedTempFile, StoreError> {
        self.ensure_root()?;
        tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .suffix(".tmp")
            .tempfile_in(&self.root)
            .map_err(|e| io_error(&self.root, e))
    }

    /// Move a fully written staging file over its destination.
    pub fn commit(staging: NamedTempFile, destination: &Path) -> Result<(), StoreError> {
        staging
            .persist(destination)
            .map(|_| ())
            .map_err(|e| io_error(destination, e.error))
    }

    /// Read the alias record. `Ok(None)` when no version has been made current.
    pub fn read_alias(&self) -> Result<Option<ActiveVersion>, StoreError> {
        let path = self.alias_path();
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(io_error(&path, e)),
        };
        let record: ActiveVersion =
            serde_json::from_str(&content).map_err(|e| StoreError::AliasCorrupted {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
        Self::validate_version(&record.active_version).map_err(|e| {
            StoreError::AliasCorrupted {
                path: path.display().to_string(),
                reason: e.to_string(),
            }
        })?;
        Ok(Some(record))
    }

    /// Replace the alias record.
    pub fn write_alias(&self, record: &ActiveVersion) -> Result<(), StoreError> {
        let path = self.alias_path();
        let body = serde_json::to_vec_pretty(record).map_err(|e| StoreError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let mut staging = self.stage()?;
        staging
            .write_all(&body)
            .and_then(|()| staging.as_file().sync_all())
            .map_err(|e| io_error(staging.path(), e))?;
        Self::commit(staging, &path)?;
        debug!(version = %record.active_version, "alias record updated");
        Ok(())
    }

    /// blake3 hex digest of a file.
    pub fn checksum(path: &Path) -> Result<String, StoreError> {
        let bytes = std::fs::read(path).map_err(|e| io_error(path, e))?;
        Ok(blake3::hash(&bytes).to_hex().to_string())
    }

    /// Versions with an artifact on disk, sorted.
    pub fn list_versions(&self) -> Result<Vec<String>, StoreError> {
        let entries = match std::fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_error(&self.root, e)),
        };

        let mut versions: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                let name = entry.file_name().into_string().ok()?;
                let version = name.strip_suffix(ARTIFACT_SUFFIX)?;
                Self::validate_version(version).ok()?;
                Some(version.to_string())
            })
            .collect();
        versions.sort();
        Ok(versions)
    }
}

fn io_error(path: &Path, e: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.display().to_string(),
        reason: e.to_string(),
    }
}
