/// Model definition, loading, and inference errors.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("model artifact not found for version {version}: {path}")]
    ArtifactNotFound { version: String, path: String },

    #[error("alias '{alias}' does not point at any version")]
    AliasUnresolved { alias: String },

    #[error("model load failed: {path}: {reason}")]
    LoadFailed { path: String, reason: String },

    #[error("checksum mismatch for version {version}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        version: String,
        expected: String,
        actual: String,
    },

    #[error("network construction failed: {reason}")]
    ConstructionFailed { reason: String },

    #[error("forward pass failed: {reason}")]
    ForwardFailed { reason: String },

    #[error("model save failed for version {version}: {reason}")]
    SaveFailed { version: String, reason: String },

    #[error("parameter store error: {0}")]
    Store(#[from] super::StoreError),
}
