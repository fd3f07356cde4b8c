/// Parameter-store (artifact directory + alias record) errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("invalid version label '{version}': {reason}")]
    InvalidVersion { version: String, reason: String },

    #[error("alias record {path} is corrupted: {reason}")]
    AliasCorrupted { path: String, reason: String },
}
