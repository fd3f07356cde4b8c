use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The alias record stored next to the artifacts.
///
/// Resolves the "current" alias to a concrete version without relying on
/// filesystem links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveVersion {
    /// Version label the alias points at.
    pub active_version: String,
    /// blake3 hex digest of the artifact at the time it became active.
    pub checksum: String,
    pub updated_at: DateTime<Utc>,
}
