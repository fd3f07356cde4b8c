use serde::{Deserialize, Serialize};

use super::defaults;

/// Parameter-store configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory holding one artifact per version plus the alias record.
    pub root: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            root: defaults::DEFAULT_STORE_ROOT.to_string(),
        }
    }
}
