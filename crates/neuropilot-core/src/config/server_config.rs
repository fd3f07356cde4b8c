use serde::{Deserialize, Serialize};

use super::defaults;

/// HTTP server configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address the server binds to.
    pub bind_addr: String,
    /// Requests with a larger body are rejected with 413.
    pub max_body_bytes: usize,
    /// Connections that have not delivered a full request within this many
    /// seconds are answered with 408 and closed.
    pub read_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: defaults::DEFAULT_BIND_ADDR.to_string(),
            max_body_bytes: defaults::DEFAULT_MAX_BODY_BYTES,
            read_timeout_secs: defaults::DEFAULT_READ_TIMEOUT_SECS,
        }
    }
}
