use serde::{Deserialize, Serialize};

/// Engine limits and defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Timeout used when the caller doesn't pick one (seconds).
    #[serde(default = "default_timeout_secs")]
    pub default_timeout_secs: u64,
    /// Upper bound on a contract timeout (seconds). `None` means unbounded.
    #[serde(default)]
    pub max_timeout_secs: Option<u64>,
}

fn default_timeout_secs() -> u64 {
    // 21 minutes
    1260
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_timeout_secs: default_timeout_secs(),
            max_timeout_secs: None,
        }
    }
}
