//! CLI configuration loading and management.

use std::path::Path;
use std::sync::Arc;

use htlc_core::{AuthorizationVerifier, Ed25519Verifier, EngineConfig, SharedSecretVerifier};
use serde::{Deserialize, Serialize};

/// Full configuration for the `htlc` tool.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HtlcConfig {
    /// Engine limits.
    #[serde(default)]
    pub engine: EngineConfig,

    /// Authorization scheme.
    #[serde(default)]
    pub auth: AuthConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum AuthScheme {
    /// Credential must equal the pre-shared key.
    #[default]
    SharedSecret,
    /// Credential is an Ed25519 signature over the branch challenge.
    Ed25519,
}

impl AuthScheme {
    pub fn verifier(&self) -> Arc<dyn AuthorizationVerifier> {
        match self {
            Self::SharedSecret => Arc::new(SharedSecretVerifier),
            Self::Ed25519 => Arc::new(Ed25519Verifier),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AuthConfig {
    #[serde(default)]
    pub scheme: AuthScheme,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (text, json).
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".into()
}
fn default_log_format() -> String {
    "text".into()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl HtlcConfig {
    /// Read `htlc.toml`. Any of `[engine]`, `[auth]` or `[logging]` may be
    /// omitted, and a missing file yields the built-in settings.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            let config: HtlcConfig = toml::from_str(&contents)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Write every section out, so `htlc init` leaves an editable file.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let contents = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, contents)?;
        Ok(())
    }
}
