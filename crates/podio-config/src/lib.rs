//! Provider configuration for the Podio provider.
//!
//! Settings are layered from an optional TOML file and `PODIO__`-prefixed
//! environment variables:
//!
//! ```toml
//! client_id = "my-app"
//! client_secret = "..."
//! username = "ops@example.com"
//! password = "..."
//! trust_level = 2
//! ```
//!
//! `PODIO__PASSWORD=...` overrides the file value.

pub mod loader;
pub mod provider;
pub mod secrets;

pub use loader::{DEFAULT_CONFIG_FILE, ENV_PREFIX, load_config, load_config_with_prefix};
pub use provider::{Credentials, ProviderConfig};
pub use secrets::Secret;

/// Error types for configuration operations
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl ConfigError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

/// Build and deserialize failures from the `config` crate are parse errors.
impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        Self::Parse(err.to_string())
    }
}
