use std::path::{Path, PathBuf};

use config::{Config, Environment, File};

use crate::{ConfigError, ProviderConfig};

pub const DEFAULT_CONFIG_FILE: &str = "podio.toml";
pub const ENV_PREFIX: &str = "PODIO";

/// Loads provider configuration from `path` (or `podio.toml` in the working
/// directory) overlaid with `PODIO__*` environment variables.
///
/// The result is not validated: credentials may legitimately be supplied
/// later, and `Provider::configure` validates before authenticating.
pub fn load_config(path: Option<&Path>) -> Result<ProviderConfig, ConfigError> {
    load_config_with_prefix(path, ENV_PREFIX)
}

/// Same as [`load_config`] with a custom environment prefix.
pub fn load_config_with_prefix(
    path: Option<&Path>,
    env_prefix: &str,
) -> Result<ProviderConfig, ConfigError> {
    let mut builder = Config::builder();
    match path {
        Some(p) => {
            if !p.exists() {
                return Err(ConfigError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("config file not found: {}", p.display()),
                )));
            }
            builder = builder.add_source(File::from(p.to_path_buf()));
        }
        None => {
            let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
            if default_path.exists() {
                builder = builder.add_source(File::from(default_path));
            }
        }
    }
    // Environment variable overrides, e.g. PODIO__CLIENT_ID=my-app
    builder = builder.add_source(
        Environment::with_prefix(env_prefix)
            .try_parsing(true)
            .separator("__"),
    );

    let merged: ProviderConfig = builder.build()?.try_deserialize()?;

    tracing::debug!(
        base_url = %merged.base_url,
        trust_level = merged.trust_level,
        "Loaded provider configuration"
    );
    Ok(merged)
}
