use serde::{Deserialize, Serialize};

use crate::{ConfigError, Secret};

pub const DEFAULT_BASE_URL: &str = "https://api.podio.com";

/// Provider-level settings: API credentials and connection tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub client_secret: Option<Secret>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<Secret>,
    /// Account trust level. Low levels cannot delete spaces or apps, which is
    /// what `ignore_delete_errors` on each resource exists for.
    #[serde(default = "default_trust_level")]
    pub trust_level: i64,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_trust_level() -> i64 {
    2
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            username: None,
            password: None,
            trust_level: default_trust_level(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Borrowed view of a validated configuration's credentials.
#[derive(Debug, Clone, Copy)]
pub struct Credentials<'a> {
    pub client_id: &'a str,
    pub client_secret: &'a Secret,
    pub username: &'a str,
    pub password: &'a Secret,
}

impl ProviderConfig {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<Secret>,
        username: impl Into<String>,
        password: impl Into<Secret>,
    ) -> Self {
        Self {
            client_id: Some(client_id.into()),
            client_secret: Some(client_secret.into()),
            username: Some(username.into()),
            password: Some(password.into()),
            ..Default::default()
        }
    }

    /// Checks the configuration, reporting every missing credential at once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let missing: Vec<&str> = [
            ("client_id", self.client_id.as_deref().is_none_or(str::is_empty)),
            (
                "client_secret",
                self.client_secret.as_ref().is_none_or(Secret::is_empty),
            ),
            ("username", self.username.as_deref().is_none_or(str::is_empty)),
            ("password", self.password.as_ref().is_none_or(Secret::is_empty)),
        ]
        .into_iter()
        .filter_map(|(name, absent)| absent.then_some(name))
        .collect();

        if !missing.is_empty() {
            return Err(ConfigError::validation(format!(
                "missing required settings: {}",
                missing.join(", ")
            )));
        }
        if self.trust_level < 0 {
            return Err(ConfigError::validation("trust_level must be >= 0"));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::validation("timeout_secs must be > 0"));
        }
        url::Url::parse(&self.base_url)
            .map_err(|e| ConfigError::validation(format!("base_url is not a valid URL: {e}")))?;
        Ok(())
    }

    /// Validates and returns the credentials in one step.
    pub fn credentials(&self) -> Result<Credentials<'_>, ConfigError> {
        self.validate()?;
        match (
            self.client_id.as_deref(),
            self.client_secret.as_ref(),
            self.username.as_deref(),
            self.password.as_ref(),
        ) {
            (Some(client_id), Some(client_secret), Some(username), Some(password)) => {
                Ok(Credentials {
                    client_id,
                    client_secret,
                    username,
                    password,
                })
            }
            _ => Err(ConfigError::validation("credentials are incomplete")),
        }
    }

    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = ProviderConfig::default();
        assert_eq!(cfg.trust_level, 2);
        assert_eq!(cfg.base_url, "https://api.podio.com");
        assert_eq!(cfg.timeout_secs, 30);
    }

    #[test]
    fn test_validate_reports_all_missing_credentials() {
        let cfg = ProviderConfig {
            client_id: Some("app".into()),
            ..Default::default()
        };
        let err = cfg.validate().unwrap_err().to_string();
        assert!(
            err.contains("client_secret, username, password"),
            "unexpected message: {err}"
        );
        assert!(!err.contains("client_id"));
    }

    #[test]
    fn test_empty_values_count_as_missing() {
        let cfg = ProviderConfig::new("app", "", "ops", "pw");
        let err = cfg.validate().unwrap_err().to_string();
        assert!(err.contains("client_secret"));
    }

    #[test]
    fn test_validate_rejects_bad_tuning() {
        let mut cfg = ProviderConfig::new("app", "secret", "ops", "pw");
        assert!(cfg.validate().is_ok());

        cfg.trust_level = -1;
        assert!(cfg.validate().is_err());

        cfg.trust_level = 0;
        cfg.timeout_secs = 0;
        assert!(cfg.validate().is_err());

        cfg.timeout_secs = 5;
        cfg.base_url = "not a url".into();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_credentials_view() {
        let cfg = ProviderConfig::new("app", "secret", "ops", "pw");
        let creds = cfg.credentials().unwrap();
        assert_eq!(creds.client_id, "app");
        assert_eq!(creds.password.expose(), "pw");
    }

    #[test]
    fn test_serialized_config_hides_secrets() {
        let cfg = ProviderConfig::new("app", "secret", "ops", "pw");
        let rendered = toml::to_string(&cfg).unwrap();
        assert!(rendered.contains("client_secret = \"***\""));
        assert!(!rendered.contains("pw"));
    }
}
