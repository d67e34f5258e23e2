use std::time::Duration;

use serde::Deserialize;
use url::Url;

use podio_remote::RemoteError;

pub const DEFAULT_BASE_URL: &str = "https://api.podio.com";

/// Fixed settings of an API client, independent of the user being authenticated.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub api_key: String,
    pub api_secret: String,
    pub user_agent: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl ClientOptions {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            user_agent: format!("podio-provider/{}", env!("CARGO_PKG_VERSION")),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Points the client at another API root, e.g. a mock server.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, RemoteError> {
        let parsed = Url::parse(base_url)
            .map_err(|e| RemoteError::transport(format!("invalid base URL '{base_url}': {e}")))?;
        self.base_url = parsed.as_str().trim_end_matches('/').to_string();
        Ok(self)
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Base URL without a trailing slash, ready for path concatenation.
    pub(crate) fn root(&self) -> String {
        self.base_url.trim_end_matches('/').to_string()
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
}

/// Password-grant token exchange.
pub(crate) async fn password_grant(
    http: &reqwest::Client,
    options: &ClientOptions,
    username: &str,
    password: &str,
) -> Result<TokenResponse, RemoteError> {
    let resp = http
        .post(format!("{}/oauth/token", options.root()))
        .form(&[
            ("grant_type", "password"),
            ("username", username),
            ("password", password),
            ("client_id", options.api_key.as_str()),
            ("client_secret", options.api_secret.as_str()),
        ])
        .send()
        .await
        .map_err(|e| RemoteError::transport(format!("Failed to connect to server: {e}")))?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        return Err(RemoteError::authentication(format!(
            "token request failed (HTTP {status}): {}",
            crate::client::error_message(&body)
        )));
    }

    resp.json()
        .await
        .map_err(|e| RemoteError::decode(format!("Failed to parse token response: {e}")))
}
