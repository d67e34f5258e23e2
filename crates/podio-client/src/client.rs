use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use url::Url;

use podio_remote::{
    App, AppConfig, AppField, AppFieldConfig, CreateAppFieldParams, CreateSpaceParams,
    Organization, RemoteClient, RemoteError, Space, UpdateSpaceParams,
};

use crate::auth::{ClientOptions, password_grant};

/// Authenticated client for the Podio REST API.
///
/// Built once by [`PodioClient::authenticate`]; the access token is fixed for
/// the lifetime of the value, so a single instance can be shared freely
/// between concurrent callers.
pub struct PodioClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl std::fmt::Debug for PodioClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PodioClient")
            .field("base_url", &self.base_url)
            .field("token", &"***")
            .finish()
    }
}

#[derive(Deserialize)]
struct SpaceCreated {
    space_id: i64,
}

#[derive(Deserialize)]
struct AppCreated {
    app_id: i64,
}

#[derive(Deserialize)]
struct FieldCreated {
    field_id: i64,
}

impl PodioClient {
    /// Exchanges user credentials for an access token and returns a ready client.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::Authentication` if the credentials are rejected and
    /// `RemoteError::Transport` if the API cannot be reached.
    pub async fn authenticate(
        options: ClientOptions,
        username: &str,
        password: &str,
    ) -> Result<Self, RemoteError> {
        let http = reqwest::Client::builder()
            .user_agent(options.user_agent.clone())
            .timeout(options.timeout)
            .build()
            .map_err(|e| RemoteError::transport(format!("Failed to build HTTP client: {e}")))?;

        let token = password_grant(&http, &options, username, password).await?;
        tracing::debug!(base_url = %options.base_url, "Authenticated with Podio");

        Ok(Self {
            http,
            base_url: options.root(),
            token: token.access_token,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, url)
            .header("Authorization", format!("OAuth2 {}", self.token))
            .header("Accept", "application/json")
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        entity: &str,
        id: &str,
    ) -> Result<T, RemoteError> {
        let resp = self
            .request(reqwest::Method::GET, &self.url(path))
            .send()
            .await
            .map_err(transport)?;
        handle_response(resp, entity, id).await
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        method: reqwest::Method,
        path: &str,
        body: &Value,
        entity: &str,
        id: &str,
    ) -> Result<T, RemoteError> {
        let resp = self
            .request(method, &self.url(path))
            .json(body)
            .send()
            .await
            .map_err(transport)?;
        handle_response(resp, entity, id).await
    }

    async fn send_delete(&self, path: &str, entity: &str, id: &str) -> Result<(), RemoteError> {
        let resp = self
            .request(reqwest::Method::DELETE, &self.url(path))
            .send()
            .await
            .map_err(transport)?;
        let _: Value = handle_response(resp, entity, id).await?;
        Ok(())
    }
}

fn transport(err: reqwest::Error) -> RemoteError {
    RemoteError::transport(format!("Failed to connect to server: {err}"))
}

fn body_of<T: serde::Serialize>(value: &T) -> Result<Value, RemoteError> {
    serde_json::to_value(value).map_err(|e| RemoteError::decode(e.to_string()))
}

/// Extracts the API's error description from a response body, falling back to
/// the raw body.
pub(crate) fn error_message(body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<Value>(body) {
        let description = json
            .get("error_description")
            .and_then(Value::as_str)
            .or_else(|| json.get("error").and_then(Value::as_str));
        if let Some(msg) = description {
            return msg.to_string();
        }
    }
    body.to_string()
}

async fn handle_response<T: DeserializeOwned>(
    resp: reqwest::Response,
    entity: &str,
    id: &str,
) -> Result<T, RemoteError> {
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();

    if !status.is_success() {
        return Err(match status.as_u16() {
            // Deleted objects answer 410 Gone; for reconciliation both mean "absent".
            404 | 410 => RemoteError::not_found(entity, id),
            401 => RemoteError::authentication(error_message(&body)),
            code => RemoteError::api(code, error_message(&body)),
        });
    }

    let body = if body.trim().is_empty() { "null" } else { body.as_str() };
    serde_json::from_str(body)
        .map_err(|e| RemoteError::decode(format!("Failed to parse response JSON: {e}")))
}

#[async_trait]
impl RemoteClient for PodioClient {
    async fn get_organization(&self, org_id: i64) -> Result<Organization, RemoteError> {
        let id = org_id.to_string();
        self.get_json(&format!("org/{id}"), "org", &id).await
    }

    async fn get_organization_by_slug(
        &self,
        url_label: &str,
    ) -> Result<Organization, RemoteError> {
        let org_url = format!("https://podio.com/{url_label}");
        let url = Url::parse_with_params(&self.url("org/url"), &[("org_url", org_url.as_str())])
            .map_err(|e| RemoteError::transport(e.to_string()))?;
        let resp = self
            .request(reqwest::Method::GET, url.as_str())
            .send()
            .await
            .map_err(transport)?;
        handle_response(resp, "org", url_label).await
    }

    async fn create_space(&self, params: &CreateSpaceParams) -> Result<Space, RemoteError> {
        let created: SpaceCreated = self
            .send_json(reqwest::Method::POST, "space/", &body_of(params)?, "space", "")
            .await?;
        self.get_space(created.space_id).await
    }

    async fn get_space(&self, space_id: i64) -> Result<Space, RemoteError> {
        let id = space_id.to_string();
        self.get_json(&format!("space/{id}"), "space", &id).await
    }

    async fn update_space(
        &self,
        space_id: i64,
        params: &UpdateSpaceParams,
    ) -> Result<Space, RemoteError> {
        let id = space_id.to_string();
        let _: Value = self
            .send_json(
                reqwest::Method::PUT,
                &format!("space/{id}"),
                &body_of(params)?,
                "space",
                &id,
            )
            .await?;
        self.get_space(space_id).await
    }

    async fn delete_space(&self, space_id: i64) -> Result<(), RemoteError> {
        let id = space_id.to_string();
        self.send_delete(&format!("space/{id}"), "space", &id).await
    }

    async fn create_app(&self, space_id: i64, config: &AppConfig) -> Result<App, RemoteError> {
        let body = json!({ "space_id": space_id, "config": body_of(config)? });
        let created: AppCreated = self
            .send_json(reqwest::Method::POST, "app/", &body, "app", "")
            .await?;
        self.get_app(created.app_id).await
    }

    async fn get_app(&self, app_id: i64) -> Result<App, RemoteError> {
        let id = app_id.to_string();
        self.get_json(&format!("app/{id}"), "app", &id).await
    }

    async fn update_app(&self, app_id: i64, config: &AppConfig) -> Result<App, RemoteError> {
        let id = app_id.to_string();
        let body = json!({ "config": body_of(config)? });
        let _: Value = self
            .send_json(reqwest::Method::PUT, &format!("app/{id}"), &body, "app", &id)
            .await?;
        self.get_app(app_id).await
    }

    async fn delete_app(&self, app_id: i64) -> Result<(), RemoteError> {
        let id = app_id.to_string();
        self.send_delete(&format!("app/{id}"), "app", &id).await
    }

    async fn create_app_field(
        &self,
        app_id: i64,
        params: &CreateAppFieldParams,
    ) -> Result<AppField, RemoteError> {
        let created: FieldCreated = self
            .send_json(
                reqwest::Method::POST,
                &format!("app/{app_id}/field/"),
                &body_of(params)?,
                "field",
                "",
            )
            .await?;
        self.get_app_field(app_id, created.field_id).await
    }

    async fn get_app_field(&self, app_id: i64, field_id: i64) -> Result<AppField, RemoteError> {
        let id = format!("{app_id}/{field_id}");
        let mut field: AppField = self
            .get_json(&format!("app/{app_id}/field/{field_id}"), "field", &id)
            .await?;
        field.app_id = app_id;
        Ok(field)
    }

    async fn update_app_field(
        &self,
        app_id: i64,
        field_id: i64,
        config: &AppFieldConfig,
    ) -> Result<AppField, RemoteError> {
        let id = format!("{app_id}/{field_id}");
        let _: Value = self
            .send_json(
                reqwest::Method::PUT,
                &format!("app/{app_id}/field/{field_id}"),
                &body_of(config)?,
                "field",
                &id,
            )
            .await?;
        self.get_app_field(app_id, field_id).await
    }

    async fn delete_app_field(&self, app_id: i64, field_id: i64) -> Result<(), RemoteError> {
        let id = format!("{app_id}/{field_id}");
        self.send_delete(&format!("app/{app_id}/field/{field_id}"), "field", &id)
            .await
    }

    fn backend_name(&self) -> &'static str {
        "podio"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_prefers_description() {
        let body = r#"{"error":"forbidden","error_description":"The space cannot be deleted"}"#;
        assert_eq!(error_message(body), "The space cannot be deleted");

        let body = r#"{"error":"forbidden"}"#;
        assert_eq!(error_message(body), "forbidden");

        assert_eq!(error_message("gateway timeout"), "gateway timeout");
    }
}
