//! Wire types for the remote API.
//!
//! Request types use `Option` for every attribute the caller may leave to the
//! server; unset options are omitted from the serialized body so the server
//! applies its own default.

use serde::{Deserialize, Serialize};

/// An organization as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub org_id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub url_label: String,
}

/// A space (workspace) within an organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Space {
    pub space_id: i64,
    pub org_id: i64,
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub url_label: String,
    #[serde(default)]
    pub privacy: String,
    #[serde(default)]
    pub auto_join: bool,
    #[serde(default)]
    pub post_on_new_app: bool,
    #[serde(default)]
    pub post_on_new_member: bool,
}

/// Body of a space creation request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateSpaceParams {
    pub org_id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub privacy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_join: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_on_new_app: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_on_new_member: Option<bool>,
}

/// Body of a space update request. The owning organization cannot change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateSpaceParams {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub privacy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_join: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_on_new_app: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_on_new_member: Option<bool>,
}

/// An app within a space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct App {
    pub app_id: i64,
    pub space_id: i64,
    pub config: AppConfig,
}

/// App configuration, used both as request body and in responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub app_type: Option<String>,
    pub item_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_edit: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_attachments: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_comments: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub silent_creates: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub silent_edits: Option<bool>,
}

/// A field within an app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppField {
    pub field_id: i64,
    /// Owning app. Field responses do not carry it, so clients fill it in.
    #[serde(default)]
    pub app_id: i64,
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    pub config: AppFieldConfig,
}

/// App field configuration, used both as request body and in responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppFieldConfig {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delta: Option<i64>,
}

/// Body of an app field creation request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateAppFieldParams {
    #[serde(rename = "type")]
    pub field_type: String,
    pub config: AppFieldConfig,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unset_params_are_omitted() {
        let params = CreateSpaceParams {
            org_id: 42,
            name: "Eng".into(),
            privacy: Some("closed".into()),
            ..Default::default()
        };
        let body = serde_json::to_value(&params).unwrap();
        assert_eq!(body, json!({"org_id": 42, "name": "Eng", "privacy": "closed"}));
    }

    #[test]
    fn test_app_type_renamed() {
        let config = AppConfig {
            name: "Tasks".into(),
            app_type: Some("standard".into()),
            item_name: "Task".into(),
            ..Default::default()
        };
        let body = serde_json::to_value(&config).unwrap();
        assert_eq!(body["type"], "standard");
        assert!(body.get("icon").is_none());
    }

    #[test]
    fn test_space_response_tolerates_missing_flags() {
        let space: Space = serde_json::from_value(json!({
            "space_id": 1,
            "org_id": 42,
            "name": "Eng",
            "url": "https://podio.com/acme/eng"
        }))
        .unwrap();
        assert!(!space.auto_join);
        assert_eq!(space.privacy, "");
    }

    #[test]
    fn test_field_response_without_app_id() {
        let field: AppField = serde_json::from_value(json!({
            "field_id": 9,
            "type": "text",
            "external_id": "title",
            "config": {"label": "Title", "required": true, "delta": 0}
        }))
        .unwrap();
        assert_eq!(field.app_id, 0);
        assert_eq!(field.config.required, Some(true));
        assert_eq!(field.external_id.as_deref(), Some("title"));
    }
}
