use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;

use podio_core::{AttrType, Record, Result};
use podio_remote::{App, AppConfig, RemoteClient};

use crate::controller::ResourceKind;
use crate::schema::{AttributeSpec, EntitySchema, SchemaKind};
use crate::validators::{MatchesRegex, OneOf};

pub const TYPE_NAME: &str = "podio_app";

static ICON_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.png$").expect("Invalid icon regex"));

static SCHEMA: LazyLock<EntitySchema> = LazyLock::new(|| {
    EntitySchema::new(TYPE_NAME, SchemaKind::Resource, "An app within a space in Podio")
        .id_attribute("app_id")
        .attribute(AttributeSpec::computed("app_id", AttrType::Int64, "ID of the app"))
        .attribute(
            AttributeSpec::required("space_id", AttrType::Int64, "ID of the space").force_new(),
        )
        .attribute(AttributeSpec::required("name", AttrType::String, "Name of the app"))
        .attribute(
            AttributeSpec::optional_computed("type", AttrType::String, "Type of the app.")
                .with_validator(OneOf::new(&["standard", "meeting", "contact"])),
        )
        .attribute(AttributeSpec::required(
            "item_name",
            AttrType::String,
            "Name of the item type to use for the app",
        ))
        .attribute(AttributeSpec::optional_computed(
            "description",
            AttrType::String,
            "Description of the app",
        ))
        .attribute(AttributeSpec::optional_computed(
            "usage",
            AttrType::String,
            "How the app should be used.",
        ))
        .attribute(
            AttributeSpec::optional(
                "icon",
                AttrType::String,
                "Icon of the app, in the format `12.png`.",
            )
            .with_validator(MatchesRegex::new(&ICON_REGEX)),
        )
        .attribute(AttributeSpec::optional_computed(
            "allow_edit",
            AttrType::Bool,
            "Whether the app should be editable",
        ))
        .attribute(AttributeSpec::optional_computed(
            "allow_attachments",
            AttrType::Bool,
            "True if attachment of files to an item is allowed",
        ))
        .attribute(AttributeSpec::optional_computed(
            "allow_comments",
            AttrType::Bool,
            "True if comments are allowed",
        ))
        .attribute(AttributeSpec::optional_computed(
            "silent_creates",
            AttrType::Bool,
            "True if item creates should not be posted to the stream",
        ))
        .attribute(AttributeSpec::optional_computed(
            "silent_edits",
            AttrType::Bool,
            "True if item edits should not be posted to the stream",
        ))
        .attribute(AttributeSpec::ignore_delete_errors())
});

/// The `podio_app` resource.
#[derive(Debug, Clone, Copy, Default)]
pub struct AppResource;

fn to_config(desired: &Record) -> Result<AppConfig> {
    Ok(AppConfig {
        name: desired.require_str(TYPE_NAME, "name")?.to_string(),
        app_type: desired.get_str("type").map(str::to_string),
        item_name: desired.require_str(TYPE_NAME, "item_name")?.to_string(),
        description: desired.get_str("description").map(str::to_string),
        usage: desired.get_str("usage").map(str::to_string),
        icon: desired.get_str("icon").map(str::to_string),
        allow_edit: desired.get_bool("allow_edit"),
        allow_attachments: desired.get_bool("allow_attachments"),
        allow_comments: desired.get_bool("allow_comments"),
        silent_creates: desired.get_bool("silent_creates"),
        silent_edits: desired.get_bool("silent_edits"),
    })
}

fn to_record(app: &App) -> Record {
    let config = &app.config;
    let mut record = Record::new()
        .with("app_id", app.app_id)
        .with("space_id", app.space_id)
        .with("name", config.name.as_str());
    record.set_opt("type", config.app_type.clone());
    record.insert("item_name", config.item_name.as_str());
    record.set_opt("description", config.description.clone());
    record.set_opt("usage", config.usage.clone());
    record.set_opt("icon", config.icon.clone());
    record.set_opt("allow_edit", config.allow_edit);
    record.set_opt("allow_attachments", config.allow_attachments);
    record.set_opt("allow_comments", config.allow_comments);
    record.set_opt("silent_creates", config.silent_creates);
    record.set_opt("silent_edits", config.silent_edits);
    record
}

fn app_id(tracked: &Record) -> Result<i64> {
    tracked.require_i64(TYPE_NAME, "app_id")
}

#[async_trait]
impl ResourceKind for AppResource {
    fn schema(&self) -> &'static EntitySchema {
        &SCHEMA
    }

    async fn create(&self, client: &dyn RemoteClient, desired: &Record) -> Result<Record> {
        let space_id = desired.require_i64(TYPE_NAME, "space_id")?;
        let config = to_config(desired)?;

        let app = client
            .create_app(space_id, &config)
            .await
            .map_err(|e| e.into_provider_error(TYPE_NAME, "create", ""))?;
        Ok(to_record(&app))
    }

    async fn read(&self, client: &dyn RemoteClient, tracked: &Record) -> Result<Record> {
        let id = app_id(tracked)?;
        let app = client
            .get_app(id)
            .await
            .map_err(|e| e.into_provider_error(TYPE_NAME, "read", &id.to_string()))?;
        Ok(to_record(&app))
    }

    async fn update(
        &self,
        client: &dyn RemoteClient,
        prior: &Record,
        desired: &Record,
    ) -> Result<Record> {
        let id = app_id(prior)?;
        let config = to_config(desired)?;

        let app = client
            .update_app(id, &config)
            .await
            .map_err(|e| e.into_provider_error(TYPE_NAME, "update", &id.to_string()))?;
        Ok(to_record(&app))
    }

    async fn delete(&self, client: &dyn RemoteClient, tracked: &Record) -> Result<()> {
        let id = app_id(tracked)?;
        client
            .delete_app(id)
            .await
            .map_err(|e| e.into_provider_error(TYPE_NAME, "delete", &id.to_string()))
    }
}
