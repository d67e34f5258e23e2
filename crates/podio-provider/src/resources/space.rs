use std::sync::LazyLock;

use async_trait::async_trait;

use podio_core::{AttrType, Record, Result};
use podio_remote::{CreateSpaceParams, RemoteClient, Space, UpdateSpaceParams};

use crate::controller::ResourceKind;
use crate::schema::{AttributeSpec, EntitySchema, SchemaKind};
use crate::validators::OneOf;

pub const TYPE_NAME: &str = "podio_space";

static SCHEMA: LazyLock<EntitySchema> = LazyLock::new(|| {
    EntitySchema::new(
        TYPE_NAME,
        SchemaKind::Resource,
        "A space/workspace within a Podio organization.",
    )
    .id_attribute("space_id")
    .attribute(AttributeSpec::computed("space_id", AttrType::Int64, "ID of the space"))
    .attribute(
        AttributeSpec::required("org_id", AttrType::Int64, "ID of the organization").force_new(),
    )
    .attribute(AttributeSpec::required(
        "name",
        AttrType::String,
        "Name of the space. Changing this does not affect the ID or URL of the space.",
    ))
    .attribute(AttributeSpec::computed("url", AttrType::String, "URL of the space"))
    .attribute(AttributeSpec::computed(
        "url_label",
        AttrType::String,
        "URL label of the space",
    ))
    .attribute(
        AttributeSpec::optional_computed(
            "privacy",
            AttrType::String,
            "Privacy of the space. Defaults to `closed`.",
        )
        .with_validator(OneOf::new(&["open", "closed"])),
    )
    .attribute(AttributeSpec::optional_computed(
        "auto_join",
        AttrType::Bool,
        "If true, new employees automatically join this space. Defaults to `false`",
    ))
    .attribute(AttributeSpec::optional_computed(
        "post_on_new_app",
        AttrType::Bool,
        "If true, new apps are posted as a status update to this space. Defaults to `false`",
    ))
    .attribute(AttributeSpec::optional_computed(
        "post_on_new_member",
        AttrType::Bool,
        "If true, new members are posted as a status update to this space. Defaults to `false`",
    ))
    .attribute(AttributeSpec::ignore_delete_errors())
});

/// The `podio_space` resource.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpaceResource;

fn to_record(space: &Space) -> Record {
    Record::new()
        .with("space_id", space.space_id)
        .with("org_id", space.org_id)
        .with("name", space.name.as_str())
        .with("url", space.url.as_str())
        .with("url_label", space.url_label.as_str())
        .with("privacy", space.privacy.as_str())
        .with("auto_join", space.auto_join)
        .with("post_on_new_app", space.post_on_new_app)
        .with("post_on_new_member", space.post_on_new_member)
}

fn space_id(tracked: &Record) -> Result<i64> {
    tracked.require_i64(TYPE_NAME, "space_id")
}

#[async_trait]
impl ResourceKind for SpaceResource {
    fn schema(&self) -> &'static EntitySchema {
        &SCHEMA
    }

    async fn create(&self, client: &dyn RemoteClient, desired: &Record) -> Result<Record> {
        let params = CreateSpaceParams {
            org_id: desired.require_i64(TYPE_NAME, "org_id")?,
            name: desired.require_str(TYPE_NAME, "name")?.to_string(),
            privacy: desired.get_str("privacy").map(str::to_string),
            auto_join: desired.get_bool("auto_join"),
            post_on_new_app: desired.get_bool("post_on_new_app"),
            post_on_new_member: desired.get_bool("post_on_new_member"),
        };

        let space = client
            .create_space(&params)
            .await
            .map_err(|e| e.into_provider_error(TYPE_NAME, "create", ""))?;
        Ok(to_record(&space))
    }

    async fn read(&self, client: &dyn RemoteClient, tracked: &Record) -> Result<Record> {
        let id = space_id(tracked)?;
        let space = client
            .get_space(id)
            .await
            .map_err(|e| e.into_provider_error(TYPE_NAME, "read", &id.to_string()))?;
        Ok(to_record(&space))
    }

    async fn update(
        &self,
        client: &dyn RemoteClient,
        prior: &Record,
        desired: &Record,
    ) -> Result<Record> {
        let id = space_id(prior)?;
        let params = UpdateSpaceParams {
            name: desired.require_str(TYPE_NAME, "name")?.to_string(),
            privacy: desired.get_str("privacy").map(str::to_string),
            auto_join: desired.get_bool("auto_join"),
            post_on_new_app: desired.get_bool("post_on_new_app"),
            post_on_new_member: desired.get_bool("post_on_new_member"),
        };

        let space = client
            .update_space(id, &params)
            .await
            .map_err(|e| e.into_provider_error(TYPE_NAME, "update", &id.to_string()))?;
        Ok(to_record(&space))
    }

    async fn delete(&self, client: &dyn RemoteClient, tracked: &Record) -> Result<()> {
        let id = space_id(tracked)?;
        client
            .delete_space(id)
            .await
            .map_err(|e| e.into_provider_error(TYPE_NAME, "delete", &id.to_string()))
    }
}
