use std::sync::LazyLock;

use async_trait::async_trait;
use tracing::debug;

use podio_core::{AttrType, Record, Result};
use podio_remote::{DynRemoteClient, Organization};

use super::DataSource;
use crate::schema::{AttributeSpec, EntitySchema, ExactlyOneOf, SchemaKind};

pub const TYPE_NAME: &str = "podio_organization";

static SCHEMA: LazyLock<EntitySchema> = LazyLock::new(|| {
    EntitySchema::new(TYPE_NAME, SchemaKind::DataSource, "A Podio organization")
        .id_attribute("org_id")
        .attribute(AttributeSpec::optional_computed(
            "url_label",
            AttrType::String,
            "The URL label/slug for the organization, e.g. the `citrix` part of `https://podio.com/citrix`. Mutually exclusive with `org_id`.",
        ))
        .attribute(AttributeSpec::optional_computed(
            "org_id",
            AttrType::Int64,
            "The numeric ID of the organization. Mutually exclusive with `url_label`.",
        ))
        .attribute(AttributeSpec::computed(
            "name",
            AttrType::String,
            "Name of the organization",
        ))
        .attribute(AttributeSpec::computed(
            "url",
            AttrType::String,
            "URL of the Podio organization",
        ))
        .exactly_one_of(
            ExactlyOneOf::new(&["url_label", "org_id"])
                .when_many(
                    "Ambiguous search pattern",
                    "Only set one of `url_label` or `org_id`, not both.",
                )
                .when_none(
                    "No URL or Org ID specified",
                    "Either `url_label` or `org_id` must be specified",
                ),
        )
});

/// Declared schema, available without a configured client.
pub fn schema() -> &'static EntitySchema {
    &SCHEMA
}

/// The `podio_organization` data source.
pub struct OrganizationDataSource {
    client: DynRemoteClient,
}

impl OrganizationDataSource {
    pub fn new(client: DynRemoteClient) -> Self {
        Self { client }
    }
}

fn to_record(org: &Organization) -> Record {
    Record::new()
        .with("url_label", org.url_label.as_str())
        .with("org_id", org.org_id)
        .with("name", org.name.as_str())
        .with("url", org.url.as_str())
}

#[async_trait]
impl DataSource for OrganizationDataSource {
    fn schema(&self) -> &'static EntitySchema {
        &SCHEMA
    }

    async fn lookup(&self, config: &Record) -> Result<Record> {
        SCHEMA.validate_create(config)?;

        let org = match config.get_str("url_label") {
            Some(label) => self
                .client
                .get_organization_by_slug(label)
                .await
                .map_err(|e| e.into_provider_error(TYPE_NAME, "read", label))?,
            None => {
                let org_id = config.require_i64(TYPE_NAME, "org_id")?;
                self.client
                    .get_organization(org_id)
                    .await
                    .map_err(|e| e.into_provider_error(TYPE_NAME, "read", &org_id.to_string()))?
            }
        };

        debug!(entity_type = TYPE_NAME, org_id = org.org_id, "Resolved organization");
        Ok(to_record(&org))
    }
}
