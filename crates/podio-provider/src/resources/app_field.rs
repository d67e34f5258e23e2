use std::sync::LazyLock;

use async_trait::async_trait;

use podio_core::{AttrType, ProviderError, Record, Result, Violation};
use podio_remote::{AppField, AppFieldConfig, CreateAppFieldParams, RemoteClient};

use crate::controller::ResourceKind;
use crate::schema::{AttributeSpec, EntitySchema, SchemaKind};
use crate::validators::OneOf;

pub const TYPE_NAME: &str = "podio_app_field";

pub const FIELD_TYPES: &[&str] = &[
    "text",
    "number",
    "date",
    "category",
    "contact",
    "app",
    "money",
    "progress",
    "location",
    "duration",
    "email",
    "phone",
    "link",
    "calculation",
    "image",
];

static SCHEMA: LazyLock<EntitySchema> = LazyLock::new(|| {
    EntitySchema::new(TYPE_NAME, SchemaKind::Resource, "A field within an app")
        .id_attribute("field_id")
        .attribute(AttributeSpec::computed("field_id", AttrType::Int64, "ID of the field"))
        .attribute(
            AttributeSpec::required("app_id", AttrType::Int64, "ID of the app").force_new(),
        )
        .attribute(
            AttributeSpec::required("type", AttrType::String, "Type of the field.")
                .force_new()
                .with_validator(OneOf::new(FIELD_TYPES)),
        )
        .attribute(AttributeSpec::required(
            "label",
            AttrType::String,
            "Label shown for the field",
        ))
        .attribute(AttributeSpec::optional_computed(
            "description",
            AttrType::String,
            "Help text shown for the field",
        ))
        .attribute(AttributeSpec::optional_computed(
            "required",
            AttrType::Bool,
            "True if a value must be given for the field",
        ))
        .attribute(AttributeSpec::optional_computed(
            "hidden",
            AttrType::Bool,
            "True if the field is hidden by default",
        ))
        .attribute(AttributeSpec::optional_computed(
            "delta",
            AttrType::Int64,
            "Position of the field within the app",
        ))
        .attribute(AttributeSpec::computed(
            "external_id",
            AttrType::String,
            "External ID of the field, derived from the label",
        ))
        .attribute(AttributeSpec::ignore_delete_errors())
});

/// The `podio_app_field` resource. Fields are addressed by `(app_id, field_id)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AppFieldResource;

fn to_config(desired: &Record) -> Result<AppFieldConfig> {
    Ok(AppFieldConfig {
        label: desired.require_str(TYPE_NAME, "label")?.to_string(),
        description: desired.get_str("description").map(str::to_string),
        required: desired.get_bool("required"),
        hidden: desired.get_bool("hidden"),
        delta: desired.get_i64("delta"),
    })
}

fn to_record(field: &AppField) -> Record {
    let config = &field.config;
    let mut record = Record::new()
        .with("field_id", field.field_id)
        .with("app_id", field.app_id)
        .with("type", field.field_type.as_str())
        .with("label", config.label.as_str());
    record.set_opt("description", config.description.clone());
    record.set_opt("required", config.required);
    record.set_opt("hidden", config.hidden);
    record.set_opt("delta", config.delta);
    record.set_opt("external_id", field.external_id.clone());
    record
}

fn field_key(tracked: &Record) -> Result<(i64, i64)> {
    Ok((
        tracked.require_i64(TYPE_NAME, "app_id")?,
        tracked.require_i64(TYPE_NAME, "field_id")?,
    ))
}

fn invalid_import(id: &str) -> ProviderError {
    ProviderError::validation(
        TYPE_NAME,
        vec![Violation::record(
            "Invalid import identifier",
            format!("expected \"<app_id>/<field_id>\", got \"{id}\""),
        )],
    )
}

#[async_trait]
impl ResourceKind for AppFieldResource {
    fn schema(&self) -> &'static EntitySchema {
        &SCHEMA
    }

    fn import_seed(&self, id: &str) -> Result<Record> {
        let (app, field) = id.trim().split_once('/').ok_or_else(|| invalid_import(id))?;
        let app_id: i64 = app.parse().map_err(|_| invalid_import(id))?;
        let field_id: i64 = field.parse().map_err(|_| invalid_import(id))?;
        Ok(Record::new().with("field_id", field_id).with("app_id", app_id))
    }

    fn describe_id(&self, tracked: &Record) -> String {
        match (tracked.get_i64("app_id"), tracked.get_i64("field_id")) {
            (Some(app_id), Some(field_id)) => format!("{app_id}/{field_id}"),
            _ => String::new(),
        }
    }

    async fn create(&self, client: &dyn RemoteClient, desired: &Record) -> Result<Record> {
        let app_id = desired.require_i64(TYPE_NAME, "app_id")?;
        let params = CreateAppFieldParams {
            field_type: desired.require_str(TYPE_NAME, "type")?.to_string(),
            config: to_config(desired)?,
        };

        let field = client
            .create_app_field(app_id, &params)
            .await
            .map_err(|e| e.into_provider_error(TYPE_NAME, "create", ""))?;
        Ok(to_record(&field))
    }

    async fn read(&self, client: &dyn RemoteClient, tracked: &Record) -> Result<Record> {
        let (app_id, field_id) = field_key(tracked)?;
        let field = client
            .get_app_field(app_id, field_id)
            .await
            .map_err(|e| {
                e.into_provider_error(TYPE_NAME, "read", &format!("{app_id}/{field_id}"))
            })?;
        Ok(to_record(&field))
    }

    async fn update(
        &self,
        client: &dyn RemoteClient,
        prior: &Record,
        desired: &Record,
    ) -> Result<Record> {
        let (app_id, field_id) = field_key(prior)?;
        let config = to_config(desired)?;

        let field = client
            .update_app_field(app_id, field_id, &config)
            .await
            .map_err(|e| {
                e.into_provider_error(TYPE_NAME, "update", &format!("{app_id}/{field_id}"))
            })?;
        Ok(to_record(&field))
    }

    async fn delete(&self, client: &dyn RemoteClient, tracked: &Record) -> Result<()> {
        let (app_id, field_id) = field_key(tracked)?;
        client
            .delete_app_field(app_id, field_id)
            .await
            .map_err(|e| {
                e.into_provider_error(TYPE_NAME, "delete", &format!("{app_id}/{field_id}"))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_seed_parses_compound_id() {
        let seed = AppFieldResource.import_seed("31/400").unwrap();
        assert_eq!(seed.get_i64("app_id"), Some(31));
        assert_eq!(seed.get_i64("field_id"), Some(400));
        assert_eq!(AppFieldResource.describe_id(&seed), "31/400");
    }

    #[test]
    fn test_import_seed_rejects_bare_id() {
        for bad in ["400", "a/b", "31/"] {
            let err = AppFieldResource.import_seed(bad).unwrap_err();
            assert!(err.is_validation(), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_unknown_field_type_rejected() {
        let desired = Record::new()
            .with("app_id", 1i64)
            .with("type", "signature")
            .with("label", "Sign here");
        let err = SCHEMA.validate_create(&desired).unwrap_err();
        assert!(err.to_string().contains("must be one of: text, number"));
    }
}
