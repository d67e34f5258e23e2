//! Provider registry
//!
//! Owns the single authenticated remote client for a session and hands out
//! entity controllers and data sources by type name.

use std::sync::{Arc, LazyLock};

use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, info};

use podio_client::{ClientOptions, PodioClient};
use podio_config::ProviderConfig;
use podio_core::{AttrType, ProviderError, Record, Result};
use podio_remote::DynRemoteClient;

use crate::controller::{Controller, EntityController, ResourceKind};
use crate::data_sources::{self, DataSource, OrganizationDataSource};
use crate::resources::{AppFieldResource, AppResource, SpaceResource};
use crate::schema::{AttributeSpec, EntitySchema, SchemaKind};

pub const PROVIDER_NAME: &str = "podio";

static PROVIDER_SCHEMA: LazyLock<EntitySchema> = LazyLock::new(|| {
    EntitySchema::new(
        PROVIDER_NAME,
        SchemaKind::Provider,
        "Manages spaces, apps and app fields in Podio.",
    )
    .attribute(
        AttributeSpec::required("client_id", AttrType::String, "Client ID for Podio").sensitive(),
    )
    .attribute(
        AttributeSpec::required("client_secret", AttrType::String, "Client Secret for Podio")
            .sensitive(),
    )
    .attribute(
        AttributeSpec::required("username", AttrType::String, "Username for Podio").sensitive(),
    )
    .attribute(
        AttributeSpec::required("password", AttrType::String, "Password for Podio").sensitive(),
    )
    .attribute(AttributeSpec::optional(
        "trust_level",
        AttrType::Int64,
        "Trust level of the Podio API key. Lower levels cannot delete spaces or apps; pair them with `ignore_delete_errors`. `2` is the default, allowing all public API methods.",
    ))
});

/// The complete declared schema surface.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderSchema {
    pub provider: &'static EntitySchema,
    pub resources: IndexMap<&'static str, &'static EntitySchema>,
    pub data_sources: IndexMap<&'static str, &'static EntitySchema>,
}

impl ProviderSchema {
    /// Looks up a resource or data source schema by type name.
    pub fn get(&self, type_name: &str) -> Option<&'static EntitySchema> {
        if type_name == PROVIDER_NAME {
            return Some(self.provider);
        }
        self.resources
            .get(type_name)
            .or_else(|| self.data_sources.get(type_name))
            .copied()
    }

    /// Every schema, provider first.
    pub fn all(&self) -> impl Iterator<Item = &'static EntitySchema> + '_ {
        std::iter::once(self.provider)
            .chain(self.resources.values().copied())
            .chain(self.data_sources.values().copied())
    }
}

/// Schemas of everything the provider registers. Needs no credentials.
pub fn catalog() -> ProviderSchema {
    let resources = [
        SpaceResource.schema(),
        AppResource.schema(),
        AppFieldResource.schema(),
    ];
    let data_sources = [data_sources::organization::schema()];

    ProviderSchema {
        provider: &PROVIDER_SCHEMA,
        resources: resources.into_iter().map(|s| (s.type_name, s)).collect(),
        data_sources: data_sources.into_iter().map(|s| (s.type_name, s)).collect(),
    }
}

/// Pre-flight validation of a desired-state record, without touching the remote API.
pub fn validate_desired(type_name: &str, desired: &Record) -> Result<()> {
    catalog()
        .get(type_name)
        .ok_or_else(|| ProviderError::unknown_entity_type(type_name))?
        .validate_create(desired)
}

/// Aggregates controllers around one shared remote client.
pub struct Provider {
    client: DynRemoteClient,
    trust_level: i64,
    resources: IndexMap<&'static str, Arc<dyn EntityController>>,
    data_sources: IndexMap<&'static str, Arc<dyn DataSource>>,
}

impl Provider {
    /// Validates `config`, authenticates, and builds the registry.
    ///
    /// Fails with `MisconfiguredProvider` before any controller exists when
    /// credentials are missing or rejected.
    pub async fn configure(config: &ProviderConfig) -> Result<Self> {
        let creds = config
            .credentials()
            .map_err(|e| ProviderError::misconfigured(format!("Missing Configuration: {e}")))?;

        let options = ClientOptions::new(creds.client_id, creds.client_secret.expose())
            .with_base_url(&config.base_url)
            .map_err(|e| ProviderError::misconfigured(e.to_string()))?
            .with_user_agent(format!("podio-provider/{}", env!("CARGO_PKG_VERSION")))
            .with_timeout(config.timeout());

        let client = PodioClient::authenticate(options, creds.username, creds.password.expose())
            .await
            .map_err(|e| {
                ProviderError::misconfigured(format!("Failed to authenticate with Podio: {e}"))
            })?;

        let provider = Self::with_client(Arc::new(client)).with_trust_level(config.trust_level);
        info!(
            base_url = %config.base_url,
            trust_level = config.trust_level,
            "Provider configured"
        );
        Ok(provider)
    }

    /// Builds the registry around an already-authenticated client.
    pub fn with_client(client: DynRemoteClient) -> Self {
        let mut resources: IndexMap<&'static str, Arc<dyn EntityController>> = IndexMap::new();
        register(&mut resources, Controller::new(client.clone(), SpaceResource));
        register(&mut resources, Controller::new(client.clone(), AppResource));
        register(&mut resources, Controller::new(client.clone(), AppFieldResource));

        let mut data_sources: IndexMap<&'static str, Arc<dyn DataSource>> = IndexMap::new();
        let organization = OrganizationDataSource::new(client.clone());
        data_sources.insert(organization.type_name(), Arc::new(organization));

        debug!(
            backend = client.backend_name(),
            resources = resources.len(),
            data_sources = data_sources.len(),
            "Registered entity types"
        );

        Self {
            client,
            trust_level: 2,
            resources,
            data_sources,
        }
    }

    pub fn with_trust_level(mut self, trust_level: i64) -> Self {
        self.trust_level = trust_level;
        self
    }

    pub fn trust_level(&self) -> i64 {
        self.trust_level
    }

    /// Name of the remote backend in use, e.g. `podio` or `memory`.
    pub fn backend_name(&self) -> &'static str {
        self.client.backend_name()
    }

    pub fn resolve(&self, type_name: &str) -> Result<Arc<dyn EntityController>> {
        self.resources
            .get(type_name)
            .cloned()
            .ok_or_else(|| ProviderError::unknown_entity_type(type_name))
    }

    pub fn resolve_data_source(&self, type_name: &str) -> Result<Arc<dyn DataSource>> {
        self.data_sources
            .get(type_name)
            .cloned()
            .ok_or_else(|| ProviderError::unknown_entity_type(type_name))
    }

    pub fn resource_types(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.resources.keys().copied()
    }

    pub fn data_source_types(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.data_sources.keys().copied()
    }

    pub fn schema(&self) -> ProviderSchema {
        catalog()
    }

    pub fn validate(&self, type_name: &str, desired: &Record) -> Result<()> {
        validate_desired(type_name, desired)
    }
}

fn register<K: ResourceKind>(
    map: &mut IndexMap<&'static str, Arc<dyn EntityController>>,
    controller: Controller<K>,
) {
    map.insert(controller.type_name(), Arc::new(controller));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_lists_every_type() {
        let catalog = catalog();
        let resources: Vec<_> = catalog.resources.keys().copied().collect();
        assert_eq!(resources, ["podio_space", "podio_app", "podio_app_field"]);
        assert!(catalog.data_sources.contains_key("podio_organization"));
        assert_eq!(catalog.all().count(), 5);
    }

    #[test]
    fn test_provider_schema_marks_secrets() {
        let schema = catalog().provider;
        assert!(schema.get("password").is_some_and(|a| a.sensitive));
        assert!(schema.get("trust_level").is_some_and(|a| !a.sensitive));
    }

    #[test]
    fn test_validate_desired_unknown_type() {
        let err = validate_desired("podio_item", &Record::new()).unwrap_err();
        assert!(matches!(err, ProviderError::UnknownEntityType { .. }));
        assert!(err.is_fatal());
    }

    #[tokio::test]
    async fn test_configure_without_credentials_fails_fast() {
        let err = Provider::configure(&ProviderConfig::default())
            .await
            .err()
            .expect("configuration must fail");
        assert!(matches!(err, ProviderError::MisconfiguredProvider { .. }));
        assert!(err.to_string().contains("client_id"));
    }
}
