//! Generic lifecycle reconciliation shared by every resource type.
//!
//! A [`ResourceKind`] supplies the schema and the four remote operations for
//! one entity type; [`Controller`] wraps it with validation, replacement
//! detection, state merging and the delete-tolerance policy, and exposes the
//! result through the object-safe [`EntityController`] trait.

use async_trait::async_trait;
use tracing::{debug, info, warn};

use podio_core::{ProviderError, Record, Result};
use podio_remote::{DynRemoteClient, RemoteClient};

use crate::schema::{EntitySchema, Requirement};

/// Name of the tolerance flag consulted by [`Controller`] on delete.
pub const IGNORE_DELETE_ERRORS: &str = "ignore_delete_errors";

/// Per-type remote bindings.
///
/// Implementations translate between records and remote objects; they do not
/// validate input or merge local attributes.
#[async_trait]
pub trait ResourceKind: Send + Sync + 'static {
    fn schema(&self) -> &'static EntitySchema;

    /// Builds the seed record for an import from an external identifier.
    ///
    /// The default accepts a bare integer for the schema's id attribute.
    fn import_seed(&self, id: &str) -> Result<Record> {
        let schema = self.schema();
        let id_attr = schema.id_attribute.unwrap_or("id");
        let value: i64 = id.trim().parse().map_err(|_| {
            ProviderError::validation(
                schema.type_name,
                vec![podio_core::Violation::record(
                    "Invalid import identifier",
                    format!("expected a numeric {id_attr}, got \"{id}\""),
                )],
            )
        })?;
        Ok(Record::new().with(id_attr, value))
    }

    /// Identifier used in log lines and not-found errors.
    fn describe_id(&self, tracked: &Record) -> String {
        self.schema()
            .id_attribute
            .and_then(|attr| tracked.get(attr))
            .map(ToString::to_string)
            .unwrap_or_default()
    }

    async fn create(&self, client: &dyn RemoteClient, desired: &Record) -> Result<Record>;

    async fn read(&self, client: &dyn RemoteClient, tracked: &Record) -> Result<Record>;

    /// `desired` already carries prior values for omitted optional-computed attributes.
    async fn update(
        &self,
        client: &dyn RemoteClient,
        prior: &Record,
        desired: &Record,
    ) -> Result<Record>;

    async fn delete(&self, client: &dyn RemoteClient, tracked: &Record) -> Result<()>;
}

/// Delete tolerance read from tracked state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeletePolicy {
    pub ignore_errors: bool,
}

impl DeletePolicy {
    pub fn from_record(record: &Record) -> Self {
        Self {
            ignore_errors: record.get_bool(IGNORE_DELETE_ERRORS).unwrap_or(false),
        }
    }
}

/// How a successful delete was reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The remote object was already gone.
    AlreadyAbsent,
    /// The remote rejected the delete and the policy allowed ignoring it.
    Tolerated { message: String },
}

/// Object-safe lifecycle surface handed out by the provider registry.
#[async_trait]
pub trait EntityController: Send + Sync {
    fn type_name(&self) -> &'static str;

    fn schema(&self) -> &'static EntitySchema;

    async fn create(&self, desired: &Record) -> Result<Record>;

    /// Fails with `NotFound` when the remote object has disappeared.
    async fn read(&self, tracked: &Record) -> Result<Record>;

    /// Fails with `RequiresReplacement` when an immutable attribute changed.
    async fn update(&self, desired: &Record, prior: &Record) -> Result<Record>;

    async fn delete(&self, tracked: &Record) -> Result<DeleteOutcome>;

    async fn import(&self, id: &str) -> Result<Record>;
}

/// [`EntityController`] for any [`ResourceKind`].
pub struct Controller<K> {
    client: DynRemoteClient,
    kind: K,
}

impl<K: ResourceKind> Controller<K> {
    pub fn new(client: DynRemoteClient, kind: K) -> Self {
        Self { client, kind }
    }

    /// Copies local attributes from `source` onto `observed`, defaulting to `false`.
    fn with_local_attributes(&self, mut observed: Record, source: &Record) -> Record {
        for spec in self.kind.schema().local_attributes() {
            let value = source.get(spec.name).cloned().unwrap_or(false.into());
            observed.insert(spec.name, value);
        }
        observed
    }

    /// Fills omitted optional-computed attributes from prior tracked state.
    fn fill_from_prior(&self, desired: &Record, prior: &Record) -> Record {
        let mut effective = desired.clone();
        for spec in &self.kind.schema().attributes {
            if spec.requirement == Requirement::OptionalComputed
                && !spec.local
                && !effective.contains(spec.name)
            {
                if let Some(value) = prior.get(spec.name) {
                    effective.insert(spec.name, value.clone());
                }
            }
        }
        effective
    }
}

#[async_trait]
impl<K: ResourceKind> EntityController for Controller<K> {
    fn type_name(&self) -> &'static str {
        self.kind.schema().type_name
    }

    fn schema(&self) -> &'static EntitySchema {
        self.kind.schema()
    }

    async fn create(&self, desired: &Record) -> Result<Record> {
        let entity_type = self.type_name();
        self.kind.schema().validate_create(desired)?;

        let observed = self.kind.create(self.client.as_ref(), desired).await?;
        let tracked = self.with_local_attributes(observed, desired);

        info!(
            entity_type,
            id = %self.kind.describe_id(&tracked),
            "Created remote object"
        );
        Ok(tracked)
    }

    async fn read(&self, tracked: &Record) -> Result<Record> {
        let entity_type = self.type_name();
        let observed = self.kind.read(self.client.as_ref(), tracked).await?;
        let refreshed = self.with_local_attributes(observed, tracked);

        debug!(
            entity_type,
            id = %self.kind.describe_id(&refreshed),
            "Refreshed tracked state"
        );
        Ok(refreshed)
    }

    async fn update(&self, desired: &Record, prior: &Record) -> Result<Record> {
        let entity_type = self.type_name();
        let schema = self.kind.schema();
        schema.validate_update(desired, prior)?;

        let changed = schema.replacement_attributes(desired, prior);
        if !changed.is_empty() {
            debug!(entity_type, attributes = ?changed, "Immutable attributes changed");
            return Err(ProviderError::requires_replacement(entity_type, changed));
        }

        let effective = self.fill_from_prior(desired, prior);
        let observed = self
            .kind
            .update(self.client.as_ref(), prior, &effective)
            .await?;
        let tracked = self.with_local_attributes(observed, desired);

        info!(
            entity_type,
            id = %self.kind.describe_id(&tracked),
            "Updated remote object"
        );
        Ok(tracked)
    }

    async fn delete(&self, tracked: &Record) -> Result<DeleteOutcome> {
        let entity_type = self.type_name();
        let id = self.kind.describe_id(tracked);
        let policy = DeletePolicy::from_record(tracked);

        match self.kind.delete(self.client.as_ref(), tracked).await {
            Ok(()) => {
                info!(entity_type, %id, "Deleted remote object");
                Ok(DeleteOutcome::Deleted)
            }
            Err(err) if err.is_not_found() => {
                info!(entity_type, %id, "Remote object already absent");
                Ok(DeleteOutcome::AlreadyAbsent)
            }
            Err(err @ ProviderError::Remote { .. }) if policy.ignore_errors => {
                warn!(
                    entity_type,
                    %id,
                    error = %err,
                    "Ignoring delete failure"
                );
                Ok(DeleteOutcome::Tolerated {
                    message: err.to_string(),
                })
            }
            Err(err) => Err(err),
        }
    }

    async fn import(&self, id: &str) -> Result<Record> {
        let entity_type = self.type_name();
        let seed = self.kind.import_seed(id)?;
        let observed = self.kind.read(self.client.as_ref(), &seed).await?;
        let tracked = self.with_local_attributes(observed, &seed);

        debug!(entity_type, id, "Imported remote object");
        Ok(tracked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delete_policy_defaults_to_strict() {
        assert!(!DeletePolicy::from_record(&Record::new()).ignore_errors);
        let tolerant = Record::new().with(IGNORE_DELETE_ERRORS, true);
        assert!(DeletePolicy::from_record(&tolerant).ignore_errors);
    }

    #[test]
    fn test_entity_controller_is_object_safe() {
        fn _assert_object_safe(_: &dyn EntityController) {}
    }
}
