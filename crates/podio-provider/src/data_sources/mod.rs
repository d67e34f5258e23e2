//! Read-only lookups.

use async_trait::async_trait;

use podio_core::{Record, Result};

use crate::schema::EntitySchema;

pub mod organization;

pub use organization::OrganizationDataSource;

/// Object-safe surface of a data source.
#[async_trait]
pub trait DataSource: Send + Sync {
    fn type_name(&self) -> &'static str {
        self.schema().type_name
    }

    fn schema(&self) -> &'static EntitySchema;

    /// Resolves the remote object selected by `config`.
    async fn lookup(&self, config: &Record) -> Result<Record>;
}
