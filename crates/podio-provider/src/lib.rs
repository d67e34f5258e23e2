//! Resource lifecycle reconciliation for Podio.
//!
//! The [`Provider`] registry owns one authenticated remote client and resolves
//! an [`EntityController`] per resource type:
//!
//! ```ignore
//! let provider = Provider::configure(&load_config(None)?).await?;
//! let spaces = provider.resolve("podio_space")?;
//!
//! let desired = Record::new().with("org_id", 42i64).with("name", "Eng");
//! let tracked = spaces.create(&desired).await?;
//! ```

pub mod controller;
pub mod data_sources;
pub mod observability;
pub mod registry;
pub mod resources;
pub mod schema;
pub mod validators;

pub use controller::{
    Controller, DeleteOutcome, DeletePolicy, EntityController, IGNORE_DELETE_ERRORS, ResourceKind,
};
pub use data_sources::DataSource;
pub use registry::{PROVIDER_NAME, Provider, ProviderSchema, catalog, validate_desired};
pub use schema::{AttributeSpec, EntitySchema, ExactlyOneOf, Requirement, SchemaKind};
pub use validators::{MatchesRegex, OneOf, Validator};

pub use podio_core::{AttrType, AttrValue, ErrorCategory, ProviderError, Record, Violation};
