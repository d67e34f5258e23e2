//! # podio-remote
//!
//! Remote API abstraction for the Podio provider.
//!
//! This crate defines the [`RemoteClient`] trait that every backend talking to
//! the collaboration platform must implement, together with the wire types for
//! organizations, spaces, apps and app fields. It does not contain any
//! implementations - those are provided by separate crates (`podio-client`
//! for the HTTP API, `podio-remote-memory` for an in-process fake).
//!
//! ## Example
//!
//! ```ignore
//! use podio_remote::{RemoteClient, RemoteError, Space};
//!
//! async fn space_name(client: &dyn RemoteClient, id: i64) -> Result<String, RemoteError> {
//!     let space: Space = client.get_space(id).await?;
//!     Ok(space.name)
//! }
//! ```

mod error;
mod traits;
mod types;

pub use error::RemoteError;
pub use traits::RemoteClient;
pub use types::{
    App, AppConfig, AppField, AppFieldConfig, CreateAppFieldParams, CreateSpaceParams,
    Organization, Space, UpdateSpaceParams,
};

/// Type alias for a remote result.
pub type RemoteResult<T> = Result<T, RemoteError>;

/// Type alias for a shared remote client trait object.
pub type DynRemoteClient = std::sync::Arc<dyn RemoteClient>;
