//! In-memory remote backend for the Podio provider.
//!
//! This crate provides an in-process implementation of the `RemoteClient`
//! trait from `podio-remote`. It assigns IDs, applies the same defaults the
//! real service applies to omitted attributes, and can be told to fail
//! specific operations so that error-handling paths can be exercised.
//!
//! # Example
//!
//! ```ignore
//! use podio_remote::{CreateSpaceParams, RemoteClient};
//! use podio_remote_memory::InMemoryRemote;
//!
//! let remote = InMemoryRemote::new().with_organization(42, "acme");
//! let space = remote
//!     .create_space(&CreateSpaceParams { org_id: 42, name: "Eng".into(), ..Default::default() })
//!     .await?;
//! assert_eq!(space.privacy, "closed");
//! ```

mod remote_impl;
pub mod storage;

pub use podio_remote::{RemoteClient, RemoteError};
pub use storage::{InMemoryRemote, RemoteOperation};

/// Creates a new shareable in-memory remote client.
pub fn create_remote() -> podio_remote::DynRemoteClient {
    std::sync::Arc::new(InMemoryRemote::new())
}
