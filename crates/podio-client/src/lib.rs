//! HTTP implementation of `RemoteClient` for the Podio REST API.
//!
//! ```ignore
//! use podio_client::{ClientOptions, PodioClient};
//!
//! let options = ClientOptions::new("my-client-id", "my-client-secret");
//! let client = PodioClient::authenticate(options, "user@example.com", "hunter2").await?;
//! let space = client.get_space(123).await?;
//! ```

mod auth;
mod client;

pub use auth::{ClientOptions, DEFAULT_BASE_URL};
pub use client::PodioClient;
