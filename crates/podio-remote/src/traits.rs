//! The remote client trait.

use async_trait::async_trait;

use crate::error::RemoteError;
use crate::types::{
    App, AppConfig, AppField, AppFieldConfig, CreateAppFieldParams, CreateSpaceParams,
    Organization, Space, UpdateSpaceParams,
};

/// Capability for talking to the collaboration platform.
///
/// One client instance is shared by every entity controller for the lifetime
/// of a session, so implementations must be `Send + Sync` and must not keep
/// per-call mutable state beyond their fixed credentials. Every method is a
/// single request that either completes or fails; retries and timeouts are
/// the implementation's business.
///
/// Create and update calls return the server's canonical view of the object
/// after the write, not an echo of the request.
#[async_trait]
pub trait RemoteClient: Send + Sync {
    // ==================== Organizations ====================

    /// Fetches an organization by numeric ID.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::NotFound` if the organization does not exist.
    async fn get_organization(&self, org_id: i64) -> Result<Organization, RemoteError>;

    /// Fetches an organization by its URL label (slug).
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::NotFound` if no organization uses the label.
    async fn get_organization_by_slug(&self, url_label: &str)
    -> Result<Organization, RemoteError>;

    // ==================== Spaces ====================

    async fn create_space(&self, params: &CreateSpaceParams) -> Result<Space, RemoteError>;

    async fn get_space(&self, space_id: i64) -> Result<Space, RemoteError>;

    async fn update_space(
        &self,
        space_id: i64,
        params: &UpdateSpaceParams,
    ) -> Result<Space, RemoteError>;

    async fn delete_space(&self, space_id: i64) -> Result<(), RemoteError>;

    // ==================== Apps ====================

    async fn create_app(&self, space_id: i64, config: &AppConfig) -> Result<App, RemoteError>;

    async fn get_app(&self, app_id: i64) -> Result<App, RemoteError>;

    async fn update_app(&self, app_id: i64, config: &AppConfig) -> Result<App, RemoteError>;

    async fn delete_app(&self, app_id: i64) -> Result<(), RemoteError>;

    // ==================== App fields ====================

    async fn create_app_field(
        &self,
        app_id: i64,
        params: &CreateAppFieldParams,
    ) -> Result<AppField, RemoteError>;

    async fn get_app_field(&self, app_id: i64, field_id: i64) -> Result<AppField, RemoteError>;

    async fn update_app_field(
        &self,
        app_id: i64,
        field_id: i64,
        config: &AppFieldConfig,
    ) -> Result<AppField, RemoteError>;

    async fn delete_app_field(&self, app_id: i64, field_id: i64) -> Result<(), RemoteError>;

    // ==================== Metadata ====================

    /// Returns the name of this backend for logging/debugging.
    fn backend_name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Compile-time test that RemoteClient is object-safe
    fn _assert_client_object_safe(_: &dyn RemoteClient) {}
}
