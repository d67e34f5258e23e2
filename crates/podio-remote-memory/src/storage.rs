use dashmap::DashMap;
use podio_remote::{App, AppField, Organization, RemoteError, Space};
use std::sync::atomic::{AtomicI64, Ordering};

/// Operations that can be made to fail via [`InMemoryRemote::inject_fault`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoteOperation {
    GetOrganization,
    CreateSpace,
    GetSpace,
    UpdateSpace,
    DeleteSpace,
    CreateApp,
    GetApp,
    UpdateApp,
    DeleteApp,
    CreateAppField,
    GetAppField,
    UpdateAppField,
    DeleteAppField,
}

/// In-memory stand-in for the remote collaboration platform.
///
/// All maps are concurrent so one instance can be shared across parallel
/// entity operations, matching the contract of a real client.
#[derive(Debug)]
pub struct InMemoryRemote {
    pub(crate) organizations: DashMap<i64, Organization>,
    pub(crate) spaces: DashMap<i64, Space>,
    pub(crate) apps: DashMap<i64, App>,
    /// Keyed by `(app_id, field_id)`.
    pub(crate) fields: DashMap<(i64, i64), AppField>,
    /// Injected failures, consulted before every call.
    faults: DashMap<RemoteOperation, RemoteError>,
    /// Server-assigned ID sequence shared by every object kind.
    id_counter: AtomicI64,
}

impl InMemoryRemote {
    pub fn new() -> Self {
        Self {
            organizations: DashMap::new(),
            spaces: DashMap::new(),
            apps: DashMap::new(),
            fields: DashMap::new(),
            faults: DashMap::new(),
            id_counter: AtomicI64::new(1000),
        }
    }

    /// Seeds an organization. Organizations are read-only through the API.
    pub fn with_organization(self, org_id: i64, url_label: &str) -> Self {
        self.organizations.insert(
            org_id,
            Organization {
                org_id,
                name: url_label.to_string(),
                url: format!("https://podio.com/{url_label}"),
                url_label: url_label.to_string(),
            },
        );
        self
    }

    /// Makes every subsequent call of `operation` fail with `error`.
    pub fn inject_fault(&self, operation: RemoteOperation, error: RemoteError) {
        self.faults.insert(operation, error);
    }

    pub fn clear_fault(&self, operation: RemoteOperation) {
        self.faults.remove(&operation);
    }

    pub(crate) fn check_fault(&self, operation: RemoteOperation) -> Result<(), RemoteError> {
        match self.faults.get(&operation) {
            Some(err) => {
                tracing::debug!(?operation, "Injected remote fault");
                Err(err.value().clone())
            }
            None => Ok(()),
        }
    }

    pub(crate) fn next_id(&self) -> i64 {
        self.id_counter.fetch_add(1, Ordering::SeqCst)
    }

    /// Number of spaces currently held.
    pub fn space_count(&self) -> usize {
        self.spaces.len()
    }

    /// Number of apps currently held.
    pub fn app_count(&self) -> usize {
        self.apps.len()
    }

    /// Number of app fields currently held.
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Removes a space behind the provider's back, simulating out-of-band drift.
    pub fn forget_space(&self, space_id: i64) -> bool {
        self.spaces.remove(&space_id).is_some()
    }
}

impl Default for InMemoryRemote {
    fn default() -> Self {
        Self::new()
    }
}

/// Lowercase URL label derived from a display name.
pub(crate) fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Eng"), "eng");
        assert_eq!(slugify("Sales & Marketing"), "sales-marketing");
        assert_eq!(slugify("  Ops  "), "ops");
    }

    #[test]
    fn test_ids_are_unique() {
        let remote = InMemoryRemote::new();
        let a = remote.next_id();
        let b = remote.next_id();
        assert_ne!(a, b);
    }

    #[test]
    fn test_faults_can_be_cleared() {
        let remote = InMemoryRemote::new();
        remote.inject_fault(RemoteOperation::DeleteSpace, RemoteError::api(403, "nope"));
        assert!(remote.check_fault(RemoteOperation::DeleteSpace).is_err());
        assert!(remote.check_fault(RemoteOperation::GetSpace).is_ok());

        remote.clear_fault(RemoteOperation::DeleteSpace);
        assert!(remote.check_fault(RemoteOperation::DeleteSpace).is_ok());
    }
}
