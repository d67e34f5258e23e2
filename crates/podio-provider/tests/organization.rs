//! Organization lookups.

use std::sync::Arc;

use podio_provider::{Provider, Record};
use podio_remote::RemoteError;
use podio_remote_memory::{InMemoryRemote, RemoteOperation};

fn setup() -> (Arc<InMemoryRemote>, Provider) {
    let remote = Arc::new(InMemoryRemote::new().with_organization(42, "acme"));
    let provider = Provider::with_client(remote.clone());
    (remote, provider)
}

#[tokio::test]
async fn test_lookup_by_url_label() {
    let (_remote, provider) = setup();
    let orgs = provider.resolve_data_source("podio_organization").unwrap();

    let org = orgs
        .lookup(&Record::new().with("url_label", "acme"))
        .await
        .unwrap();
    assert_eq!(org.get_i64("org_id"), Some(42));
    assert_eq!(org.get_str("url"), Some("https://podio.com/acme"));
}

#[tokio::test]
async fn test_lookup_by_org_id() {
    let (_remote, provider) = setup();
    let orgs = provider.resolve_data_source("podio_organization").unwrap();

    let org = orgs.lookup(&Record::new().with("org_id", 42i64)).await.unwrap();
    assert_eq!(org.get_str("url_label"), Some("acme"));
}

#[tokio::test]
async fn test_both_selectors_are_ambiguous() {
    let (_remote, provider) = setup();
    let orgs = provider.resolve_data_source("podio_organization").unwrap();

    let err = orgs
        .lookup(&Record::new().with("url_label", "acme").with("org_id", 42i64))
        .await
        .unwrap_err();
    assert!(err.is_validation());
    assert_eq!(err.violations()[0].summary, "Ambiguous search pattern");
}

#[tokio::test]
async fn test_missing_selector() {
    let (_remote, provider) = setup();
    let orgs = provider.resolve_data_source("podio_organization").unwrap();

    let err = orgs.lookup(&Record::new()).await.unwrap_err();
    assert_eq!(err.violations()[0].summary, "No URL or Org ID specified");
}

#[tokio::test]
async fn test_unknown_organization_is_not_found() {
    let (_remote, provider) = setup();
    let orgs = provider.resolve_data_source("podio_organization").unwrap();

    let err = orgs
        .lookup(&Record::new().with("url_label", "globex"))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_remote_failure_is_surfaced() {
    let (remote, provider) = setup();
    remote.inject_fault(
        RemoteOperation::GetOrganization,
        RemoteError::transport("connection refused"),
    );
    let orgs = provider.resolve_data_source("podio_organization").unwrap();

    let err = orgs.lookup(&Record::new().with("org_id", 42i64)).await.unwrap_err();
    assert!(err.to_string().contains("connection refused"));
}
