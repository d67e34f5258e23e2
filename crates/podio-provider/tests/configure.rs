//! Provider configuration and registry resolution.

use assert_json_diff::assert_json_include;
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use podio_config::ProviderConfig;
use podio_provider::{Provider, ProviderError, Record, catalog, validate_desired};

fn config_for(server: &MockServer) -> ProviderConfig {
    let mut cfg = ProviderConfig::new("app", "secret", "ops@example.com", "pw");
    cfg.base_url = server.uri();
    cfg.trust_level = 1;
    cfg
}

#[tokio::test]
async fn test_configure_authenticates_once_and_registers_types() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(body_string_contains("username=ops%40example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok",
            "expires_in": 28800
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = Provider::configure(&config_for(&server)).await.unwrap();

    assert_eq!(provider.backend_name(), "podio");
    assert_eq!(provider.trust_level(), 1);
    let resources: Vec<_> = provider.resource_types().collect();
    assert_eq!(resources, ["podio_space", "podio_app", "podio_app_field"]);
    assert!(provider.resolve("podio_space").is_ok());
    assert!(provider.resolve_data_source("podio_organization").is_ok());
}

#[tokio::test]
async fn test_rejected_credentials_fail_fast() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Invalid user credentials"
        })))
        .mount(&server)
        .await;

    let err = Provider::configure(&config_for(&server))
        .await
        .err()
        .expect("authentication must fail");

    assert!(matches!(err, ProviderError::MisconfiguredProvider { .. }));
    assert!(err.is_fatal());
    assert!(err.to_string().contains("Failed to authenticate with Podio"));
    assert_eq!(err.category().to_string(), "misconfigured_provider");
}

#[tokio::test]
async fn test_unknown_entity_type() {
    let remote = std::sync::Arc::new(podio_remote_memory::InMemoryRemote::new());
    let provider = Provider::with_client(remote);

    let err = provider.resolve("podio_item").err().expect("unregistered type");
    assert!(matches!(err, ProviderError::UnknownEntityType { ref name } if name == "podio_item"));

    // Data sources and resources live in separate namespaces.
    assert!(provider.resolve("podio_organization").is_err());
    assert!(provider.resolve_data_source("podio_space").is_err());
}

#[test]
fn test_preflight_validation_needs_no_client() {
    let desired = Record::new().with("org_id", 1i64).with("name", "Eng");
    assert!(validate_desired("podio_space", &desired).is_ok());

    let bad = Record::new().with("name", "Eng").with("privacy", "secret");
    let err = validate_desired("podio_space", &bad).unwrap_err();
    assert_eq!(err.violations().len(), 2);
}

#[test]
fn test_schema_surface_serializes() {
    let json = serde_json::to_value(catalog()).unwrap();
    assert_json_include!(
        actual: json,
        expected: json!({
            "provider": { "type_name": "podio", "kind": "provider" },
            "resources": {
                "podio_space": {
                    "kind": "resource",
                    "id_attribute": "space_id",
                    "attributes": [{ "name": "space_id", "type": "int64", "requirement": "computed" }]
                }
            },
            "data_sources": {
                "podio_organization": {
                    "exactly_one_of": [{ "attributes": ["url_label", "org_id"] }]
                }
            }
        })
    );
}

#[test]
fn test_markdown_docs_carry_validator_descriptions() {
    let catalog = catalog();
    let space = catalog.get("podio_space").unwrap().to_markdown();
    assert!(space.contains("must be one of: `open`, `closed`"));

    let app = catalog.get("podio_app").unwrap().to_markdown();
    assert!(app.contains(r"must match regexp: `^\d+\.png$`"));
}
