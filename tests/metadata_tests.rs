//! Integration tests for the GCE metadata client using wiremock

use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use butio_salt_rs::BootstrapError;
use butio_salt_rs::sources::ArgumentSource;
use butio_salt_rs::sources::gce::{GceMetadata, GceSource};

/// Test that a 200 response yields the body
#[tokio::test]
async fn test_instance_value_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/instance/attributes/butio_salt_args"))
        .and(header("Metadata-Flavor", "Google"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"dns_servers\": []}"))
        .mount(&mock_server)
        .await;

    let metadata = GceMetadata::with_base_url(&mock_server.uri());
    let value = metadata
        .instance_value("attributes/butio_salt_args")
        .await
        .unwrap();

    assert_eq!(value, Some("{\"dns_servers\": []}".to_string()));
}

/// Test that any non-200 status yields absent, not an error
#[tokio::test]
async fn test_non_200_is_absent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/instance/attributes/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/project/forbidden"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&mock_server)
        .await;

    let metadata = GceMetadata::with_base_url(&mock_server.uri());

    assert_eq!(metadata.instance_value("attributes/missing").await.unwrap(), None);
    assert_eq!(metadata.project_value("forbidden").await.unwrap(), None);
}

/// Test that project values resolve under the project prefix
#[tokio::test]
async fn test_project_value_path() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/project/project-id"))
        .and(header("Metadata-Flavor", "Google"))
        .respond_with(ResponseTemplate::new(200).set_body_string("proj1"))
        .mount(&mock_server)
        .await;

    let metadata = GceMetadata::with_base_url(&mock_server.uri());
    let value = metadata.project_value("project-id").await.unwrap();

    assert_eq!(value, Some("proj1".to_string()));
}

/// Test the GCE source's search line construction from the project id
#[tokio::test]
async fn test_gce_source_search_line() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/project/project-id"))
        .respond_with(ResponseTemplate::new(200).set_body_string("proj1"))
        .mount(&mock_server)
        .await;

    let source = GceSource::with_base_url(&mock_server.uri());
    let line = source.dns_search_line().await.unwrap();

    assert_eq!(line, "search c.proj1.internal google.internal");
    assert_eq!(source.fallback_nameserver(), "169.254.169.254");
}

/// Test that an absent project id is fatal for the source
#[tokio::test]
async fn test_gce_source_missing_project_id() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/project/project-id"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let source = GceSource::with_base_url(&mock_server.uri());
    let err = source.dns_search_line().await.unwrap_err();

    match err {
        BootstrapError::MetadataUnavailable(key) => {
            assert_eq!(key, "project/project-id")
        }
        other => panic!("expected MetadataUnavailable, got {other:?}"),
    }
}

/// Test that an absent args attribute is fatal for the source
#[tokio::test]
async fn test_gce_source_missing_args() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/instance/attributes/butio_salt_args"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let source = GceSource::with_base_url(&mock_server.uri());
    let err = source.fetch_args().await.unwrap_err();

    assert!(matches!(err, BootstrapError::MetadataUnavailable(_)));
}
