//! Release check tests against a mocked registry.

use serde_json::json;
use wiremock::matchers::{header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use arxiv_search::config::Config;
use arxiv_search::error::ClientError;
use arxiv_search::version::{CRATE_NAME, VersionCheck, spawn_version_check};

fn crate_path() -> String {
    format!("/api/v1/crates/{CRATE_NAME}")
}

fn crate_body(stable: &str, max: &str) -> serde_json::Value {
    json!({
        "crate": {
            "name": CRATE_NAME,
            "max_stable_version": stable,
            "max_version": max,
            "downloads": 42
        }
    })
}

#[tokio::test]
async fn test_newer_release_reported() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(crate_path()))
        .and(header_exists("user-agent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(crate_body("9.9.9", "10.0.0-beta.1")))
        .mount(&mock_server)
        .await;

    let checker = VersionCheck::new(&Config::for_testing(&mock_server.uri())).unwrap();
    let notice = checker.check("0.1.0").await.unwrap().unwrap();

    assert_eq!(notice.latest, "9.9.9");
    assert_eq!(notice.current, "0.1.0");
}

#[tokio::test]
async fn test_up_to_date_reports_nothing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(crate_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(crate_body("0.1.0", "0.1.0")))
        .mount(&mock_server)
        .await;

    let checker = VersionCheck::new(&Config::for_testing(&mock_server.uri())).unwrap();
    assert_eq!(checker.check("0.1.0").await.unwrap(), None);
}

#[tokio::test]
async fn test_registry_failure_is_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(crate_path()))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .mount(&mock_server)
        .await;

    let checker = VersionCheck::new(&Config::for_testing(&mock_server.uri())).unwrap();
    let err = checker.latest_version().await.unwrap_err();
    assert_eq!(err.status_code(), Some(404));
    assert!(matches!(err, ClientError::Status { .. }));
}

#[tokio::test]
async fn test_background_check_swallows_failures() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(crate_path()))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let config = Config { version_check: true, ..Config::for_testing(&mock_server.uri()) };
    assert_eq!(spawn_version_check(&config).await.unwrap(), None);
}

#[tokio::test]
async fn test_background_check_reports_notice() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(crate_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(crate_body("999.0.0", "999.0.0")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = Config { version_check: true, ..Config::for_testing(&mock_server.uri()) };
    let notice = spawn_version_check(&config).await.unwrap().unwrap();
    assert_eq!(notice.latest, "999.0.0");
}
