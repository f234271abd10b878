//! HTTP surface integration tests

mod helpers;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use helpers::*;
use shared::GroupSet;
use tempfile::TempDir;
use tower::ServiceExt;

#[tokio::test]
async fn test_health_endpoint() {
    let server = TestServer::start().await;

    let (status, body) = server.get_json("/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert!(body["timestamp"].as_i64().unwrap() > 0);
    assert!(body["uptime_seconds"].is_u64());
}

#[tokio::test]
async fn test_status_starts_empty() {
    let server = TestServer::start().await;

    let (status, body) = server.get_json("/api/status").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "running");
    assert_eq!(body["active_connections"], 0);
    assert_eq!(body["total_assigned"], 0);

    let groups = body["groups"].as_array().unwrap();
    let labels: Vec<&str> = groups.iter().map(|g| g["group"].as_str().unwrap()).collect();
    assert_eq!(labels, vec!["Control", "Solo Musica", "Solo Aroma", "Musica y Aroma"]);
    assert!(groups.iter().all(|g| g["count"] == 0));

    assert_eq!(body["submissions"]["saved"], 0);
    assert_eq!(body["submissions"]["rejected"], 0);
    assert_eq!(body["submissions"]["failed"], 0);
}

#[tokio::test]
async fn test_status_reflects_configured_groups() {
    let groups = GroupSet::parse("Baseline, Treatment").unwrap();
    let server = TestServer::start_with(groups, None).await;

    let (_, body) = server.get_json("/api/status").await;
    let labels: Vec<&str> = body["groups"]
        .as_array()
        .unwrap()
        .iter()
        .map(|g| g["group"].as_str().unwrap())
        .collect();
    assert_eq!(labels, vec!["Baseline", "Treatment"]);
}

#[tokio::test]
async fn test_root_without_static_dir_returns_banner() {
    let server = TestServer::start().await;

    let (status, body) = server.get_json("/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["service"], "experiment-server");
    assert_eq!(body["websocket"], "/ws");
}

#[tokio::test]
async fn test_static_directory_is_served() {
    let site = TempDir::new().unwrap();
    std::fs::write(site.path().join("index.html"), "<html><body>Experimento</body></html>").unwrap();

    let server = TestServer::start_with(GroupSet::default(), Some(site.path().to_path_buf())).await;
    let router = server.server.build_router();

    let response = router
        .clone()
        .oneshot(Request::builder().uri("/index.html").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(String::from_utf8_lossy(&bytes).contains("Experimento"));

    let response = router
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.headers()[header::LOCATION], "/index.html");
}

#[tokio::test]
async fn test_unknown_path_without_static_dir_is_not_found() {
    let server = TestServer::start().await;

    let (status, _) = server.get_json("/does-not-exist").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
