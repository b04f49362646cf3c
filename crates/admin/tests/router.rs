//! Router-level tests driven with `tower::ServiceExt::oneshot`.

use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;
use std::time::Duration;

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use minimarket_admin::app;
use minimarket_admin::config::AdminConfig;
use minimarket_admin::state::AppState;
use tower::ServiceExt;
use wiremock::MockServer;

fn test_app(backend: &MockServer) -> axum::Router {
    let config = AdminConfig {
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        base_url: "http://localhost".to_string(),
        static_dir: PathBuf::from("static"),
        api_url: backend.uri().parse().expect("mock uri"),
        api_timeout: Duration::from_secs(5),
        sentry_dsn: None,
        sentry_environment: None,
    };
    app(AppState::new(config).expect("state"))
}

#[tokio::test]
async fn test_dashboard_requires_login() {
    let backend = MockServer::start().await;
    let response = test_app(&backend)
        .oneshot(Request::get("/").body(Body::empty()).expect("request"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/auth/login");
}

#[tokio::test]
async fn test_login_page_renders() {
    let backend = MockServer::start().await;
    let response = test_app(&backend)
        .oneshot(
            Request::get("/auth/login?expired=1")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let body = String::from_utf8(bytes.to_vec()).expect("utf-8");
    assert!(body.contains("name=\"password\""));
    assert!(body.contains("Tu sesión ha expirado"));
}

#[tokio::test]
async fn test_blank_login_is_rejected_without_backend_call() {
    let backend = MockServer::start().await;
    let response = test_app(&backend)
        .oneshot(
            Request::post("/auth/login")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("username=&password="))
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(
        backend
            .received_requests()
            .await
            .unwrap_or_default()
            .is_empty()
    );
}
