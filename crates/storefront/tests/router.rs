//! Router-level tests driven with `tower::ServiceExt::oneshot`.

use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;
use std::time::Duration;

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use minimarket_storefront::app;
use minimarket_storefront::config::{ApiConfig, StoreInfo, StorefrontConfig};
use minimarket_storefront::state::AppState;
use serde_json::json;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_app(backend: &MockServer) -> axum::Router {
    let config = StorefrontConfig {
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        base_url: "http://localhost".to_string(),
        static_dir: PathBuf::from("static"),
        api: ApiConfig {
            url: backend.uri().parse().expect("mock uri"),
            timeout: Duration::from_secs(5),
        },
        store: StoreInfo::default(),
        sentry_dsn: None,
        sentry_environment: None,
    };
    app(AppState::new(config).expect("state"))
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    String::from_utf8(bytes.to_vec()).expect("utf-8")
}

#[tokio::test]
async fn test_health_and_request_id() {
    let backend = MockServer::start().await;
    let response = test_app(&backend)
        .oneshot(Request::get("/health").body(Body::empty()).expect("request"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    assert_eq!(body_text(response).await, "ok");
}

#[tokio::test]
async fn test_ticket_without_sale_redirects_to_catalog() {
    let backend = MockServer::start().await;
    let response = test_app(&backend)
        .oneshot(Request::get("/ticket").body(Body::empty()).expect("request"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/");
}

#[tokio::test]
async fn test_catalog_survives_backend_outage() {
    let backend = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/productos"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&backend)
        .await;

    let response = test_app(&backend)
        .oneshot(Request::get("/").body(Body::empty()).expect("request"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Todos"));
}

#[tokio::test]
async fn test_add_unknown_product_is_not_found() {
    let backend = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/productos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "nombre": "Arroz", "descripcion": "1kg", "categoria": "Abarrotes", "precio": 3.5}
        ])))
        .mount(&backend)
        .await;

    let response = test_app(&backend)
        .oneshot(
            Request::post("/cart/add")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("product_id=7"))
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_checkout_with_empty_cart_is_rejected_locally() {
    let backend = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/metodos-pago/public"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "nombre": "EFECTIVO", "activo": true}
        ])))
        .mount(&backend)
        .await;
    Mock::given(method("POST"))
        .and(path("/ventas"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&backend)
        .await;

    let response = test_app(&backend)
        .oneshot(
            Request::post("/checkout")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("metodo_pago_id=1"))
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body_text(response).await.contains("El carrito está vacío"));
}
