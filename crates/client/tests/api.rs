//! Client behavior against a mocked backend.

use std::time::Duration;

use chrono::NaiveDate;
use minimarket_client::{ApiClient, ApiError, Credential, NewUser, SalesGateway};
use minimarket_core::report::{DateRange, ExportKind};
use minimarket_core::{PaymentMethodId, ProductId, Role, SaleItem, SaleRequest};
use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> ApiClient {
    let url = server.uri().parse().expect("mock server uri");
    ApiClient::new(&url, Duration::from_secs(5)).expect("client")
}

fn admin() -> Credential {
    Credential::new("tok-123".to_string(), "admin".to_string(), vec![Role::Admin])
}

fn week() -> DateRange {
    DateRange::new(
        NaiveDate::from_ymd_opt(2026, 3, 1).expect("date"),
        NaiveDate::from_ymd_opt(2026, 3, 7).expect("date"),
    )
    .expect("range")
}

#[tokio::test]
async fn test_login_returns_credential() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/signin"))
        .and(body_json(json!({"username": "admin", "password": "admin123"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "jwt-abc",
            "username": "admin",
            "roles": ["ROLE_ADMIN", "SUPERVISOR"]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let credential = client_for(&server)
        .login("admin", &SecretString::from("admin123"))
        .await
        .expect("login");

    assert_eq!(credential.username(), "admin");
    assert_eq!(credential.roles(), &[Role::Admin]);
}

#[tokio::test]
async fn test_login_rejected_is_backend_error_with_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/signin"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "Credenciales inválidas"})),
        )
        .mount(&server)
        .await;

    let err = client_for(&server)
        .login("admin", &SecretString::from("wrong"))
        .await
        .expect_err("should fail");

    match err {
        ApiError::Backend { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "Credenciales inválidas");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_expired_credential_is_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/dashboard/resumen"))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .dashboard_summary(&admin())
        .await
        .expect_err("should fail");
    assert!(err.is_unauthorized());
}

#[tokio::test]
async fn test_role_denial_is_forbidden_not_expired() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/reportes/rango"))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .sales_by_range(&admin(), &week())
        .await
        .expect_err("should fail");
    assert!(matches!(err, ApiError::Forbidden));
    assert!(!err.is_unauthorized());
}

#[tokio::test]
async fn test_catalog_cached_and_lenient() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/productos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "nombre": "Arroz", "descripcion": "1kg", "categoria": "Abarrotes", "precio": 3.5, "imagen": "arroz.png"},
            {"id": 2, "nombre": "Roto", "categoria": "Desconocida", "precio": 1}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let first = client.list_products().await.expect("products");
    let second = client.list_products().await.expect("cached products");

    assert_eq!(first.len(), 1);
    assert_eq!(first, second);
    assert!(
        client
            .find_product(ProductId::new(2))
            .await
            .expect("lookup")
            .is_none()
    );
}

#[tokio::test]
async fn test_product_write_invalidates_catalog_cache() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/productos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/productos/9"))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.list_products().await.expect("products");
    client
        .delete_product(&admin(), ProductId::new(9))
        .await
        .expect("delete");
    client.list_products().await.expect("products again");
}

#[tokio::test]
async fn test_payment_methods() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/metodos-pago/public"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "nombre": "EFECTIVO", "activo": true},
            {"id": 2, "nombre": "YAPE", "activo": false}
        ])))
        .mount(&server)
        .await;

    let methods = client_for(&server).payment_methods().await.expect("methods");
    assert_eq!(methods.len(), 2);
    assert!(!methods[1].active);
}

#[tokio::test]
async fn test_finalize_sale_posts_items() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ventas"))
        .and(body_json(json!({
            "items": [{"productoId": 1, "cantidad": 2}],
            "metodoPagoId": 2,
            "referencia": "778899"
        })))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({"id": 501, "metodoPago": "YAPE"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let request = SaleRequest {
        items: vec![SaleItem {
            producto_id: ProductId::new(1),
            cantidad: 2,
        }],
        metodo_pago_id: PaymentMethodId::new(2),
        referencia: "778899".to_string(),
    };
    let confirmation = client_for(&server)
        .finalize_sale(&request)
        .await
        .expect("sale");
    assert_eq!(confirmation.id.as_i64(), 501);
    assert_eq!(confirmation.payment_method.as_deref(), Some("YAPE"));
}

#[tokio::test]
async fn test_sale_rejection_message_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ventas"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({"message": "Stock insuficiente para Arroz"})),
        )
        .mount(&server)
        .await;

    let request = SaleRequest {
        items: vec![SaleItem {
            producto_id: ProductId::new(1),
            cantidad: 99,
        }],
        metodo_pago_id: PaymentMethodId::new(1),
        referencia: String::new(),
    };
    let err = client_for(&server)
        .finalize_sale(&request)
        .await
        .expect_err("should fail");
    assert_eq!(err.user_message(), "Stock insuficiente para Arroz");
}

#[tokio::test]
async fn test_reports_send_full_day_range() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/reportes/productos/top"))
        .and(query_param("inicio", "2026-03-01T00:00:00"))
        .and(query_param("fin", "2026-03-07T23:59:59"))
        .and(query_param("limite", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"productoId": 1, "nombre": "Arroz", "cantidadVendida": 12, "totalVentas": 42.0}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let top = client_for(&server)
        .top_products(&admin(), &week(), 5)
        .await
        .expect("report");
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].cantidad_vendida, 12);
}

#[tokio::test]
async fn test_export_returns_bytes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/reportes/exportar/rango/excel"))
        .and(query_param("inicio", "2026-03-01T00:00:00"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0x50, 0x4b, 0x03, 0x04]))
        .expect(1)
        .mount(&server)
        .await;

    let bytes = client_for(&server)
        .export_report(&admin(), ExportKind::Range, &week(), 10)
        .await
        .expect("export");
    assert_eq!(bytes, vec![0x50, 0x4b, 0x03, 0x04]);
}

#[tokio::test]
async fn test_signup_sends_roles() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/signup"))
        .and(body_json(json!({
            "username": "caja2",
            "password": "secreto",
            "roles": ["VENDEDOR", "ALMACENERO"]
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"message": "Usuario registrado"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let user = NewUser {
        username: "caja2".to_string(),
        password: SecretString::from("secreto"),
        roles: vec![Role::Vendedor, Role::Almacenero],
    };
    let message = client_for(&server)
        .signup(&admin(), &user)
        .await
        .expect("signup");
    assert_eq!(message, "Usuario registrado");
}

#[tokio::test]
async fn test_unreachable_backend_is_http_error() {
    let url = "http://127.0.0.1:9".parse().expect("url");
    let client = ApiClient::new(&url, Duration::from_secs(2)).expect("client");
    let err = client.backend_status().await.expect_err("should fail");
    assert!(matches!(err, ApiError::Http(_)));
}
