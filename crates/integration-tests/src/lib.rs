//! Integration test harness for Minimarket.
//!
//! Each test starts a mocked backend with `wiremock` and serves the real
//! storefront or admin router on an ephemeral port.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p minimarket-integration-tests
//! ```

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use axum::Router;
use reqwest::{Client, redirect};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A running app plus the mocked backend it talks to.
pub struct TestContext {
    pub backend: MockServer,
    pub base_url: String,
    pub client: Client,
}

impl TestContext {
    /// Start the storefront against a fresh mock backend.
    ///
    /// # Panics
    ///
    /// Panics if the server cannot be started.
    pub async fn storefront() -> Self {
        let backend = MockServer::start().await;
        let config = minimarket_storefront::config::StorefrontConfig {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 0,
            base_url: "http://localhost".to_string(),
            static_dir: PathBuf::from("../storefront/static"),
            api: minimarket_storefront::config::ApiConfig {
                url: api_url(&backend),
                timeout: Duration::from_secs(5),
            },
            store: minimarket_storefront::config::StoreInfo::default(),
            sentry_dsn: None,
            sentry_environment: None,
        };
        let state = minimarket_storefront::state::AppState::new(config).expect("storefront state");
        Self::serve(backend, minimarket_storefront::app(state)).await
    }

    /// Start the admin console against a fresh mock backend.
    ///
    /// # Panics
    ///
    /// Panics if the server cannot be started.
    pub async fn admin() -> Self {
        let backend = MockServer::start().await;
        let config = minimarket_admin::config::AdminConfig {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 0,
            base_url: "http://localhost".to_string(),
            static_dir: PathBuf::from("../admin/static"),
            api_url: api_url(&backend),
            api_timeout: Duration::from_secs(5),
            sentry_dsn: None,
            sentry_environment: None,
        };
        let state = minimarket_admin::state::AppState::new(config).expect("admin state");
        Self::serve(backend, minimarket_admin::app(state)).await
    }

    async fn serve(backend: MockServer, router: Router) -> Self {
        let listener = TcpListener::bind(SocketAddr::from((Ipv4Addr::LOCALHOST, 0)))
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, router).await.ok();
        });

        let client = Client::builder()
            .cookie_store(true)
            .redirect(redirect::Policy::none())
            .build()
            .expect("http client");

        Self {
            backend,
            base_url: format!("http://{addr}"),
            client,
        }
    }

    /// Absolute URL for a path on the app under test.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

fn api_url(backend: &MockServer) -> Url {
    backend.uri().parse().expect("mock server uri")
}

/// Two products: Arroz (S/ 3.50) and Leche (S/ 4.20).
#[must_use]
pub fn sample_products() -> Value {
    json!([
        {"id": 1, "nombre": "Arroz", "descripcion": "Arroz extra 1kg", "categoria": "Abarrotes", "precio": 3.5, "imagen": "arroz.png"},
        {"id": 2, "nombre": "Leche", "descripcion": "Leche evaporada", "categoria": "Lácteos", "precio": 4.2, "imagen": "leche.png"}
    ])
}

/// Cash, YAPE and an inactive PLIN.
#[must_use]
pub fn sample_methods() -> Value {
    json!([
        {"id": 1, "nombre": "EFECTIVO", "activo": true},
        {"id": 2, "nombre": "YAPE", "activo": true},
        {"id": 3, "nombre": "PLIN", "activo": false}
    ])
}

/// Mount the public catalog and payment method endpoints.
pub async fn mount_catalog(backend: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/productos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_products()))
        .mount(backend)
        .await;
    Mock::given(method("GET"))
        .and(path("/metodos-pago/public"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_methods()))
        .mount(backend)
        .await;
}
