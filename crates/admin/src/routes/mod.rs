//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Health check
//! GET  /health/ready           - Readiness (backend status)
//!
//! # Auth (backend username/password)
//! GET  /auth/login             - Login page
//! POST /auth/login             - Sign in
//! POST /auth/logout            - Logout
//!
//! # Dashboard
//! GET  /                       - Metrics and low-stock list (ADMIN)
//!
//! # Products
//! GET  /products               - Product list and registration form
//! POST /products               - Register product
//!
//! # Users (ADMIN only)
//! GET  /users                  - Registration form
//! POST /users                  - Register user
//!
//! # Reports
//! GET  /reports                - Report tabs (?tab=&inicio=&fin=&limite=)
//! GET  /reports/export/{kind}  - Spreadsheet download
//! ```

pub mod auth;
pub mod dashboard;
pub mod health;
pub mod products;
pub mod reports;
pub mod users;

use axum::{Router, routing::get};

use crate::state::AppState;

/// Create all routes for the admin console.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard::index))
        .merge(auth::router())
        .merge(health::router())
        .merge(products::router())
        .merge(users::router())
        .merge(reports::router())
}
