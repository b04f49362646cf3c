//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Catalog (?categoria=) with cart panel
//! GET  /health                 - Liveness
//! GET  /health/ready           - Readiness (backend status)
//!
//! # Cart (HTMX fragments, redirect to / without HTMX)
//! POST /cart/add               - Add one unit
//! POST /cart/decrement         - Remove one unit
//! POST /cart/remove            - Remove the line
//! POST /cart/clear             - Empty the cart
//! GET  /cart/count             - Cart count badge
//!
//! # Checkout
//! GET  /checkout               - Payment method selection
//! POST /checkout               - Submit the sale
//! GET  /ticket                 - Receipt of the last sale
//! ```

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod health;
pub mod ticket;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/add", post(cart::add))
        .route("/decrement", post(cart::decrement))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(catalog::index))
        .nest("/cart", cart_routes())
        .route("/checkout", get(checkout::show).post(checkout::submit))
        .route("/ticket", get(ticket::show))
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
}
