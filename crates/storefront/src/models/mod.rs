//! Domain models for storefront.

pub mod session;

pub use session::{CheckoutPhase, keys as session_keys};
