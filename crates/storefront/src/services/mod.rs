//! Storefront services.
//!
//! - [`cart`] - Loads and saves the session cart
//! - [`checkout`] - Validates, submits and finalizes a sale

pub mod cart;
pub mod checkout;
