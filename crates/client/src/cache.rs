//! Cache types for public API responses.

use minimarket_core::{PaymentMethod, Product};

/// Cache key for public catalog data.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Products,
    PaymentMethods,
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Products(Vec<Product>),
    PaymentMethods(Vec<PaymentMethod>),
}
