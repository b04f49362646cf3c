//! Core types for Minimarket.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod category;
pub mod id;
pub mod price;
pub mod role;

pub use category::{Category, CategoryFilter, ParseCategoryError};
pub use id::*;
pub use price::{Price, PriceError};
pub use role::Role;
