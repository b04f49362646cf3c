//! Minimarket Core - Shared domain library.
//!
//! This crate provides the domain types used across all Minimarket components:
//! - `storefront` - Public catalog, cart, checkout and ticket
//! - `admin` - Authenticated administration console
//! - `client` - REST client for the minimarket backend
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no HTTP
//! clients, no async. This keeps the cart and tax rules testable in isolation
//! and usable from any front end.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, categories and roles
//! - [`product`] - Catalog products and product registration input
//! - [`cart`] - The shopping cart aggregate
//! - [`tax`] - IGV policy for tax-inclusive totals
//! - [`payment`] - Payment methods and their reference requirements
//! - [`checkout`] - Sale request preparation and validation
//! - [`receipt`] - Ticket built from a finalized sale
//! - [`report`] - Report payloads and date ranges

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod checkout;
pub mod payment;
pub mod product;
pub mod receipt;
pub mod report;
pub mod tax;
pub mod types;

pub use cart::{Cart, LineItem};
pub use checkout::{CheckoutError, SaleConfirmation, SaleItem, SaleRequest};
pub use payment::{CASH_METHOD_NAME, PaymentKind, PaymentMethod};
pub use product::{NewProduct, Product, ProductValidationError};
pub use receipt::{Receipt, ReceiptLine};
pub use tax::{IGV_RATE, TaxBreakdown};
pub use types::*;
