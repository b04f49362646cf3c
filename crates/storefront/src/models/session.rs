//! Session-related types.

use serde::{Deserialize, Serialize};

/// Where the session's checkout stands.
///
/// A session is `Submitted` from the moment its sale is sent until the
/// backend answers; a second submission is refused meanwhile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckoutPhase {
    #[default]
    AwaitingConfirmation,
    Submitted,
}

/// Session keys for storefront data.
pub mod keys {
    /// Key for the shopping cart.
    pub const CART: &str = "cart";

    /// Key for the receipt of the last finalized sale.
    pub const LAST_RECEIPT: &str = "last_receipt";

    /// Key for the checkout phase.
    pub const CHECKOUT_PHASE: &str = "checkout_phase";
}
