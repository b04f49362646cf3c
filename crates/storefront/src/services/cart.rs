//! Session-backed cart storage.
//!
//! The cart is loaded from the session, changed through the [`Cart`]
//! operations and written back in one step by [`update_cart`].

use minimarket_core::Cart;
use tower_sessions::Session;

use crate::models::session_keys;

/// Load the session's cart, empty if none was stored yet.
///
/// # Errors
///
/// Returns an error if the session store fails or the stored cart cannot be
/// decoded.
pub async fn load_cart(session: &Session) -> Result<Cart, tower_sessions::session::Error> {
    Ok(session
        .get::<Cart>(session_keys::CART)
        .await?
        .unwrap_or_default())
}

/// Store the cart in the session.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn save_cart(session: &Session, cart: &Cart) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CART, cart).await
}

/// Apply `change` to the session cart and save the result.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn update_cart<F>(session: &Session, change: F) -> Result<Cart, tower_sessions::session::Error>
where
    F: FnOnce(&mut Cart),
{
    let mut cart = load_cart(session).await?;
    change(&mut cart);
    save_cart(session, &cart).await?;
    Ok(cart)
}
