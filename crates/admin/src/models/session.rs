//! Session-related types for admin authentication.
//!
//! The session holds the backend [`minimarket_client::Credential`] of the
//! signed-in user; nothing else about the user is stored locally.

/// Session keys for admin authentication data.
pub mod keys {
    /// Key for the signed-in user's credential.
    pub const CREDENTIAL: &str = "credential";
}
