//! HTTP middleware stack for admin.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request span with status and latency)
//! 3. Session layer (tower-sessions with in-memory store)
//! 4. Credential expiry (drops a credential the backend rejected)
//! 5. Auth extractors on protected handlers

pub mod auth;
pub mod session;

pub use auth::{RequireAdminAuth, RequireAdminRole, clear_credential, expire_credential, set_credential};
pub use session::create_session_layer;
