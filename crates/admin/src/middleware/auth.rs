//! Authentication middleware and extractors for admin.
//!
//! Provides extractors for requiring a signed-in user in route handlers and
//! the single place where a rejected credential is dropped.

use axum::{
    extract::{FromRequestParts, Request},
    http::{StatusCode, request::Parts},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use minimarket_client::Credential;
use minimarket_core::Role;
use tower_sessions::Session;

use crate::error::{CredentialExpired, clear_sentry_user, set_sentry_user};
use crate::models::session_keys;

/// Extractor that requires a signed-in user.
///
/// If nobody is signed in, redirects to the login page.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAdminAuth(credential): RequireAdminAuth,
/// ) -> impl IntoResponse {
///     format!("Hola, {}!", credential.username())
/// }
/// ```
pub struct RequireAdminAuth(pub Credential);

/// Error returned when authentication is required but the user is not signed in.
pub enum AdminAuthRejection {
    /// Redirect to login page.
    RedirectToLogin,
    /// The session layer is missing.
    MissingSession,
}

impl IntoResponse for AdminAuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/auth/login").into_response(),
            Self::MissingSession => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireAdminAuth
where
    S: Send + Sync,
{
    type Rejection = AdminAuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AdminAuthRejection::MissingSession)?;

        let credential: Credential = session
            .get(session_keys::CREDENTIAL)
            .await
            .ok()
            .flatten()
            .ok_or(AdminAuthRejection::RedirectToLogin)?;

        set_sentry_user(credential.username());
        Ok(Self(credential))
    }
}

/// Extractor that requires the `ADMIN` role.
///
/// Signed-out users are redirected to login; other roles get 403.
pub struct RequireAdminRole(pub Credential);

impl<S> FromRequestParts<S> for RequireAdminRole
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let RequireAdminAuth(credential) = RequireAdminAuth::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;

        if !credential.has_role(Role::Admin) {
            return Err((
                StatusCode::FORBIDDEN,
                "No tienes permisos de administrador para ver este contenido",
            )
                .into_response());
        }

        Ok(Self(credential))
    }
}

/// Helper to store the credential in the session after login.
///
/// The session id is cycled to prevent fixation.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_credential(
    session: &Session,
    credential: &Credential,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::CREDENTIAL, credential).await
}

/// Helper to clear the credential from the session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_credential(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<Credential>(session_keys::CREDENTIAL)
        .await?;
    clear_sentry_user();
    Ok(())
}

/// Drop the session credential when a handler reports it was rejected.
///
/// Handlers surface a rejected credential as
/// [`crate::error::AppError::Api`] with `ApiError::Unauthorized`, whose
/// response carries [`CredentialExpired`].
pub async fn expire_credential(session: Session, request: Request, next: Next) -> Response {
    let response = next.run(request).await;

    if response.extensions().get::<CredentialExpired>().is_some() {
        if let Err(e) = clear_credential(&session).await {
            tracing::error!(error = %e, "Failed to clear expired credential");
        }
    }

    response
}
