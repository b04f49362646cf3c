//! Authentication route handlers for admin.
//!
//! Username/password sign-in against the backend. The issued credential is
//! kept in the session until logout or until the backend rejects it.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::middleware::{clear_credential, set_credential};
use crate::models::session_keys;
use crate::state::AppState;

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub username: String,
    pub error: Option<String>,
    pub notice: Option<&'static str>,
}

/// Query parameters for the login page.
#[derive(Debug, Default, Deserialize)]
pub struct LoginQuery {
    pub expired: Option<String>,
}

/// Login form data.
#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/login", get(login_page).post(login))
        .route("/auth/logout", post(logout))
}

/// Render the login page.
///
/// GET /auth/login
async fn login_page(session: Session, Query(query): Query<LoginQuery>) -> Result<Response> {
    if session
        .get::<serde_json::Value>(session_keys::CREDENTIAL)
        .await?
        .is_some()
    {
        return Ok(Redirect::to("/").into_response());
    }

    Ok(LoginTemplate {
        username: String::new(),
        error: None,
        notice: query
            .expired
            .is_some()
            .then_some("Tu sesión ha expirado, inicia sesión nuevamente"),
    }
    .into_response())
}

/// Sign in.
///
/// POST /auth/login
#[instrument(skip(state, session, form), fields(username = %form.username))]
async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let username = form.username.trim();
    let password = SecretString::from(form.password);
    if username.is_empty() || password.expose_secret().is_empty() {
        return Ok(login_failed(
            username,
            "Ingresa usuario y contraseña".to_string(),
        ));
    }

    match state.api().login(username, &password).await {
        Ok(credential) => {
            set_credential(&session, &credential).await?;
            tracing::info!(roles = ?credential.roles(), "Admin signed in");
            Ok(Redirect::to("/").into_response())
        }
        Err(e) => {
            tracing::warn!(error = %e, "Sign-in rejected");
            Ok(login_failed(username, e.user_message()))
        }
    }
}

fn login_failed(username: &str, message: String) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        LoginTemplate {
            username: username.to_string(),
            error: Some(message),
            notice: None,
        },
    )
        .into_response()
}

/// Logout and clear session.
///
/// POST /auth/logout
async fn logout(session: Session) -> Result<Redirect> {
    clear_credential(&session).await?;
    Ok(Redirect::to("/auth/login"))
}
