//! User registration (ADMIN only).

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    extract::{RawForm, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use minimarket_client::{ApiError, NewUser};
use minimarket_core::Role;
use secrecy::SecretString;
use tracing::instrument;

use crate::{
    error::{AppError, Result},
    filters,
    middleware::RequireAdminRole,
    state::AppState,
};

use super::dashboard::AdminUserView;

/// Role checkbox for templates.
#[derive(Debug, Clone)]
pub struct RoleOption {
    pub value: &'static str,
    pub label: &'static str,
    pub checked: bool,
}

fn role_options(selected: &[Role]) -> Vec<RoleOption> {
    Role::ASSIGNABLE
        .iter()
        .map(|role| RoleOption {
            value: role.as_str(),
            label: role.label(),
            checked: selected.contains(role),
        })
        .collect()
}

/// Users page template.
#[derive(Template, WebTemplate)]
#[template(path = "users/index.html")]
pub struct UsersTemplate {
    pub admin_user: AdminUserView,
    pub current_path: String,
    pub username: String,
    pub roles: Vec<RoleOption>,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Submitted registration, parsed from the urlencoded body.
///
/// `roles` repeats once per checked box, which `serde_urlencoded` cannot
/// collect into a `Vec`.
#[derive(Debug, Default)]
struct SignupForm {
    username: String,
    password: String,
    roles: Vec<Role>,
}

impl SignupForm {
    fn parse(body: &[u8]) -> Self {
        let mut form = Self::default();
        for (key, value) in url::form_urlencoded::parse(body) {
            match key.as_ref() {
                "username" => form.username = value.trim().to_string(),
                "password" => form.password = value.into_owned(),
                "roles" => {
                    if let Ok(role) = value.parse::<Role>()
                        && !form.roles.contains(&role)
                    {
                        form.roles.push(role);
                    }
                }
                _ => {}
            }
        }
        form
    }

    fn validate(self) -> std::result::Result<NewUser, (String, Vec<Role>, &'static str)> {
        let missing = if self.username.is_empty() {
            Some("El usuario es obligatorio")
        } else if self.password.is_empty() {
            Some("La contraseña es obligatoria")
        } else if self.roles.is_empty() {
            Some("Selecciona al menos un rol")
        } else {
            None
        };

        match missing {
            Some(message) => Err((self.username, self.roles, message)),
            None => Ok(NewUser {
                username: self.username,
                password: SecretString::from(self.password),
                roles: self.roles,
            }),
        }
    }
}

/// Build the users router.
pub fn router() -> Router<AppState> {
    Router::new().route("/users", get(index).post(create))
}

/// Users page handler.
#[instrument(skip(credential))]
pub async fn index(RequireAdminRole(credential): RequireAdminRole) -> UsersTemplate {
    UsersTemplate {
        admin_user: AdminUserView::from(&credential),
        current_path: "/users".to_string(),
        username: String::new(),
        roles: role_options(&[]),
        error: None,
        success: None,
    }
}

/// Register a user with the selected roles.
#[instrument(skip(credential, state, body))]
pub async fn create(
    RequireAdminRole(credential): RequireAdminRole,
    State(state): State<AppState>,
    RawForm(body): RawForm,
) -> Result<Response> {
    let admin_user = AdminUserView::from(&credential);

    let user = match SignupForm::parse(&body).validate() {
        Ok(user) => user,
        Err((username, roles, message)) => {
            let template = UsersTemplate {
                admin_user,
                current_path: "/users".to_string(),
                username,
                roles: role_options(&roles),
                error: Some(message.to_string()),
                success: None,
            };
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, template).into_response());
        }
    };

    match state.api().signup(&credential, &user).await {
        Ok(message) => {
            tracing::info!(username = %user.username, "User registered");
            Ok(UsersTemplate {
                admin_user,
                current_path: "/users".to_string(),
                username: String::new(),
                roles: role_options(&[]),
                error: None,
                success: Some(message),
            }
            .into_response())
        }
        Err(ApiError::Unauthorized) => Err(AppError::Api(ApiError::Unauthorized)),
        Err(e) => {
            tracing::warn!(error = %e, "User registration rejected");
            let template = UsersTemplate {
                admin_user,
                current_path: "/users".to_string(),
                username: user.username,
                roles: role_options(&user.roles),
                error: Some(e.user_message()),
                success: None,
            };
            Ok((StatusCode::UNPROCESSABLE_ENTITY, template).into_response())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn test_parse_collects_repeated_roles() {
        let form = SignupForm::parse(b"username=+caja2+&password=s3cr3t&roles=VENDEDOR&roles=ADMIN&roles=VENDEDOR&roles=ROOT");
        assert_eq!(form.username, "caja2");
        assert_eq!(form.roles, vec![Role::Vendedor, Role::Admin]);

        let user = form.validate().unwrap();
        assert_eq!(user.password.expose_secret(), "s3cr3t");
    }

    #[test]
    fn test_validate_requires_a_role() {
        let form = SignupForm::parse(b"username=caja2&password=x");
        let (username, roles, message) = form.validate().unwrap_err();
        assert_eq!(username, "caja2");
        assert!(roles.is_empty());
        assert_eq!(message, "Selecciona al menos un rol");
    }

    #[test]
    fn test_role_options_mark_selection() {
        let options = role_options(&[Role::Almacenero]);
        assert_eq!(options.len(), 3);
        assert!(options.iter().any(|o| o.value == "ALMACENERO" && o.checked));
        assert_eq!(options.iter().filter(|o| o.checked).count(), 1);
    }
}
