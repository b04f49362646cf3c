//! Authentication against the backend.
//!
//! Username/password sign-in yields a bearer token wrapped in a
//! [`Credential`]. The admin console keeps it in the session and passes it to
//! every authenticated call.

use minimarket_core::Role;
use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, Serializer};
use tracing::instrument;

use crate::{ApiClient, ApiError};

/// An authenticated backend identity.
///
/// `Debug` never prints the token. Serializing exposes it, for the session
/// store only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credential {
    #[serde(serialize_with = "expose_token")]
    token: SecretString,
    username: String,
    roles: Vec<Role>,
}

fn expose_token<S: Serializer>(token: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(token.expose_secret())
}

impl Credential {
    /// Wrap a token issued by the backend.
    #[must_use]
    pub fn new(token: impl Into<SecretString>, username: String, roles: Vec<Role>) -> Self {
        Self {
            token: token.into(),
            username,
            roles,
        }
    }

    pub(crate) fn token(&self) -> &str {
        self.token.expose_secret()
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    #[must_use]
    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    #[must_use]
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// The role shown in the console header (first one issued).
    #[must_use]
    pub fn primary_role(&self) -> Option<Role> {
        self.roles.first().copied()
    }
}

/// User registration data.
#[derive(Debug)]
pub struct NewUser {
    pub username: String,
    pub password: SecretString,
    pub roles: Vec<Role>,
}

#[derive(Serialize)]
struct SigninRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct SigninResponse {
    token: SecretString,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    roles: Vec<String>,
}

#[derive(Serialize)]
struct SignupRequest<'a> {
    username: &'a str,
    password: &'a str,
    roles: Vec<&'static str>,
}

#[derive(Deserialize)]
struct MessageResponse {
    #[serde(default)]
    message: Option<String>,
}

impl ApiClient {
    /// Sign in with username and password.
    ///
    /// Roles the console does not know are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Backend`] with the backend's message when the
    /// credentials are rejected.
    #[instrument(skip(self, password), fields(username = %username))]
    pub async fn login(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<Credential, ApiError> {
        let builder = self
            .request(Method::POST, "/auth/signin", None)
            .json(&SigninRequest {
                username,
                password: password.expose_secret(),
            });

        let response: SigninResponse = self.execute_json(builder, false).await?;

        let roles = response
            .roles
            .iter()
            .filter_map(|role| match role.parse::<Role>() {
                Ok(role) => Some(role),
                Err(e) => {
                    tracing::warn!(error = %e, "Ignoring unknown role");
                    None
                }
            })
            .collect();

        tracing::info!("Signed in");

        Ok(Credential::new(
            response.token,
            response.username.unwrap_or_else(|| username.to_string()),
            roles,
        ))
    }

    /// Register a new backend user.
    ///
    /// Returns the backend's confirmation message.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] if `credential` is no longer valid
    /// and [`ApiError::Backend`] if the backend rejects the user.
    #[instrument(skip(self, credential, user), fields(username = %user.username))]
    pub async fn signup(&self, credential: &Credential, user: &NewUser) -> Result<String, ApiError> {
        let builder = self
            .request(Method::POST, "/auth/signup", Some(credential))
            .json(&SignupRequest {
                username: &user.username,
                password: user.password.expose_secret(),
                roles: user.roles.iter().map(Role::as_str).collect(),
            });

        let response: MessageResponse = self.execute_json(builder, true).await?;
        Ok(response
            .message
            .unwrap_or_else(|| "Usuario registrado correctamente".to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_token() {
        let credential = Credential::new(
            "eyJhbGciOiJIUzI1NiJ9.secret".to_string(),
            "admin".to_string(),
            vec![Role::Admin],
        );
        let debug = format!("{credential:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("secret"));
        assert!(debug.contains("admin"));
    }

    #[test]
    fn test_session_round_trip_keeps_token() {
        let credential = Credential::new("tok-abc", "admin".to_string(), vec![Role::Admin]);

        let stored = serde_json::to_value(&credential).unwrap();
        assert_eq!(stored["token"], "tok-abc");

        let restored: Credential = serde_json::from_value(stored).unwrap();
        assert_eq!(restored.token(), "tok-abc");
        assert_eq!(restored.username(), "admin");
        assert_eq!(restored.roles(), &[Role::Admin]);
    }

    #[test]
    fn test_roles() {
        let credential = Credential::new(
            "t".to_string(),
            "caja1".to_string(),
            vec![Role::Cajero, Role::Vendedor],
        );
        assert!(credential.has_role(Role::Vendedor));
        assert!(!credential.has_role(Role::Admin));
        assert_eq!(credential.primary_role(), Some(Role::Cajero));
    }
}
