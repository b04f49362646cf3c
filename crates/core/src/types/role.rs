//! User roles issued by the backend.

use serde::{Deserialize, Serialize};

/// Role of a backend user.
///
/// The backend accepts roles on signup and returns them on signin, both in
/// upper case (`ADMIN`, `VENDEDOR`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Full access to the console.
    Admin,
    /// Sells at the counter.
    Vendedor,
    /// Operates the cash register.
    Cajero,
    /// Manages stock.
    Almacenero,
}

impl Role {
    /// Roles that can be assigned from the user registration form.
    pub const ASSIGNABLE: [Self; 3] = [Self::Admin, Self::Vendedor, Self::Almacenero];

    /// Wire value of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Vendedor => "VENDEDOR",
            Self::Cajero => "CAJERO",
            Self::Almacenero => "ALMACENERO",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Vendedor => "Vendedor",
            Self::Cajero => "Cajero",
            Self::Almacenero => "Almacenero",
        }
    }

    /// Badge shown next to the user name on the dashboard.
    #[must_use]
    pub const fn icon(&self) -> &'static str {
        match self {
            Self::Admin => "👑",
            Self::Cajero => "💰",
            Self::Almacenero => "📦",
            Self::Vendedor => "👤",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Spring Security style prefixes are accepted on input
        match s.trim().trim_start_matches("ROLE_") {
            "ADMIN" => Ok(Self::Admin),
            "VENDEDOR" => Ok(Self::Vendedor),
            "CAJERO" => Ok(Self::Cajero),
            "ALMACENERO" => Ok(Self::Almacenero),
            other => Err(format!("invalid role: {other}")),
        }
    }
}
