//! Product categories.
//!
//! The catalog uses a fixed set of categories. Their serialized form is the
//! Spanish label the backend stores (including accents).

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when a label does not name a known category.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown category: {0}")]
pub struct ParseCategoryError(pub String);

/// A product category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Lácteos")]
    Lacteos,
    #[serde(rename = "Panadería")]
    Panaderia,
    Abarrotes,
    Cereales,
    Frutas,
    Verduras,
    Bebidas,
    Snacks,
    Limpieza,
    Carnes,
}

impl Category {
    /// All categories, in catalog display order.
    pub const ALL: [Self; 10] = [
        Self::Lacteos,
        Self::Panaderia,
        Self::Abarrotes,
        Self::Cereales,
        Self::Frutas,
        Self::Verduras,
        Self::Bebidas,
        Self::Snacks,
        Self::Limpieza,
        Self::Carnes,
    ];

    /// The label shown to users and stored by the backend.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Lacteos => "Lácteos",
            Self::Panaderia => "Panadería",
            Self::Abarrotes => "Abarrotes",
            Self::Cereales => "Cereales",
            Self::Frutas => "Frutas",
            Self::Verduras => "Verduras",
            Self::Bebidas => "Bebidas",
            Self::Snacks => "Snacks",
            Self::Limpieza => "Limpieza",
            Self::Carnes => "Carnes",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.label() == trimmed)
            .ok_or_else(|| ParseCategoryError(trimmed.to_string()))
    }
}

/// Catalog filter: every category, or a single one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    /// Show all products ("Todos").
    #[default]
    All,
    /// Show products of one category.
    Only(Category),
}

impl CategoryFilter {
    /// Label of the catch-all filter.
    pub const ALL_LABEL: &'static str = "Todos";

    /// Parse a filter from a query parameter.
    ///
    /// Missing, empty, "Todos" and unknown values all select every category.
    #[must_use]
    pub fn from_param(param: Option<&str>) -> Self {
        match param.map(str::trim) {
            None | Some("" | Self::ALL_LABEL) => Self::All,
            Some(label) => label.parse().map_or(Self::All, Self::Only),
        }
    }

    /// Whether a product in `category` passes the filter.
    #[must_use]
    pub fn matches(&self, category: Category) -> bool {
        match self {
            Self::All => true,
            Self::Only(selected) => *selected == category,
        }
    }

    /// The label of the selected filter.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::All => Self::ALL_LABEL,
            Self::Only(category) => category.label(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_uses_spanish_labels() {
        assert_eq!(
            serde_json::to_string(&Category::Lacteos).unwrap(),
            "\"Lácteos\""
        );
        let parsed: Category = serde_json::from_str("\"Panadería\"").unwrap();
        assert_eq!(parsed, Category::Panaderia);
        assert!(serde_json::from_str::<Category>("\"Frescos\"").is_err());
    }

    #[test]
    fn test_from_str_round_trips_labels() {
        for category in Category::ALL {
            assert_eq!(category.label().parse::<Category>().unwrap(), category);
        }
        assert_eq!(
            "Juguetes".parse::<Category>(),
            Err(ParseCategoryError("Juguetes".to_string()))
        );
    }

    #[test]
    fn test_filter_from_param() {
        assert_eq!(CategoryFilter::from_param(None), CategoryFilter::All);
        assert_eq!(CategoryFilter::from_param(Some("Todos")), CategoryFilter::All);
        assert_eq!(CategoryFilter::from_param(Some("nope")), CategoryFilter::All);
        assert_eq!(
            CategoryFilter::from_param(Some("Bebidas")),
            CategoryFilter::Only(Category::Bebidas)
        );
    }

    #[test]
    fn test_filter_matches() {
        assert!(CategoryFilter::All.matches(Category::Carnes));
        let only = CategoryFilter::Only(Category::Frutas);
        assert!(only.matches(Category::Frutas));
        assert!(!only.matches(Category::Verduras));
    }
}
