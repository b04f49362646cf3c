//! Catalog products.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Category, Price, ProductId};

/// Image used when a product is registered without one.
pub const DEFAULT_IMAGE: &str = "default.png";

/// A product as returned by the catalog.
///
/// The cart references products but never mutates them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Display name.
    #[serde(rename = "nombre")]
    pub name: String,
    /// Free-text description.
    #[serde(rename = "descripcion", default)]
    pub description: String,
    /// Catalog category.
    #[serde(rename = "categoria")]
    pub category: Category,
    /// Unit price, tax included.
    #[serde(rename = "precio")]
    pub price: Price,
    /// Image file name or absolute URL.
    #[serde(rename = "imagen", default = "default_image")]
    pub image: String,
}

fn default_image() -> String {
    DEFAULT_IMAGE.to_string()
}

impl Product {
    /// Source for an `<img>` tag.
    ///
    /// Absolute URLs and rooted paths are used as-is; bare file names are
    /// served from `/img/`.
    #[must_use]
    pub fn image_src(&self) -> String {
        if self.image.starts_with("http://")
            || self.image.starts_with("https://")
            || self.image.starts_with('/')
        {
            self.image.clone()
        } else {
            format!("/img/{}", self.image)
        }
    }
}

/// Errors produced when validating a product registration.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ProductValidationError {
    /// Name is blank.
    #[error("El nombre es obligatorio")]
    MissingName,
    /// Description is blank.
    #[error("La descripción es obligatoria")]
    MissingDescription,
    /// Category is not one of the catalog categories.
    #[error("Categoría inválida: {0}")]
    InvalidCategory(String),
    /// Price is not a decimal number.
    #[error("Precio inválido: {0}")]
    InvalidPrice(String),
    /// Price is below zero.
    #[error("El precio no puede ser negativo")]
    NegativePrice,
}

/// Product registration payload sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewProduct {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "categoria")]
    pub category: Category,
    /// Sent as a JSON number.
    #[serde(rename = "precio", with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(rename = "imagen")]
    pub image: String,
}

impl NewProduct {
    /// Build a registration payload from raw form fields.
    ///
    /// Fields are trimmed; an empty image falls back to [`DEFAULT_IMAGE`].
    ///
    /// # Errors
    ///
    /// Returns the first [`ProductValidationError`] found, checking name,
    /// description, category and price in that order.
    pub fn from_form(
        name: &str,
        description: &str,
        category: &str,
        price: &str,
        image: &str,
    ) -> Result<Self, ProductValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ProductValidationError::MissingName);
        }

        let description = description.trim();
        if description.is_empty() {
            return Err(ProductValidationError::MissingDescription);
        }

        let category = category
            .parse::<Category>()
            .map_err(|e| ProductValidationError::InvalidCategory(e.0))?;

        let price_text = price.trim();
        let price = price_text
            .parse::<Decimal>()
            .map_err(|_| ProductValidationError::InvalidPrice(price_text.to_string()))?;
        if price.is_sign_negative() && !price.is_zero() {
            return Err(ProductValidationError::NegativePrice);
        }

        let image = match image.trim() {
            "" => DEFAULT_IMAGE.to_string(),
            other => other.to_string(),
        };

        Ok(Self {
            name: name.to_string(),
            description: description.to_string(),
            category,
            price,
            image,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_backend_product() {
        let json = r#"{"id":1,"nombre":"Arroz","descripcion":"Costeño 1kg","categoria":"Abarrotes","precio":3.50,"imagen":"arroz.png"}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, ProductId::new(1));
        assert_eq!(product.category, Category::Abarrotes);
        assert_eq!(product.price.plain(), "3.50");
        assert_eq!(product.image_src(), "/img/arroz.png");
    }

    #[test]
    fn test_missing_image_uses_default() {
        let json = r#"{"id":2,"nombre":"Leche","categoria":"Lácteos","precio":2.3}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.image, DEFAULT_IMAGE);
        assert_eq!(product.description, "");
    }

    #[test]
    fn test_absolute_image_kept() {
        let json = r#"{"id":3,"nombre":"Pan","categoria":"Panadería","precio":0.2,"imagen":"https://cdn.example.com/pan.jpg"}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.image_src(), "https://cdn.example.com/pan.jpg");
    }

    #[test]
    fn test_from_form_valid() {
        let product =
            NewProduct::from_form(" Yogurt ", "Fresa 1L", "Lácteos", "6.90", "").unwrap();
        assert_eq!(product.name, "Yogurt");
        assert_eq!(product.image, DEFAULT_IMAGE);
        assert_eq!(product.price, Decimal::new(690, 2));

        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["precio"], serde_json::json!(6.9));
        assert_eq!(json["categoria"], "Lácteos");
    }

    #[test]
    fn test_from_form_errors() {
        assert_eq!(
            NewProduct::from_form("", "d", "Frutas", "1", ""),
            Err(ProductValidationError::MissingName)
        );
        assert_eq!(
            NewProduct::from_form("n", "  ", "Frutas", "1", ""),
            Err(ProductValidationError::MissingDescription)
        );
        assert_eq!(
            NewProduct::from_form("n", "d", "Juguetes", "1", ""),
            Err(ProductValidationError::InvalidCategory("Juguetes".to_string()))
        );
        assert_eq!(
            NewProduct::from_form("n", "d", "Frutas", "abc", ""),
            Err(ProductValidationError::InvalidPrice("abc".to_string()))
        );
        assert_eq!(
            NewProduct::from_form("n", "d", "Frutas", "-2", ""),
            Err(ProductValidationError::NegativePrice)
        );
    }
}
