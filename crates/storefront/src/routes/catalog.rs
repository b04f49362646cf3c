//! Catalog page.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use minimarket_core::{Category, CategoryFilter, Product};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::routes::cart::CartView;
use crate::services::cart::load_cart;
use crate::state::AppState;

/// Query parameters for the catalog.
#[derive(Debug, Default, Deserialize)]
pub struct CatalogQuery {
    pub categoria: Option<String>,
}

/// Product card display data.
#[derive(Clone)]
pub struct ProductView {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub category: &'static str,
    pub price: String,
    pub image_src: String,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.as_i64(),
            name: product.name.clone(),
            description: product.description.clone(),
            category: product.category.label(),
            price: product.price.to_string(),
            image_src: product.image_src(),
        }
    }
}

/// Category filter link.
#[derive(Clone)]
pub struct CategoryLink {
    pub label: &'static str,
    pub href: String,
    pub active: bool,
}

impl CategoryLink {
    fn new(filter: CategoryFilter, selected: CategoryFilter) -> Self {
        let href = match filter {
            CategoryFilter::All => "/".to_string(),
            CategoryFilter::Only(category) => {
                let encoded: String =
                    url::form_urlencoded::byte_serialize(category.label().as_bytes()).collect();
                format!("/?categoria={encoded}")
            }
        };
        Self {
            label: filter.label(),
            href,
            active: filter == selected,
        }
    }
}

/// Filter links in display order, "Todos" first.
fn category_links(selected: CategoryFilter) -> Vec<CategoryLink> {
    std::iter::once(CategoryFilter::All)
        .chain(Category::ALL.into_iter().map(CategoryFilter::Only))
        .map(|filter| CategoryLink::new(filter, selected))
        .collect()
}

/// Catalog page template.
#[derive(Template, WebTemplate)]
#[template(path = "catalog/index.html")]
pub struct CatalogTemplate {
    pub store_name: String,
    pub categories: Vec<CategoryLink>,
    pub selected: &'static str,
    pub products: Vec<ProductView>,
    pub cart: CartView,
    pub error: Option<String>,
}

/// Display the catalog, optionally filtered by category.
///
/// A backend failure still renders the page with an error banner and an
/// empty grid.
#[instrument(skip(state, session))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<CatalogQuery>,
) -> Result<CatalogTemplate> {
    let filter = CategoryFilter::from_param(query.categoria.as_deref());
    let cart = load_cart(&session).await?;

    let (products, error) = match state.api().list_products().await {
        Ok(products) => (
            products
                .iter()
                .filter(|p| filter.matches(p.category))
                .map(ProductView::from)
                .collect(),
            None,
        ),
        Err(e) => {
            tracing::error!(error = %e, "Failed to load catalog");
            (Vec::new(), Some(e.user_message()))
        }
    };

    Ok(CatalogTemplate {
        store_name: state.config().store.name.clone(),
        categories: category_links(filter),
        selected: filter.label(),
        products,
        cart: CartView::from(&cart),
        error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_links_encode_accents() {
        let links = category_links(CategoryFilter::Only(Category::Lacteos));
        assert_eq!(links[0].label, "Todos");
        assert_eq!(links[0].href, "/");
        assert!(!links[0].active);

        let dairy = &links[1];
        assert_eq!(dairy.href, "/?categoria=L%C3%A1cteos");
        assert!(dairy.active);
        assert_eq!(links.len(), Category::ALL.len() + 1);
    }
}
