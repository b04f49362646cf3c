//! Product list and registration.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use minimarket_client::{ApiError, Credential};
use minimarket_core::{Category, NewProduct, Product};
use serde::Deserialize;
use tracing::instrument;

use crate::{
    error::{AppError, Result},
    filters,
    middleware::RequireAdminAuth,
    state::AppState,
};

use super::dashboard::AdminUserView;

/// Product row for templates.
#[derive(Debug, Clone)]
pub struct ProductView {
    pub id: i64,
    pub name: String,
    pub category: &'static str,
    pub price: String,
    pub image_src: String,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.as_i64(),
            name: product.name.clone(),
            category: product.category.label(),
            price: product.price.to_string(),
            image_src: product.image_src(),
        }
    }
}

/// Registration form data, echoed back on errors.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductForm {
    #[serde(default)]
    pub nombre: String,
    #[serde(default)]
    pub descripcion: String,
    #[serde(default)]
    pub categoria: String,
    #[serde(default)]
    pub precio: String,
    #[serde(default)]
    pub imagen: String,
}

/// Products page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsTemplate {
    pub admin_user: AdminUserView,
    pub current_path: String,
    pub categories: Vec<&'static str>,
    pub products: Vec<ProductView>,
    pub form: ProductForm,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Build the products router.
pub fn router() -> Router<AppState> {
    Router::new().route("/products", get(index).post(create))
}

async fn render(
    state: &AppState,
    credential: &Credential,
    form: ProductForm,
    error: Option<String>,
    success: Option<String>,
) -> ProductsTemplate {
    let products = match state.api().list_products().await {
        Ok(products) => products.iter().map(ProductView::from).collect(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch products");
            Vec::new()
        }
    };

    ProductsTemplate {
        admin_user: AdminUserView::from(credential),
        current_path: "/products".to_string(),
        categories: Category::ALL.iter().map(Category::label).collect(),
        products,
        form,
        error,
        success,
    }
}

/// Products page handler.
#[instrument(skip(credential, state))]
pub async fn index(
    RequireAdminAuth(credential): RequireAdminAuth,
    State(state): State<AppState>,
) -> ProductsTemplate {
    render(&state, &credential, ProductForm::default(), None, None).await
}

/// Register a product.
///
/// The form is validated locally first; nothing is sent when it is invalid.
#[instrument(skip(credential, state, form), fields(name = %form.nombre))]
pub async fn create(
    RequireAdminAuth(credential): RequireAdminAuth,
    State(state): State<AppState>,
    Form(form): Form<ProductForm>,
) -> Result<Response> {
    let product = match NewProduct::from_form(
        &form.nombre,
        &form.descripcion,
        &form.categoria,
        &form.precio,
        &form.imagen,
    ) {
        Ok(product) => product,
        Err(e) => {
            let template = render(&state, &credential, form, Some(e.to_string()), None).await;
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, template).into_response());
        }
    };

    match state.api().create_product(&credential, &product).await {
        Ok(created) => {
            let message = format!("Producto registrado: {}", created.name);
            Ok(render(&state, &credential, ProductForm::default(), None, Some(message))
                .await
                .into_response())
        }
        Err(ApiError::Unauthorized) => Err(AppError::Api(ApiError::Unauthorized)),
        Err(e) => {
            tracing::warn!(error = %e, "Product rejected");
            let template = render(&state, &credential, form, Some(e.user_message()), None).await;
            Ok((StatusCode::UNPROCESSABLE_ENTITY, template).into_response())
        }
    }
}
