//! Dashboard route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use minimarket_client::{ApiError, Credential};
use minimarket_core::{
    Role,
    report::{DashboardSummary, LowStockProduct},
};
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::instrument;

use crate::{
    error::{AppError, Result},
    filters,
    middleware::RequireAdminAuth,
    state::AppState,
};

/// Signed-in user view for templates.
#[derive(Debug, Clone)]
pub struct AdminUserView {
    pub username: String,
    pub role: String,
    pub role_icon: &'static str,
    pub is_admin: bool,
}

impl From<&Credential> for AdminUserView {
    fn from(credential: &Credential) -> Self {
        let role = credential.primary_role();
        Self {
            username: credential.username().to_string(),
            role: role.map_or_else(|| "Sin rol".to_string(), |r| r.as_str().to_string()),
            role_icon: role.map_or("👤", |r| r.icon()),
            is_admin: credential.has_role(Role::Admin),
        }
    }
}

/// Format an amount as soles with two decimals.
pub fn soles(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("S/ {rounded:.2}")
}

/// Dashboard metrics.
#[derive(Debug, Clone)]
pub struct DashboardMetrics {
    pub sales_today: String,
    pub sales_count_today: u64,
    pub total_products: u64,
    pub products_in_stock: u64,
    pub products_low_stock: u64,
    pub products_out_of_stock: u64,
    pub active_users: u64,
    pub new_users_month: u64,
}

impl From<&DashboardSummary> for DashboardMetrics {
    fn from(summary: &DashboardSummary) -> Self {
        Self {
            sales_today: soles(summary.ventas_hoy),
            sales_count_today: summary.cantidad_ventas_hoy,
            total_products: summary.total_productos,
            products_in_stock: summary.productos_con_stock,
            products_low_stock: summary.productos_stock_bajo,
            products_out_of_stock: summary.productos_agotados,
            active_users: summary.usuarios_activos,
            new_users_month: summary.nuevos_usuarios_mes,
        }
    }
}

/// Low-stock row for the dashboard table.
#[derive(Debug, Clone)]
pub struct LowStockView {
    pub name: String,
    pub category: String,
    pub stock: i64,
    pub min_stock: i64,
    pub price: String,
    pub out_of_stock: bool,
}

impl From<&LowStockProduct> for LowStockView {
    fn from(product: &LowStockProduct) -> Self {
        Self {
            name: product.nombre.clone(),
            category: product
                .categoria
                .map(|c| c.label().to_string())
                .unwrap_or_default(),
            stock: product.stock,
            min_stock: product.stock_minimo,
            price: soles(product.precio),
            out_of_stock: product.is_out_of_stock(),
        }
    }
}

/// Dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub admin_user: AdminUserView,
    pub current_path: String,
    pub today: String,
    pub metrics: Option<DashboardMetrics>,
    pub low_stock: Vec<LowStockView>,
    pub error: Option<String>,
}

/// Dashboard page handler.
///
/// Metrics are only fetched for the `ADMIN` role; other roles get the
/// welcome header and shortcuts.
#[instrument(skip(credential, state), fields(username = %credential.username()))]
pub async fn index(
    RequireAdminAuth(credential): RequireAdminAuth,
    State(state): State<AppState>,
) -> Result<DashboardTemplate> {
    let mut metrics = None;
    let mut low_stock = Vec::new();
    let mut error = None;

    if credential.has_role(Role::Admin) {
        match state.api().dashboard_summary(&credential).await {
            Ok(summary) => {
                metrics = Some(DashboardMetrics::from(&summary));
                low_stock = summary
                    .productos_stock_bajo_list
                    .iter()
                    .map(LowStockView::from)
                    .collect();
            }
            Err(ApiError::Unauthorized) => return Err(AppError::Api(ApiError::Unauthorized)),
            Err(e) => {
                tracing::error!(error = %e, "Failed to load dashboard summary");
                error = Some(e.user_message());
            }
        }
    }

    Ok(DashboardTemplate {
        admin_user: AdminUserView::from(&credential),
        current_path: "/".to_string(),
        today: chrono::Local::now().format("%d/%m/%Y").to_string(),
        metrics,
        low_stock,
        error,
    })
}
