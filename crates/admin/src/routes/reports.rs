//! Sales and inventory reports with spreadsheet export.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::NaiveDate;
use minimarket_client::{ApiError, Credential};
use minimarket_core::report::{
    DailySales, DateRange, ExportKind, InventoryStats, PaymentMethodSales, SellerSales, TOP_LIMITS,
    TodaySummary, TopProduct, normalize_top_limit,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use crate::{
    error::{AppError, Result},
    filters,
    middleware::RequireAdminAuth,
    state::AppState,
};

use super::dashboard::{AdminUserView, soles};

/// MIME type of the exported spreadsheets.
const XLSX_CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Report tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportTab {
    #[default]
    Sales,
    TopProducts,
    Sellers,
    PaymentMethods,
    Inventory,
    Today,
}

impl ReportTab {
    pub const ALL: [Self; 6] = [
        Self::Sales,
        Self::TopProducts,
        Self::Sellers,
        Self::PaymentMethods,
        Self::Inventory,
        Self::Today,
    ];

    /// Query value of the tab.
    #[must_use]
    pub const fn slug(&self) -> &'static str {
        match self {
            Self::Sales => "ventas",
            Self::TopProducts => "top-productos",
            Self::Sellers => "vendedores",
            Self::PaymentMethods => "metodos-pago",
            Self::Inventory => "inventario",
            Self::Today => "resumen",
        }
    }

    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Sales => "Ventas",
            Self::TopProducts => "Top Productos",
            Self::Sellers => "Por Vendedor",
            Self::PaymentMethods => "Métodos de Pago",
            Self::Inventory => "Inventario",
            Self::Today => "Resumen Hoy",
        }
    }

    /// Unknown or missing values select the sales tab.
    #[must_use]
    pub fn from_param(param: Option<&str>) -> Self {
        param
            .and_then(|p| Self::ALL.into_iter().find(|tab| tab.slug() == p.trim()))
            .unwrap_or_default()
    }

    const fn uses_range(self) -> bool {
        matches!(
            self,
            Self::Sales | Self::TopProducts | Self::Sellers | Self::PaymentMethods
        )
    }
}

/// Query parameters shared by the report page and the export endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    pub tab: Option<String>,
    pub inicio: Option<String>,
    pub fin: Option<String>,
    pub limite: Option<String>,
}

impl ReportQuery {
    fn range(&self, today: NaiveDate) -> std::result::Result<DateRange, String> {
        DateRange::from_params(self.inicio.as_deref(), self.fin.as_deref(), today)
            .map_err(|e| e.to_string())
    }

    fn limit(&self) -> u32 {
        normalize_top_limit(self.limite.as_deref().and_then(|l| l.trim().parse().ok()))
    }
}

/// Tab link for templates.
#[derive(Debug, Clone)]
pub struct TabLink {
    pub slug: &'static str,
    pub label: &'static str,
    pub active: bool,
}

/// Export button for templates.
#[derive(Debug, Clone)]
pub struct ExportLink {
    pub label: &'static str,
    pub href: String,
}

#[derive(Debug, Clone)]
pub struct DailySalesView {
    pub date: String,
    pub count: u64,
    pub total: String,
    pub average: String,
}

impl From<&DailySales> for DailySalesView {
    fn from(row: &DailySales) -> Self {
        Self {
            date: display_day(&row.fecha),
            count: row.cantidad_ventas,
            total: soles(row.total_ventas),
            average: soles(row.average()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TopProductView {
    pub rank: usize,
    pub name: String,
    pub quantity: u64,
    pub total: String,
    pub average: String,
}

#[derive(Debug, Clone)]
pub struct SellerView {
    pub seller: String,
    pub count: u64,
    pub total: String,
    pub average: String,
}

impl From<&SellerSales> for SellerView {
    fn from(row: &SellerSales) -> Self {
        Self {
            seller: row.vendedor.clone(),
            count: row.cantidad_ventas,
            total: soles(row.total_ventas),
            average: soles(row.promedio_venta),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PaymentMethodView {
    pub method: String,
    pub count: u64,
    pub total: String,
    pub share: String,
}

/// Payment method rows; a missing share is computed from the totals.
fn payment_method_views(rows: &[PaymentMethodSales]) -> Vec<PaymentMethodView> {
    let grand_total: Decimal = rows.iter().map(|r| r.total_monto).sum();
    rows.iter()
        .map(|row| {
            let share = row.porcentaje.unwrap_or_else(|| {
                if grand_total.is_zero() {
                    Decimal::ZERO
                } else {
                    row.total_monto * Decimal::ONE_HUNDRED / grand_total
                }
            });
            PaymentMethodView {
                method: row.metodo_pago.clone(),
                count: row.cantidad_pagos,
                total: soles(row.total_monto),
                share: format!("{:.1}%", share.round_dp(1)),
            }
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct InventoryView {
    pub total: u64,
    pub in_stock: u64,
    pub low_stock: u64,
    pub out_of_stock: u64,
    pub in_stock_pct: String,
    pub low_stock_pct: String,
    pub out_of_stock_pct: String,
}

impl From<&InventoryStats> for InventoryView {
    fn from(stats: &InventoryStats) -> Self {
        Self {
            total: stats.total_productos,
            in_stock: stats.productos_con_stock,
            low_stock: stats.productos_stock_bajo,
            out_of_stock: stats.productos_agotados,
            in_stock_pct: format!("{:.1}%", stats.porcentaje_con_stock.round_dp(1)),
            low_stock_pct: format!("{:.1}%", stats.porcentaje_stock_bajo.round_dp(1)),
            out_of_stock_pct: format!("{:.1}%", stats.porcentaje_agotados.round_dp(1)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TodayView {
    pub total: String,
    pub count: u64,
    pub average_ticket: String,
    pub best_seller: String,
    pub units_sold: u64,
}

impl From<&TodaySummary> for TodayView {
    fn from(summary: &TodaySummary) -> Self {
        Self {
            total: soles(summary.total_ventas),
            count: summary.cantidad_ventas,
            average_ticket: soles(summary.ticket_promedio),
            best_seller: summary.producto_mas_vendido.clone().unwrap_or_default(),
            units_sold: summary.cantidad_productos_vendidos,
        }
    }
}

/// `2024-05-01T...` or `2024-05-01` as `01/05/2024`; anything else verbatim.
fn display_day(value: &str) -> String {
    value
        .get(..10)
        .and_then(|day| NaiveDate::parse_from_str(day, "%Y-%m-%d").ok())
        .map_or_else(|| value.to_string(), |d| d.format("%d/%m/%Y").to_string())
}

/// Reports page template.
#[derive(Template, WebTemplate)]
#[template(path = "reports/index.html")]
pub struct ReportsTemplate {
    pub admin_user: AdminUserView,
    pub current_path: String,
    pub tab: &'static str,
    pub tab_label: &'static str,
    pub tabs: Vec<TabLink>,
    pub uses_range: bool,
    pub start: String,
    pub end: String,
    pub limit: u32,
    pub limits: Vec<u32>,
    pub exports: Vec<ExportLink>,
    pub error: Option<String>,
    pub sales: Vec<DailySalesView>,
    pub top_products: Vec<TopProductView>,
    pub sellers: Vec<SellerView>,
    pub payment_methods: Vec<PaymentMethodView>,
    pub inventory: Option<InventoryView>,
    pub today: Option<TodayView>,
}

impl ReportsTemplate {
    fn new(credential: &Credential, tab: ReportTab, query: &ReportQuery, range: &DateRange, limit: u32) -> Self {
        let range_query = format!(
            "inicio={}&fin={}&limite={limit}",
            range.start().format("%Y-%m-%d"),
            range.end().format("%Y-%m-%d")
        );

        Self {
            admin_user: AdminUserView::from(credential),
            current_path: "/reports".to_string(),
            tab: tab.slug(),
            tab_label: tab.label(),
            tabs: ReportTab::ALL
                .into_iter()
                .map(|t| TabLink {
                    slug: t.slug(),
                    label: t.label(),
                    active: t == tab,
                })
                .collect(),
            uses_range: tab.uses_range(),
            start: query
                .inicio
                .clone()
                .unwrap_or_else(|| range.start().format("%Y-%m-%d").to_string()),
            end: query
                .fin
                .clone()
                .unwrap_or_else(|| range.end().format("%Y-%m-%d").to_string()),
            limit,
            limits: TOP_LIMITS.to_vec(),
            exports: ExportKind::ALL
                .into_iter()
                .map(|kind| ExportLink {
                    label: kind.label(),
                    href: format!("/reports/export/{}?{range_query}", kind.slug()),
                })
                .collect(),
            error: None,
            sales: Vec::new(),
            top_products: Vec::new(),
            sellers: Vec::new(),
            payment_methods: Vec::new(),
            inventory: None,
            today: None,
        }
    }
}

/// Build the reports router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/reports", get(index))
        .route("/reports/export/{kind}", get(export))
}

/// Reports page handler.
#[instrument(skip(credential, state))]
pub async fn index(
    RequireAdminAuth(credential): RequireAdminAuth,
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> Result<Response> {
    let tab = ReportTab::from_param(query.tab.as_deref());
    let today = chrono::Local::now().date_naive();
    let limit = query.limit();

    let range = match query.range(today) {
        Ok(range) => range,
        Err(message) => {
            let mut template =
                ReportsTemplate::new(&credential, tab, &query, &DateRange::last_week(today), limit);
            template.error = Some(message);
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, template).into_response());
        }
    };

    let mut template = ReportsTemplate::new(&credential, tab, &query, &range, limit);
    let api = state.api();

    let loaded: std::result::Result<(), ApiError> = async {
        match tab {
            ReportTab::Sales => {
                let rows = api.sales_by_range(&credential, &range).await?;
                template.sales = rows.iter().map(DailySalesView::from).collect();
            }
            ReportTab::TopProducts => {
                let rows: Vec<TopProduct> = api.top_products(&credential, &range, limit).await?;
                template.top_products = rows
                    .iter()
                    .enumerate()
                    .map(|(i, row)| TopProductView {
                        rank: i + 1,
                        name: row.nombre.clone(),
                        quantity: row.cantidad_vendida,
                        total: soles(row.total_ventas),
                        average: soles(row.average()),
                    })
                    .collect();
            }
            ReportTab::Sellers => {
                let rows = api.sales_by_seller(&credential, &range).await?;
                template.sellers = rows.iter().map(SellerView::from).collect();
            }
            ReportTab::PaymentMethods => {
                let rows = api.sales_by_payment_method(&credential, &range).await?;
                template.payment_methods = payment_method_views(&rows);
            }
            ReportTab::Inventory => {
                let stats = api.inventory_stats(&credential).await?;
                template.inventory = Some(InventoryView::from(&stats));
            }
            ReportTab::Today => {
                let summary = api.today_summary(&credential).await?;
                template.today = Some(TodayView::from(&summary));
            }
        }
        Ok(())
    }
    .await;

    match loaded {
        Ok(()) => Ok(template.into_response()),
        Err(ApiError::Unauthorized) => Err(AppError::Api(ApiError::Unauthorized)),
        Err(ApiError::Forbidden) => {
            template.error = Some(ApiError::Forbidden.user_message());
            Ok((StatusCode::FORBIDDEN, template).into_response())
        }
        Err(e) => {
            tracing::error!(error = %e, tab = tab.slug(), "Failed to load report");
            template.error = Some(e.user_message());
            Ok(template.into_response())
        }
    }
}

/// Download a report as a spreadsheet.
#[instrument(skip(credential, state))]
pub async fn export(
    RequireAdminAuth(credential): RequireAdminAuth,
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Query(query): Query<ReportQuery>,
) -> Result<Response> {
    let kind: ExportKind = kind
        .parse()
        .map_err(|_| AppError::NotFound(format!("Reporte desconocido: {kind}")))?;
    let today = chrono::Local::now().date_naive();
    let range = query.range(today).map_err(AppError::BadRequest)?;

    let bytes = state
        .api()
        .export_report(&credential, kind, &range, query.limit())
        .await?;

    let disposition = format!("attachment; filename=\"{}\"", kind.file_name(today));
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_from_param() {
        assert_eq!(ReportTab::from_param(None), ReportTab::Sales);
        assert_eq!(ReportTab::from_param(Some("inventario")), ReportTab::Inventory);
        assert_eq!(ReportTab::from_param(Some("desconocido")), ReportTab::Sales);
    }

    #[test]
    fn test_query_limit_normalized() {
        let query = ReportQuery {
            limite: Some("20".to_string()),
            ..ReportQuery::default()
        };
        assert_eq!(query.limit(), 20);

        let query = ReportQuery {
            limite: Some("7".to_string()),
            ..ReportQuery::default()
        };
        assert_eq!(query.limit(), 10);
    }

    #[test]
    fn test_reversed_range_is_rejected() {
        let query = ReportQuery {
            inicio: Some("2024-05-10".to_string()),
            fin: Some("2024-05-01".to_string()),
            ..ReportQuery::default()
        };
        let today = NaiveDate::from_ymd_opt(2024, 5, 20).unwrap_or_default();
        assert!(query.range(today).is_err());
    }

    #[test]
    fn test_payment_share_computed_when_missing() {
        let rows = vec![
            PaymentMethodSales {
                metodo_pago: "EFECTIVO".to_string(),
                cantidad_pagos: 3,
                total_monto: Decimal::new(75, 0),
                porcentaje: None,
            },
            PaymentMethodSales {
                metodo_pago: "YAPE".to_string(),
                cantidad_pagos: 1,
                total_monto: Decimal::new(25, 0),
                porcentaje: None,
            },
        ];
        let views = payment_method_views(&rows);
        assert_eq!(views[0].share, "75.0%");
        assert_eq!(views[1].total, "S/ 25.00");
    }

    #[test]
    fn test_display_day() {
        assert_eq!(display_day("2024-05-01T00:00:00"), "01/05/2024");
        assert_eq!(display_day("2024-05-01"), "01/05/2024");
        assert_eq!(display_day("ayer"), "ayer");
    }
}
