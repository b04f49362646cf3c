//! Report payloads, date ranges and export kinds.
//!
//! All payloads mirror the backend's camelCase JSON. Missing numeric fields
//! default to zero so a partially filled report still renders.

use core::fmt;
use core::str::FromStr;

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Category, ProductId};

/// Days covered by the default report range.
pub const DEFAULT_RANGE_DAYS: u64 = 7;

/// Allowed sizes for the top-products report.
pub const TOP_LIMITS: [u32; 4] = [5, 10, 20, 50];

/// Size used when the requested limit is missing or not allowed.
pub const DEFAULT_TOP_LIMIT: u32 = 10;

/// Clamp a requested top-products limit to an allowed value.
#[must_use]
pub fn normalize_top_limit(requested: Option<u32>) -> u32 {
    requested
        .filter(|limit| TOP_LIMITS.contains(limit))
        .unwrap_or(DEFAULT_TOP_LIMIT)
}

/// Errors in a user-supplied date range.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DateRangeError {
    #[error("Fecha inválida: {0}")]
    InvalidDate(String),
    #[error("La fecha de inicio debe ser anterior a la fecha de fin")]
    StartAfterEnd,
}

/// An inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Create a range.
    ///
    /// # Errors
    ///
    /// Returns [`DateRangeError::StartAfterEnd`] if `start > end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DateRangeError> {
        if start > end {
            return Err(DateRangeError::StartAfterEnd);
        }
        Ok(Self { start, end })
    }

    /// The last [`DEFAULT_RANGE_DAYS`] days up to and including `today`.
    #[must_use]
    pub fn last_week(today: NaiveDate) -> Self {
        let start = today
            .checked_sub_days(Days::new(DEFAULT_RANGE_DAYS))
            .unwrap_or(today);
        Self { start, end: today }
    }

    /// Parse a range from `YYYY-MM-DD` query parameters.
    ///
    /// A missing or blank bound takes its value from [`Self::last_week`].
    ///
    /// # Errors
    ///
    /// Returns [`DateRangeError::InvalidDate`] for unparseable dates and
    /// [`DateRangeError::StartAfterEnd`] for reversed ranges.
    pub fn from_params(
        start: Option<&str>,
        end: Option<&str>,
        today: NaiveDate,
    ) -> Result<Self, DateRangeError> {
        let default = Self::last_week(today);
        let start = parse_day(start)?.unwrap_or(default.start);
        let end = parse_day(end)?.unwrap_or(default.end);
        Self::new(start, end)
    }

    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// `inicio` query value: start of the first day.
    #[must_use]
    pub fn start_param(&self) -> String {
        format!("{}T00:00:00", self.start.format("%Y-%m-%d"))
    }

    /// `fin` query value: end of the last day.
    #[must_use]
    pub fn end_param(&self) -> String {
        format!("{}T23:59:59", self.end.format("%Y-%m-%d"))
    }
}

fn parse_day(value: Option<&str>) -> Result<Option<NaiveDate>, DateRangeError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| DateRangeError::InvalidDate(text.to_string())),
    }
}

/// Spreadsheet exports offered by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Weekly,
    Monthly,
    Inventory,
    /// Sales in a date range.
    Range,
    /// Best sellers in a date range.
    TopProducts,
}

impl ExportKind {
    pub const ALL: [Self; 5] = [
        Self::Weekly,
        Self::Monthly,
        Self::Range,
        Self::TopProducts,
        Self::Inventory,
    ];

    /// Path segment, as used under `/reportes/exportar/`.
    #[must_use]
    pub const fn slug(&self) -> &'static str {
        match self {
            Self::Weekly => "semanal",
            Self::Monthly => "mensual",
            Self::Inventory => "inventario",
            Self::Range => "rango",
            Self::TopProducts => "top-productos",
        }
    }

    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Weekly => "Reporte semanal",
            Self::Monthly => "Reporte mensual",
            Self::Inventory => "Inventario",
            Self::Range => "Ventas por rango",
            Self::TopProducts => "Top productos",
        }
    }

    /// Whether the export is filtered by a date range.
    #[must_use]
    pub const fn uses_range(&self) -> bool {
        matches!(self, Self::Range | Self::TopProducts)
    }

    /// Download file name for an export generated on `day`.
    #[must_use]
    pub fn file_name(&self, day: NaiveDate) -> String {
        format!("reporte_{}_{}.xlsx", self.slug(), day.format("%Y-%m-%d"))
    }
}

impl fmt::Display for ExportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for ExportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.slug() == s)
            .ok_or_else(|| format!("unknown export: {s}"))
    }
}

/// Sales aggregated per day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySales {
    pub fecha: String,
    #[serde(default)]
    pub cantidad_ventas: u64,
    #[serde(default)]
    pub total_ventas: Decimal,
}

impl DailySales {
    /// Average ticket for the day, zero without sales.
    #[must_use]
    pub fn average(&self) -> Decimal {
        average(self.total_ventas, self.cantidad_ventas)
    }
}

/// One entry of the best-sellers report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopProduct {
    pub producto_id: ProductId,
    pub nombre: String,
    #[serde(default)]
    pub cantidad_vendida: u64,
    #[serde(default)]
    pub total_ventas: Decimal,
}

impl TopProduct {
    /// Average unit price sold.
    #[must_use]
    pub fn average(&self) -> Decimal {
        average(self.total_ventas, self.cantidad_vendida)
    }
}

/// Sales per seller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerSales {
    pub vendedor: String,
    #[serde(default)]
    pub cantidad_ventas: u64,
    #[serde(default)]
    pub total_ventas: Decimal,
    #[serde(default)]
    pub promedio_venta: Decimal,
}

/// Collected amount per payment method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethodSales {
    pub metodo_pago: String,
    #[serde(default)]
    pub cantidad_pagos: u64,
    #[serde(default)]
    pub total_monto: Decimal,
    #[serde(default)]
    pub porcentaje: Option<Decimal>,
}

/// Stock levels across the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InventoryStats {
    pub total_productos: u64,
    pub productos_con_stock: u64,
    pub productos_stock_bajo: u64,
    pub productos_agotados: u64,
    pub porcentaje_con_stock: Decimal,
    pub porcentaje_stock_bajo: Decimal,
    pub porcentaje_agotados: Decimal,
}

/// Today's sales at a glance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TodaySummary {
    pub total_ventas: Decimal,
    pub cantidad_ventas: u64,
    pub ticket_promedio: Decimal,
    pub producto_mas_vendido: Option<String>,
    pub cantidad_productos_vendidos: u64,
}

/// A product at or below its minimum stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LowStockProduct {
    pub id: ProductId,
    pub nombre: String,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub stock_minimo: i64,
    #[serde(default)]
    pub estado: String,
    #[serde(default)]
    pub categoria: Option<Category>,
    #[serde(default)]
    pub precio: Decimal,
}

impl LowStockProduct {
    #[must_use]
    pub fn is_out_of_stock(&self) -> bool {
        self.stock <= 0
    }
}

/// Dashboard summary returned by `/dashboard/resumen`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardSummary {
    pub ventas_hoy: Decimal,
    pub cantidad_ventas_hoy: u64,
    pub total_productos: u64,
    pub productos_con_stock: u64,
    pub productos_stock_bajo: u64,
    pub productos_agotados: u64,
    pub usuarios_activos: u64,
    pub nuevos_usuarios_mes: u64,
    pub productos_stock_bajo_list: Vec<LowStockProduct>,
}

fn average(total: Decimal, count: u64) -> Decimal {
    if count == 0 {
        Decimal::ZERO
    } else {
        total / Decimal::from(count)
    }
}
