//! Sale receipt (boleta).

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use crate::cart::LineItem;
use crate::checkout::SaleConfirmation;
use crate::tax::TaxBreakdown;
use crate::types::{Price, SaleId};

/// Series printed before the sale number.
pub const RECEIPT_SERIES: &str = "B001";

/// Store offset used when printing the issue time (Peru, UTC-5).
const STORE_UTC_OFFSET_SECS: i32 = -5 * 3600;

/// One printed line of the receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptLine {
    pub name: String,
    pub quantity: u32,
    pub unit_price: Price,
    pub subtotal: Price,
}

impl From<&LineItem> for ReceiptLine {
    fn from(line: &LineItem) -> Self {
        Self {
            name: line.product().name.clone(),
            quantity: line.quantity(),
            unit_price: line.product().price,
            subtotal: line.subtotal(),
        }
    }
}

/// Receipt of a finalized sale.
///
/// Built from a snapshot of the cart taken before it is cleared, so later
/// cart changes never alter it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub sale_id: SaleId,
    pub lines: Vec<ReceiptLine>,
    pub subtotal: Price,
    pub tax: Price,
    pub total: Price,
    pub payment_method: String,
    pub issued_at: DateTime<Utc>,
    pub item_count: u32,
}

impl Receipt {
    /// Build the receipt for a recorded sale.
    ///
    /// The method name echoed by the backend wins over `selected_method`.
    #[must_use]
    pub fn from_sale(
        lines: &[LineItem],
        confirmation: &SaleConfirmation,
        selected_method: &str,
        issued_at: DateTime<Utc>,
    ) -> Self {
        let lines: Vec<ReceiptLine> = lines.iter().map(ReceiptLine::from).collect();
        let total: Price = lines.iter().map(|line| line.subtotal).sum();
        let breakdown = TaxBreakdown::from_inclusive_total(total);
        let item_count = lines.iter().map(|line| line.quantity).sum();

        Self {
            sale_id: confirmation.id,
            lines,
            subtotal: breakdown.subtotal,
            tax: breakdown.tax,
            total: breakdown.total,
            payment_method: confirmation
                .payment_method
                .clone()
                .unwrap_or_else(|| selected_method.to_string()),
            issued_at,
            item_count,
        }
    }

    /// Printed receipt number, e.g. `B001-42`.
    #[must_use]
    pub fn number(&self) -> String {
        format!("{RECEIPT_SERIES}-{}", self.sale_id)
    }

    /// Issue time in store local time.
    #[must_use]
    pub fn issued_local(&self) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(STORE_UTC_OFFSET_SECS).map_or_else(
            || self.issued_at.fixed_offset(),
            |offset| self.issued_at.with_timezone(&offset),
        )
    }

    /// Issue date as `dd/mm/yyyy`.
    #[must_use]
    pub fn issued_date(&self) -> String {
        self.issued_local().format("%d/%m/%Y").to_string()
    }

    /// Issue time as `HH:MM:SS`.
    #[must_use]
    pub fn issued_time(&self) -> String {
        self.issued_local().format("%H:%M:%S").to_string()
    }
}
