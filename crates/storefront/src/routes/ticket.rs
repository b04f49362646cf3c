//! Ticket (boleta) of the last finalized sale.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use minimarket_core::{Receipt, ReceiptLine};
use tower_sessions::Session;
use tracing::instrument;

use crate::config::StoreInfo;
use crate::error::Result;
use crate::filters;
use crate::services::checkout::last_receipt;
use crate::state::AppState;

/// Receipt line display data.
#[derive(Clone)]
pub struct ReceiptLineView {
    pub name: String,
    pub quantity: u32,
    pub unit_price: String,
    pub subtotal: String,
}

impl From<&ReceiptLine> for ReceiptLineView {
    fn from(line: &ReceiptLine) -> Self {
        Self {
            name: line.name.clone(),
            quantity: line.quantity,
            unit_price: line.unit_price.to_string(),
            subtotal: line.subtotal.to_string(),
        }
    }
}

/// Receipt display data.
#[derive(Clone)]
pub struct ReceiptView {
    pub number: String,
    pub date: String,
    pub time: String,
    pub lines: Vec<ReceiptLineView>,
    pub subtotal: String,
    pub tax: String,
    pub total: String,
    pub payment_method: String,
    pub item_count: u32,
}

impl From<&Receipt> for ReceiptView {
    fn from(receipt: &Receipt) -> Self {
        Self {
            number: receipt.number(),
            date: receipt.issued_date(),
            time: receipt.issued_time(),
            lines: receipt.lines.iter().map(ReceiptLineView::from).collect(),
            subtotal: receipt.subtotal.to_string(),
            tax: receipt.tax.to_string(),
            total: receipt.total.to_string(),
            payment_method: receipt.payment_method.clone(),
            item_count: receipt.item_count,
        }
    }
}

/// Ticket page template.
#[derive(Template, WebTemplate)]
#[template(path = "ticket/show.html")]
pub struct TicketTemplate {
    pub store: StoreInfo,
    pub receipt: ReceiptView,
}

/// Show the receipt of the session's last sale, or go back to the catalog.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<Response> {
    let Some(receipt) = last_receipt(&session).await? else {
        return Ok(Redirect::to("/").into_response());
    };

    Ok(TicketTemplate {
        store: state.config().store.clone(),
        receipt: ReceiptView::from(&receipt),
    }
    .into_response())
}
