//! Checkout coordinator.
//!
//! Validates the session cart against the offered payment methods, submits
//! the sale through a [`SalesGateway`] and, once the backend records it,
//! clears the cart and stores the receipt for the ticket page.
//!
//! The submit-and-finalize step runs on its own task. If the browser goes
//! away mid-request the task still finishes and writes the outcome to the
//! session that submitted it, so a recorded sale always empties that cart.

use chrono::Utc;
use minimarket_client::{ApiError, SalesGateway};
use minimarket_core::{
    Cart, CheckoutError, LineItem, PaymentMethod, PaymentMethodId, Receipt, SaleRequest,
};
use thiserror::Error;
use tower_sessions::Session;
use tracing::instrument;

use crate::models::{CheckoutPhase, session_keys};
use crate::services::cart::{load_cart, update_cart};

/// Why a checkout did not produce a receipt.
#[derive(Debug, Error)]
pub enum CheckoutFailure {
    /// Rejected before anything was sent.
    #[error(transparent)]
    Invalid(#[from] CheckoutError),

    /// A sale from this session is still waiting for the backend.
    #[error("Ya hay una venta en proceso")]
    InProgress,

    /// The backend refused or could not be reached; the cart is untouched.
    #[error(transparent)]
    Rejected(ApiError),

    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// The finalize task panicked.
    #[error("Checkout task failed: {0}")]
    Interrupted(String),
}

impl CheckoutFailure {
    /// Text shown on the checkout page.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Invalid(err) => err.to_string(),
            Self::InProgress => self.to_string(),
            Self::Rejected(err) => err.user_message(),
            Self::Session(_) | Self::Interrupted(_) => {
                "No se pudo completar la venta, intenta nuevamente".to_string()
            }
        }
    }
}

/// Validate the session cart and submit the sale.
///
/// `methods` are the active methods shown to the user. On success the cart
/// is empty and the receipt is stored under the last-receipt session key.
///
/// # Errors
///
/// Returns [`CheckoutFailure::Invalid`] without contacting the backend when
/// validation fails, and [`CheckoutFailure::Rejected`] with the backend's
/// error when the sale is not recorded.
#[instrument(skip(gateway, session, methods, reference))]
pub async fn submit_checkout<G: SalesGateway>(
    gateway: &G,
    session: &Session,
    methods: &[PaymentMethod],
    selected: Option<PaymentMethodId>,
    reference: &str,
) -> Result<Receipt, CheckoutFailure> {
    if checkout_phase(session).await? == CheckoutPhase::Submitted {
        return Err(CheckoutFailure::InProgress);
    }

    let cart = load_cart(session).await?;
    let (request, method) = SaleRequest::validate(&cart, methods, selected, reference)?;
    let method_name = method.name.clone();
    let snapshot = cart.lines().to_vec();

    set_phase(session, CheckoutPhase::Submitted).await?;

    let task = tokio::spawn(finalize(
        gateway.clone(),
        session.clone(),
        request,
        snapshot,
        method_name,
    ));

    match task.await {
        Ok(outcome) => outcome,
        Err(e) => {
            // finalize never reached its reset
            tracing::error!(error = %e, "Checkout task failed");
            set_phase(session, CheckoutPhase::AwaitingConfirmation).await?;
            Err(CheckoutFailure::Interrupted(e.to_string()))
        }
    }
}

/// Send the sale and apply the outcome to the session.
async fn finalize<G: SalesGateway>(
    gateway: G,
    session: Session,
    request: SaleRequest,
    snapshot: Vec<LineItem>,
    method_name: String,
) -> Result<Receipt, CheckoutFailure> {
    let outcome = match gateway.finalize_sale(&request).await {
        Ok(confirmation) => {
            let receipt = Receipt::from_sale(&snapshot, &confirmation, &method_name, Utc::now());
            record_sale(&session, &receipt).await.map(|()| receipt)
        }
        Err(err) => {
            tracing::warn!(error = %err, "Sale not recorded");
            Err(CheckoutFailure::Rejected(err))
        }
    };

    // Reset and persist even if the request that started us is gone
    set_phase(&session, CheckoutPhase::AwaitingConfirmation).await?;
    session.save().await?;

    outcome
}

async fn record_sale(session: &Session, receipt: &Receipt) -> Result<(), CheckoutFailure> {
    update_cart(session, Cart::clear).await?;
    session.insert(session_keys::LAST_RECEIPT, receipt).await?;
    tracing::info!(
        sale_id = %receipt.sale_id,
        total = %receipt.total,
        items = receipt.item_count,
        "Sale finalized"
    );
    Ok(())
}

async fn checkout_phase(session: &Session) -> Result<CheckoutPhase, tower_sessions::session::Error> {
    Ok(session
        .get::<CheckoutPhase>(session_keys::CHECKOUT_PHASE)
        .await?
        .unwrap_or_default())
}

async fn set_phase(
    session: &Session,
    phase: CheckoutPhase,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CHECKOUT_PHASE, phase).await?;
    session.save().await
}

/// The receipt of the session's last finalized sale.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn last_receipt(session: &Session) -> Result<Option<Receipt>, tower_sessions::session::Error> {
    session.get::<Receipt>(session_keys::LAST_RECEIPT).await
}
