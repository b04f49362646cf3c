//! Checkout page and sale submission.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use minimarket_core::{PaymentMethod, PaymentMethodId, Price, payment};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::routes::cart::CartView;
use crate::services::cart::load_cart;
use crate::services::checkout::{CheckoutFailure, submit_checkout};
use crate::state::AppState;

/// Payment method option on the checkout page.
#[derive(Clone)]
pub struct MethodView {
    pub id: i64,
    pub name: String,
    pub requires_reference: bool,
    pub instruction: String,
    pub selected: bool,
}

impl MethodView {
    fn new(method: &PaymentMethod, total: Price, reference: &str, selected: bool) -> Self {
        Self {
            id: method.id.as_i64(),
            name: method.name.clone(),
            requires_reference: method.requires_reference(),
            instruction: method.instruction(total, reference),
            selected,
        }
    }
}

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutTemplate {
    pub store_name: String,
    pub cart: CartView,
    pub methods: Vec<MethodView>,
    pub reference: String,
    pub error: Option<String>,
}

/// Checkout form data.
#[derive(Debug, Default, Deserialize)]
pub struct CheckoutForm {
    pub metodo_pago_id: Option<String>,
    #[serde(default)]
    pub referencia: String,
}

impl CheckoutForm {
    /// The selected method; blank or malformed values select nothing.
    fn selected(&self) -> Option<PaymentMethodId> {
        self.metodo_pago_id
            .as_deref()
            .and_then(|v| v.trim().parse::<i64>().ok())
            .map(PaymentMethodId::new)
    }
}

/// Active methods from the backend.
async fn active_methods(state: &AppState) -> std::result::Result<Vec<PaymentMethod>, String> {
    state
        .api()
        .payment_methods()
        .await
        .map(payment::active_methods)
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to load payment methods");
            e.user_message()
        })
}

fn method_views(
    methods: &[PaymentMethod],
    total: Price,
    selected: Option<PaymentMethodId>,
    reference: &str,
) -> Vec<MethodView> {
    let selected = selected
        .filter(|id| methods.iter().any(|m| m.id == *id))
        .or_else(|| payment::default_method(methods).map(|m| m.id));
    methods
        .iter()
        .map(|m| MethodView::new(m, total, reference, Some(m.id) == selected))
        .collect()
}

/// Display the checkout page.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<CheckoutTemplate> {
    let cart = load_cart(&session).await?;
    let (methods, error) = match active_methods(&state).await {
        Ok(methods) => (methods, None),
        Err(message) => (Vec::new(), Some(message)),
    };

    Ok(CheckoutTemplate {
        store_name: state.config().store.name.clone(),
        methods: method_views(&methods, cart.total(), None, ""),
        cart: CartView::from(&cart),
        reference: String::new(),
        error,
    })
}

/// Submit the sale.
///
/// On success redirects to the ticket. Validation and backend rejections
/// re-render the page with the message and leave the cart as it was.
#[instrument(skip(state, session, form))]
pub async fn submit(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<CheckoutForm>,
) -> Result<Response> {
    let methods = match active_methods(&state).await {
        Ok(methods) => methods,
        Err(message) => {
            return rerender(&state, &session, &[], &form, message).await;
        }
    };

    match submit_checkout(
        state.api(),
        &session,
        &methods,
        form.selected(),
        &form.referencia,
    )
    .await
    {
        Ok(receipt) => {
            add_breadcrumb(
                "checkout",
                "Sale finalized",
                &[("sale_id", receipt.sale_id.to_string())],
            );
            tracing::info!(sale_id = %receipt.sale_id, "Checkout completed");
            Ok(Redirect::to("/ticket").into_response())
        }
        Err(CheckoutFailure::Session(e)) => Err(AppError::Session(e)),
        Err(CheckoutFailure::Interrupted(e)) => Err(AppError::Internal(e)),
        Err(failure) => {
            let message = failure.user_message();
            rerender(&state, &session, &methods, &form, message).await
        }
    }
}

async fn rerender(
    state: &AppState,
    session: &Session,
    methods: &[PaymentMethod],
    form: &CheckoutForm,
    message: String,
) -> Result<Response> {
    let cart = load_cart(session).await?;
    let template = CheckoutTemplate {
        store_name: state.config().store.name.clone(),
        methods: method_views(methods, cart.total(), form.selected(), &form.referencia),
        cart: CartView::from(&cart),
        reference: form.referencia.clone(),
        error: Some(message),
    };
    Ok((StatusCode::UNPROCESSABLE_ENTITY, template).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn methods() -> Vec<PaymentMethod> {
        vec![
            PaymentMethod {
                id: PaymentMethodId::new(2),
                name: "YAPE".to_string(),
                active: true,
            },
            PaymentMethod {
                id: PaymentMethodId::new(1),
                name: "EFECTIVO".to_string(),
                active: true,
            },
        ]
    }

    #[test]
    fn test_cash_is_preselected() {
        let views = method_views(&methods(), Price::ZERO, None, "");
        assert!(!views[0].selected);
        assert!(views[1].selected);
        assert!(views[0].requires_reference);
    }

    #[test]
    fn test_unknown_selection_falls_back_to_default() {
        let views = method_views(&methods(), Price::ZERO, Some(PaymentMethodId::new(9)), "");
        assert!(views[1].selected);
    }

    #[test]
    fn test_form_selection_parsing() {
        let form = CheckoutForm {
            metodo_pago_id: Some(" 2 ".to_string()),
            referencia: String::new(),
        };
        assert_eq!(form.selected(), Some(PaymentMethodId::new(2)));

        let blank = CheckoutForm {
            metodo_pago_id: Some(String::new()),
            referencia: String::new(),
        };
        assert_eq!(blank.selected(), None);
    }
}
