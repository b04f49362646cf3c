//! Checkout validation and sale payloads.
//!
//! Everything here is pure: a [`SaleRequest`] is only built once the cart,
//! the selected payment method and the reference have been validated, so an
//! invalid checkout never reaches the network.

use serde::{Deserialize, Deserializer, Serialize};

use crate::cart::Cart;
use crate::payment::PaymentMethod;
use crate::types::{PaymentMethodId, ProductId, SaleId};

/// Reasons a checkout is rejected before submission.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckoutError {
    #[error("El carrito está vacío")]
    EmptyCart,
    /// No method selected, or the selection is not an active method.
    #[error("Selecciona un método de pago")]
    NoPaymentMethod,
    /// The method needs an operation reference and none was given.
    #[error("Referencia obligatoria para {0}")]
    MissingReference(String),
}

/// One line of a sale as the backend expects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleItem {
    pub producto_id: ProductId,
    pub cantidad: u32,
}

/// Body of the finalize-sale request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleRequest {
    pub items: Vec<SaleItem>,
    pub metodo_pago_id: PaymentMethodId,
    /// Empty for cash.
    pub referencia: String,
}

impl SaleRequest {
    /// Validate a checkout and build the request body.
    ///
    /// `methods` are the methods currently offered; a selection outside them
    /// is treated as no selection. Returns the request together with the
    /// chosen method.
    ///
    /// # Errors
    ///
    /// Returns the first [`CheckoutError`] found, checking the cart, then the
    /// method, then the reference.
    pub fn validate<'a>(
        cart: &Cart,
        methods: &'a [PaymentMethod],
        selected: Option<PaymentMethodId>,
        reference: &str,
    ) -> Result<(Self, &'a PaymentMethod), CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let method = selected
            .and_then(|id| methods.iter().find(|m| m.id == id && m.active))
            .ok_or(CheckoutError::NoPaymentMethod)?;

        let reference = reference.trim();
        let referencia = if method.requires_reference() {
            if reference.is_empty() {
                return Err(CheckoutError::MissingReference(method.name.clone()));
            }
            reference.to_string()
        } else {
            String::new()
        };

        let items = cart
            .lines()
            .iter()
            .map(|line| SaleItem {
                producto_id: line.product().id,
                cantidad: line.quantity(),
            })
            .collect();

        Ok((
            Self {
                items,
                metodo_pago_id: method.id,
                referencia,
            },
            method,
        ))
    }
}

/// What the backend returns for a recorded sale.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SaleConfirmation {
    pub id: SaleId,
    /// Method name echoed by the backend, when it sends one.
    #[serde(
        rename = "metodoPago",
        default,
        deserialize_with = "deserialize_method_name"
    )]
    pub payment_method: Option<String>,
}

/// Accepts `"YAPE"`, `{"nombre": "YAPE", ...}` or null.
fn deserialize_method_name<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum MethodField {
        Name(String),
        Object {
            nombre: String,
        },
    }

    Ok(
        Option::<MethodField>::deserialize(deserializer)?.map(|field| match field {
            MethodField::Name(name) | MethodField::Object { nombre: name } => name,
        }),
    )
}
