//! Payment methods offered at checkout.

use serde::{Deserialize, Serialize};

use crate::types::{PaymentMethodId, Price};

/// Name of the cash method, the only one that needs no reference.
pub const CASH_METHOD_NAME: &str = "EFECTIVO";

/// A payment method configured in the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMethod {
    pub id: PaymentMethodId,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "activo", default)]
    pub active: bool,
}

/// How a payment method is settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentKind {
    /// Cash at the counter.
    Cash,
    /// Wallet or transfer (YAPE, PLIN, ...); needs an operation reference.
    Reference,
}

impl PaymentMethod {
    /// Classify the method by name.
    #[must_use]
    pub fn kind(&self) -> PaymentKind {
        if self.name.trim().eq_ignore_ascii_case(CASH_METHOD_NAME) {
            PaymentKind::Cash
        } else {
            PaymentKind::Reference
        }
    }

    #[must_use]
    pub fn requires_reference(&self) -> bool {
        self.kind() == PaymentKind::Reference
    }

    /// Instruction shown to the customer for reference-based payments.
    ///
    /// A blank reference is rendered as `N/A`.
    #[must_use]
    pub fn instruction(&self, total: Price, reference: &str) -> String {
        let reference = match reference.trim() {
            "" => "N/A",
            other => other,
        };
        format!(
            "Pago {} - {} {} - Ref: {}",
            self.name,
            Price::SYMBOL,
            total.plain(),
            reference
        )
    }
}

/// Keep only active methods, in backend order.
#[must_use]
pub fn active_methods(methods: Vec<PaymentMethod>) -> Vec<PaymentMethod> {
    methods.into_iter().filter(|m| m.active).collect()
}

/// The method pre-selected on the checkout page: cash when offered.
#[must_use]
pub fn default_method(methods: &[PaymentMethod]) -> Option<&PaymentMethod> {
    methods.iter().find(|m| m.kind() == PaymentKind::Cash)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn method(id: i64, name: &str, active: bool) -> PaymentMethod {
        PaymentMethod {
            id: PaymentMethodId::new(id),
            name: name.to_string(),
            active,
        }
    }

    #[test]
    fn test_cash_needs_no_reference() {
        assert!(!method(1, "EFECTIVO", true).requires_reference());
        assert!(method(2, "YAPE", true).requires_reference());
        assert!(method(3, "PLIN", true).requires_reference());
    }

    #[test]
    fn test_only_active_methods_offered() {
        let methods = active_methods(vec![
            method(1, "EFECTIVO", true),
            method(2, "YAPE", false),
            method(3, "PLIN", true),
        ]);
        let names: Vec<&str> = methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["EFECTIVO", "PLIN"]);
    }

    #[test]
    fn test_cash_preselected() {
        let methods = vec![method(2, "YAPE", true), method(1, "EFECTIVO", true)];
        assert_eq!(default_method(&methods).map(|m| m.id.as_i64()), Some(1));
        assert!(default_method(&methods[..1]).is_none());
    }

    #[test]
    fn test_instruction_text() {
        let total = Price::try_new(Decimal::new(1590, 2)).unwrap();
        let yape = method(2, "YAPE", true);
        assert_eq!(yape.instruction(total, "123456"), "Pago YAPE - S/ 15.90 - Ref: 123456");
        assert_eq!(yape.instruction(total, " "), "Pago YAPE - S/ 15.90 - Ref: N/A");
    }

    #[test]
    fn test_deserialize_backend_method() {
        let m: PaymentMethod =
            serde_json::from_str(r#"{"id":4,"nombre":"PLIN","activo":true}"#).unwrap();
        assert_eq!(m, method(4, "PLIN", true));
    }
}
