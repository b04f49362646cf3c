//! IGV (Peruvian sales tax) policy.
//!
//! Shelf prices already include IGV. The receipt shows the tax portion as
//! `total × IGV_RATE` and the subtotal as the remainder.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::types::Price;

/// IGV rate applied to every sale (18%).
pub const IGV_RATE: Decimal = Decimal::from_parts(18, 0, 0, false, 2);

/// Split of a tax-inclusive total into subtotal and IGV.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TaxBreakdown {
    pub subtotal: Price,
    pub tax: Price,
    pub total: Price,
}

impl TaxBreakdown {
    /// Break down a total that already includes IGV.
    ///
    /// ```
    /// use minimarket_core::{Price, TaxBreakdown};
    /// use rust_decimal::Decimal;
    ///
    /// let total = Price::try_new(Decimal::new(100, 0)).unwrap();
    /// let breakdown = TaxBreakdown::from_inclusive_total(total);
    /// assert_eq!(breakdown.tax.plain(), "18.00");
    /// assert_eq!(breakdown.subtotal.plain(), "82.00");
    /// ```
    #[must_use]
    pub fn from_inclusive_total(total: Price) -> Self {
        let amount = total.amount();
        let tax = amount * IGV_RATE;
        // 0 <= tax <= total, so neither side can go negative
        let tax = Price::try_new(tax).unwrap_or(Price::ZERO);
        let subtotal = Price::try_new(amount - tax.amount()).unwrap_or(Price::ZERO);
        Self {
            subtotal,
            tax,
            total,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn price(cents: i64) -> Price {
        Price::try_new(Decimal::new(cents, 2)).unwrap()
    }

    #[test]
    fn test_rate_is_eighteen_percent() {
        assert_eq!(IGV_RATE, Decimal::new(18, 2));
    }

    #[test]
    fn test_hundred_soles() {
        let breakdown = TaxBreakdown::from_inclusive_total(price(10_000));
        assert_eq!(breakdown.tax, price(1_800));
        assert_eq!(breakdown.subtotal, price(8_200));
        assert_eq!(breakdown.total, price(10_000));
    }

    #[test]
    fn test_parts_add_up_to_total() {
        for cents in [0, 1, 1_590, 999_999] {
            let total = price(cents);
            let breakdown = TaxBreakdown::from_inclusive_total(total);
            assert_eq!(breakdown.subtotal + breakdown.tax, total);
        }
    }

    #[test]
    fn test_display_rounding() {
        let breakdown = TaxBreakdown::from_inclusive_total(price(1_590));
        assert_eq!(breakdown.tax.plain(), "2.86");
        assert_eq!(breakdown.subtotal.plain(), "13.04");
    }
}
