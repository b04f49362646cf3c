//! Shopping cart aggregate.
//!
//! A [`Cart`] is an insertion-ordered list of [`LineItem`]s with at most one
//! line per product. Quantities are always at least one; a line that would
//! drop to zero is removed instead. The total is derived on every read.

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use crate::product::Product;
use crate::types::{Price, ProductId};

/// A product in the cart together with its quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    product: Product,
    quantity: NonZeroU32,
}

impl LineItem {
    /// The product on this line.
    #[must_use]
    pub const fn product(&self) -> &Product {
        &self.product
    }

    /// Number of units, never zero.
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity.get()
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.product.price.times(self.quantity.get())
    }
}

/// The shopping cart of one browsing session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<LineItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Add one unit of `product`.
    ///
    /// Increments the existing line for the product, or appends a new line
    /// with quantity one.
    pub fn add_product(&mut self, product: Product) {
        if let Some(line) = self.line_mut(product.id) {
            line.quantity = line.quantity.saturating_add(1);
        } else {
            self.lines.push(LineItem {
                product,
                quantity: NonZeroU32::MIN,
            });
        }
    }

    /// Remove one unit of the product.
    ///
    /// A line at quantity one is removed. Unknown ids are ignored.
    pub fn decrement_product(&mut self, id: ProductId) {
        let Some(line) = self.line_mut(id) else {
            return;
        };
        match NonZeroU32::new(line.quantity.get() - 1) {
            Some(quantity) => line.quantity = quantity,
            None => self.remove_product(id),
        }
    }

    /// Remove the product's line regardless of quantity.
    pub fn remove_product(&mut self, id: ProductId) {
        self.lines.retain(|line| line.product.id != id);
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of price times quantity over all lines.
    #[must_use]
    pub fn total(&self) -> Price {
        self.lines.iter().map(LineItem::subtotal).sum()
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[LineItem] {
        &self.lines
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(LineItem::quantity).sum()
    }

    /// Quantity of a product, zero when absent.
    #[must_use]
    pub fn quantity_of(&self, id: ProductId) -> u32 {
        self.get(id).map_or(0, LineItem::quantity)
    }

    /// The line for a product, if present.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&LineItem> {
        self.lines.iter().find(|line| line.product.id == id)
    }

    fn line_mut(&mut self, id: ProductId) -> Option<&mut LineItem> {
        self.lines.iter_mut().find(|line| line.product.id == id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::types::Category;

    fn product(id: i64, cents: i64) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Producto {id}"),
            description: String::new(),
            category: Category::Abarrotes,
            price: Price::try_new(Decimal::new(cents, 2)).unwrap(),
            image: "default.png".to_string(),
        }
    }

    #[test]
    fn test_add_same_product_increments_quantity() {
        let mut cart = Cart::new();
        let rice = product(1, 350);
        for _ in 0..5 {
            cart.add_product(rice.clone());
        }
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.quantity_of(rice.id), 5);
    }

    #[test]
    fn test_add_appends_in_insertion_order() {
        let mut cart = Cart::new();
        cart.add_product(product(3, 100));
        cart.add_product(product(1, 100));
        cart.add_product(product(3, 100));
        let ids: Vec<i64> = cart.lines().iter().map(|l| l.product().id.as_i64()).collect();
        assert_eq!(ids, vec![3, 1]);
    }

    #[test]
    fn test_decrement_never_below_one() {
        let mut cart = Cart::new();
        let milk = product(2, 230);
        cart.add_product(milk.clone());
        cart.add_product(milk.clone());

        cart.decrement_product(milk.id);
        assert_eq!(cart.quantity_of(milk.id), 1);

        cart.decrement_product(milk.id);
        assert!(cart.get(milk.id).is_none());
        assert!(cart.is_empty());

        cart.decrement_product(milk.id);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_remove_is_unconditional() {
        let mut cart = Cart::new();
        let bread = product(4, 20);
        for _ in 0..7 {
            cart.add_product(bread.clone());
        }
        cart.add_product(product(5, 100));
        cart.remove_product(bread.id);
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.quantity_of(bread.id), 0);

        cart.remove_product(ProductId::new(99));
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_rice_and_oil_total() {
        let mut cart = Cart::new();
        let rice = product(1, 350);
        let oil = product(2, 890);
        cart.add_product(rice.clone());
        cart.add_product(rice);
        cart.add_product(oil);

        assert_eq!(cart.total().plain(), "15.90");
        assert_eq!(cart.item_count(), 3);
        assert_eq!(cart.lines()[0].subtotal().plain(), "7.00");
    }

    #[test]
    fn test_total_matches_sum_after_mixed_operations() {
        let mut cart = Cart::new();
        let a = product(1, 125);
        let b = product(2, 999);
        let c = product(3, 1);
        cart.add_product(a.clone());
        cart.add_product(b.clone());
        cart.add_product(b.clone());
        cart.add_product(c.clone());
        cart.decrement_product(b.id);
        cart.add_product(a.clone());
        cart.remove_product(c.id);

        let expected: Decimal = cart
            .lines()
            .iter()
            .map(|l| l.product().price.amount() * Decimal::from(l.quantity()))
            .sum();
        assert_eq!(cart.total().amount(), expected);
        assert_eq!(cart.total().plain(), "12.49");
    }

    #[test]
    fn test_clear_empties_cart() {
        let mut cart = Cart::new();
        cart.add_product(product(1, 350));
        cart.add_product(product(2, 890));
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Price::ZERO);
        assert_eq!(cart.item_count(), 0);
    }

    #[test]
    fn test_session_round_trip_keeps_order() {
        let mut cart = Cart::new();
        cart.add_product(product(2, 890));
        cart.add_product(product(1, 350));
        cart.add_product(product(1, 350));

        let json = serde_json::to_string(&cart).unwrap();
        let restored: Cart = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, cart);
    }

    #[test]
    fn test_zero_quantity_rejected_on_deserialize() {
        let mut cart = Cart::new();
        cart.add_product(product(1, 350));
        let json = serde_json::to_string(&cart).unwrap().replace("\"quantity\":1", "\"quantity\":0");
        assert!(serde_json::from_str::<Cart>(&json).is_err());
    }

    // =========================================================================
    // Proptest: operation sequences against a counting model
    // =========================================================================

    mod proptest_cart {
        use std::collections::BTreeMap;

        use proptest::prelude::*;

        use super::*;

        #[derive(Debug, Clone)]
        enum Op {
            Add(i64),
            Decrement(i64),
            Remove(i64),
            Clear,
        }

        fn arb_op() -> impl Strategy<Value = Op> {
            prop_oneof![
                6 => (1..=5i64).prop_map(Op::Add),
                3 => (1..=6i64).prop_map(Op::Decrement),
                1 => (1..=6i64).prop_map(Op::Remove),
                1 => Just(Op::Clear),
            ]
        }

        /// Price in cents for a catalog id.
        fn cents(id: i64) -> i64 {
            id * 137 + 45
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(256))]

            #[test]
            fn prop_cart_matches_model(ops in prop::collection::vec(arb_op(), 0..60)) {
                let mut cart = Cart::new();
                let mut model: BTreeMap<i64, u32> = BTreeMap::new();

                for op in ops {
                    match op {
                        Op::Add(id) => {
                            cart.add_product(product(id, cents(id)));
                            *model.entry(id).or_default() += 1;
                        }
                        Op::Decrement(id) => {
                            cart.decrement_product(ProductId::new(id));
                            if let Some(quantity) = model.get_mut(&id) {
                                *quantity -= 1;
                                if *quantity == 0 {
                                    model.remove(&id);
                                }
                            }
                        }
                        Op::Remove(id) => {
                            cart.remove_product(ProductId::new(id));
                            model.remove(&id);
                        }
                        Op::Clear => {
                            cart.clear();
                            model.clear();
                        }
                    }

                    prop_assert!(cart.lines().iter().all(|line| line.quantity() >= 1));
                    prop_assert_eq!(cart.len(), model.len());
                    for (id, quantity) in &model {
                        prop_assert_eq!(cart.quantity_of(ProductId::new(*id)), *quantity);
                    }

                    let expected: i64 = model
                        .iter()
                        .map(|(id, quantity)| cents(*id) * i64::from(*quantity))
                        .sum();
                    prop_assert_eq!(cart.total().amount(), Decimal::new(expected, 2));
                }
            }

            #[test]
            fn prop_quantity_counts_adds(id in 1..=5i64, adds in 1..40u32) {
                let mut cart = Cart::new();
                for _ in 0..adds {
                    cart.add_product(product(id, cents(id)));
                }
                prop_assert_eq!(cart.quantity_of(ProductId::new(id)), adds);
                prop_assert_eq!(cart.item_count(), adds);
                prop_assert_eq!(cart.len(), 1);
            }
        }
    }
}
