use crate::domain::money::{Money, Price};
use crate::error::CheckoutError;
use serde::{Deserialize, Serialize};

/// A single entry in the shopping cart.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct LineItem {
    /// Catalog identifier for the item (a package id for catalog items).
    pub id: String,
    pub name: String,
    pub unit_price: Price,
    /// Always at least 1.
    pub quantity: u32,
    /// Path or URL of the item's image.
    pub image_ref: String,
}

impl LineItem {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        unit_price: Price,
        quantity: u32,
        image_ref: impl Into<String>,
    ) -> Result<Self, CheckoutError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(CheckoutError::ValidationError(
                "Line item id must not be empty".to_string(),
            ));
        }
        if quantity == 0 {
            return Err(CheckoutError::ValidationError(format!(
                "Line item {id} must have a quantity of at least 1"
            )));
        }
        let item = Self {
            id,
            name: name.into(),
            unit_price,
            quantity,
            image_ref: image_ref.into(),
        };
        item.line_total()?;
        Ok(item)
    }

    pub fn line_total(&self) -> Result<Money, CheckoutError> {
        self.unit_price.checked_total(self.quantity).ok_or_else(|| {
            CheckoutError::ValidationError(format!("Line total of item {} overflows", self.id))
        })
    }
}

/// An ordered collection of line items.
///
/// Items keep the order in which they were first added. Quantities never drop
/// below 1; removing an item is the only way to take it out of the cart.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Default)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Adds an item, merging quantities when the id is already in the cart.
    pub fn add(&mut self, item: LineItem) {
        match self.items.iter_mut().find(|existing| existing.id == item.id) {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(item.quantity),
            None => self.items.push(item),
        }
    }

    /// Removes the item with the given id. Returns the removed item, if any.
    pub fn remove(&mut self, id: &str) -> Option<LineItem> {
        let index = self.items.iter().position(|item| item.id == id)?;
        Some(self.items.remove(index))
    }

    /// Sets the quantity of an item, clamping to a minimum of 1.
    ///
    /// Returns `false` when the id is not in the cart.
    pub fn set_quantity(&mut self, id: &str, quantity: u32) -> bool {
        match self.items.iter_mut().find(|item| item.id == id) {
            Some(item) => {
                item.quantity = quantity.max(1);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of all line totals. Fails if the amount is out of range.
    pub fn subtotal(&self) -> Result<Money, CheckoutError> {
        self.items.iter().try_fold(Money::ZERO, |acc, item| {
            acc.checked_add(item.line_total()?).ok_or_else(|| {
                CheckoutError::ValidationError("Cart subtotal overflows".to_string())
            })
        })
    }

    /// Total number of units across all lines.
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |acc, item| acc.saturating_add(item.quantity))
    }
}

impl FromIterator<LineItem> for Cart {
    fn from_iter<I: IntoIterator<Item = LineItem>>(iter: I) -> Self {
        let mut cart = Cart::new();
        for item in iter {
            cart.add(item);
        }
        cart
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn item(id: &str, price: rust_decimal::Decimal, quantity: u32) -> LineItem {
        LineItem::new(
            id,
            format!("Item {id}"),
            Price::new(price).unwrap(),
            quantity,
            format!("/images/{id}.png"),
        )
        .unwrap()
    }

    fn item_with_price(id: &str, price: Price) -> LineItem {
        LineItem::new(id, format!("Item {id}"), price, 1, "").unwrap()
    }

    #[test]
    fn test_line_item_rejects_zero_quantity() {
        let result = LineItem::new("pubg-60", "60 UC", Price::new(dec!(1.0)).unwrap(), 0, "");
        assert!(matches!(result, Err(CheckoutError::ValidationError(_))));
    }

    #[test]
    fn test_line_item_rejects_blank_id() {
        let result = LineItem::new("  ", "60 UC", Price::new(dec!(1.0)).unwrap(), 1, "");
        assert!(matches!(result, Err(CheckoutError::ValidationError(_))));
    }

    #[test]
    fn test_add_merges_same_id() {
        let mut cart = Cart::new();
        cart.add(item("a", dec!(5.0), 1));
        cart.add(item("b", dec!(2.0), 1));
        cart.add(item("a", dec!(5.0), 2));

        assert_eq!(cart.items().len(), 2);
        assert_eq!(cart.items()[0].id, "a");
        assert_eq!(cart.items()[0].quantity, 3);
        assert_eq!(cart.item_count(), 4);
    }

    #[test]
    fn test_set_quantity_clamps_to_one() {
        let mut cart = Cart::new();
        cart.add(item("a", dec!(5.0), 4));

        assert!(cart.set_quantity("a", 0));
        assert_eq!(cart.items()[0].quantity, 1);

        assert!(cart.set_quantity("a", 7));
        assert_eq!(cart.items()[0].quantity, 7);

        assert!(!cart.set_quantity("missing", 3));
    }

    #[test]
    fn test_remove_drops_item() {
        let mut cart = Cart::new();
        cart.add(item("a", dec!(5.0), 1));
        cart.add(item("b", dec!(2.0), 1));

        let removed = cart.remove("a").unwrap();
        assert_eq!(removed.id, "a");
        assert_eq!(cart.items().len(), 1);
        assert!(cart.remove("a").is_none());
    }

    #[test]
    fn test_subtotal() {
        let cart: Cart = vec![item("a", dec!(4.99), 2), item("b", dec!(10.00), 1)]
            .into_iter()
            .collect();
        assert_eq!(cart.subtotal().unwrap(), Money::new(dec!(19.98)));

        let empty = Cart::new();
        assert_eq!(empty.subtotal().unwrap(), Money::ZERO);
        assert!(empty.is_empty());
    }

    #[test]
    fn test_line_item_rejects_overflowing_total() {
        let price = Price::new(dec!(40000000000000000000000000000)).unwrap();
        let result = LineItem::new("a", "A", price, 2, "");
        assert!(matches!(result, Err(CheckoutError::ValidationError(_))));
    }

    #[test]
    fn test_subtotal_overflow_is_an_error() {
        let price = Price::new(dec!(40000000000000000000000000000)).unwrap();
        let mut cart = Cart::new();
        cart.add(item_with_price("a", price));
        cart.add(item_with_price("b", price));
        assert!(matches!(
            cart.subtotal(),
            Err(CheckoutError::ValidationError(_))
        ));

        // Merging can push a single line past the range too.
        let mut merged = Cart::new();
        merged.add(item_with_price("a", price));
        merged.add(item_with_price("a", price));
        assert!(merged.subtotal().is_err());
    }
}
