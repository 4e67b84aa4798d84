//! Client-side shopping cart.
//!
//! A cart line is identified by product id plus the chosen size and color, so
//! the same product in two sizes is two lines. Adding an existing line merges
//! quantities; setting a quantity to zero or below removes the line.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use loomline_core::{DiscountPercent, ProductId, effective_price};

use crate::types::Product;

/// One cart line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: ProductId,
    pub name: String,
    /// Undiscounted unit price at the time the line was added.
    pub price: Decimal,
    pub discount: DiscountPercent,
    /// Primary product image, if any.
    pub image: Option<String>,
    pub size: String,
    pub color: String,
    pub quantity: u32,
}

impl CartItem {
    /// Discounted unit price.
    #[must_use]
    pub fn unit_price(&self) -> Decimal {
        effective_price(self.price, self.discount)
    }

    /// Discounted line total.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price() * Decimal::from(self.quantity)
    }

    fn matches(&self, product_id: ProductId, size: &str, color: &str) -> bool {
        self.product_id == product_id && self.size == size && self.color == color
    }
}

/// In-memory cart state.
///
/// Insertion order is preserved; merged lines keep their original position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CartStore {
    items: Vec<CartItem>,
}

impl CartStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current cart lines, oldest first.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Add a product in a given size and color.
    ///
    /// If the same (product, size, color) line already exists, its quantity
    /// grows by `quantity` instead of creating a duplicate line.
    pub fn add(&mut self, product: &Product, size: &str, color: &str, quantity: u32) {
        if quantity == 0 {
            return;
        }

        if let Some(item) = self
            .items
            .iter_mut()
            .find(|item| item.matches(product.id, size, color))
        {
            item.quantity += quantity;
            return;
        }

        self.items.push(CartItem {
            product_id: product.id,
            name: product.name.clone(),
            price: product.price,
            discount: product.discount,
            image: product.images.first().cloned(),
            size: size.to_string(),
            color: color.to_string(),
            quantity,
        });
    }

    /// Set a line's quantity. Zero removes the line; an unknown line is a
    /// no-op.
    pub fn update_quantity(
        &mut self,
        product_id: ProductId,
        size: &str,
        color: &str,
        quantity: u32,
    ) {
        if quantity == 0 {
            self.remove(product_id, size, color);
            return;
        }

        if let Some(item) = self
            .items
            .iter_mut()
            .find(|item| item.matches(product_id, size, color))
        {
            item.quantity = quantity;
        }
    }

    /// Remove a line entirely.
    pub fn remove(&mut self, product_id: ProductId, size: &str, color: &str) {
        self.items
            .retain(|item| !item.matches(product_id, size, color));
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn total_items(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// Discounted total of the whole cart.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.items.iter().map(CartItem::line_total).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use loomline_core::ProductStatus;

    fn product(name: &str, price: Decimal, discount: i32) -> Product {
        Product {
            id: ProductId::generate(),
            name: name.to_string(),
            description: String::new(),
            price,
            discount: DiscountPercent::new(discount).expect("valid discount"),
            category: "Shirts".to_string(),
            images: vec!["/uploads/products/a.jpg".to_string()],
            colors: vec!["black".to_string(), "white".to_string()],
            sizes: vec!["S".to_string(), "M".to_string()],
            stock: 10,
            status: ProductStatus::Active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn adding_same_variant_merges_quantities() {
        let mut cart = CartStore::new();
        let shirt = product("Tee", Decimal::from(20), 0);

        cart.add(&shirt, "M", "black", 1);
        cart.add(&shirt, "M", "black", 2);

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].quantity, 3);
    }

    #[test]
    fn different_sizes_are_separate_lines() {
        let mut cart = CartStore::new();
        let shirt = product("Tee", Decimal::from(20), 0);

        cart.add(&shirt, "S", "black", 1);
        cart.add(&shirt, "M", "black", 1);

        assert_eq!(cart.items().len(), 2);
        assert_eq!(cart.total_items(), 2);
    }

    #[test]
    fn different_colors_are_separate_lines() {
        let mut cart = CartStore::new();
        let shirt = product("Tee", Decimal::from(20), 0);

        cart.add(&shirt, "M", "black", 1);
        cart.add(&shirt, "M", "white", 1);

        assert_eq!(cart.items().len(), 2);
    }

    #[test]
    fn zero_quantity_update_removes_the_line() {
        let mut cart = CartStore::new();
        let shirt = product("Tee", Decimal::from(20), 0);

        cart.add(&shirt, "M", "black", 2);
        cart.update_quantity(shirt.id, "M", "black", 0);

        assert!(cart.is_empty());
    }

    #[test]
    fn update_sets_absolute_quantity() {
        let mut cart = CartStore::new();
        let shirt = product("Tee", Decimal::from(20), 0);

        cart.add(&shirt, "M", "black", 2);
        cart.update_quantity(shirt.id, "M", "black", 5);

        assert_eq!(cart.items()[0].quantity, 5);
    }

    #[test]
    fn update_of_unknown_line_is_a_noop() {
        let mut cart = CartStore::new();
        let shirt = product("Tee", Decimal::from(20), 0);

        cart.update_quantity(shirt.id, "M", "black", 5);
        assert!(cart.is_empty());
    }

    #[test]
    fn subtotal_uses_discounted_prices() {
        let mut cart = CartStore::new();
        // 20 at 50% off -> 10 each.
        let discounted = product("Tee", Decimal::from(20), 50);
        let full = product("Hoodie", Decimal::from(30), 0);

        cart.add(&discounted, "M", "black", 2);
        cart.add(&full, "M", "black", 1);

        assert_eq!(cart.subtotal(), Decimal::from(50));
        assert_eq!(cart.total_items(), 3);
    }

    #[test]
    fn adding_zero_quantity_is_a_noop() {
        let mut cart = CartStore::new();
        let shirt = product("Tee", Decimal::from(20), 0);

        cart.add(&shirt, "M", "black", 0);
        assert!(cart.is_empty());
    }

    #[test]
    fn price_is_captured_at_add_time() {
        let mut cart = CartStore::new();
        let shirt = product("Tee", Decimal::from(20), 0);
        cart.add(&shirt, "M", "black", 1);

        // The line keeps the price it was added with.
        assert_eq!(cart.items()[0].price, Decimal::from(20));
        assert_eq!(cart.items()[0].image.as_deref(), Some("/uploads/products/a.jpg"));
    }
}
