//! Catalog filtering and sorting.
//!
//! Filters compose with AND semantics; within one attribute list (sizes,
//! colors) any overlap matches. Price bounds apply to the discounted price,
//! which is what the shopper sees.

use rust_decimal::Decimal;

use loomline_core::ProductStatus;

use crate::types::Product;

/// Sort order for a filtered product list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Newest first, the catalog's natural order.
    #[default]
    Newest,
    PriceAsc,
    PriceDesc,
}

/// Composable catalog filter.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub category: Option<String>,
    /// Inclusive bounds on the discounted price.
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    /// Match products offering at least one of these sizes.
    pub sizes: Vec<String>,
    /// Match products offering at least one of these colors.
    pub colors: Vec<String>,
    pub in_stock_only: bool,
    /// Hidden products are excluded unless this is set.
    pub include_inactive: bool,
}

impl ProductFilter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether one product passes every active criterion.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        if !self.include_inactive && product.status != ProductStatus::Active {
            return false;
        }
        if let Some(category) = &self.category
            && !product.category.eq_ignore_ascii_case(category)
        {
            return false;
        }

        let price = product.effective_price();
        if self.min_price.is_some_and(|min| price < min) {
            return false;
        }
        if self.max_price.is_some_and(|max| price > max) {
            return false;
        }

        if !self.sizes.is_empty() && !intersects(&self.sizes, &product.sizes) {
            return false;
        }
        if !self.colors.is_empty() && !intersects(&self.colors, &product.colors) {
            return false;
        }

        if self.in_stock_only && !product.in_stock() {
            return false;
        }

        true
    }

    /// Filter and sort a product list.
    ///
    /// The sort is stable, so products tied on the key keep their catalog
    /// order (newest first as the API returns them).
    #[must_use]
    pub fn apply(&self, products: &[Product], sort: SortKey) -> Vec<Product> {
        let mut matched: Vec<Product> = products
            .iter()
            .filter(|p| self.matches(p))
            .cloned()
            .collect();

        match sort {
            SortKey::Newest => {
                matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            }
            SortKey::PriceAsc => {
                matched.sort_by(|a, b| a.effective_price().cmp(&b.effective_price()));
            }
            SortKey::PriceDesc => {
                matched.sort_by(|a, b| b.effective_price().cmp(&a.effective_price()));
            }
        }

        matched
    }
}

fn intersects(wanted: &[String], offered: &[String]) -> bool {
    wanted
        .iter()
        .any(|w| offered.iter().any(|o| o.eq_ignore_ascii_case(w)))
}
