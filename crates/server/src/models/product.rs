//! Product model, creation input, and partial-update patch.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use loomline_core::{DiscountPercent, ProductId, ProductStatus, effective_price};

/// A catalog product.
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub discount: DiscountPercent,
    pub category: String,
    /// Ordered list of image URLs; the first is the primary image.
    pub images: Vec<String>,
    pub colors: Vec<String>,
    pub sizes: Vec<String>,
    pub stock: i32,
    pub status: ProductStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Sale price after the percentage discount.
    #[must_use]
    pub fn effective_price(&self) -> Decimal {
        effective_price(self.price, self.discount)
    }
}

/// Validated input for creating a product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub discount: DiscountPercent,
    pub category: String,
    pub images: Vec<String>,
    pub colors: Vec<String>,
    pub sizes: Vec<String>,
    pub stock: i32,
    pub status: ProductStatus,
}

/// Validated partial update.
///
/// `None` means "leave unchanged". Explicit zero values (a cleared discount,
/// stock set to 0) are `Some` and are applied - presence is tracked by the
/// option, never by truthiness.
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub discount: Option<DiscountPercent>,
    pub category: Option<String>,
    pub images: Option<Vec<String>>,
    pub colors: Option<Vec<String>>,
    pub sizes: Option<Vec<String>>,
    pub stock: Option<i32>,
    pub status: Option<ProductStatus>,
}

impl ProductPatch {
    /// Whether the patch changes anything at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.discount.is_none()
            && self.category.is_none()
            && self.images.is_none()
            && self.colors.is_none()
            && self.sizes.is_none()
            && self.stock.is_none()
            && self.status.is_none()
    }
}
