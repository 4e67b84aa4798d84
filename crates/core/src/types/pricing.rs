//! Discount and effective-price arithmetic.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Error returned when a discount is outside the valid range.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("discount must be between 0 and 100 (got {0})")]
pub struct DiscountPercentError(pub i32);

/// A percentage discount in `[0, 100]`.
///
/// Zero is a valid, meaningful value ("no discount") and must survive
/// partial updates - it is never treated as "unset".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(try_from = "i32", into = "i32")]
pub struct DiscountPercent(i32);

impl DiscountPercent {
    /// No discount.
    pub const ZERO: Self = Self(0);

    /// Construct a discount, validating the range.
    ///
    /// # Errors
    ///
    /// Returns [`DiscountPercentError`] if `value` is outside `[0, 100]`.
    pub const fn new(value: i32) -> Result<Self, DiscountPercentError> {
        if value < 0 || value > 100 {
            return Err(DiscountPercentError(value));
        }
        Ok(Self(value))
    }

    /// The raw percentage value.
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self.0
    }
}

impl TryFrom<i32> for DiscountPercent {
    type Error = DiscountPercentError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DiscountPercent> for i32 {
    fn from(value: DiscountPercent) -> Self {
        value.0
    }
}

impl std::fmt::Display for DiscountPercent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Sale price after applying the percentage discount.
///
/// `price * (1 - discount/100)`. With `price >= 0` and the discount clamped
/// to `[0, 100]` by construction, the result is always non-negative.
#[must_use]
pub fn effective_price(price: Decimal, discount: DiscountPercent) -> Decimal {
    let factor = Decimal::from(100 - discount.as_i32()) / Decimal::from(100);
    price * factor
}
