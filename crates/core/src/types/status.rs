//! Status enums.

use serde::{Deserialize, Serialize};

/// Product visibility status.
///
/// Inactive products remain in the catalog store but are hidden from the
/// storefront listing by the client-side filter pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    #[default]
    Active,
    Inactive,
}

impl std::fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Inactive => write!(f, "inactive"),
        }
    }
}

impl std::str::FromStr for ProductStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            _ => Err(format!("invalid product status: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_wire_format() {
        for status in [ProductStatus::Active, ProductStatus::Inactive] {
            let parsed: ProductStatus = status.to_string().parse().expect("round-trip");
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn default_is_active() {
        assert_eq!(ProductStatus::default(), ProductStatus::Active);
    }
}
