//! Core types for Loomline.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod chat;
pub mod email;
pub mod id;
pub mod pricing;
pub mod role;
pub mod status;

pub use chat::{ChatCapabilities, capabilities_for, support_channel_id};
pub use email::{Email, EmailError};
pub use id::*;
pub use pricing::{DiscountPercent, DiscountPercentError, effective_price};
pub use role::Role;
pub use status::ProductStatus;
