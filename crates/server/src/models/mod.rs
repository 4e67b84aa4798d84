//! Domain models.

pub mod product;
pub mod user;

pub use product::{NewProduct, Product, ProductPatch};
pub use user::{User, UserPublic};
