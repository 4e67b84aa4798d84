//! Loomline storefront client library.
//!
//! Everything a storefront frontend needs that is not rendering: the cart
//! ([`cart::CartStore`]), catalog filtering and sorting ([`filters`]), a typed
//! API client ([`api::ApiClient`]), and the support-chat connection lifecycle
//! ([`chat::ChatConnectionManager`]).

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod chat;
pub mod filters;
pub mod types;

pub use api::{ApiClient, ApiClientError, AuthSession};
pub use cart::{CartItem, CartStore};
pub use chat::{ChatConnection, ChatConnectionManager, ChatConnector, ConnectError};
pub use filters::{ProductFilter, SortKey};
pub use types::{Product, ProductForm};
