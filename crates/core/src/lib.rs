//! Loomline Core - Shared domain types.
//!
//! This crate provides common types used across all Loomline components:
//! - `server` - REST API for the storefront and admin back-office
//! - `client` - Storefront client library (cart, filters, chat connection)
//! - `cli` - Command-line tools for migrations and management
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP clients. This keeps it lightweight and allows it to be used
//! anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, roles, prices,
//!   and the chat capability table

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
