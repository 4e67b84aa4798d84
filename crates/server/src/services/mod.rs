//! Business services.

pub mod auth;
pub mod chat;
pub mod token;
