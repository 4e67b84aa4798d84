//! Stream Chat server-side API client.
//!
//! Loomline does not implement message delivery, ordering, or persistence;
//! all of that lives inside Stream. This module only covers the server-side
//! surface the support workflow needs: user upserts, channel query/create,
//! membership changes, and user-token minting.

mod client;
mod error;
mod types;

pub use client::StreamClient;
pub use error::StreamError;
pub use types::{ChannelState, StreamUser};
