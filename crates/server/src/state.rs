//! Shared application state.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::ServerConfig;
use crate::services::token::TokenIssuer;
use crate::stream::StreamClient;

/// Shared state handed to every request handler.
///
/// Cheap to clone; all fields live behind one `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<Inner>,
}

struct Inner {
    config: ServerConfig,
    pool: PgPool,
    stream: StreamClient,
    tokens: TokenIssuer,
}

impl AppState {
    /// Assemble the state from its already-initialized parts.
    #[must_use]
    pub fn new(
        config: ServerConfig,
        pool: PgPool,
        stream: StreamClient,
        tokens: TokenIssuer,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                config,
                pool,
                stream,
                tokens,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    #[must_use]
    pub fn stream(&self) -> &StreamClient {
        &self.inner.stream
    }

    #[must_use]
    pub fn tokens(&self) -> &TokenIssuer {
        &self.inner.tokens
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", self.config())
            .finish_non_exhaustive()
    }
}
