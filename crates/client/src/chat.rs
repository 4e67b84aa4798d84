//! Support-chat connection lifecycle.
//!
//! One live chat connection per client. Concurrent connect calls are
//! serialized; a call that finds a live connection for the same user reuses
//! it instead of opening a second one. Transient failures retry with a
//! bounded linear backoff, rejections fail immediately.

use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{info, warn};

use loomline_core::{ChatCapabilities, Role, capabilities_for};

/// Default number of connection attempts before giving up.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default base delay between attempts; attempt N waits N times this.
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(500);

/// What a client needs to open a chat connection.
#[derive(Debug, Clone)]
pub struct ChatCredentials {
    /// The account id, which is also the chat-side user id.
    pub user_id: String,
    /// Chat token minted by the server.
    pub token: String,
    pub role: Role,
}

/// Chat connection failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConnectError {
    /// Transient failure; worth retrying.
    #[error("chat service unavailable: {0}")]
    Unavailable(String),

    /// The credentials were refused; retrying cannot help.
    #[error("chat connection rejected: {0}")]
    Rejected(String),
}

/// Opens raw chat connections. Implemented over the real chat SDK in the
/// application and over a stub in tests.
pub trait ChatConnector {
    type Handle: Clone + Send;

    fn connect(
        &self,
        credentials: &ChatCredentials,
    ) -> impl Future<Output = Result<Self::Handle, ConnectError>> + Send;
}

/// A live connection plus what the connected identity may do.
#[derive(Debug, Clone)]
pub struct ChatConnection<H> {
    pub handle: H,
    pub user_id: String,
    pub capabilities: ChatCapabilities,
}

/// Owns the single chat connection and its retry policy.
pub struct ChatConnectionManager<C: ChatConnector> {
    connector: C,
    max_attempts: u32,
    base_delay: Duration,
    state: Mutex<Option<ChatConnection<C::Handle>>>,
}

impl<C: ChatConnector> ChatConnectionManager<C> {
    /// Create a manager with the default retry policy.
    #[must_use]
    pub fn new(connector: C) -> Self {
        Self::with_policy(connector, DEFAULT_MAX_ATTEMPTS, DEFAULT_BASE_DELAY)
    }

    /// Create a manager with an explicit retry policy.
    ///
    /// `max_attempts` is clamped to at least one.
    #[must_use]
    pub fn with_policy(connector: C, max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            connector,
            max_attempts: max_attempts.max(1),
            base_delay,
            state: Mutex::new(None),
        }
    }

    /// Connect, or reuse the live connection if it belongs to the same user.
    ///
    /// Connecting as a different user drops the old connection first.
    ///
    /// # Errors
    ///
    /// Returns the last [`ConnectError`] once transient retries are
    /// exhausted, or immediately on [`ConnectError::Rejected`].
    pub async fn connect(
        &self,
        credentials: &ChatCredentials,
    ) -> Result<ChatConnection<C::Handle>, ConnectError> {
        // Holding the lock across the attempt serializes concurrent callers;
        // the second caller finds the first one's connection and reuses it.
        let mut state = self.state.lock().await;

        if let Some(connection) = state.as_ref() {
            if connection.user_id == credentials.user_id {
                return Ok(connection.clone());
            }
            info!(
                old = %connection.user_id,
                new = %credentials.user_id,
                "Switching chat user, dropping old connection"
            );
            *state = None;
        }

        let handle = self.connect_with_retry(credentials).await?;
        let connection = ChatConnection {
            handle,
            user_id: credentials.user_id.clone(),
            capabilities: capabilities_for(credentials.role),
        };
        *state = Some(connection.clone());
        Ok(connection)
    }

    /// Drop the live connection, if any.
    pub async fn disconnect(&self) {
        let mut state = self.state.lock().await;
        if state.take().is_some() {
            info!("Chat connection closed");
        }
    }

    /// Whether a connection is currently live.
    pub async fn is_connected(&self) -> bool {
        self.state.lock().await.is_some()
    }

    async fn connect_with_retry(
        &self,
        credentials: &ChatCredentials,
    ) -> Result<C::Handle, ConnectError> {
        let mut attempt = 1;
        loop {
            match self.connector.connect(credentials).await {
                Ok(handle) => {
                    info!(user_id = %credentials.user_id, attempt, "Chat connected");
                    return Ok(handle);
                }
                Err(e @ ConnectError::Rejected(_)) => return Err(e),
                Err(e) if attempt >= self.max_attempts => {
                    warn!(user_id = %credentials.user_id, attempt, error = %e, "Chat connection failed, giving up");
                    return Err(e);
                }
                Err(e) => {
                    let delay = self.base_delay * attempt;
                    warn!(user_id = %credentials.user_id, attempt, error = %e, delay_ms = delay.as_millis() as u64, "Chat connection failed, retrying");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Connector that fails a configured number of times, then succeeds.
    struct FlakyConnector {
        failures: u32,
        calls: Arc<AtomicU32>,
        reject: bool,
    }

    impl FlakyConnector {
        fn new(failures: u32) -> Self {
            Self {
                failures,
                calls: Arc::new(AtomicU32::new(0)),
                reject: false,
            }
        }

        fn rejecting() -> Self {
            Self {
                failures: u32::MAX,
                calls: Arc::new(AtomicU32::new(0)),
                reject: true,
            }
        }

        fn calls(&self) -> Arc<AtomicU32> {
            Arc::clone(&self.calls)
        }
    }

    impl ChatConnector for FlakyConnector {
        type Handle = u32;

        async fn connect(
            &self,
            _credentials: &ChatCredentials,
        ) -> Result<Self::Handle, ConnectError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if self.reject {
                return Err(ConnectError::Rejected("bad token".to_string()));
            }
            if call <= self.failures {
                return Err(ConnectError::Unavailable("connection reset".to_string()));
            }
            Ok(call)
        }
    }

    fn credentials(user_id: &str, role: Role) -> ChatCredentials {
        ChatCredentials {
            user_id: user_id.to_string(),
            token: "chat-token".to_string(),
            role,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn transient_failures_are_retried() {
        let connector = FlakyConnector::new(2);
        let calls = connector.calls();
        let manager = ChatConnectionManager::new(connector);

        let connection = manager
            .connect(&credentials("u1", Role::User))
            .await
            .expect("connect");

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(connection.user_id, "u1");
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_after_max_attempts() {
        let connector = FlakyConnector::new(u32::MAX);
        let calls = connector.calls();
        let manager = ChatConnectionManager::with_policy(
            connector,
            3,
            Duration::from_millis(100),
        );

        let result = manager.connect(&credentials("u1", Role::User)).await;
        assert!(matches!(result, Err(ConnectError::Unavailable(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert!(!manager.is_connected().await);
    }

    #[tokio::test(start_paused = true)]
    async fn rejection_fails_without_retry() {
        let connector = FlakyConnector::rejecting();
        let calls = connector.calls();
        let manager = ChatConnectionManager::new(connector);

        let result = manager.connect(&credentials("u1", Role::User)).await;
        assert!(matches!(result, Err(ConnectError::Rejected(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn same_user_reuses_the_live_connection() {
        let connector = FlakyConnector::new(0);
        let calls = connector.calls();
        let manager = ChatConnectionManager::new(connector);

        let first = manager
            .connect(&credentials("u1", Role::User))
            .await
            .expect("connect");
        let second = manager
            .connect(&credentials("u1", Role::User))
            .await
            .expect("connect");

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(first.handle, second.handle);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_connects_share_one_attempt() {
        let connector = FlakyConnector::new(0);
        let calls = connector.calls();
        let manager = ChatConnectionManager::new(connector);

        let creds = credentials("u1", Role::User);
        let (a, b) = tokio::join!(manager.connect(&creds), manager.connect(&creds));

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(a.expect("connect").handle, b.expect("connect").handle);
    }

    #[tokio::test(start_paused = true)]
    async fn switching_user_opens_a_new_connection() {
        let connector = FlakyConnector::new(0);
        let calls = connector.calls();
        let manager = ChatConnectionManager::new(connector);

        manager
            .connect(&credentials("u1", Role::User))
            .await
            .expect("connect");
        let second = manager
            .connect(&credentials("u2", Role::User))
            .await
            .expect("connect");

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(second.user_id, "u2");
    }

    #[tokio::test(start_paused = true)]
    async fn capabilities_follow_the_role() {
        let manager = ChatConnectionManager::new(FlakyConnector::new(0));

        let connection = manager
            .connect(&credentials("admin-1", Role::Admin))
            .await
            .expect("connect");

        assert!(connection.capabilities.create_channel);
        assert!(connection.capabilities.read_channel);
    }

    #[tokio::test(start_paused = true)]
    async fn disconnect_clears_the_connection() {
        let connector = FlakyConnector::new(0);
        let calls = connector.calls();
        let manager = ChatConnectionManager::new(connector);

        manager
            .connect(&credentials("u1", Role::User))
            .await
            .expect("connect");
        manager.disconnect().await;
        assert!(!manager.is_connected().await);

        manager
            .connect(&credentials("u1", Role::User))
            .await
            .expect("connect");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
