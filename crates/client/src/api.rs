//! Typed client for the Loomline REST API.

use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::instrument;

use loomline_core::ProductId;

use crate::types::{Product, ProductForm, User};

/// Errors from API access.
#[derive(Debug, Error)]
pub enum ApiClientError {
    /// The request could not be sent.
    #[error("request failed: {0}")]
    Request(String),

    /// The server answered with an error status.
    #[error("API error ({status}): {message}")]
    Api {
        status: StatusCode,
        /// The server's `message` field, or the raw body if it wasn't JSON.
        message: String,
    },

    /// The response body could not be decoded.
    #[error("invalid response: {0}")]
    Response(String),

    /// The operation needs a logged-in session.
    #[error("not logged in")]
    NotLoggedIn,
}

/// A logged-in session: the bearer token plus the account it belongs to.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct AuthSession {
    pub token: String,
    pub user: User,
}

#[derive(Serialize)]
struct RegisterBody<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct LoginBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(serde::Deserialize)]
struct MeEnvelope {
    user: User,
}

#[derive(serde::Deserialize)]
struct TokenEnvelope {
    token: String,
}

#[derive(serde::Deserialize)]
struct ChannelEnvelope {
    channel: String,
}

#[derive(serde::Deserialize)]
struct ErrorBody {
    message: String,
}

/// API client with an optional bearer token.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a client for a server base URL (no trailing slash needed).
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// Attach a bearer token for authenticated calls.
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    /// Drop the stored token.
    pub fn clear_token(&mut self) {
        self.token = None;
    }

    /// Whether a token is attached.
    #[must_use]
    pub const fn is_logged_in(&self) -> bool {
        self.token.is_some()
    }

    /// Register a new account and store its token.
    #[instrument(skip(self, password))]
    pub async fn register(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, ApiClientError> {
        let session: AuthSession = self
            .send(
                self.request(Method::POST, "/api/auth/register")
                    .json(&RegisterBody { name, email, password }),
            )
            .await?;
        self.token = Some(session.token.clone());
        Ok(session)
    }

    /// Log in and store the session token.
    #[instrument(skip(self, password))]
    pub async fn login(
        &mut self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, ApiClientError> {
        let session: AuthSession = self
            .send(
                self.request(Method::POST, "/api/auth/login")
                    .json(&LoginBody { email, password }),
            )
            .await?;
        self.token = Some(session.token.clone());
        Ok(session)
    }

    /// The account behind the stored token.
    pub async fn me(&self) -> Result<User, ApiClientError> {
        let envelope: MeEnvelope = self.send(self.authed(Method::GET, "/api/auth/me")?).await?;
        Ok(envelope.user)
    }

    /// The full catalog, newest first.
    pub async fn products(&self) -> Result<Vec<Product>, ApiClientError> {
        self.send(self.request(Method::GET, "/api/products")).await
    }

    /// One product by id.
    pub async fn product(&self, id: ProductId) -> Result<Product, ApiClientError> {
        self.send(self.request(Method::GET, &format!("/api/products/{id}")))
            .await
    }

    /// Create a product. Admin only.
    pub async fn create_product(&self, form: &ProductForm) -> Result<Product, ApiClientError> {
        self.send(self.authed(Method::POST, "/api/products")?.json(form))
            .await
    }

    /// Partially update a product; absent form fields are left unchanged.
    /// Admin only.
    pub async fn update_product(
        &self,
        id: ProductId,
        form: &ProductForm,
    ) -> Result<Product, ApiClientError> {
        self.send(
            self.authed(Method::PUT, &format!("/api/products/{id}"))?
                .json(form),
        )
        .await
    }

    /// Delete a product. Admin only.
    pub async fn delete_product(&self, id: ProductId) -> Result<(), ApiClientError> {
        let _: serde_json::Value = self
            .send(self.authed(Method::DELETE, &format!("/api/products/{id}"))?)
            .await?;
        Ok(())
    }

    /// All non-admin accounts, for the back-office. Admin only.
    pub async fn clients(&self) -> Result<Vec<User>, ApiClientError> {
        #[derive(serde::Deserialize)]
        struct ClientsEnvelope {
            clients: Vec<User>,
        }
        let envelope: ClientsEnvelope = self
            .send(self.authed(Method::GET, "/api/users/clients")?)
            .await?;
        Ok(envelope.clients)
    }

    /// A chat token for connecting to the support channel.
    pub async fn chat_token(&self) -> Result<String, ApiClientError> {
        let envelope: TokenEnvelope = self
            .send(self.authed(Method::GET, "/api/auth/chat-token")?)
            .await?;
        Ok(envelope.token)
    }

    /// The caller's support channel id, creating the channel if needed.
    pub async fn support_channel(&self) -> Result<String, ApiClientError> {
        let envelope: ChannelEnvelope = self
            .send(self.authed(Method::GET, "/api/chat/support-channel")?)
            .await?;
        Ok(envelope.channel)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, format!("{}{path}", self.base_url))
    }

    fn authed(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiClientError> {
        let token = self.token.as_deref().ok_or(ApiClientError::NotLoggedIn)?;
        Ok(self.request(method, path).bearer_auth(token))
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, ApiClientError> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiClientError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map_or(body, |parsed| parsed.message);
            return Err(ApiClientError::Api { status, message });
        }

        response
            .json()
            .await
            .map_err(|e| ApiClientError::Response(e.to_string()))
    }
}
