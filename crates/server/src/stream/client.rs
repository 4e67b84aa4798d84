//! Stream Chat REST client.
//!
//! Server-to-Stream calls authenticate with a long-lived server JWT
//! (`{"server": true}` signed with the app secret) plus the
//! `stream-auth-type: jwt` header; the API key rides as a query parameter.

use std::collections::HashMap;

use jsonwebtoken::{EncodingKey, Header};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::{debug, instrument};

use super::error::StreamError;
use super::types::{
    AddMembersRequest, ChannelData, ChannelState, CreateChannelRequest, QueryChannelsRequest,
    QueryChannelsResponse, StreamApiError, StreamUser, UpsertUsersRequest,
};

/// Stream Chat API base URL.
const STREAM_API_BASE: &str = "https://chat.stream-io-api.com";

/// Channel type used for support conversations.
const CHANNEL_TYPE: &str = "messaging";

/// Stream Chat API client.
#[derive(Clone)]
pub struct StreamClient {
    http: Client,
    api_key: String,
    api_secret: SecretString,
    /// Pre-signed server token, minted once at construction.
    server_token: String,
}

impl std::fmt::Debug for StreamClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamClient")
            .field("api_key", &self.api_key)
            .field("api_secret", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

#[derive(Serialize)]
struct ServerClaims {
    server: bool,
}

#[derive(Serialize)]
struct UserClaims {
    user_id: String,
}

impl StreamClient {
    /// Create a new Stream client.
    ///
    /// # Errors
    ///
    /// Returns `StreamError::Token` if the server token cannot be signed.
    pub fn new(api_key: String, api_secret: SecretString) -> Result<Self, StreamError> {
        let server_token = sign(&api_secret, &ServerClaims { server: true })?;

        Ok(Self {
            http: Client::new(),
            api_key,
            api_secret,
            server_token,
        })
    }

    /// The public API key, safe to hand to browsers.
    #[must_use]
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Mint a user token for browser-side Stream connections.
    ///
    /// # Errors
    ///
    /// Returns `StreamError::Token` if signing fails.
    pub fn create_user_token(&self, user_id: &str) -> Result<String, StreamError> {
        sign(
            &self.api_secret,
            &UserClaims {
                user_id: user_id.to_string(),
            },
        )
    }

    /// Create or update users on the Stream side.
    ///
    /// Membership operations require the users to exist at Stream, and the
    /// role must be current for the capability grant to take effect.
    #[instrument(skip(self, users), fields(count = users.len()))]
    pub async fn upsert_users(&self, users: &[StreamUser]) -> Result<(), StreamError> {
        let body = UpsertUsersRequest {
            users: users
                .iter()
                .map(|u| (u.id.clone(), u.clone()))
                .collect::<HashMap<_, _>>(),
        };

        self.post::<_, serde_json::Value>("/users", &body).await?;
        Ok(())
    }

    /// Look up a channel by id. Returns `None` if it does not exist.
    #[instrument(skip(self), fields(channel_id = %channel_id))]
    pub async fn query_channel(
        &self,
        channel_id: &str,
    ) -> Result<Option<ChannelState>, StreamError> {
        let body = QueryChannelsRequest {
            filter_conditions: serde_json::json!({
                "id": channel_id,
                "type": CHANNEL_TYPE,
            }),
            limit: 1,
            state: true,
        };

        let response: QueryChannelsResponse = self.post("/channels", &body).await?;
        Ok(response.channels.into_iter().next().map(ChannelState::from))
    }

    /// Create a channel with an initial member set and support feature flags.
    #[instrument(skip(self, members), fields(channel_id = %channel_id, members = members.len()))]
    pub async fn create_channel(
        &self,
        channel_id: &str,
        name: &str,
        created_by_id: &str,
        members: &[String],
    ) -> Result<ChannelState, StreamError> {
        let body = CreateChannelRequest {
            data: ChannelData {
                name: name.to_string(),
                members: members.to_vec(),
                created_by_id: created_by_id.to_string(),
                typing_events: true,
                read_events: true,
                replies: true,
                reactions: true,
            },
            state: true,
        };

        let envelope: super::types::ChannelEnvelope = self
            .post(&format!("/channels/{CHANNEL_TYPE}/{channel_id}/query"), &body)
            .await?;

        debug!(cid = %envelope.channel.cid, "Support channel created");
        Ok(envelope.into())
    }

    /// Add members to an existing channel.
    #[instrument(skip(self, member_ids), fields(channel_id = %channel_id, adding = member_ids.len()))]
    pub async fn add_members(
        &self,
        channel_id: &str,
        member_ids: &[String],
    ) -> Result<(), StreamError> {
        if member_ids.is_empty() {
            return Ok(());
        }

        let body = AddMembersRequest {
            add_members: member_ids.to_vec(),
        };

        self.post::<_, serde_json::Value>(
            &format!("/channels/{CHANNEL_TYPE}/{channel_id}"),
            &body,
        )
        .await?;
        Ok(())
    }

    /// POST a JSON body and decode a JSON response, mapping Stream errors.
    async fn post<B: Serialize, R: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, StreamError> {
        let response = self
            .http
            .post(format!("{STREAM_API_BASE}{path}"))
            .query(&[("api_key", self.api_key.as_str())])
            .header("Authorization", &self.server_token)
            .header("stream-auth-type", "jwt")
            .json(body)
            .send()
            .await
            .map_err(|e| StreamError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let err: StreamApiError = response
                .json()
                .await
                .unwrap_or_else(|_| StreamApiError {
                    code: 0,
                    message: format!("HTTP {status}"),
                });
            return Err(StreamError::Api {
                code: err.code,
                message: err.message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| StreamError::Response(e.to_string()))
    }
}

/// Sign a claims payload with the app secret (HS256, no expiry - Stream
/// server and user tokens are long-lived).
fn sign<C: Serialize>(secret: &SecretString, claims: &C) -> Result<String, StreamError> {
    jsonwebtoken::encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.expose_secret().as_bytes()),
    )
    .map_err(|e| StreamError::Token(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> StreamClient {
        StreamClient::new(
            "key123".to_string(),
            SecretString::from("stream-secret-value".to_string()),
        )
        .expect("client")
    }

    #[test]
    fn user_tokens_differ_per_user() {
        let client = client();
        let a = client.create_user_token("user-a").expect("token");
        let b = client.create_user_token("user-b").expect("token");
        assert_ne!(a, b);
    }

    #[test]
    fn user_token_embeds_user_id() {
        use jsonwebtoken::{DecodingKey, Validation};

        let client = client();
        let token = client.create_user_token("abc-123").expect("token");

        let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        #[derive(serde::Deserialize)]
        struct Decoded {
            user_id: String,
        }

        let data = jsonwebtoken::decode::<Decoded>(
            &token,
            &DecodingKey::from_secret(b"stream-secret-value"),
            &validation,
        )
        .expect("decode");
        assert_eq!(data.claims.user_id, "abc-123");
    }

    #[test]
    fn debug_redacts_secret() {
        let output = format!("{:?}", client());
        assert!(output.contains("key123"));
        assert!(!output.contains("stream-secret-value"));
    }
}
