//! Identity-token issuance and verification.
//!
//! Tokens are stateless HS256 JWTs: `{sub, iat, exp}` signed with the server
//! secret. Validity is solely a function of signature and expiry - there is
//! no revocation list.

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use loomline_core::UserId;

/// Default token lifetime: 7 days.
pub const DEFAULT_TTL_SECS: u64 = 7 * 24 * 60 * 60;

/// Errors from token verification or issuance.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("token expired")]
    Expired,
    #[error("invalid signature")]
    Invalid,
    #[error("malformed token")]
    Malformed,
    #[error("signing failed: {0}")]
    Signing(String),
}

/// JWT claims payload.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// User ID (UUID string).
    sub: String,
    /// Issued-at (seconds since UNIX epoch).
    iat: u64,
    /// Expiration (seconds since UNIX epoch).
    exp: u64,
}

/// Issues and verifies identity tokens.
#[derive(Clone)]
pub struct TokenIssuer {
    secret: SecretString,
    ttl_secs: u64,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("secret", &"[REDACTED]")
            .field("ttl_secs", &self.ttl_secs)
            .finish()
    }
}

impl TokenIssuer {
    /// Create an issuer with the default 7-day lifetime.
    #[must_use]
    pub fn new(secret: SecretString) -> Self {
        Self::with_ttl(secret, DEFAULT_TTL_SECS)
    }

    /// Create an issuer with an explicit lifetime in seconds.
    #[must_use]
    pub const fn with_ttl(secret: SecretString, ttl_secs: u64) -> Self {
        Self { secret, ttl_secs }
    }

    /// Sign a token for a user.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Signing` if encoding fails.
    pub fn issue(&self, user_id: UserId) -> Result<String, TokenError> {
        let now = unix_now();
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now,
            exp: now + self.ttl_secs,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.expose_secret().as_bytes()),
        )
        .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verify a token and return the user it identifies.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Expired` for expired tokens,
    /// `TokenError::Invalid` for bad signatures, and
    /// `TokenError::Malformed` for anything else.
    pub fn verify(&self, token: &str) -> Result<UserId, TokenError> {
        let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.expose_secret().as_bytes()),
            &validation,
        )
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
            jsonwebtoken::errors::ErrorKind::InvalidSignature => TokenError::Invalid,
            _ => TokenError::Malformed,
        })?;

        data.claims
            .sub
            .parse::<UserId>()
            .map_err(|_| TokenError::Malformed)
    }
}

fn unix_now() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(SecretString::from(
            "test-signing-secret-0123456789abcdef".to_string(),
        ))
    }

    #[test]
    fn issue_then_verify_round_trips() {
        let issuer = issuer();
        let user_id = UserId::generate();
        let token = issuer.issue(user_id).expect("issue");
        assert_eq!(issuer.verify(&token).expect("verify"), user_id);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = issuer().issue(UserId::generate()).expect("issue");
        let other = TokenIssuer::new(SecretString::from(
            "different-signing-secret-0123456789".to_string(),
        ));
        assert!(matches!(other.verify(&token), Err(TokenError::Invalid)));
    }

    #[test]
    fn expired_token_is_rejected() {
        // Lifetime of zero and issued in the past beyond the default leeway.
        let issuer = TokenIssuer::with_ttl(
            SecretString::from("test-signing-secret-0123456789abcdef".to_string()),
            0,
        );
        let user_id = UserId::generate();

        // Build an already-expired token by hand to avoid sleeping.
        let now = unix_now();
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now - 600,
            exp: now - 300,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-signing-secret-0123456789abcdef"),
        )
        .expect("encode");

        assert!(matches!(issuer.verify(&token), Err(TokenError::Expired)));
    }

    #[test]
    fn garbage_is_malformed() {
        assert!(matches!(
            issuer().verify("not.a.jwt"),
            Err(TokenError::Malformed)
        ));
    }
}
