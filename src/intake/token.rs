//! Bound intake tokens.
//!
//! A token is a short-lived HS256 JWT embedding the requester's IP and a
//! salted, truncated hash of its user-agent. Verification recomputes both
//! from the presenting request and compares in constant time, so a token
//! only works from the client context that requested it even though it is
//! bearer-style. Tokens are stateless; there is no revocation list.

use std::time::Duration;

use axum::http::HeaderMap;
use hmac::{Hmac, Mac};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::error::TokenError;

/// Purpose marker distinguishing intake tokens from any other token class.
pub const TOKEN_TYPE: &str = "intake_token";

/// Fixed validity window.
pub const TOKEN_TTL: Duration = Duration::from_secs(10 * 60);

/// Length of the hex-encoded user-agent hash carried in claims.
const UA_HASH_LEN: usize = 16;

/// Claims embedded in an intake token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntakeClaims {
    /// Client address at issuance, derived from proxy headers.
    pub ip: String,
    /// Truncated salted hash of the client's user-agent.
    #[serde(rename = "uaHash")]
    pub ua_hash: String,
    /// Token purpose, always [`TOKEN_TYPE`] for valid tokens.
    #[serde(rename = "type")]
    pub token_type: String,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and verifies bound intake tokens with a shared secret.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    // Also used as the keyed-hash salt for the UA binding.
    secret: Vec<u8>,
    validation: Validation,
}

impl TokenService {
    pub fn new(secret: &SecretString) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        let mut validation = Validation::new(Algorithm::HS256);
        // The 10-minute window is exact; no clock leeway.
        validation.leeway = 0;
        Self {
            encoding_key: EncodingKey::from_secret(bytes),
            decoding_key: DecodingKey::from_secret(bytes),
            secret: bytes.to_vec(),
            validation,
        }
    }

    /// Salted one-way hash of a user-agent string, truncated for the claim.
    pub fn ua_hash(&self, user_agent: &str) -> String {
        let mut mac = Hmac::<Sha256>::new_from_slice(&self.secret)
            .expect("HMAC can take key of any size");
        mac.update(user_agent.as_bytes());
        let digest = hex::encode(mac.finalize().into_bytes());
        digest[..UA_HASH_LEN].to_string()
    }

    /// Issue a token bound to the given client context, valid for
    /// [`TOKEN_TTL`] from now.
    pub fn issue(&self, ip: &str, user_agent: &str) -> Result<String, TokenError> {
        let now = chrono::Utc::now().timestamp();
        let claims = IntakeClaims {
            ip: ip.to_string(),
            ua_hash: self.ua_hash(user_agent),
            token_type: TOKEN_TYPE.to_string(),
            iat: now,
            exp: now + TOKEN_TTL.as_secs() as i64,
        };
        self.sign(&claims)
    }

    fn sign(&self, claims: &IntakeClaims) -> Result<String, TokenError> {
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(TokenError::Signing)
    }

    /// Verify signature, expiry, binding, and purpose, in that order.
    pub fn verify(
        &self,
        token: &str,
        ip: &str,
        user_agent: &str,
    ) -> Result<IntakeClaims, TokenError> {
        let data = jsonwebtoken::decode::<IntakeClaims>(token, &self.decoding_key, &self.validation)
            .map_err(TokenError::Verification)?;
        let claims = data.claims;

        // Constant-time comparison of both binding components; evaluate both
        // before branching so a mismatch reveals nothing about which failed.
        let ip_ok = ct_eq(&claims.ip, ip);
        let ua_ok = ct_eq(&claims.ua_hash, &self.ua_hash(user_agent));
        if !(ip_ok & ua_ok) {
            return Err(TokenError::BindingMismatch);
        }

        if claims.token_type != TOKEN_TYPE {
            return Err(TokenError::WrongType);
        }

        Ok(claims)
    }
}

/// Constant-time string equality (length leaks, content does not).
fn ct_eq(a: &str, b: &str) -> bool {
    a.len() == b.len() && bool::from(a.as_bytes().ct_eq(b.as_bytes()))
}

/// Extract a bearer token from an `Authorization` header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, TokenError> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .filter(|t| !t.is_empty())
        .ok_or(TokenError::MissingHeader)
}
