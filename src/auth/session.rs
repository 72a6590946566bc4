//! Signed, expiring session tokens
//!
//! A session is an HS256 JWT carried in an HTTP-only cookie.

use crate::error::{BrieflyError, Result};
use crate::storage::User;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "session";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,      // User ID
    pub username: String,
    pub iat: i64,         // Issued at
    pub exp: i64,         // Expiration time
}

impl SessionClaims {
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}

/// Issues and verifies session tokens
#[derive(Clone)]
pub struct SessionManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_secs: i64,
}

impl SessionManager {
    pub fn new(secret: &str, ttl_secs: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl_secs,
        }
    }

    /// Sign a session for `user`
    pub fn issue(&self, user: &User) -> Result<String> {
        let now = chrono::Utc::now().timestamp();
        let claims = SessionClaims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            iat: now,
            exp: now + self.ttl_secs,
        };
        self.sign(&claims)
    }

    fn sign(&self, claims: &SessionClaims) -> Result<String> {
        Ok(encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)?)
    }

    /// Verify signature and expiry
    pub fn verify(&self, token: &str) -> Result<SessionClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let data = decode::<SessionClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| BrieflyError::Auth(format!("Invalid session: {}", e)))?;
        Ok(data.claims)
    }

    /// `Set-Cookie` value carrying `token`
    pub fn cookie(&self, token: &str) -> String {
        format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
            SESSION_COOKIE, token, self.ttl_secs
        )
    }

    /// `Set-Cookie` value that clears the session
    pub fn clear_cookie() -> String {
        format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", SESSION_COOKIE)
    }
}

/// Value of the session cookie in a `Cookie` header
pub fn token_from_cookie_header(header: &str) -> Option<&str> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}
