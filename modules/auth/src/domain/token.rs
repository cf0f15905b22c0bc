use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use super::error::AuthError;
use super::model::PrincipalKind;

/// Whether a token grants API access or only the right to mint a new pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Signed token payload.
///
/// The routing claims (`tenant_id`, `store_locator`, `tenant_name`) let the
/// validator reach the right tenant database without a control-plane lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub role: String,
    pub variant: PrincipalKind,
    pub is_supervisor: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_record_id: Option<i64>,
    pub tenant_id: i64,
    pub store_locator: String,
    pub tenant_name: String,
    pub token_use: TokenKind,
    pub iat: i64,
    pub exp: i64,
}

/// HS256 encoder/decoder around a shared secret.
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    #[must_use]
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // The session-freshness math below needs exact timestamps.
        validation.leeway = 0;
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// # Errors
    /// Returns [`AuthError::Infrastructure`] when signing fails.
    pub fn encode(&self, claims: &Claims) -> Result<String, AuthError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding).map_err(AuthError::infra)
    }

    /// Verify signature and expiry, returning the claims.
    ///
    /// # Errors
    /// Returns [`AuthError::InvalidToken`] for any token that does not
    /// verify, expired ones included. Session-lifetime expiry is a separate
    /// concern decided against the account's activity stamp, not here.
    pub fn decode(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|_| AuthError::InvalidToken)
    }
}
