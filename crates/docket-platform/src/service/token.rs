//! Session Token Service
//!
//! HS256 JWTs binding an account id to an access kind. Tokens carry no
//! expiry; a session ends when its entry is removed from the account or
//! rotated out.

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::ACCESS_AUTH;
use crate::error::{DocketError, Result};

/// Claims embedded in every session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Account id
    #[serde(rename = "_id")]
    pub account_id: String,

    /// Access kind, always [`ACCESS_AUTH`] for login sessions
    pub access: String,

    /// Issued at (Unix epoch seconds)
    pub iat: i64,

    /// Unique token id; keeps two tokens issued in the same second distinct
    pub jti: String,
}

#[derive(Clone)]
pub struct TokenConfig {
    /// Symmetric signing secret, supplied by deployment configuration
    pub secret: String,
}

impl TokenConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self { secret: secret.into() }
    }
}

#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenService {
    pub fn new(config: TokenConfig) -> Result<Self> {
        if config.secret.is_empty() {
            return Err(DocketError::configuration("token signing secret must not be empty"));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.required_spec_claims.clear();
        validation.validate_exp = false;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
        })
    }

    /// Sign a login session token for `account_id`
    pub fn sign(&self, account_id: &str) -> Result<String> {
        let claims = SessionClaims {
            account_id: account_id.to_string(),
            access: ACCESS_AUTH.to_string(),
            iat: Utc::now().timestamp(),
            jti: Uuid::new_v4().to_string(),
        };
        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?)
    }

    /// Check the signature and access kind. Touches no storage.
    pub fn verify(&self, token: &str) -> Result<SessionClaims> {
        let data = decode::<SessionClaims>(token, &self.decoding_key, &self.validation)?;
        if data.claims.access != ACCESS_AUTH {
            return Err(DocketError::token(format!(
                "unexpected access kind '{}'",
                data.claims.access
            )));
        }
        Ok(data.claims)
    }
}
