use crate::{
    config::AuthConfig,
    error::{ApiError, Result},
    models::role::Role,
};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use time::OffsetDateTime;

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user email)
    pub sub: String,
    /// Role code
    pub role: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
}

pub struct JWTService {
    config: Arc<AuthConfig>,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JWTService {
    pub fn new(config: Arc<AuthConfig>) -> Self {
        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Token lifetime in seconds
    pub fn expiration_seconds(&self) -> u64 {
        self.config.token_expiration_minutes * 60
    }

    /// Generate a signed HS256 token for a user
    pub fn generate_token(&self, email: &str, role: Role) -> Result<String> {
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let exp = now + self.expiration_seconds() as i64;

        let claims = Claims {
            sub: email.to_string(),
            role: role.as_str().to_string(),
            iat: now,
            exp,
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| ApiError::Internal(e.into()))?;

        Ok(token)
    }

    /// Validate and decode a JWT token
    pub fn validate_token(&self, token: &str) -> Result<Claims> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => ApiError::ExpiredToken,
                _ => ApiError::InvalidToken(e.to_string()),
            })?;

        Ok(token_data.claims)
    }

    /// Extract the role from claims
    pub fn role_from_claims(claims: &Claims) -> Result<Role> {
        Role::from_code(&claims.role)
            .ok_or_else(|| ApiError::InvalidToken(format!("Invalid role: {}", claims.role)))
    }
}
