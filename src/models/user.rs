use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use validator::{Validate, ValidationError};

use super::{common::trimmed, role::Role};

pub fn validate_role_code(value: &str) -> Result<(), ValidationError> {
    match Role::from_code(value) {
        Some(_) => Ok(()),
        None => Err(ValidationError::new("role_code").with_message("Unknown role.".into())),
    }
}

// ============================================================================
// Request Models
// ============================================================================

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(max = 100), email)]
    pub email: String,
    #[validate(length(min = 1, max = 255))]
    pub password: String,
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(max = 100), email)]
    pub email: String,
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 1, max = 255))]
    pub password: String,
    #[serde(deserialize_with = "trimmed")]
    #[validate(custom(function = "validate_role_code"))]
    pub role_code: String,
}

// ============================================================================
// Response Models
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub name: String,
    /// Token lifetime in seconds
    pub expires_in: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i32,
    pub email: String,
    pub name: String,
    pub role_code: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<entity::user::Model> for UserResponse {
    fn from(model: entity::user::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            name: model.name,
            role_code: model.role_code,
            created_at: model.created_at,
        }
    }
}

/// Response from /users/me
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub name: String,
    pub role_code: String,
}
