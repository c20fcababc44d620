use entity::contact;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use validator::{Validate, ValidationError};

use super::common::{empty_string_as_none, trimmed};

/// Portuguese landline area codes (first three digits)
pub const LANDLINE_PREFIXES: [u16; 69] = [
    210, 211, 212, 213, 214, 215, 216, 217, 218, 219, 220, 221, 222, 223, 224, 225, 226, 227, 228,
    229, 231, 232, 233, 234, 235, 236, 238, 239, 241, 242, 243, 244, 245, 249, 251, 252, 253, 254,
    255, 256, 258, 259, 261, 262, 263, 265, 266, 268, 269, 271, 272, 273, 274, 275, 276, 277, 278,
    279, 281, 282, 283, 284, 285, 286, 289, 291, 292, 295, 296,
];

/// Mobile network prefixes (first two digits)
pub const MOBILE_PREFIXES: [u16; 4] = [91, 92, 93, 96];

fn nine_digit_prefix(value: &str, digits: usize) -> Option<u16> {
    if value.len() != 9 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value[..digits].parse().ok()
}

pub fn validate_mobile_number(value: &str) -> Result<(), ValidationError> {
    match nine_digit_prefix(value, 2) {
        Some(prefix) if MOBILE_PREFIXES.contains(&prefix) => Ok(()),
        _ => Err(ValidationError::new("mobile_number")
            .with_message("Invalid phone number.".into())),
    }
}

pub fn validate_landline_number(value: &str) -> Result<(), ValidationError> {
    match nine_digit_prefix(value, 3) {
        Some(prefix) if LANDLINE_PREFIXES.contains(&prefix) => Ok(()),
        _ => Err(ValidationError::new("landline_number")
            .with_message("Invalid landline phone.".into())),
    }
}

fn validate_has_phone(contact: &NewContact) -> Result<(), ValidationError> {
    if contact.number.is_none() && contact.landline_number.is_none() {
        return Err(ValidationError::new("phone_required")
            .with_message("Either number or landlineNumber is required.".into()));
    }
    Ok(())
}

/// Contact fields accepted when creating a member or non-member
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_has_phone"))]
pub struct NewContact {
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 1, max = 255))]
    pub address: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(custom(function = "validate_mobile_number"))]
    pub number: Option<String>,
    #[serde(default, alias = "landline_number", deserialize_with = "empty_string_as_none")]
    #[validate(custom(function = "validate_landline_number"))]
    pub landline_number: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(length(max = 255), email)]
    pub email: Option<String>,
}

/// Partial contact update; absent fields keep their value
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ContactChanges {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(length(max = 255))]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(custom(function = "validate_mobile_number"))]
    pub number: Option<String>,
    #[serde(default, alias = "landline_number", deserialize_with = "empty_string_as_none")]
    #[validate(custom(function = "validate_landline_number"))]
    pub landline_number: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(length(max = 255), email)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactResponse {
    pub id: i32,
    pub address: String,
    pub number: Option<String>,
    pub landline_number: Option<String>,
    pub email: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<contact::Model> for ContactResponse {
    fn from(model: contact::Model) -> Self {
        Self {
            id: model.id,
            address: model.address,
            number: model.number,
            landline_number: model.landline_number,
            email: model.email,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
