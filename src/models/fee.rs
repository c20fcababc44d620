use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use validator::{Validate, ValidationError};

use super::common::{empty_string_as_none, BasicInfo};

pub fn validate_positive_amount(value: &Decimal) -> Result<(), ValidationError> {
    if *value > Decimal::ZERO {
        return Ok(());
    }
    Err(ValidationError::new("positive_amount").with_message("Amount must be positive.".into()))
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ListFeesQuery {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(length(max = 255))]
    pub member_name: Option<String>,
    #[serde(default)]
    pub show_fees_missing_schedule: Option<bool>,
    #[serde(default)]
    pub show_fees_on_schedule: Option<bool>,
}

/// Body for both fee creation and fee update
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FeeRequest {
    #[validate(range(min = 2014, max = 2099))]
    pub year: i32,
    #[validate(custom(function = "validate_positive_amount"))]
    pub paid_amount: Decimal,
    #[validate(range(min = 1))]
    pub member_id: i32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeResponse {
    pub id: i32,
    pub year: i32,
    pub paid_amount: Decimal,
    pub member_id: i32,
    pub fees_on_schedule: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member: Option<BasicInfo>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl FeeResponse {
    pub fn new(
        fee: entity::fee::Model,
        member: Option<&entity::member::Model>,
        fees_on_schedule: bool,
    ) -> Self {
        Self {
            id: fee.id,
            year: fee.year,
            paid_amount: fee.paid_amount,
            member_id: fee.member_id,
            fees_on_schedule,
            member: member.map(|m| BasicInfo {
                id: m.id,
                name: m.name.clone(),
            }),
            created_at: fee.created_at,
            updated_at: fee.updated_at,
        }
    }
}
