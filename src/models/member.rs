use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use validator::Validate;

use super::{
    common::{empty_string_as_none, trimmed},
    contact::{ContactChanges, ContactResponse, NewContact},
    trip_type::TripTypeResponse,
};

// ============================================================================
// Request Models
// ============================================================================

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ListMembersQuery {
    pub skip: Option<u64>,
    #[validate(range(min = 1))]
    pub take: Option<u64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(length(max = 255))]
    pub text: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateMemberRequest {
    /// Membership number; the next free number is used when absent
    #[validate(range(min = 1))]
    pub id: Option<i32>,
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[serde(flatten)]
    #[validate(nested)]
    pub contact: NewContact,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMemberRequest {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(length(max = 255))]
    pub name: Option<String>,
    #[serde(flatten)]
    #[validate(nested)]
    pub contact: ContactChanges,
}

// ============================================================================
// Response Models
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberResponse {
    pub id: i32,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<ContactResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fees_on_schedule: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trip_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fees: Option<Vec<MemberFee>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_trips: Option<Vec<MemberTripSummary>>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl MemberResponse {
    pub fn new(member: entity::member::Model, contact: Option<entity::contact::Model>) -> Self {
        Self {
            id: member.id,
            name: member.name,
            contact: contact.map(Into::into),
            fees_on_schedule: None,
            trip_count: None,
            fees: None,
            member_trips: None,
            created_at: member.created_at,
            updated_at: member.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberList {
    pub total_count: u64,
    pub members: Vec<MemberResponse>,
}

/// Fee line inside a member detail
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberFee {
    pub id: i32,
    pub year: i32,
    pub paid_amount: Decimal,
}

/// Trip booked by a member, as shown in the member detail
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberTripSummary {
    pub reserved_seats: i32,
    pub paid_amount: Decimal,
    pub trip: TripSummary,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripSummary {
    pub id: i32,
    pub name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    pub trip_type: TripTypeResponse,
}

/// New members per creation year
pub type MembersByYear = BTreeMap<i32, u64>;
