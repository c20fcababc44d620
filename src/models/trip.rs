use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::{macros::datetime, OffsetDateTime};
use validator::{Validate, ValidationError};

use super::{
    common::{empty_string_as_none, trimmed, BasicInfo},
    fee::validate_positive_amount,
    trip_type::TripTypeResponse,
};

const EARLIEST_TRIP_DATE: OffsetDateTime = datetime!(2014-01-01 0:00 UTC);
const LATEST_TRIP_DATE: OffsetDateTime = datetime!(2099-01-01 0:00 UTC);

pub fn validate_trip_date(value: &OffsetDateTime) -> Result<(), ValidationError> {
    if (EARLIEST_TRIP_DATE..=LATEST_TRIP_DATE).contains(value) {
        return Ok(());
    }
    Err(ValidationError::new("trip_date")
        .with_message("Date must be between 2014-01-01 and 2099-01-01.".into()))
}

// ============================================================================
// Request Models
// ============================================================================

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ListTripsQuery {
    pub skip: Option<u64>,
    #[validate(range(min = 1))]
    pub take: Option<u64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(length(max = 255))]
    pub text: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(length(max = 255))]
    pub trip_type_code: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub date_start: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub date_end: Option<OffsetDateTime>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LastTripsQuery {
    #[validate(range(min = 1, max = 100))]
    pub take: u64,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MemberBooking {
    #[validate(range(min = 1))]
    pub member_id: i32,
    #[validate(range(min = 1))]
    pub reserved_seats: i32,
    #[validate(custom(function = "validate_positive_amount"))]
    pub paid_amount: Decimal,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NonMemberBooking {
    #[validate(range(min = 1))]
    pub non_member_id: i32,
    #[validate(range(min = 1))]
    pub reserved_seats: i32,
    #[validate(custom(function = "validate_positive_amount"))]
    pub paid_amount: Decimal,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTripRequest {
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 1, max = 255))]
    pub trip_type_code: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(length(max = 255))]
    pub trip_poster_file_name: Option<String>,
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 1, max = 255))]
    pub destination: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(length(max = 255))]
    pub description: Option<String>,
    #[validate(range(min = 1))]
    pub total_seats: i32,
    #[serde(with = "time::serde::rfc3339")]
    #[validate(custom(function = "validate_trip_date"))]
    pub date: OffsetDateTime,
    #[serde(default, alias = "memberTrip")]
    #[validate(nested)]
    pub member_trips: Vec<MemberBooking>,
    #[serde(default, alias = "nonMemberTrip")]
    #[validate(nested)]
    pub non_member_trips: Vec<NonMemberBooking>,
}

/// Trip update. Booking lists replace the stored bookings; an absent list clears them.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTripRequest {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(length(max = 255))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(length(max = 255))]
    pub trip_type_code: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(length(max = 255))]
    pub trip_poster_file_name: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(length(max = 255))]
    pub destination: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(length(max = 255))]
    pub description: Option<String>,
    #[validate(range(min = 1))]
    pub total_seats: Option<i32>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    #[validate(custom(function = "validate_trip_date"))]
    pub date: Option<OffsetDateTime>,
    #[serde(default, alias = "memberTrip")]
    #[validate(nested)]
    pub member_trips: Vec<MemberBooking>,
    #[serde(default, alias = "nonMemberTrip")]
    #[validate(nested)]
    pub non_member_trips: Vec<NonMemberBooking>,
}

// ============================================================================
// Response Models
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripResponse {
    pub id: i32,
    pub name: String,
    pub trip_type: TripTypeResponse,
    pub trip_poster_file_name: Option<String>,
    pub destination: String,
    pub description: Option<String>,
    pub total_seats: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_trips: Option<Vec<MemberBookingResponse>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub non_member_trips: Option<Vec<NonMemberBookingResponse>>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl TripResponse {
    pub fn new(trip: entity::trip::Model, trip_type: TripTypeResponse) -> Self {
        Self {
            id: trip.id,
            name: trip.name,
            trip_type,
            trip_poster_file_name: trip.trip_poster_file_name,
            destination: trip.destination,
            description: trip.description,
            total_seats: trip.total_seats,
            date: trip.date,
            member_trips: None,
            non_member_trips: None,
            created_at: trip.created_at,
            updated_at: trip.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberBookingResponse {
    pub reserved_seats: i32,
    pub paid_amount: Decimal,
    pub member: BasicInfo,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NonMemberBookingResponse {
    pub reserved_seats: i32,
    pub paid_amount: Decimal,
    pub non_member: BasicInfo,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripList {
    pub total_count: u64,
    pub trips: Vec<TripResponse>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripDashboardEntry {
    pub name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    pub total_paid_amount: Decimal,
}
