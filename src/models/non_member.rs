use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use validator::Validate;

use super::{
    common::{empty_string_as_none, trimmed},
    contact::{ContactChanges, ContactResponse, NewContact},
};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ListNonMembersQuery {
    pub skip: Option<u64>,
    #[validate(range(min = 1))]
    pub take: Option<u64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(length(max = 255))]
    pub text: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateNonMemberRequest {
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[serde(flatten)]
    #[validate(nested)]
    pub contact: NewContact,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNonMemberRequest {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(length(max = 255))]
    pub name: Option<String>,
    #[serde(flatten)]
    #[validate(nested)]
    pub contact: ContactChanges,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NonMemberResponse {
    pub id: i32,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<ContactResponse>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl NonMemberResponse {
    pub fn new(
        non_member: entity::non_member::Model,
        contact: Option<entity::contact::Model>,
    ) -> Self {
        Self {
            id: non_member.id,
            name: non_member.name,
            contact: contact.map(Into::into),
            created_at: non_member.created_at,
            updated_at: non_member.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NonMemberList {
    pub total_count: u64,
    pub non_members: Vec<NonMemberResponse>,
}
