use serde::{Deserialize, Serialize};
use validator::Validate;

use super::common::trimmed;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTripTypeRequest {
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 1, max = 255))]
    pub code: String,
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 1, max = 255))]
    pub name: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTripTypeRequest {
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 1, max = 255))]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripTypeResponse {
    pub code: String,
    pub name: String,
}

impl From<entity::trip_type::Model> for TripTypeResponse {
    fn from(model: entity::trip_type::Model) -> Self {
        Self {
            code: model.code,
            name: model.name,
        }
    }
}
