use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use tracing::instrument;
use validator::Validate;

use super::gated;
use crate::{
    app_state::AppState,
    error::{AppJson, Result},
    models::{
        common::{MessageResponse, SuccessResponse},
        role::{Action, Resource},
        trip_type::{CreateTripTypeRequest, TripTypeResponse, UpdateTripTypeRequest},
    },
};

pub fn routes() -> Router<AppState> {
    let read = Router::new().route("/trip-types", get(list_trip_types));
    let create = Router::new().route("/trip-types", post(create_trip_type));
    let update = Router::new().route("/trip-types/{code}", put(update_trip_type));
    let remove = Router::new().route("/trip-types/{code}", delete(delete_trip_type));

    Router::new()
        .merge(gated(read, Resource::TripType, Action::Read))
        .merge(gated(create, Resource::TripType, Action::Create))
        .merge(gated(update, Resource::TripType, Action::Update))
        .merge(gated(remove, Resource::TripType, Action::Delete))
}

/// GET /api/v1/trip-types
#[instrument(skip(state))]
pub async fn list_trip_types(
    State(state): State<AppState>,
) -> Result<Json<SuccessResponse<Vec<TripTypeResponse>>>> {
    let trip_types = state.trip_type_service.list().await?;
    Ok(Json(SuccessResponse::new(trip_types)))
}

/// POST /api/v1/trip-types
#[instrument(skip(state, request))]
pub async fn create_trip_type(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreateTripTypeRequest>,
) -> Result<(StatusCode, Json<SuccessResponse<TripTypeResponse>>)> {
    request.validate()?;

    let trip_type = state.trip_type_service.create(request).await?;

    Ok((StatusCode::CREATED, Json(SuccessResponse::new(trip_type))))
}

/// PUT /api/v1/trip-types/{code}
#[instrument(skip(state, request))]
pub async fn update_trip_type(
    State(state): State<AppState>,
    Path(code): Path<String>,
    AppJson(request): AppJson<UpdateTripTypeRequest>,
) -> Result<Json<SuccessResponse<TripTypeResponse>>> {
    request.validate()?;

    let trip_type = state.trip_type_service.update(&code, request).await?;

    Ok(Json(SuccessResponse::new(trip_type)))
}

/// DELETE /api/v1/trip-types/{code}
#[instrument(skip(state))]
pub async fn delete_trip_type(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<SuccessResponse<MessageResponse>>> {
    state.trip_type_service.delete(&code).await?;

    Ok(Json(SuccessResponse::new(MessageResponse::new(format!(
        "Trip type {} deleted",
        code
    )))))
}
