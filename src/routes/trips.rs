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
    error::{AppJson, AppQuery, Result},
    models::{
        common::{MessageResponse, PageRequest, SuccessResponse},
        role::{Action, Resource},
        trip::{
            CreateTripRequest, LastTripsQuery, ListTripsQuery, TripDashboardEntry, TripList,
            TripResponse, UpdateTripRequest,
        },
    },
};

pub fn routes() -> Router<AppState> {
    let read = Router::new()
        .route("/trips", get(list_trips))
        .route("/trips/last", get(last_trips))
        .route("/trips/dashboard", get(trips_dashboard));
    let create = Router::new().route("/trips", post(create_trip));
    let update = Router::new().route("/trips/{id}", put(update_trip));
    let remove = Router::new().route("/trips/{id}", delete(delete_trip));

    Router::new()
        .merge(gated(read, Resource::Trip, Action::Read))
        .merge(gated(create, Resource::Trip, Action::Create))
        .merge(gated(update, Resource::Trip, Action::Update))
        .merge(gated(remove, Resource::Trip, Action::Delete))
}

/// GET /api/v1/trips
#[instrument(skip(state))]
pub async fn list_trips(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ListTripsQuery>,
) -> Result<Json<SuccessResponse<TripList>>> {
    query.validate()?;

    let page = PageRequest::resolve(query.skip, query.take, &state.config.pagination);
    let trips = state.trip_service.list(&query, page).await?;

    Ok(Json(SuccessResponse::new(trips)))
}

/// GET /api/v1/trips/last
#[instrument(skip(state))]
pub async fn last_trips(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<LastTripsQuery>,
) -> Result<Json<SuccessResponse<Vec<TripResponse>>>> {
    query.validate()?;

    let trips = state.trip_service.last(query.take).await?;

    Ok(Json(SuccessResponse::new(trips)))
}

/// GET /api/v1/trips/dashboard
#[instrument(skip(state))]
pub async fn trips_dashboard(
    State(state): State<AppState>,
) -> Result<Json<SuccessResponse<Vec<TripDashboardEntry>>>> {
    let entries = state.trip_service.dashboard().await?;
    Ok(Json(SuccessResponse::new(entries)))
}

/// POST /api/v1/trips
#[instrument(skip(state, request))]
pub async fn create_trip(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreateTripRequest>,
) -> Result<(StatusCode, Json<SuccessResponse<TripResponse>>)> {
    request.validate()?;

    let trip = state.trip_service.create(request).await?;

    Ok((StatusCode::CREATED, Json(SuccessResponse::new(trip))))
}

/// PUT /api/v1/trips/{id}
#[instrument(skip(state, request))]
pub async fn update_trip(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(request): AppJson<UpdateTripRequest>,
) -> Result<Json<SuccessResponse<TripResponse>>> {
    request.validate()?;

    let trip = state.trip_service.update(id, request).await?;

    Ok(Json(SuccessResponse::new(trip)))
}

/// DELETE /api/v1/trips/{id}
#[instrument(skip(state))]
pub async fn delete_trip(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<SuccessResponse<MessageResponse>>> {
    state.trip_service.delete(id).await?;

    Ok(Json(SuccessResponse::new(MessageResponse::new(format!(
        "Trip {} deleted",
        id
    )))))
}
