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
        common::{MessageResponse, SuccessResponse},
        fee::{FeeRequest, FeeResponse, ListFeesQuery},
        role::{Action, Resource},
    },
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(gated(
            Router::new().route("/fees", get(list_fees)),
            Resource::Fee,
            Action::Read,
        ))
        .merge(gated(
            Router::new().route("/fees", post(create_fee)),
            Resource::Fee,
            Action::Create,
        ))
        .merge(gated(
            Router::new().route("/fees/{id}", put(update_fee)),
            Resource::Fee,
            Action::Update,
        ))
        .merge(gated(
            Router::new().route("/fees/{id}", delete(delete_fee)),
            Resource::Fee,
            Action::Delete,
        ))
}

/// GET /api/v1/fees
#[instrument(skip(state))]
pub async fn list_fees(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ListFeesQuery>,
) -> Result<Json<SuccessResponse<Vec<FeeResponse>>>> {
    query.validate()?;

    let fees = state.fee_service.list(&query).await?;

    Ok(Json(SuccessResponse::new(fees)))
}

/// POST /api/v1/fees
#[instrument(skip(state, request))]
pub async fn create_fee(
    State(state): State<AppState>,
    AppJson(request): AppJson<FeeRequest>,
) -> Result<(StatusCode, Json<SuccessResponse<FeeResponse>>)> {
    request.validate()?;

    let fee = state.fee_service.create(request).await?;

    Ok((StatusCode::CREATED, Json(SuccessResponse::new(fee))))
}

/// PUT /api/v1/fees/{id}
#[instrument(skip(state, request))]
pub async fn update_fee(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(request): AppJson<FeeRequest>,
) -> Result<Json<SuccessResponse<FeeResponse>>> {
    request.validate()?;

    let fee = state.fee_service.update(id, request).await?;

    Ok(Json(SuccessResponse::new(fee)))
}

/// DELETE /api/v1/fees/{id}
#[instrument(skip(state))]
pub async fn delete_fee(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<SuccessResponse<MessageResponse>>> {
    state.fee_service.delete(id).await?;

    Ok(Json(SuccessResponse::new(MessageResponse::new(format!(
        "Fee {} deleted",
        id
    )))))
}
