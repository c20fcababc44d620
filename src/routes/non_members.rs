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
        common::{BasicInfo, MessageResponse, PageRequest, SuccessResponse},
        non_member::{
            CreateNonMemberRequest, ListNonMembersQuery, NonMemberList, NonMemberResponse,
            UpdateNonMemberRequest,
        },
        role::{Action, Resource},
    },
};

pub fn routes() -> Router<AppState> {
    let read = Router::new()
        .route("/non-members", get(list_non_members))
        .route("/non-members/basic-info", get(non_member_basic_info));
    let create = Router::new().route("/non-members", post(create_non_member));
    let update = Router::new().route("/non-members/{id}", put(update_non_member));
    let remove = Router::new().route("/non-members/{id}", delete(delete_non_member));

    Router::new()
        .merge(gated(read, Resource::NonMember, Action::Read))
        .merge(gated(create, Resource::NonMember, Action::Create))
        .merge(gated(update, Resource::NonMember, Action::Update))
        .merge(gated(remove, Resource::NonMember, Action::Delete))
}

/// GET /api/v1/non-members
#[instrument(skip(state))]
pub async fn list_non_members(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ListNonMembersQuery>,
) -> Result<Json<SuccessResponse<NonMemberList>>> {
    query.validate()?;

    let page = PageRequest::resolve(query.skip, query.take, &state.config.pagination);
    let non_members = state
        .non_member_service
        .list(query.text.as_deref(), page)
        .await?;

    Ok(Json(SuccessResponse::new(non_members)))
}

/// GET /api/v1/non-members/basic-info
#[instrument(skip(state))]
pub async fn non_member_basic_info(
    State(state): State<AppState>,
) -> Result<Json<SuccessResponse<Vec<BasicInfo>>>> {
    let non_members = state.non_member_service.basic_info().await?;
    Ok(Json(SuccessResponse::new(non_members)))
}

/// POST /api/v1/non-members
#[instrument(skip(state, request))]
pub async fn create_non_member(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreateNonMemberRequest>,
) -> Result<(StatusCode, Json<SuccessResponse<NonMemberResponse>>)> {
    request.validate()?;

    let non_member = state.non_member_service.create(request).await?;

    Ok((StatusCode::CREATED, Json(SuccessResponse::new(non_member))))
}

/// PUT /api/v1/non-members/{id}
#[instrument(skip(state, request))]
pub async fn update_non_member(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(request): AppJson<UpdateNonMemberRequest>,
) -> Result<Json<SuccessResponse<NonMemberResponse>>> {
    request.validate()?;

    let non_member = state.non_member_service.update(id, request).await?;

    Ok(Json(SuccessResponse::new(non_member)))
}

/// DELETE /api/v1/non-members/{id}
#[instrument(skip(state))]
pub async fn delete_non_member(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<SuccessResponse<MessageResponse>>> {
    state.non_member_service.delete(id).await?;

    Ok(Json(SuccessResponse::new(MessageResponse::new(format!(
        "Non-member {} deleted",
        id
    )))))
}
