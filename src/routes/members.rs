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
        member::{
            CreateMemberRequest, ListMembersQuery, MemberList, MemberResponse, MembersByYear,
            UpdateMemberRequest,
        },
        role::{Action, Resource},
    },
};

pub fn routes() -> Router<AppState> {
    let read = Router::new()
        .route("/members", get(list_members))
        .route("/members/dashboard", get(members_dashboard))
        .route("/members/{id}", get(get_member));
    let create = Router::new().route("/members", post(create_member));
    let update = Router::new().route("/members/{id}", put(update_member));
    let remove = Router::new().route("/members/{id}", delete(delete_member));

    Router::new()
        .merge(gated(read, Resource::Member, Action::Read))
        .merge(gated(create, Resource::Member, Action::Create))
        .merge(gated(update, Resource::Member, Action::Update))
        .merge(gated(remove, Resource::Member, Action::Delete))
        // Selection lists only need a session
        .route("/members/basic-info", get(member_basic_info))
}

/// GET /api/v1/members
#[instrument(skip(state))]
pub async fn list_members(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ListMembersQuery>,
) -> Result<Json<SuccessResponse<MemberList>>> {
    query.validate()?;

    let page = PageRequest::resolve(query.skip, query.take, &state.config.pagination);
    let members = state
        .member_service
        .list(query.text.as_deref(), page)
        .await?;

    Ok(Json(SuccessResponse::new(members)))
}

/// GET /api/v1/members/basic-info
#[instrument(skip(state))]
pub async fn member_basic_info(
    State(state): State<AppState>,
) -> Result<Json<SuccessResponse<Vec<BasicInfo>>>> {
    let members = state.member_service.basic_info().await?;
    Ok(Json(SuccessResponse::new(members)))
}

/// GET /api/v1/members/dashboard
#[instrument(skip(state))]
pub async fn members_dashboard(
    State(state): State<AppState>,
) -> Result<Json<SuccessResponse<MembersByYear>>> {
    let by_year = state.member_service.new_members_by_year().await?;
    Ok(Json(SuccessResponse::new(by_year)))
}

/// GET /api/v1/members/{id}
#[instrument(skip(state))]
pub async fn get_member(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<SuccessResponse<MemberResponse>>> {
    let member = state.member_service.get(id).await?;
    Ok(Json(SuccessResponse::new(member)))
}

/// POST /api/v1/members
#[instrument(skip(state, request))]
pub async fn create_member(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreateMemberRequest>,
) -> Result<(StatusCode, Json<SuccessResponse<MemberResponse>>)> {
    request.validate()?;

    let member = state.member_service.create(request).await?;

    Ok((StatusCode::CREATED, Json(SuccessResponse::new(member))))
}

/// PUT /api/v1/members/{id}
#[instrument(skip(state, request))]
pub async fn update_member(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(request): AppJson<UpdateMemberRequest>,
) -> Result<Json<SuccessResponse<MemberResponse>>> {
    request.validate()?;

    let member = state.member_service.update(id, request).await?;

    Ok(Json(SuccessResponse::new(member)))
}

/// DELETE /api/v1/members/{id}
#[instrument(skip(state))]
pub async fn delete_member(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<SuccessResponse<MessageResponse>>> {
    state.member_service.delete(id).await?;

    Ok(Json(SuccessResponse::new(MessageResponse::new(format!(
        "Member {} deleted",
        id
    )))))
}
