use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{info, instrument};
use validator::Validate;

use super::gated;
use crate::{
    app_state::AppState,
    error::{AppJson, Result},
    middleware::{
        jwt_auth::{removal_cookie, session_cookie},
        UserIdentity,
    },
    models::{
        common::{MessageResponse, SuccessResponse},
        role::{Action, Resource},
        user::{LoginRequest, LoginResponse, MeResponse, RegisterRequest, UserResponse},
    },
};

/// Routes reachable without a session
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/users/check", get(check))
        .route("/users/login", post(login))
}

/// Routes requiring a session; registration is only mounted in development
pub fn session_routes(with_registration: bool) -> Router<AppState> {
    let router = Router::new()
        .route("/users/logout", get(logout))
        .route("/users/is-logged-in", get(is_logged_in))
        .route("/users/me", get(me));

    if !with_registration {
        return router;
    }

    router.merge(gated(
        Router::new().route("/users/register", post(register)),
        Resource::User,
        Action::Create,
    ))
}

/// GET /api/v1/users/check
pub async fn check() -> Json<SuccessResponse<MessageResponse>> {
    Json(SuccessResponse::new(MessageResponse::new("Service is running")))
}

/// POST /api/v1/users/login
#[instrument(skip(state, jar, request))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    AppJson(request): AppJson<LoginRequest>,
) -> Result<(CookieJar, Json<SuccessResponse<LoginResponse>>)> {
    request.validate()?;

    let (response, token) = state.user_service.login(request).await?;
    let jar = jar.add(session_cookie(token, &state.config.auth));

    Ok((jar, Json(SuccessResponse::new(response))))
}

/// GET /api/v1/users/logout
#[instrument(skip(jar, identity))]
pub async fn logout(
    identity: UserIdentity,
    jar: CookieJar,
) -> (CookieJar, Json<SuccessResponse<MessageResponse>>) {
    info!("User {} logged out", identity.email);

    (
        jar.remove(removal_cookie()),
        Json(SuccessResponse::new(MessageResponse::new("Logged out"))),
    )
}

/// GET /api/v1/users/is-logged-in
pub async fn is_logged_in(_identity: UserIdentity) -> Json<SuccessResponse<bool>> {
    Json(SuccessResponse::new(true))
}

/// GET /api/v1/users/me
#[instrument(skip(state, identity))]
pub async fn me(
    State(state): State<AppState>,
    identity: UserIdentity,
) -> Result<Json<SuccessResponse<MeResponse>>> {
    let me = state.user_service.me(&identity.email).await?;
    Ok(Json(SuccessResponse::new(me)))
}

/// POST /api/v1/users/register
#[instrument(skip(state, request))]
pub async fn register(
    State(state): State<AppState>,
    AppJson(request): AppJson<RegisterRequest>,
) -> Result<(StatusCode, Json<SuccessResponse<UserResponse>>)> {
    request.validate()?;

    let user = state.user_service.register(request).await?;

    Ok((StatusCode::CREATED, Json(SuccessResponse::new(user))))
}
