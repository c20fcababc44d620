use crate::{
    app_state::AppState,
    config::AuthConfig,
    error::ApiError,
    models::role::Role,
    services::jwt_service::JWTService,
};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

/// Name of the cookie holding the session token
pub const TOKEN_COOKIE: &str = "token";

/// Request extension storing verified user identity from JWT
#[derive(Debug, Clone)]
pub struct UserIdentity {
    pub email: String,
    pub role: Role,
}

/// Session cookie carrying a freshly issued token
pub fn session_cookie(token: String, config: &AuthConfig) -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE, token))
        .http_only(true)
        .path("/")
        .secure(config.secure_cookie)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::minutes(config.token_expiration_minutes as i64))
        .build()
}

/// Cookie matching the session cookie's path, used to remove it
pub fn removal_cookie() -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE, "")).path("/").build()
}

/// JWT authentication middleware
///
/// Reads the token from the `token` cookie, falling back to an
/// `Authorization: Bearer` header, validates it and stores the verified
/// identity in request extensions.
///
/// Returns 401 Unauthorized when no token is present or validation fails;
/// an invalid or expired token also clears the cookie.
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let token = match extract_token(&jar, &request) {
        Some(token) => token,
        None => {
            return ApiError::Unauthorized("Missing authentication token".to_string())
                .into_response()
        }
    };

    let identity = match verify(&state.jwt_service, &token) {
        Ok(identity) => identity,
        Err(err) => {
            tracing::debug!("Rejected token: {}", err);
            return (jar.remove(removal_cookie()), err).into_response();
        }
    };

    request.extensions_mut().insert(identity);

    next.run(request).await
}

fn extract_token(jar: &CookieJar, request: &Request) -> Option<String> {
    if let Some(cookie) = jar.get(TOKEN_COOKIE) {
        if !cookie.value().is_empty() {
            return Some(cookie.value().to_string());
        }
    }

    request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string)
}

fn verify(jwt_service: &JWTService, token: &str) -> Result<UserIdentity, ApiError> {
    let claims = jwt_service.validate_token(token)?;
    let role = JWTService::role_from_claims(&claims)?;

    Ok(UserIdentity {
        email: claims.sub,
        role,
    })
}

/// Axum extractor for user identity
///
/// Only works on routes protected by jwt_auth_middleware.
impl<S> FromRequestParts<S> for UserIdentity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<UserIdentity>()
            .cloned()
            .ok_or_else(|| ApiError::Unauthorized("User is not authenticated".to_string()))
    }
}
