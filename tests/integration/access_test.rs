use axum::http::{header, Method, StatusCode};
use serde_json::json;
use tripclub::{models::role::Role, services::jwt_service::Claims};

use crate::common::{request, setup, DESIGNER_EMAIL, READ_ONLY_EMAIL};

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let app = setup().await;

    let (status, body) = app
        .send(request(Method::GET, "/api/v1/members", None, None))
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_invalid_token_clears_cookie() {
    let app = setup().await;

    let invalid = axum::http::Request::builder()
        .uri("/api/v1/members")
        .header(header::COOKIE, "token=not-a-jwt")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = tower::ServiceExt::oneshot(app.router.clone(), invalid)
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(cookie.starts_with("token=;"), "{}", cookie);
    assert!(cookie.contains("Max-Age=0"), "{}", cookie);
}

#[tokio::test]
async fn test_read_only_can_read_but_not_write() {
    let app = setup().await;
    let token = app.token(READ_ONLY_EMAIL, Role::ReadOnly);

    let (status, _) = app.get("/api/v1/members", &token).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .post(
            "/api/v1/members",
            &token,
            json!({"name": "Ana", "address": "Rua 1", "number": "912345678"}),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "FORBIDDEN");

    let (status, _) = app.delete("/api/v1/fees/1", &token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_designer_only_sees_trips() {
    let app = setup().await;
    let token = app.token(DESIGNER_EMAIL, Role::Designer);

    let (status, _) = app.get("/api/v1/trips", &token).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.get("/api/v1/members", &token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.get("/api/v1/fees", &token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Selection lists only need a session
    let (status, _) = app.get("/api/v1/members/basic-info", &token).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_only_administrators_manage_trip_types() {
    let app = setup().await;
    let body = json!({"code": "SCHOOL", "name": "Escola"});

    let (status, _) = app
        .post("/api/v1/trip-types", &app.manager_token(), body.clone())
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.get("/api/v1/trip-types", &app.manager_token()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .post("/api/v1/trip-types", &app.admin_token(), body)
        .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_expired_token_is_rejected() {
    let app = setup().await;

    let now = time::OffsetDateTime::now_utc().unix_timestamp();
    let claims = Claims {
        sub: crate::common::MANAGER_EMAIL.to_string(),
        role: Role::Manager.as_str().to_string(),
        iat: now - 7200,
        exp: now - 3600,
    };
    let token = jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(app.state.config.auth.jwt_secret.as_bytes()),
    )
    .unwrap();

    let (status, body) = app.get("/api/v1/members", &token).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "TOKEN_EXPIRED");
}
