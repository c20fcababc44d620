use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use serde_json::json;
use tower::ServiceExt;
use tripclub::{config::Environment, models::role::Role};

use crate::common::{
    request, setup, setup_with_config, test_config, MANAGER_EMAIL, PASSWORD,
};

fn login_request(email: &str, password: &str) -> Request<Body> {
    request(
        Method::POST,
        "/api/v1/users/login",
        None,
        Some(json!({"email": email, "password": password})),
    )
}

#[tokio::test]
async fn test_check_is_public() {
    let app = setup().await;

    let (status, body) = app
        .send(request(Method::GET, "/api/v1/users/check", None, None))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn test_login_sets_session_cookie() {
    let app = setup().await;

    let response = app
        .router
        .clone()
        .oneshot(login_request(MANAGER_EMAIL, PASSWORD))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("token="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("Path=/"));

    // The cookie alone authenticates
    let token_pair = cookie.split(';').next().unwrap().to_string();
    let me = Request::builder()
        .uri("/api/v1/users/me")
        .header(header::COOKIE, token_pair)
        .body(Body::empty())
        .unwrap();
    let (status, body) = app.send(me).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!({"name": "Manuela", "roleCode": "MANAGER"}));
}

#[tokio::test]
async fn test_login_body_has_no_token() {
    let app = setup().await;

    let (status, body) = app.send(login_request(MANAGER_EMAIL, PASSWORD)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Manuela");
    assert_eq!(body["data"]["expiresIn"], 3600);
    assert!(body["data"].get("token").is_none());
}

#[tokio::test]
async fn test_bad_credentials_are_unauthorized() {
    let app = setup().await;

    let (status, body) = app.send(login_request(MANAGER_EMAIL, "wrong")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");

    let (status, _) = app.send(login_request("nobody@club.pt", PASSWORD)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.send(login_request("not-an-email", PASSWORD)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_logout_clears_cookie() {
    let app = setup().await;
    let token = app.manager_token();

    let logout = Request::builder()
        .uri("/api/v1/users/logout")
        .header(header::COOKIE, format!("token={}", token))
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(logout).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap();
    assert!(cookie.starts_with("token=;"));
}

#[tokio::test]
async fn test_is_logged_in_requires_session() {
    let app = setup().await;

    let (status, _) = app
        .send(request(Method::GET, "/api/v1/users/is-logged-in", None, None))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app
        .get("/api/v1/users/is-logged-in", &app.manager_token())
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], true);
}

#[tokio::test]
async fn test_register_requires_user_create() {
    let app = setup().await;
    let body = json!({
        "email": "novo@club.pt",
        "name": "Novo",
        "password": "segredo",
        "roleCode": "READ_ONLY"
    });

    let (status, _) = app
        .post("/api/v1/users/register", &app.manager_token(), body.clone())
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, created) = app
        .post("/api/v1/users/register", &app.admin_token(), body.clone())
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["data"]["roleCode"], "READ_ONLY");
    assert!(created["data"].get("password").is_none());

    let (status, _) = app
        .post("/api/v1/users/register", &app.admin_token(), body)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app.send(login_request("novo@club.pt", "segredo")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_register_is_not_mounted_in_production() {
    let mut config = test_config();
    config.environment = Environment::Production;
    config.rate_limit.enabled = false;
    let app = setup_with_config(config).await;

    let (status, _) = app
        .post(
            "/api/v1/users/register",
            &app.admin_token(),
            json!({"email": "x@club.pt", "name": "X", "password": "p", "roleCode": "MANAGER"}),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_bootstrap_administrator_is_created_once() {
    let app = setup().await;
    let admin = tripclub::config::BootstrapAdminConfig {
        email: "root@club.pt".to_string(),
        name: "Root".to_string(),
        password: "bootstrap".to_string(),
    };

    app.state.user_service.ensure_administrator(&admin).await.unwrap();
    app.state.user_service.ensure_administrator(&admin).await.unwrap();

    let me = app
        .state
        .user_service
        .me("root@club.pt")
        .await
        .unwrap();
    assert_eq!(me.role_code, Role::Administrator.as_str());

    let (status, _) = app.send(login_request("root@club.pt", "bootstrap")).await;
    assert_eq!(status, StatusCode::OK);
}
