use axum::http::StatusCode;
use serde_json::json;
use tripclub::utils::date::current_year;

use crate::common::{setup, TestApp};

async fn pay(app: &TestApp, member_id: i64, year: i32) -> (StatusCode, serde_json::Value) {
    app.post(
        "/api/v1/fees",
        &app.manager_token(),
        json!({"year": year, "paidAmount": 15, "memberId": member_id}),
    )
    .await
}

#[tokio::test]
async fn test_create_fee_reports_schedule() {
    let app = setup().await;
    let id = app.create_member("Ana Sousa").await;
    let year = current_year();

    let (status, body) = pay(&app, id, year - 2).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["feesOnSchedule"], false);
    assert_eq!(body["data"]["member"]["name"], "Ana Sousa");

    let (status, body) = pay(&app, id, year - 1).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["feesOnSchedule"], true);
}

#[tokio::test]
async fn test_duplicate_fee_year_is_rejected() {
    let app = setup().await;
    let id = app.create_member("Ana Sousa").await;

    let (status, _) = pay(&app, id, 2022).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = pay(&app, id, 2022).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "CONFLICT");
}

#[tokio::test]
async fn test_fee_for_unknown_member_is_not_found() {
    let app = setup().await;

    let (status, _) = pay(&app, 42, 2022).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_fee_validation() {
    let app = setup().await;
    let id = app.create_member("Ana Sousa").await;
    let token = app.manager_token();

    for body in [
        json!({"year": 2013, "paidAmount": 15, "memberId": id}),
        json!({"year": 2100, "paidAmount": 15, "memberId": id}),
        json!({"year": 2022, "paidAmount": 0, "memberId": id}),
        json!({"year": 2022, "paidAmount": 15, "memberId": 0}),
    ] {
        let (status, response) = app.post("/api/v1/fees", &token, body.clone()).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{}", body);
        assert_eq!(response["error"]["code"], "VALIDATION_ERROR");
    }
}

#[tokio::test]
async fn test_update_fee_checks_duplicates_and_existence() {
    let app = setup().await;
    let id = app.create_member("Ana Sousa").await;
    let token = app.manager_token();

    pay(&app, id, 2021).await;
    let (_, body) = pay(&app, id, 2022).await;
    let fee_id = body["data"]["id"].as_i64().unwrap();

    // Keeping its own year is fine
    let (status, body) = app
        .put(
            &format!("/api/v1/fees/{}", fee_id),
            &token,
            json!({"year": 2022, "paidAmount": 20, "memberId": id}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["paidAmount"].as_f64(), Some(20.0));

    let (status, _) = app
        .put(
            &format!("/api/v1/fees/{}", fee_id),
            &token,
            json!({"year": 2021, "paidAmount": 20, "memberId": id}),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app
        .put(
            "/api/v1/fees/999",
            &token,
            json!({"year": 2023, "paidAmount": 20, "memberId": id}),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .put(
            &format!("/api/v1/fees/{}", fee_id),
            &token,
            json!({"year": 2023, "paidAmount": 20, "memberId": 999}),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_filters_on_schedule_status() {
    let app = setup().await;
    let year = current_year();
    let token = app.manager_token();

    let on_schedule = app.create_member("Ana Sousa").await;
    pay(&app, on_schedule, year - 2).await;
    pay(&app, on_schedule, year - 1).await;

    let behind = app.create_member("Bruno Costa").await;
    pay(&app, behind, year - 3).await;
    pay(&app, behind, year - 1).await;

    let (status, body) = app.get("/api/v1/fees", &token).await;
    assert_eq!(status, StatusCode::OK);
    let fees = body["data"].as_array().unwrap();
    assert_eq!(fees.len(), 4);
    // Ordered by member name, then year
    assert_eq!(fees[0]["member"]["name"], "Ana Sousa");
    assert_eq!(fees[0]["year"], year - 2);
    assert_eq!(fees[2]["member"]["name"], "Bruno Costa");
    assert_eq!(fees[2]["year"], year - 3);

    let (_, body) = app
        .get("/api/v1/fees?showFeesMissingSchedule=true", &token)
        .await;
    let fees = body["data"].as_array().unwrap();
    assert_eq!(fees.len(), 2);
    assert!(fees.iter().all(|f| f["memberId"] == behind));

    let (_, body) = app.get("/api/v1/fees?showFeesOnSchedule=true", &token).await;
    let fees = body["data"].as_array().unwrap();
    assert_eq!(fees.len(), 2);
    assert!(fees.iter().all(|f| f["memberId"] == on_schedule));

    let (_, body) = app.get("/api/v1/fees?memberName=bruno", &token).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_delete_fee() {
    let app = setup().await;
    let id = app.create_member("Ana Sousa").await;
    let (_, body) = pay(&app, id, 2022).await;
    let fee_id = body["data"]["id"].as_i64().unwrap();
    let token = app.manager_token();

    let (status, _) = app.delete(&format!("/api/v1/fees/{}", fee_id), &token).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.delete(&format!("/api/v1/fees/{}", fee_id), &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
