use axum::http::StatusCode;
use entity::{contact, fee, member_trip};
use sea_orm::{EntityTrait, PaginatorTrait};
use serde_json::json;
use tripclub::utils::date::current_year;

use crate::common::setup;

#[tokio::test]
async fn test_member_ids_follow_the_highest_number() {
    let app = setup().await;

    assert_eq!(app.create_member("Ana Sousa").await, 1);
    assert_eq!(app.create_member("Bruno Costa").await, 2);

    let (status, body) = app
        .post(
            "/api/v1/members",
            &app.manager_token(),
            json!({"id": 10, "name": "Carla Dias", "address": "Rua Nova 3", "number": "934567890"}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["id"], 10);

    assert_eq!(app.create_member("Duarte Lima").await, 11);
}

#[tokio::test]
async fn test_duplicate_member_id_is_a_conflict() {
    let app = setup().await;
    app.create_member("Ana Sousa").await;

    let (status, body) = app
        .post(
            "/api/v1/members",
            &app.manager_token(),
            json!({"id": 1, "name": "Outra Ana", "address": "Rua Velha 2", "number": "961234567"}),
        )
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "CONFLICT");
}

#[tokio::test]
async fn test_contact_validation() {
    let app = setup().await;
    let token = app.manager_token();

    // Neither phone number
    let (status, body) = app
        .post(
            "/api/v1/members",
            &token,
            json!({"name": "Ana", "address": "Rua Direita 1", "email": "ana@club.pt"}),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    // Unknown mobile prefix
    let (status, _) = app
        .post(
            "/api/v1/members",
            &token,
            json!({"name": "Ana", "address": "Rua Direita 1", "number": "951234567"}),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    // Landline alone is enough
    let (status, body) = app
        .post(
            "/api/v1/members",
            &token,
            json!({"name": "Ana", "address": "Rua Direita 1", "landlineNumber": "253123456"}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["contact"]["landlineNumber"], "253123456");
}

#[tokio::test]
async fn test_malformed_json_is_a_bad_request() {
    let app = setup().await;

    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/api/v1/members")
        .header("authorization", format!("Bearer {}", app.manager_token()))
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{\"name\": "))
        .unwrap();
    let (status, body) = app.send(request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_list_filters_by_name_case_insensitively() {
    let app = setup().await;
    app.create_member("Ana Sousa").await;
    app.create_member("Bruno Costa").await;
    app.create_member("Joana Santos").await;

    let (status, body) = app
        .get("/api/v1/members?text=ANA&take=10", &app.manager_token())
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["totalCount"], 2);
    let names: Vec<&str> = body["data"]["members"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Ana Sousa", "Joana Santos"]);
    assert_eq!(body["data"]["members"][0]["tripCount"], 0);
    assert_eq!(body["data"]["members"][0]["feesOnSchedule"], false);
}

#[tokio::test]
async fn test_list_filter_treats_wildcards_literally() {
    let app = setup().await;
    let token = app.manager_token();
    app.create_member("Ana Sousa").await;
    app.create_member("Bruno Costa").await;

    let (_, body) = app.get("/api/v1/members?text=%25", &token).await;
    assert_eq!(body["data"]["totalCount"], 0);
    let (_, body) = app.get("/api/v1/members?text=_", &token).await;
    assert_eq!(body["data"]["totalCount"], 0);

    app.create_member("Clube 100% Costa").await;
    app.create_member("Dora_Lima").await;

    let (status, body) = app.get("/api/v1/members?text=%25", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["totalCount"], 1);
    assert_eq!(body["data"]["members"][0]["name"], "Clube 100% Costa");

    let (_, body) = app.get("/api/v1/members?text=a_l", &token).await;
    assert_eq!(body["data"]["totalCount"], 1);
    assert_eq!(body["data"]["members"][0]["name"], "Dora_Lima");
}

#[tokio::test]
async fn test_list_pagination() {
    let app = setup().await;
    for name in ["A", "B", "C"] {
        app.create_member(name).await;
    }

    let (_, body) = app
        .get("/api/v1/members?skip=1&take=1", &app.manager_token())
        .await;

    assert_eq!(body["data"]["totalCount"], 3);
    assert_eq!(body["data"]["members"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"]["members"][0]["name"], "B");
}

#[tokio::test]
async fn test_get_member_details() {
    let app = setup().await;
    let id = app.create_member("Ana Sousa").await;
    let token = app.manager_token();
    let year = current_year();

    for fee_year in [year - 1, year - 2] {
        let (status, _) = app
            .post(
                "/api/v1/fees",
                &token,
                json!({"year": fee_year, "paidAmount": 12.5, "memberId": id}),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = app.get(&format!("/api/v1/members/{}", id), &token).await;

    assert_eq!(status, StatusCode::OK);
    let member = &body["data"];
    assert_eq!(member["name"], "Ana Sousa");
    assert_eq!(member["contact"]["number"], "912345678");
    assert_eq!(member["feesOnSchedule"], true);
    assert_eq!(member["fees"][0]["year"], year - 2);
    assert_eq!(member["fees"][1]["year"], year - 1);
    assert_eq!(member["memberTrips"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_unknown_member_is_not_found() {
    let app = setup().await;

    let (status, body) = app.get("/api/v1/members/99", &app.manager_token()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    let (status, _) = app.delete("/api/v1/members/99", &app.manager_token()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_member_keeps_untouched_fields() {
    let app = setup().await;
    let id = app.create_member("Ana Sousa").await;

    let (status, body) = app
        .put(
            &format!("/api/v1/members/{}", id),
            &app.manager_token(),
            json!({"email": "ana@club.pt"}),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Ana Sousa");
    assert_eq!(body["data"]["contact"]["email"], "ana@club.pt");
    assert_eq!(body["data"]["contact"]["number"], "912345678");
}

#[tokio::test]
async fn test_delete_member_removes_dependent_rows() {
    let app = setup().await;
    let id = app.create_member("Ana Sousa").await;
    let token = app.manager_token();

    app.post(
        "/api/v1/fees",
        &token,
        json!({"year": 2020, "paidAmount": 10, "memberId": id}),
    )
    .await;
    let (status, _) = app
        .post(
            "/api/v1/trips",
            &token,
            json!({
                "name": "Gerês",
                "tripTypeCode": "ASSOCIATION",
                "destination": "Gerês",
                "totalSeats": 50,
                "date": "2024-06-01T08:00:00Z",
                "memberTrips": [{"memberId": id, "reservedSeats": 2, "paidAmount": 30}]
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app.delete(&format!("/api/v1/members/{}", id), &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let db = &app.state.db;
    assert_eq!(fee::Entity::find().count(db).await.unwrap(), 0);
    assert_eq!(member_trip::Entity::find().count(db).await.unwrap(), 0);
    assert_eq!(contact::Entity::find().count(db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_basic_info_and_dashboard() {
    let app = setup().await;
    app.create_member("Bruno Costa").await;
    app.create_member("Ana Sousa").await;
    let token = app.manager_token();

    let (status, body) = app.get("/api/v1/members/basic-info", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0], json!({"id": 1, "name": "Bruno Costa"}));
    assert_eq!(body["data"][1], json!({"id": 2, "name": "Ana Sousa"}));

    let (status, body) = app.get("/api/v1/members/dashboard", &token).await;
    assert_eq!(status, StatusCode::OK);
    let year = current_year();
    assert_eq!(body["data"][year.to_string()], 2);
    assert_eq!(body["data"][(year - 1).to_string()], 0);
    assert_eq!(body["data"][(year - 2).to_string()], 0);
}

#[tokio::test]
async fn test_non_member_lifecycle() {
    let app = setup().await;
    let token = app.manager_token();
    let zeca = app.create_non_member("Zeca").await;
    app.create_non_member("Alice").await;

    let (status, body) = app.get("/api/v1/non-members", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["totalCount"], 2);
    assert_eq!(body["data"]["nonMembers"][0]["name"], "Alice");

    let (status, body) = app
        .put(
            &format!("/api/v1/non-members/{}", zeca),
            &token,
            json!({"name": "Zeca Afonso"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Zeca Afonso");

    let (status, _) = app
        .delete(&format!("/api/v1/non-members/{}", zeca), &token)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app.get("/api/v1/non-members/basic-info", &token).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}
