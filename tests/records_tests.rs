// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Manual workout and meal management tests.

use axum::http::{Method, StatusCode};
use serde_json::json;
use uuid::Uuid;

mod common;

#[tokio::test]
async fn test_workout_lifecycle() {
    let app = common::create_test_app();
    let token = app.token_for(Uuid::new_v4());

    let (status, created) = app
        .post(
            "/api/workouts",
            &token,
            json!({
                "title": "Evening Run",
                "workout_type": "cardio",
                "scheduled_date": "2024-05-06",
                "duration_minutes": 40,
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["scheduled_time"], "09:00:00");
    assert_eq!(created["completed"], false);
    let id = created["id"].as_str().unwrap().to_string();

    let (status, updated) = app
        .request(
            Method::PATCH,
            &format!("/api/workouts/{}", id),
            Some(&token),
            Some(json!({ "completed": true, "scheduled_time": "18:15:00" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["completed"], true);
    assert_eq!(updated["scheduled_time"], "18:15:00");
    assert_eq!(updated["title"], "Evening Run");

    let (status, listed) = app
        .get("/api/workouts?start_date=2024-05-06&end_date=2024-05-06", &token)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let (status, body) = app
        .request(
            Method::DELETE,
            &format!("/api/workouts/{}", id),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (status, body) = app
        .request(
            Method::DELETE,
            &format!("/api/workouts/{}", id),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Workout not found");
}

#[tokio::test]
async fn test_meal_defaults_time_from_type() {
    let app = common::create_test_app();
    let token = app.token_for(Uuid::new_v4());

    let (status, created) = app
        .post(
            "/api/meals",
            &token,
            json!({
                "title": "Trail Mix",
                "meal_type": "snack",
                "scheduled_date": "2024-05-06",
                "calories": 250,
            }),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["scheduled_time"], "15:30:00");
    assert_eq!(created["meal_type"], "snack");
}

#[tokio::test]
async fn test_list_window_is_inclusive_and_scoped() {
    let app = common::create_test_app();
    let token = app.token_for(Uuid::new_v4());
    let other = app.token_for(Uuid::new_v4());

    app.post("/api/scheduler/weekly", &token, json!({ "start_date": "2024-01-01" }))
        .await;
    app.post("/api/scheduler/weekly", &other, json!({ "start_date": "2024-01-01" }))
        .await;

    let (_, meals) = app
        .get("/api/meals?start_date=2024-01-02&end_date=2024-01-03", &token)
        .await;
    assert_eq!(meals.as_array().unwrap().len(), 6);

    let (_, workouts) = app.get("/api/workouts?start_date=2024-01-01", &token).await;
    assert_eq!(workouts.as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_list_rejects_inverted_range() {
    let app = common::create_test_app();
    let token = app.token_for(Uuid::new_v4());

    let (status, _) = app
        .get("/api/meals?start_date=2024-01-05&end_date=2024-01-01", &token)
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_empty_update_is_rejected() {
    let app = common::create_test_app();
    let token = app.token_for(Uuid::new_v4());

    let (_, created) = app
        .post(
            "/api/meals",
            &token,
            json!({
                "title": "Oatmeal",
                "meal_type": "breakfast",
                "scheduled_date": "2024-05-06",
            }),
        )
        .await;
    let id = created["id"].as_str().unwrap();

    let (status, body) = app
        .request(
            Method::PATCH,
            &format!("/api/meals/{}", id),
            Some(&token),
            Some(json!({})),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No fields to update");
}

#[tokio::test]
async fn test_cannot_touch_another_users_records() {
    let app = common::create_test_app();
    let owner = app.token_for(Uuid::new_v4());
    let intruder = app.token_for(Uuid::new_v4());

    let (_, created) = app
        .post(
            "/api/workouts",
            &owner,
            json!({
                "title": "Leg Day",
                "workout_type": "strength",
                "scheduled_date": "2024-05-06",
            }),
        )
        .await;
    let uri = format!("/api/workouts/{}", created["id"].as_str().unwrap());

    let (status, _) = app
        .request(
            Method::PATCH,
            &uri,
            Some(&intruder),
            Some(json!({ "completed": true })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.request(Method::DELETE, &uri, Some(&intruder), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .request(Method::DELETE, "/api/workouts/not-a-uuid", Some(&owner), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_validation() {
    let app = common::create_test_app();
    let token = app.token_for(Uuid::new_v4());

    let (status, body) = app
        .post(
            "/api/workouts",
            &token,
            json!({
                "title": "",
                "workout_type": "cardio",
                "scheduled_date": "2024-05-06",
            }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "title: Title is required");
}

#[tokio::test]
async fn test_unknown_meal_type_is_a_json_400() {
    let app = common::create_test_app();
    let token = app.token_for(Uuid::new_v4());

    let (status, body) = app
        .post(
            "/api/meals",
            &token,
            json!({
                "title": "Brunch",
                "meal_type": "brunch",
                "scheduled_date": "2024-05-06",
            }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Invalid request body"));
}
