// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Schedule generation endpoint tests.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use chrono::NaiveDate;
use fitplan_api::db::DataStore;
use fitplan_api::models::DateRange;
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;

mod common;

#[tokio::test]
async fn test_weekly_generates_workouts_and_full_week_of_meals() {
    let app = common::create_test_app();
    let user = Uuid::new_v4();
    let token = app.token_for(user);

    let (status, body) = app
        .post(
            "/api/scheduler/weekly",
            &token,
            json!({ "start_date": "2024-01-01" }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["schedule"]["days_per_week"], 4);

    let days = body["schedule"]["days"].as_array().unwrap();
    assert_eq!(days.len(), 7);
    let workouts: usize = days.iter().map(|d| d["workouts"].as_array().unwrap().len()).sum();
    let meals: usize = days.iter().map(|d| d["meals"].as_array().unwrap().len()).sum();
    assert_eq!(workouts, 4);
    assert_eq!(meals, 21);

    // Persisted too
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let range = DateRange::days_from(start, 7);
    assert_eq!(app.store.list_workouts(user, range).await.unwrap().len(), 4);
    assert_eq!(app.store.list_meals(user, range).await.unwrap().len(), 21);
}

#[tokio::test]
async fn test_weekly_rotation_follows_day_offset() {
    let app = common::create_test_app();
    let token = app.token_for(Uuid::new_v4());

    let (status, body) = app
        .post(
            "/api/scheduler/weekly",
            &token,
            json!({ "start_date": "2024-01-01", "days_per_week": 4 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let days = body["schedule"]["days"].as_array().unwrap();
    let expected = [
        ("2024-01-01", Some("Upper Body Strength")),
        ("2024-01-02", Some("Lower Body Power")),
        ("2024-01-03", Some("Full Body Circuit")),
        ("2024-01-04", Some("Core & Cardio")),
        ("2024-01-05", None),
    ];
    for (i, (date, title)) in expected.iter().enumerate() {
        assert_eq!(days[i]["date"], *date);
        let workouts = days[i]["workouts"].as_array().unwrap();
        match title {
            Some(title) => {
                assert_eq!(workouts.len(), 1);
                assert_eq!(workouts[0]["title"], *title);
                assert_eq!(workouts[0]["scheduled_time"], "09:00:00");
            }
            None => assert!(workouts.is_empty()),
        }
        assert_eq!(days[i]["meals"].as_array().unwrap().len(), 3);
    }
}

#[tokio::test]
async fn test_weekly_requires_start_date() {
    let app = common::create_test_app();
    let token = app.token_for(Uuid::new_v4());

    let (status, body) = app.post("/api/scheduler/weekly", &token, json!({})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Start date is required");
}

#[tokio::test]
async fn test_weekly_rejects_days_out_of_range() {
    let app = common::create_test_app();
    let token = app.token_for(Uuid::new_v4());

    let (status, body) = app
        .post(
            "/api/scheduler/weekly",
            &token,
            json!({ "start_date": "2024-01-01", "days_per_week": 9 }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "days_per_week: Days per week must be between 1 and 7"
    );
}

#[tokio::test]
async fn test_malformed_body_gets_json_error() {
    let app = common::create_test_app();
    let token = app.token_for(Uuid::new_v4());

    for days in [json!("four"), json!(-1)] {
        let (status, body) = app
            .post(
                "/api/scheduler/weekly",
                &token,
                json!({ "start_date": "2024-01-01", "days_per_week": days }),
            )
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"]
            .as_str()
            .unwrap()
            .starts_with("Invalid request body"));
    }
}

#[tokio::test]
async fn test_non_json_body_gets_json_error() {
    let app = common::create_test_app();
    let token = app.token_for(Uuid::new_v4());

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/scheduler/daily")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_daily_generates_one_workout_three_meals() {
    let app = common::create_test_app();
    let user = Uuid::new_v4();
    let token = app.token_for(user);

    let (status, body) = app
        .post("/api/scheduler/daily", &token, json!({ "date": "2024-02-10" }))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["schedule"]["date"], "2024-02-10");
    let workouts = body["schedule"]["workouts"].as_array().unwrap();
    assert_eq!(workouts.len(), 1);
    assert_eq!(workouts[0]["title"], "Full Body Strength Training");
    assert_eq!(workouts[0]["user_id"], user.to_string());

    let meals = body["schedule"]["meals"].as_array().unwrap();
    let types: Vec<&str> = meals.iter().map(|m| m["meal_type"].as_str().unwrap()).collect();
    assert_eq!(types, vec!["breakfast", "lunch", "dinner"]);
}

#[tokio::test]
async fn test_daily_requires_date() {
    let app = common::create_test_app();
    let token = app.token_for(Uuid::new_v4());

    let (status, body) = app
        .post("/api/scheduler/daily", &token, json!({ "date": "" }))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Date is required");
}

#[tokio::test]
async fn test_generation_failure_surfaces_error() {
    let app = common::create_test_app();
    app.store.mark_unprovisioned("meals");
    let user = Uuid::new_v4();
    let token = app.token_for(user);

    let (status, body) = app
        .post(
            "/api/scheduler/weekly",
            &token,
            json!({ "start_date": "2024-01-01" }),
        )
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to create meals");

    // Workouts inserted before the failure stay in place
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let workouts = app
        .store
        .list_workouts(user, DateRange::days_from(start, 7))
        .await
        .unwrap();
    assert_eq!(workouts.len(), 4);
}
