// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Weekly view tests.

use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

mod common;

#[tokio::test]
async fn test_weekly_view_groups_and_sorts_by_time() {
    let app = common::create_test_app();
    let token = app.token_for(Uuid::new_v4());

    let (status, _) = app
        .post(
            "/api/scheduler/weekly",
            &token,
            json!({ "start_date": "2024-01-01" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .get("/api/schedule/weekly?startDate=2024-01-01", &token)
        .await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(body["startDate"], "2024-01-01");
    assert_eq!(body["endDate"], "2024-01-08");
    assert_eq!(body["summary"]["totalWorkouts"], 4);
    assert_eq!(body["summary"]["totalMeals"], 21);
    assert_eq!(body["summary"]["totalEvents"], 25);

    let schedule = body["schedule"].as_object().unwrap();
    assert_eq!(schedule.len(), 7);
    for entries in schedule.values() {
        let times: Vec<&str> = entries
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["time"].as_str().unwrap())
            .collect();
        let mut sorted = times.clone();
        sorted.sort();
        assert_eq!(times, sorted);
    }

    let monday: Vec<(&str, &str)> = schedule["2024-01-01"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| (e["time"].as_str().unwrap(), e["type"].as_str().unwrap()))
        .collect();
    assert_eq!(
        monday,
        vec![
            ("07:30", "meal"),
            ("09:00", "workout"),
            ("12:30", "meal"),
            ("18:30", "meal"),
        ]
    );
    assert_eq!(schedule["2024-01-01"][1]["color"], "bg-blue-400");
    assert_eq!(schedule["2024-01-01"][1]["duration"], 60);
    assert_eq!(schedule["2024-01-01"][0]["calories"], 420);
}

#[tokio::test]
async fn test_weekly_view_accepts_timestamp_start() {
    let app = common::create_test_app();
    let token = app.token_for(Uuid::new_v4());

    let (status, body) = app
        .get("/api/schedule/weekly?startDate=2024-03-10T15:00:00.000Z", &token)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["startDate"], "2024-03-10");
    assert_eq!(body["endDate"], "2024-03-17");
}

#[tokio::test]
async fn test_weekly_view_excludes_other_users_and_dates() {
    let app = common::create_test_app();
    let me = app.token_for(Uuid::new_v4());
    let other = app.token_for(Uuid::new_v4());

    app.post("/api/scheduler/weekly", &other, json!({ "start_date": "2024-01-01" }))
        .await;
    app.post("/api/scheduler/daily", &me, json!({ "date": "2024-01-08" }))
        .await;

    let (_, body) = app
        .get("/api/schedule/weekly?startDate=2024-01-01", &me)
        .await;

    assert_eq!(body["summary"]["totalEvents"], 0);
    assert!(body["schedule"].as_object().unwrap().is_empty());
}

#[tokio::test]
async fn test_weekly_view_soft_fails_when_tables_missing() {
    let app = common::create_test_app();
    let token = app.token_for(Uuid::new_v4());
    app.post("/api/scheduler/daily", &token, json!({ "date": "2024-01-02" }))
        .await;
    app.store.mark_unprovisioned("workouts");

    let (status, body) = app
        .get("/api/schedule/weekly?startDate=2024-01-01", &token)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["summary"]["totalWorkouts"], 0);
    assert_eq!(body["summary"]["totalMeals"], 3);
}

#[tokio::test]
async fn test_weekly_view_rejects_garbage_date() {
    let app = common::create_test_app();
    let token = app.token_for(Uuid::new_v4());

    let (status, _) = app
        .get("/api/schedule/weekly?startDate=next-tuesday", &token)
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}
