// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use fitplan_api::config::Config;
use fitplan_api::db::MemoryStore;
use fitplan_api::error::AppError;
use fitplan_api::routes::create_router;
use fitplan_api::services::identity::create_session_token;
use fitplan_api::services::{CalendarEvent, CalendarProvider, JwtIdentity, TokenResponse};
use fitplan_api::AppState;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;
use uuid::Uuid;

/// Calendar provider that records every call instead of talking to Google.
#[derive(Default)]
pub struct FakeCalendar {
    refreshes: AtomicUsize,
    exchanges: AtomicUsize,
    /// (access token used, event)
    events: Mutex<Vec<(String, CalendarEvent)>>,
    /// Summaries containing this text are rejected
    reject: Mutex<Option<String>>,
    fail_refresh: AtomicBool,
}

#[allow(dead_code)]
impl FakeCalendar {
    pub const REFRESHED_TOKEN: &'static str = "refreshed-access-token";
    pub const EXCHANGED_TOKEN: &'static str = "exchanged-access-token";

    pub fn refresh_count(&self) -> usize {
        self.refreshes.load(Ordering::SeqCst)
    }

    pub fn exchange_count(&self) -> usize {
        self.exchanges.load(Ordering::SeqCst)
    }

    pub fn events(&self) -> Vec<(String, CalendarEvent)> {
        self.events.lock().unwrap().clone()
    }

    pub fn reject_summaries_containing(&self, text: &str) {
        *self.reject.lock().unwrap() = Some(text.to_string());
    }

    /// Make every token refresh fail as a revoked grant would.
    pub fn fail_refreshes(&self) {
        self.fail_refresh.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl CalendarProvider for FakeCalendar {
    async fn exchange_code(
        &self,
        code: &str,
        _redirect_uri: &str,
    ) -> Result<TokenResponse, AppError> {
        self.exchanges.fetch_add(1, Ordering::SeqCst);
        if code == "bad-code" {
            return Err(AppError::Upstream("invalid_grant".to_string()));
        }
        Ok(TokenResponse {
            access_token: Self::EXCHANGED_TOKEN.to_string(),
            refresh_token: Some("refresh-token".to_string()),
            expires_in: 3600,
        })
    }

    async fn refresh_token(&self, _refresh_token: &str) -> Result<TokenResponse, AppError> {
        self.refreshes.fetch_add(1, Ordering::SeqCst);
        if self.fail_refresh.load(Ordering::SeqCst) {
            return Err(AppError::Upstream("invalid_grant".to_string()));
        }
        Ok(TokenResponse {
            access_token: Self::REFRESHED_TOKEN.to_string(),
            refresh_token: None,
            expires_in: 3600,
        })
    }

    async fn insert_event(
        &self,
        access_token: &str,
        event: &CalendarEvent,
    ) -> Result<(), AppError> {
        if let Some(text) = self.reject.lock().unwrap().as_deref() {
            if event.summary.contains(text) {
                return Err(AppError::Upstream("rejected".to_string()));
            }
        }
        self.events
            .lock()
            .unwrap()
            .push((access_token.to_string(), event.clone()));
        Ok(())
    }
}

/// Router plus handles on the fakes behind it.
#[allow(dead_code)]
pub struct TestApp {
    pub router: axum::Router,
    pub state: Arc<AppState>,
    pub store: Arc<MemoryStore>,
    pub calendar: Arc<FakeCalendar>,
}

#[allow(dead_code)]
impl TestApp {
    /// Session token for `user_id` signed with the test secret.
    pub fn token_for(&self, user_id: Uuid) -> String {
        let secret = self
            .state
            .config
            .supabase_jwt_secret
            .as_deref()
            .expect("test config has a JWT secret");
        create_session_token(user_id, Some("tester@example.com"), secret).unwrap()
    }

    /// Send a request and decode the JSON body (`Null` when empty).
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, serde_json::Value) {
        self.request(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(
        &self,
        uri: &str,
        token: &str,
        body: serde_json::Value,
    ) -> (StatusCode, serde_json::Value) {
        self.request(Method::POST, uri, Some(token), Some(body)).await
    }
}

/// Create a test app backed by the in-memory store and a fake calendar.
#[allow(dead_code)]
pub fn create_test_app() -> TestApp {
    create_test_app_with(Config::test_default())
}

#[allow(dead_code)]
pub fn create_test_app_with(config: Config) -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let calendar = Arc::new(FakeCalendar::default());
    let secret = config
        .supabase_jwt_secret
        .clone()
        .expect("test config has a JWT secret");

    let state = Arc::new(AppState {
        config,
        store: store.clone(),
        identity: Arc::new(JwtIdentity::new(&secret)),
        calendar: calendar.clone(),
    });

    TestApp {
        router: create_router(state.clone()),
        state,
        store,
        calendar,
    }
}
