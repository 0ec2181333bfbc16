// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Fitplan API Server
//!
//! Generates workout and meal schedules and syncs them to Google Calendar.

use fitplan_api::{
    config::{Config, IdentityMode},
    db::{DataStore, MemoryStore, PostgrestStore},
    services::{CalendarProvider, GoogleCalendarClient, IdentityProvider, JwtIdentity, RemoteIdentity},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Fitplan API");

    // Data store: managed backend if configured, otherwise in-process
    let store: Arc<dyn DataStore> = match (&config.supabase_url, &config.supabase_service_key) {
        (Some(url), Some(key)) => Arc::new(
            PostgrestStore::new(url, key, config.http_timeout_secs)
                .expect("Failed to initialize data store"),
        ),
        _ => {
            tracing::warn!("SUPABASE_URL/SUPABASE_SERVICE_KEY not set, using in-memory store");
            Arc::new(MemoryStore::new())
        }
    };

    // Session verification
    let identity: Arc<dyn IdentityProvider> = match config.identity_mode {
        IdentityMode::Jwt => {
            let secret = config
                .supabase_jwt_secret
                .as_deref()
                .expect("SUPABASE_JWT_SECRET is required for jwt identity mode");
            Arc::new(JwtIdentity::new(secret))
        }
        IdentityMode::Remote => {
            let url = config
                .supabase_url
                .as_deref()
                .expect("SUPABASE_URL is required for remote identity mode");
            let key = config.supabase_service_key.as_deref().unwrap_or_default();
            Arc::new(
                RemoteIdentity::new(url, key, config.http_timeout_secs)
                    .expect("Failed to initialize identity client"),
            )
        }
    };
    tracing::info!(mode = ?config.identity_mode, "Identity provider initialized");

    // Google Calendar client; credentials are checked per request
    let calendar: Arc<dyn CalendarProvider> = Arc::new(
        GoogleCalendarClient::new(
            config.google_client_id.clone(),
            config.google_client_secret.clone(),
            config.http_timeout_secs,
        )
        .expect("Failed to initialize calendar client"),
    );
    if config.google_client_id.is_none() {
        tracing::warn!("GOOGLE_CLIENT_ID not set, calendar connect is disabled");
    }

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        store,
        identity,
        calendar,
    });

    // Build router
    let app = fitplan_api::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("fitplan_api=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
