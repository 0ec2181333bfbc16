// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Fitplan: workout and meal planning backend
//!
//! This crate provides the JSON API that generates template-based weekly
//! schedules, serves the merged weekly view, and pushes upcoming workouts
//! and meals to a connected Google Calendar.

pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::DataStore;
use services::{CalendarProvider, IdentityProvider};
use std::sync::Arc;

/// Shared application state.
///
/// Every collaborator is injected here once at startup; handlers never reach
/// for process-wide singletons.
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn DataStore>,
    pub identity: Arc<dyn IdentityProvider>,
    pub calendar: Arc<dyn CalendarProvider>,
}
