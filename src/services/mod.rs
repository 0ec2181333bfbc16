// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod calendar;
pub mod gate;
pub mod generator;
pub mod identity;
pub mod profile;
pub mod schedule;
pub mod sync;
pub mod templates;

pub use calendar::{CalendarEvent, CalendarProvider, GoogleCalendarClient, TokenResponse};
pub use identity::{IdentityProvider, JwtIdentity, RemoteIdentity, SessionUser};
