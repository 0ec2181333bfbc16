// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! External OAuth integration model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Provider key for Google Calendar integrations.
pub const PROVIDER_GOOGLE_CALENDAR: &str = "google_calendar";

/// Stored OAuth credential set linking a user to one provider.
///
/// At most one active row exists per (user, provider).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalIntegration {
    pub id: Uuid,
    pub user_id: Uuid,
    pub provider: String,
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub token_expires_at: DateTime<Utc>,
    pub is_active: bool,
    pub last_synced_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl ExternalIntegration {
    /// The stored access token can no longer be used.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.token_expires_at < now
    }

    /// Token-free view for API responses.
    pub fn summary(&self) -> IntegrationSummary {
        IntegrationSummary {
            id: self.id.to_string(),
            provider: self.provider.clone(),
            is_active: self.is_active,
            token_expires_at: self.token_expires_at.to_rfc3339(),
            last_synced_at: self.last_synced_at.map(|t| t.to_rfc3339()),
        }
    }
}

/// Credentials obtained from an OAuth code exchange.
#[derive(Debug, Clone)]
pub struct NewIntegration {
    pub user_id: Uuid,
    pub provider: String,
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub token_expires_at: DateTime<Utc>,
}

/// Integration as exposed to the client.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct IntegrationSummary {
    pub id: String,
    pub provider: String,
    pub is_active: bool,
    pub token_expires_at: String,
    pub last_synced_at: Option<String>,
}
