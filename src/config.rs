// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! Provider credentials are optional at startup. Handlers that need them
//! check at request time and answer with an explicit "not configured" error.

use std::env;

/// How session tokens are verified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityMode {
    /// Verify the provider-issued HS256 JWT locally with the shared secret.
    Jwt,
    /// Ask the managed auth service who the token belongs to.
    Remote,
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Environment Variables (non-sensitive) ---
    /// Frontend URL for post-OAuth redirects
    pub frontend_url: String,
    /// Public base URL of this API, used to build the OAuth redirect URI
    pub api_url: Option<String>,
    /// Google OAuth client ID (public)
    pub google_client_id: Option<String>,
    /// Managed backend base URL (auth + REST)
    pub supabase_url: Option<String>,
    /// Session verification strategy
    pub identity_mode: IdentityMode,
    /// Timeout for outbound HTTP calls
    pub http_timeout_secs: u64,
    /// Server port
    pub port: u16,

    // --- Secrets ---
    /// Google OAuth client secret
    pub google_client_secret: Option<String>,
    /// Managed backend service key
    pub supabase_service_key: Option<String>,
    /// Shared secret the identity provider signs session JWTs with
    pub supabase_jwt_secret: Option<Vec<u8>>,
    /// HMAC key for the OAuth `state` parameter (raw bytes)
    pub oauth_state_key: Vec<u8>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file is honored for local development.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let identity_mode = match env::var("IDENTITY_MODE").as_deref() {
            Ok("remote") => IdentityMode::Remote,
            Ok("jwt") | Err(_) => IdentityMode::Jwt,
            Ok(_) => return Err(ConfigError::Invalid("IDENTITY_MODE")),
        };

        let config = Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            api_url: env::var("API_URL")
                .ok()
                .filter(|url| url.starts_with("http://") || url.starts_with("https://")),
            google_client_id: non_empty_var("GOOGLE_CLIENT_ID"),
            supabase_url: non_empty_var("SUPABASE_URL")
                .map(|url| url.trim_end_matches('/').to_string()),
            identity_mode,
            http_timeout_secs: env::var("HTTP_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),

            google_client_secret: non_empty_var("GOOGLE_CLIENT_SECRET"),
            supabase_service_key: non_empty_var("SUPABASE_SERVICE_KEY"),
            supabase_jwt_secret: non_empty_var("SUPABASE_JWT_SECRET").map(String::into_bytes),
            oauth_state_key: env::var("OAUTH_STATE_KEY")
                .map_err(|_| ConfigError::Missing("OAUTH_STATE_KEY"))?
                .into_bytes(),
        };

        match config.identity_mode {
            IdentityMode::Jwt if config.supabase_jwt_secret.is_none() => {
                Err(ConfigError::Missing("SUPABASE_JWT_SECRET"))
            }
            IdentityMode::Remote if config.supabase_url.is_none() => {
                Err(ConfigError::Missing("SUPABASE_URL"))
            }
            _ => Ok(config),
        }
    }

    /// Deterministic config for tests. No managed backend, fake Google client.
    pub fn test_default() -> Self {
        Self {
            frontend_url: "http://localhost:3000".to_string(),
            api_url: Some("http://localhost:8080".to_string()),
            google_client_id: Some("test_client_id".to_string()),
            supabase_url: None,
            identity_mode: IdentityMode::Jwt,
            http_timeout_secs: 5,
            port: 8080,
            google_client_secret: Some("test_client_secret".to_string()),
            supabase_service_key: None,
            supabase_jwt_secret: Some(b"test_jwt_secret_32_bytes_minimum!".to_vec()),
            oauth_state_key: b"test_oauth_state_key".to_vec(),
        }
    }

    /// Whether the managed backend is configured for persistence.
    pub fn has_managed_store(&self) -> bool {
        self.supabase_url.is_some() && self.supabase_service_key.is_some()
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        env::set_var("OAUTH_STATE_KEY", "state_key");
        env::set_var("SUPABASE_JWT_SECRET", "jwt_secret");
        env::set_var("GOOGLE_CLIENT_ID", "  client-id  ");
        env::set_var("API_URL", "not-a-url");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.oauth_state_key, b"state_key");
        assert_eq!(config.google_client_id.as_deref(), Some("client-id"));
        assert_eq!(config.identity_mode, IdentityMode::Jwt);
        assert!(config.api_url.is_none(), "non-http API_URL is ignored");
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_default_has_no_managed_store() {
        assert!(!Config::test_default().has_managed_store());
    }
}
