// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session verification against the external identity provider.

use crate::error::AppError;
use async_trait::async_trait;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

/// Audience the identity provider stamps on user sessions.
pub const SESSION_AUDIENCE: &str = "authenticated";

/// User behind a valid session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub id: Uuid,
    pub email: Option<String>,
}

/// Answers "who does this session token belong to".
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// `Ok(None)` for a token that is invalid or expired; `Err` only when the
    /// provider itself could not be asked.
    async fn authenticate(&self, token: &str) -> Result<Option<SessionUser>, AppError>;
}

/// Session JWT claims.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub aud: String,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
}

/// Verifies HS256 session tokens locally with the provider's shared secret.
pub struct JwtIdentity {
    key: DecodingKey,
    validation: Validation,
}

impl JwtIdentity {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[SESSION_AUDIENCE]);
        Self {
            key: DecodingKey::from_secret(secret),
            validation,
        }
    }
}

#[async_trait]
impl IdentityProvider for JwtIdentity {
    async fn authenticate(&self, token: &str) -> Result<Option<SessionUser>, AppError> {
        let Ok(data) = decode::<Claims>(token, &self.key, &self.validation) else {
            return Ok(None);
        };

        Ok(Uuid::parse_str(&data.claims.sub)
            .ok()
            .map(|id| SessionUser {
                id,
                email: data.claims.email,
            }))
    }
}

/// Create a session token the way the identity provider does. Used by local
/// tooling and tests.
pub fn create_session_token(
    user_id: Uuid,
    email: Option<&str>,
    signing_key: &[u8],
) -> anyhow::Result<String> {
    use jsonwebtoken::{encode, EncodingKey, Header};
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs() as usize;

    let claims = Claims {
        sub: user_id.to_string(),
        email: email.map(str::to_string),
        aud: SESSION_AUDIENCE.to_string(),
        iat: now,
        exp: now + 60 * 60, // 1 hour
    };

    Ok(encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(signing_key),
    )?)
}

#[derive(Deserialize)]
struct RemoteUser {
    id: Uuid,
    #[serde(default)]
    email: Option<String>,
}

/// Asks the managed auth service to resolve the token.
pub struct RemoteIdentity {
    http: reqwest::Client,
    user_url: String,
    api_key: String,
}

impl RemoteIdentity {
    pub fn new(base_url: &str, api_key: &str, timeout_secs: u64) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            http,
            user_url: format!("{}/auth/v1/user", base_url.trim_end_matches('/')),
            api_key: api_key.to_string(),
        })
    }
}

#[async_trait]
impl IdentityProvider for RemoteIdentity {
    async fn authenticate(&self, token: &str) -> Result<Option<SessionUser>, AppError> {
        let response = self
            .http
            .get(&self.user_url)
            .header("apikey", &self.api_key)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Identity lookup failed: {}", e)))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(AppError::Upstream(format!(
                "Identity lookup returned {}",
                status
            )));
        }

        let user: RemoteUser = response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("Invalid identity response: {}", e)))?;

        Ok(Some(SessionUser {
            id: user.id,
            email: user.email,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"identity_test_secret";

    #[tokio::test]
    async fn test_jwt_round_trip() {
        let user = Uuid::new_v4();
        let token = create_session_token(user, Some("sam@example.com"), SECRET).unwrap();

        let session = JwtIdentity::new(SECRET)
            .authenticate(&token)
            .await
            .unwrap()
            .expect("token should verify");

        assert_eq!(session.id, user);
        assert_eq!(session.email.as_deref(), Some("sam@example.com"));
    }

    #[tokio::test]
    async fn test_jwt_wrong_secret_is_rejected() {
        let token = create_session_token(Uuid::new_v4(), None, SECRET).unwrap();
        let session = JwtIdentity::new(b"another_secret")
            .authenticate(&token)
            .await
            .unwrap();
        assert!(session.is_none());
    }

    #[tokio::test]
    async fn test_jwt_wrong_audience_is_rejected() {
        use jsonwebtoken::{encode, EncodingKey, Header};

        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            email: None,
            aud: "anon".to_string(),
            iat: 0,
            exp: usize::MAX / 2,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        let session = JwtIdentity::new(SECRET).authenticate(&token).await.unwrap();
        assert!(session.is_none());
    }

    #[tokio::test]
    async fn test_garbage_token_is_rejected() {
        let session = JwtIdentity::new(SECRET)
            .authenticate("not-a-jwt")
            .await
            .unwrap();
        assert!(session.is_none());
    }
}
