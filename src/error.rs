// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use crate::db::StoreError;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
///
/// The client only ever sees a message string; anything more detailed is
/// logged here.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotConfigured(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("{0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Wrap a store failure behind a user-facing message, logging the cause.
    pub fn store(context: &str, err: StoreError) -> Self {
        tracing::error!(error = %err, context, "Data store operation failed");
        AppError::Database(context.to_string())
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::store("Database error", err)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(status = %rejection.status(), "Rejected request body");
        AppError::BadRequest(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(validation_message(&errors))
    }
}

/// First field error rendered as `field: message`, sorted by field name so
/// the answer is stable.
fn validation_message(errors: &validator::ValidationErrors) -> String {
    let field_errors = errors.field_errors();
    let mut fields: Vec<_> = field_errors.iter().collect();
    fields.sort_by(|a, b| a.0.cmp(b.0));

    fields
        .into_iter()
        .find_map(|(field, errs)| {
            errs.first().map(|e| {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string());
                format!("{}: {}", field, message)
            })
        })
        .unwrap_or_else(|| "Invalid request".to_string())
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, self.to_string(), None),
            AppError::NotFound(what) => (
                StatusCode::NOT_FOUND,
                format!("{} not found", what),
                None,
            ),
            AppError::BadRequest(msg) | AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, msg.clone(), None)
            }
            AppError::NotConfigured(msg) => {
                tracing::error!(error = %msg, "Required configuration missing");
                (StatusCode::INTERNAL_SERVER_ERROR, msg.clone(), None)
            }
            AppError::Upstream(msg) => {
                tracing::warn!(error = %msg, "Upstream call failed");
                (
                    StatusCode::BAD_GATEWAY,
                    "Upstream service request failed".to_string(),
                    Some(msg.clone()),
                )
            }
            AppError::Database(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone(), None),
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    None,
                )
            }
        };

        let body = ErrorResponse { error, details };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 1, message = "Name is required"))]
        display_name: String,
        #[validate(range(max = 150, message = "Age must be at most 150"))]
        age: u32,
    }

    #[test]
    fn test_validation_message_names_field() {
        let sample = Sample {
            display_name: String::new(),
            age: 30,
        };
        let err: AppError = sample.validate().unwrap_err().into();
        assert_eq!(err.to_string(), "display_name: Name is required");
    }

    #[test]
    fn test_validation_message_is_stable_across_fields() {
        let sample = Sample {
            display_name: String::new(),
            age: 200,
        };
        let err: AppError = sample.validate().unwrap_err().into();
        assert_eq!(err.to_string(), "age: Age must be at most 150");
    }

    #[test]
    fn test_status_codes() {
        let cases = [
            (AppError::Unauthorized, StatusCode::UNAUTHORIZED),
            (AppError::BadRequest("x".into()), StatusCode::BAD_REQUEST),
            (AppError::NotFound("Workout".into()), StatusCode::NOT_FOUND),
            (AppError::Upstream("x".into()), StatusCode::BAD_GATEWAY),
            (
                AppError::NotConfigured("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
