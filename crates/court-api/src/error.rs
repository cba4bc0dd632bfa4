//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps domain errors from court-state and court-core to HTTP status codes
//! and JSON error bodies with a machine-checkable code. Internal error
//! detail (storage failures included) never reaches the client.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Structured JSON error response body.
///
/// Every error response uses this format across the API surface.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "FORBIDDEN", "CONFLICT").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// Referenced submission absent (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Input failed validation bounds (422). Rejected before any mutation.
    #[error("validation error: {0}")]
    Validation(String),

    /// Request body could not be parsed (422). Normalized with
    /// `Validation`: the client sent syntactically valid HTTP but
    /// semantically invalid content.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Missing or invalid identity proof (401).
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated but the role lacks permission (403).
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Duplicate vote or duplicate email (400).
    ///
    /// The taxonomy kind is CONFLICT, but the wire status is 400:
    /// existing clients expect 400 for both duplicates.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Internal server error (500). Message is logged but not returned to
    /// the client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Return the HTTP status code and machine-readable error code.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            Self::BadRequest(_) => (StatusCode::UNPROCESSABLE_ENTITY, "BAD_REQUEST"),
            Self::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            Self::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            // 400 for wire compatibility — see the variant docs.
            Self::Conflict(_) => (StatusCode::BAD_REQUEST, "CONFLICT"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        // Never expose internal error messages to clients.
        let message = match &self {
            Self::Internal(_) => "An internal error occurred".to_string(),
            other => other.to_string(),
        };

        if let Self::Internal(_) = &self {
            tracing::error!(error = %self, "internal server error");
        }

        let body = ErrorBody {
            error: ErrorDetail { code: code.to_string(), message },
        };

        (status, Json(body)).into_response()
    }
}

/// Field validation failures are 422s.
impl From<court_core::ValidationError> for AppError {
    fn from(err: court_core::ValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}

/// Duplicate email is a conflict (400 on the wire).
impl From<court_state::UserError> for AppError {
    fn from(err: court_state::UserError) -> Self {
        match &err {
            court_state::UserError::EmailTaken { .. } => Self::Conflict(err.to_string()),
        }
    }
}

/// Workflow errors carry their taxonomy kind in the variant.
impl From<court_state::SubmissionError> for AppError {
    fn from(err: court_state::SubmissionError) -> Self {
        match &err {
            court_state::SubmissionError::Forbidden { .. } => Self::Forbidden(err.to_string()),
            court_state::SubmissionError::NotFound { .. } => Self::NotFound(err.to_string()),
        }
    }
}

/// Ledger errors: duplicate votes conflict, role failures are forbidden.
impl From<court_state::VoteError> for AppError {
    fn from(err: court_state::VoteError) -> Self {
        match &err {
            court_state::VoteError::Forbidden { .. } => Self::Forbidden(err.to_string()),
            court_state::VoteError::AlreadyVoted { .. } => Self::Conflict(err.to_string()),
        }
    }
}

/// Raw storage errors never surface their detail.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        Self::Internal(format!("database error: {err}"))
    }
}
