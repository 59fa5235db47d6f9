//! Error types and error handling for the HTTP layer
//!
//! Every handler failure is an [`AppError`]. Its `IntoResponse` impl produces
//! the `{"code": <status>, "issues": [...]}` body used by all routes.

use crate::expenses::ExpenseError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Issue reported for any 500-class failure; the cause is only logged
pub const INTERNAL_ISSUE: &str = "internal server error";

/// Application-level error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Request body failed structural validation, one issue per problem
    #[error("invalid request: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// Request is malformed (headers, encoding, path)
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Failure reported by the expense service
    #[error(transparent)]
    Expense(#[from] ExpenseError),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// HTTP status code
    pub code: u16,
    /// Human-readable problems with the request
    pub issues: Vec<String>,
}

impl AppError {
    /// HTTP status this error maps to
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Expense(ExpenseError::UnknownId(_)) => StatusCode::NOT_FOUND,
            AppError::Expense(e) if e.is_invalid_input() => StatusCode::BAD_REQUEST,
            AppError::Expense(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let issues = if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
            vec![INTERNAL_ISSUE.to_string()]
        } else {
            tracing::warn!(status = status.as_u16(), error = %self, "Rejected request");
            match self {
                AppError::Validation(issues) => issues,
                AppError::BadRequest(issue) => vec![issue],
                AppError::Expense(e) => vec![e.to_string()],
            }
        };

        let body = Json(ErrorResponse {
            code: status.as_u16(),
            issues,
        });

        (status, body).into_response()
    }
}
