//! API utility functions
//!
//! Request checks shared by the expense handlers: content type, body
//! decoding, and path id parsing.

use crate::error::AppError;
use crate::expenses::ExpenseId;
use axum::http::{header, HeaderMap};
use serde::de::DeserializeOwned;

/// Issue reported when a mutating request is not JSON
pub const MISSING_JSON_CONTENT_TYPE: &str = "'Content-Type' header missing 'application/json'";

/// Issue reported when the body cannot be decoded
pub const UNDECODABLE_BODY: &str = "unable to decode body";

/// Issue reported when the path id is not an integer
pub const INVALID_PATH_ID: &str = "id in path is not valid id";

/// Require a `Content-Type` header mentioning `application/json`
pub fn require_json_content_type(headers: &HeaderMap) -> Result<(), AppError> {
    let is_json = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.contains("application/json"));

    if !is_json {
        return Err(AppError::BadRequest(MISSING_JSON_CONTENT_TYPE.to_string()));
    }
    Ok(())
}

/// Decode a JSON request body
pub fn decode_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, AppError> {
    serde_json::from_slice(body).map_err(|e| {
        tracing::debug!("Failed to decode request body: {}", e);
        AppError::BadRequest(UNDECODABLE_BODY.to_string())
    })
}

/// Parse the `:id` path segment
///
/// Only the syntax is checked here; the service decides whether the value
/// is an acceptable id.
pub fn parse_path_id(raw: &str) -> Result<ExpenseId, AppError> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::BadRequest(INVALID_PATH_ID.to_string()))
}
