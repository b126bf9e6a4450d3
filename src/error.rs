//!
//! # Error Handling
//!
//! Central `AppError` type used by every handler, plus its mapping onto
//! HTTP responses. Subsystems report failures through their own small
//! error enums (`TokenError`, `StoreError`, `CredentialError`) and the
//! `From` impls here translate those into HTTP-facing errors, so `?`
//! works all the way up through the handlers.
//!
//! Two deliberate collapses happen in this mapping: every token failure
//! becomes the same 401 body, and internal failures reach the client as
//! a generic 500 with the detail kept in the server log.

use actix_web::{error::ResponseError, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

use crate::auth::token::TokenError;
use crate::services::CredentialError;
use crate::storage::StoreError;

/// Represents all error conditions a handler can surface.
#[derive(Debug)]
pub enum AppError {
    /// Authentication is missing or failed (HTTP 401).
    Unauthorized(String),
    /// A malformed or invalid request (HTTP 400).
    BadRequest(String),
    /// The requested resource does not exist for this caller (HTTP 404).
    NotFound(String),
    /// A write conflicted with existing state (HTTP 409).
    Conflict(String),
    /// Failed input validation (HTTP 400 with a field-to-message map).
    ValidationError(ValidationErrors),
    /// An unexpected server-side failure (HTTP 500).
    InternalServerError(String),
    /// A storage-layer failure (HTTP 500).
    DatabaseError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::ValidationError(errors) => write!(f, "Validation Error: {}", errors),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
        }
    }
}

/// Flattens validation errors into a `{field: message}` object, one
/// message per offending field.
fn validation_body(errors: &ValidationErrors) -> serde_json::Value {
    let mut body = serde_json::Map::new();
    for (field, field_errors) in errors.field_errors() {
        if let Some(first) = field_errors.first() {
            let message = first
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("{} is invalid", field));
            body.insert(field.to_string(), json!(message));
        }
    }
    serde_json::Value::Object(body)
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Unauthorized(msg) => HttpResponse::Unauthorized().json(json!({
                "error": msg
            })),
            AppError::BadRequest(msg) => HttpResponse::BadRequest().json(json!({
                "error": msg
            })),
            AppError::NotFound(msg) => HttpResponse::NotFound().json(json!({
                "error": msg
            })),
            AppError::Conflict(msg) => HttpResponse::Conflict().json(json!({
                "error": msg
            })),
            AppError::ValidationError(errors) => {
                HttpResponse::BadRequest().json(validation_body(errors))
            }
            // The client gets a generic body; the detail stays in the log.
            AppError::InternalServerError(msg) | AppError::DatabaseError(msg) => {
                log::error!("internal error: {}", msg);
                HttpResponse::InternalServerError().json(json!({
                    "error": "An unexpected error occurred"
                }))
            }
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> AppError {
        AppError::ValidationError(errors)
    }
}

/// Every token failure collapses into one 401; the response does not
/// reveal whether the token was malformed, forged or expired.
impl From<TokenError> for AppError {
    fn from(_: TokenError) -> AppError {
        AppError::Unauthorized("Invalid token".into())
    }
}

impl From<StoreError> for AppError {
    fn from(error: StoreError) -> AppError {
        match error {
            StoreError::AlreadyExists => AppError::Conflict("Record already exists".into()),
            StoreError::Database(e) => AppError::DatabaseError(e.to_string()),
        }
    }
}

impl From<CredentialError> for AppError {
    fn from(error: CredentialError) -> AppError {
        match error {
            CredentialError::UsernameTaken => {
                AppError::Conflict("Username already exists".into())
            }
            CredentialError::InvalidCredentials => {
                AppError::Unauthorized("Invalid username or password".into())
            }
            CredentialError::Store(e) => e.into(),
            CredentialError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}
