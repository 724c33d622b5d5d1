//! # Error Handling Middleware
//!
//! This module provides a standardized way to handle errors in the
//! MedTrack API. It maps domain-specific errors to appropriate HTTP
//! status codes and JSON error responses, ensuring a consistent error
//! handling experience across the entire API.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use medtrack_core::errors::MedError;

/// Application error wrapper that provides HTTP status code mapping.
///
/// `AppError` wraps domain-specific `MedError` instances and implements
/// `IntoResponse` to convert them into HTTP responses with appropriate
/// status codes and JSON payloads.
#[derive(Debug)]
pub struct AppError(pub MedError);

/// Converts application errors to HTTP responses.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Map error types to HTTP status codes
        let status = match &self.0 {
            MedError::NotFound(_) => StatusCode::NOT_FOUND,
            MedError::Validation(_) => StatusCode::BAD_REQUEST,
            MedError::Conflict(_) => StatusCode::CONFLICT,
            MedError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            MedError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            MedError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Get the error message and format as JSON
        let message = self.0.to_string();
        let body = Json(json!({ "error": message }));

        // Combine status code and JSON body into a response
        (status, body).into_response()
    }
}

/// Automatic conversion from MedError to AppError.
///
/// This implementation allows using `?` operator with functions that
/// return `Result<T, MedError>` in handler functions that return
/// `Result<T, AppError>`.
impl From<MedError> for AppError {
    fn from(err: MedError) -> Self {
        AppError(err)
    }
}

/// Automatic conversion from eyre::Report to AppError.
///
/// Repository functions return `eyre::Result`; this wraps their errors
/// in a `MedError::Database` variant so handlers can use `?` directly.
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(MedError::Database(err))
    }
}
