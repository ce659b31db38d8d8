//! Error responses.
//!
//! Form-flow and report endpoints answer `{error, message}`; the assignment
//! endpoints answer `{success: false, message}`. Both carry the status code
//! of the underlying [`AppError`].

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde_json::json;
use shepherd_shared::AppError;
use tracing::error;

/// Message returned when an assignment request cannot be understood.
pub const INVALID_REQUEST: &str = "Invalid request";

fn status_of(err: &AppError) -> StatusCode {
    StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

fn log_if_unexpected(err: &AppError) {
    if matches!(err, AppError::Database(_) | AppError::Internal(_)) {
        error!(error = %err, "Request failed");
    }
}

/// Error answered as `{error, message}`.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl ApiError {
    /// Wraps a store failure.
    #[must_use]
    pub fn database(err: &DbErr) -> Self {
        Self(AppError::Database(err.to_string()))
    }
}

impl<E: Into<AppError>> From<E> for ApiError {
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        log_if_unexpected(&self.0);
        (
            status_of(&self.0),
            Json(json!({
                "error": self.0.error_code().to_lowercase(),
                "message": self.0.user_message(),
            })),
        )
            .into_response()
    }
}

/// Error answered as `{success: false, message}`.
#[derive(Debug)]
pub struct AssignError(pub AppError);

impl AssignError {
    /// The request was not a well-formed assignment.
    #[must_use]
    pub fn invalid_request() -> Self {
        Self(AppError::BadRequest(INVALID_REQUEST.to_string()))
    }
}

impl<E: Into<AppError>> From<E> for AssignError {
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for AssignError {
    fn into_response(self) -> Response {
        log_if_unexpected(&self.0);
        (
            status_of(&self.0),
            Json(json!({
                "success": false,
                "message": self.0.user_message(),
            })),
        )
            .into_response()
    }
}

/// Result alias for handlers answering `{error, message}`.
pub type ApiResult<T> = Result<T, ApiError>;
