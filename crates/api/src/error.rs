//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-side errors to
//! Sentry before responding to the client. All route handlers return
//! `Result<T, AppError>`. Error bodies are JSON: `{"message": "..."}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::gemini::GeminiError;
use crate::services::auth::AuthError;
use crate::services::cart::CartError;
use crate::services::cloudinary::CloudinaryError;
use crate::services::razorpay::RazorpayError;
use crate::services::session::SessionError;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Registration/login failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Session token missing, invalid, or expired.
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Cart operation failed.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Generative AI call failed.
    #[error("AI error: {0}")]
    Gemini(#[from] GeminiError),

    /// Image host call failed.
    #[error("Image host error: {0}")]
    Cloudinary(#[from] CloudinaryError),

    /// Payment gateway call failed.
    #[error("Payment gateway error: {0}")]
    Razorpay(#[from] RazorpayError),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Caller is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Caller's role does not permit the operation.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    const fn status(&self) -> StatusCode {
        match self {
            Self::Database(RepositoryError::Conflict(_)) => StatusCode::CONFLICT,
            Self::Database(_) | Self::Gemini(_) | Self::Cloudinary(_) | Self::Razorpay(_)
            | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Auth(err) => err.status(),
            Self::Cart(err) => err.status(),
            Self::Session(_) | Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    /// Client-facing message. Internal detail is never echoed.
    fn message(&self) -> String {
        match self {
            Self::Database(RepositoryError::Conflict(msg)) => msg.clone(),
            Self::Database(_) | Self::Internal(_) => "Internal server error".to_owned(),
            Self::Gemini(_) => "Failed to analyze produce.".to_owned(),
            Self::Cloudinary(_) => "Failed to upload image.".to_owned(),
            Self::Razorpay(_) => "Payment gateway error.".to_owned(),
            Self::Auth(err) => err.message(),
            Self::Cart(err) => err.message(),
            Self::Session(_) => "Not authorized.".to_owned(),
            Self::BadRequest(msg)
            | Self::Unauthorized(msg)
            | Self::Forbidden(msg)
            | Self::NotFound(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture external-dependency and database failures to Sentry
        if self.status() == StatusCode::INTERNAL_SERVER_ERROR {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let body = Json(json!({ "message": self.message() }));
        (self.status(), body).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::BadRequest("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Unauthorized("x".into()).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Forbidden("x".into()).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(AppError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::Internal("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::Database(RepositoryError::Conflict("email already registered".into()))
                .status(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_internal_detail_not_echoed() {
        let err = AppError::Internal("connection pool exhausted at 10.0.0.3".into());
        assert_eq!(err.message(), "Internal server error");
    }

    #[test]
    fn test_conflict_message_passes_through() {
        let err =
            AppError::Database(RepositoryError::Conflict("email already registered".into()));
        assert_eq!(err.message(), "email already registered");
    }
}
