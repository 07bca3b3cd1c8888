//! Authentication error types.

use axum::http::StatusCode;
use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during registration and login.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] mandi_core::EmailError),

    /// Invalid location coordinates.
    #[error("invalid location: {0}")]
    InvalidLocation(#[from] mandi_core::GeoError),

    /// Name missing or blank.
    #[error("name must not be empty")]
    EmptyName,

    /// Unknown role string.
    #[error("invalid role: {0}")]
    InvalidRole(String),

    /// Invalid credentials (wrong password or user not found).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Email already registered.
    #[error("user already exists")]
    UserAlreadyExists,

    /// Password too weak or invalid.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}

impl AuthError {
    /// HTTP status this error maps to.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::InvalidEmail(_)
            | Self::InvalidLocation(_)
            | Self::InvalidRole(_)
            | Self::EmptyName
            | Self::WeakPassword(_) => StatusCode::BAD_REQUEST,
            Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::UserAlreadyExists => StatusCode::CONFLICT,
            Self::Repository(_) | Self::PasswordHash => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing message. Internal detail stays in logs.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::InvalidEmail(e) => format!("Invalid email: {e}."),
            Self::InvalidLocation(_) => "Invalid location coordinates.".to_owned(),
            Self::InvalidRole(role) => format!("Invalid role: {role}."),
            Self::EmptyName => "Name must not be empty.".to_owned(),
            Self::WeakPassword(msg) => format!("Password rejected: {msg}."),
            Self::InvalidCredentials => "Invalid email or password.".to_owned(),
            Self::UserAlreadyExists => "Email is already registered.".to_owned(),
            Self::Repository(_) | Self::PasswordHash => "Internal server error".to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AuthError::InvalidCredentials.status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AuthError::UserAlreadyExists.status(), StatusCode::CONFLICT);
        assert_eq!(
            AuthError::WeakPassword("too short".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AuthError::PasswordHash.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_credentials_message_does_not_leak_which_side_failed() {
        assert_eq!(
            AuthError::InvalidCredentials.message(),
            "Invalid email or password."
        );
    }
}
