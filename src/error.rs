use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// API-level failure taxonomy. Every variant maps to one status code and a
/// machine-readable message; plaintext passwords never appear in any of them.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("user already exists")]
    UserAlreadyExists,
    #[error("invalid email")]
    InvalidEmail,
    #[error("invalid password")]
    InvalidPassword,
    #[error("email does not match the authenticated user")]
    EmailMismatch,
    #[error("invalid credentials")]
    Unauthorized,
    #[error("invalid image")]
    InvalidImage,
    #[error("profile image already exists")]
    ImageAlreadyExists,
    #[error("image not found")]
    ImageNotFound,
    #[error("service unavailable")]
    Unavailable,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub status: u16,
    pub message: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::UserAlreadyExists
            | ApiError::InvalidEmail
            | ApiError::InvalidPassword
            | ApiError::EmailMismatch
            | ApiError::InvalidImage
            | ApiError::ImageAlreadyExists => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::ImageNotFound => StatusCode::NOT_FOUND,
            ApiError::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::Internal(e) => {
                error!(error = %e, "internal error");
                "internal server error".to_string()
            }
            other => other.to_string(),
        };
        let body = ErrorBody {
            status: status.as_u16(),
            message,
        };
        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        ApiError::Internal(e.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(ApiError::UserAlreadyExists.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::InvalidEmail.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::InvalidPassword.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::EmailMismatch.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::ImageAlreadyExists.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::ImageNotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::Unavailable.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn unauthorized_message_does_not_distinguish_cause() {
        // Unknown email and wrong password must render identically.
        assert_eq!(ApiError::Unauthorized.to_string(), "invalid credentials");
    }

    #[test]
    fn internal_error_is_not_leaked() {
        let err = ApiError::Internal(anyhow::anyhow!("connection refused to 10.0.0.3"));
        let body = ErrorBody {
            status: err.status().as_u16(),
            message: "internal server error".into(),
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(!json.contains("10.0.0.3"));
        assert!(json.contains("500"));
    }
}
