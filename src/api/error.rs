use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{error::Error, warning};

/// Error returned by route handlers, rendered as a plain-text body.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Unauthorized(String),
    NotFound(String),
    Internal(String),
}

impl ApiError {
    /// Logs `err` in full and maps it to a response carrying only `message`.
    ///
    /// Missing authentication and a missing video keep their own status codes,
    /// everything else becomes a 500.
    pub fn from_error(message: &str, err: Error) -> Self {
        warning!("{}: {}", message, err);
        match err {
            Error::NotAuthenticated => ApiError::Unauthorized(err.to_string()),
            Error::NoVideoMatch(_) => {
                ApiError::NotFound("No video found for the given track name".into())
            }
            _ => ApiError::Internal(message.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg).into_response(),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg).into_response(),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg).into_response(),
        }
    }
}
