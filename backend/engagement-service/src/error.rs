/// Error types for the engagement service.
///
/// Every error converts to an HTTP response with a JSON body of
/// `{error, status}` so API clients get one shape regardless of where the
/// failure happened.
use actix_web::{
    error::ResponseError,
    http::{header, StatusCode},
    HttpResponse,
};
use std::fmt;

use crate::store::StoreError;

/// Result type for engagement-service operations
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types
#[derive(Debug)]
pub enum AppError {
    /// Request body or query validation failed
    ValidationError(String),

    /// Malformed request input
    BadRequest(String),

    /// Resource not found
    NotFound(String),

    /// Client exceeded its request budget
    RateLimited { retry_after_secs: u64 },

    /// A dependency is unavailable
    ServiceUnavailable(String),

    /// Internal server error
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::RateLimited { retry_after_secs } => {
                write!(f, "Rate limit exceeded, retry in {}s", retry_after_secs)
            }
            AppError::ServiceUnavailable(msg) => write!(f, "Service unavailable: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let error_msg = self.to_string();

        let mut builder = HttpResponse::build(status);
        if let AppError::RateLimited { retry_after_secs } = self {
            builder.insert_header((header::RETRY_AFTER, retry_after_secs.to_string()));
        }

        builder.json(serde_json::json!({
            "error": error_msg,
            "status": status.as_u16(),
        }))
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => AppError::NotFound(id),
            StoreError::Unavailable(msg) => AppError::ServiceUnavailable(msg),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}
