use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use derive_more::Display;
use serde_json::json;

use crate::store::StoreError;

/// Client-correctable problems with a payload or query.
#[derive(Debug, Display, PartialEq)]
pub enum ValidationError {
    #[display(fmt = "Please fill in all required fields.")]
    MissingFields,
    #[display(fmt = "Unknown request type: {}", _0)]
    UnknownType(String),
    #[display(fmt = "Invalid date: {}", _0)]
    InvalidDate(String),
    #[display(fmt = "Cannot request vacation/permits on {}.", _0)]
    BlockedDateConflict(String),
    #[display(fmt = "No request selected.")]
    EmptySelection,
    #[display(fmt = "Date missing.")]
    MissingDate,
    #[display(fmt = "Invalid month: {}", _0)]
    InvalidMonth(String),
    #[display(fmt = "Malformed request: {}", _0)]
    MalformedBody(String),
}

#[derive(Debug, Display, PartialEq)]
pub enum AuthError {
    #[display(fmt = "Token missing")]
    MissingToken,
    #[display(fmt = "Invalid credentials.")]
    InvalidCredentials,
    #[display(fmt = "Invalid or expired token")]
    InvalidOrExpiredToken,
}

#[derive(Debug, Display, PartialEq)]
pub enum ConflictError {
    #[display(fmt = "The date is already blocked.")]
    DateAlreadyBlocked,
}

#[derive(Debug, Display)]
pub enum AppError {
    #[display(fmt = "{}", _0)]
    Validation(ValidationError),
    #[display(fmt = "{}", _0)]
    Auth(AuthError),
    #[display(fmt = "{}", _0)]
    Conflict(ConflictError),
    /// The request is stored; only the notification failed.
    #[display(fmt = "Request saved, but the notification email could not be sent.")]
    Delivery(String),
    #[display(fmt = "Internal Server Error")]
    Internal(String),
}

impl std::error::Error for AppError {}

impl From<ValidationError> for AppError {
    fn from(e: ValidationError) -> Self {
        AppError::Validation(e)
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        AppError::Auth(e)
    }
}

impl From<ConflictError> for AppError {
    fn from(e: ConflictError) -> Self {
        AppError::Conflict(e)
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::Internal(e.to_string())
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::Conflict(_) => StatusCode::BAD_REQUEST,
            AppError::Auth(AuthError::InvalidCredentials) => StatusCode::UNAUTHORIZED,
            AppError::Auth(_) => StatusCode::FORBIDDEN,
            AppError::Delivery(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Delivery(detail) | AppError::Internal(detail) => {
                tracing::error!(error = %detail, "{}", self);
            }
            _ => {}
        }

        HttpResponse::build(self.status_code()).json(json!({
            "message": self.to_string()
        }))
    }
}
