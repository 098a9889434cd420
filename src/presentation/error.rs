use crate::domain::error::DomainError;
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, ResponseError, error::JsonPayloadError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized";
pub const SERVER_ERROR_MESSAGE: &str = "Internal Server Error";

/// Body of every error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// What the caller sees. Server-side failures stay opaque.
    fn public_message(&self) -> &str {
        match self {
            ApiError::Validation(msg) => msg,
            ApiError::Unauthorized(_) => UNAUTHORIZED_MESSAGE,
            ApiError::NotFound(_) | ApiError::Internal(_) => SERVER_ERROR_MESSAGE,
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            // Missing records surface the way the store reports them.
            ApiError::NotFound(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        match self {
            ApiError::Validation(_) => warn!(error = %self, status = %status, "Validation error"),
            ApiError::Unauthorized(_) => warn!(error = %self, status = %status, "Unauthorized"),
            ApiError::NotFound(_) => warn!(error = %self, status = %status, "Resource not found"),
            ApiError::Internal(_) => error!(error = %self, status = %status, "Internal error"),
        }

        HttpResponse::build(status).json(ErrorResponse {
            error: self.public_message().to_string(),
        })
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast_ref::<DomainError>() {
            Some(DomainError::Validation(msg)) => ApiError::Validation(msg.clone()),
            Some(DomainError::NotFound(msg)) => ApiError::NotFound(msg.clone()),
            Some(DomainError::Unauthorized(msg)) => ApiError::Unauthorized(msg.clone()),
            Some(DomainError::Internal(msg)) => ApiError::Internal(msg.clone()),
            None => ApiError::Internal(format!("{:#}", err)),
        }
    }
}

/// Malformed JSON bodies become validation errors with the uniform body.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::Validation(format!("Invalid request body: {}", err)).into()
}
