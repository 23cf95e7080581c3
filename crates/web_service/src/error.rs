use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use chat_llm::{CatalogError, LLMError};
use serde::Serialize;
use thiserror::Error;

use crate::identity::IdentityError;

#[derive(Debug, Error)]
pub enum AppError {
    /// A looked-up model does not exist.
    #[error("Model '{0}' not found")]
    ModelNotFound(String),

    /// A request named a model that is not in the catalog.
    #[error("Unknown model: {0}")]
    UnknownModel(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Invalid user id: {0}")]
    InvalidIdentity(#[from] IdentityError),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Internal server error: {0}")]
    InternalError(#[from] anyhow::Error),
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::UnknownModel(id) => AppError::UnknownModel(id),
            other => AppError::InternalError(other.into()),
        }
    }
}

impl From<LLMError> for AppError {
    fn from(err: LLMError) -> Self {
        match err {
            LLMError::Auth(msg) => AppError::Authentication(msg),
            other => AppError::InternalError(other.into()),
        }
    }
}

#[derive(Serialize)]
struct JsonError {
    message: String,
    r#type: String,
}

#[derive(Serialize)]
struct JsonErrorWrapper {
    error: JsonError,
}

impl AppError {
    fn error_type(&self) -> &'static str {
        match self {
            AppError::ModelNotFound(_) => "not_found_error",
            AppError::UnknownModel(_)
            | AppError::InvalidIdentity(_)
            | AppError::InvalidRequest(_) => "invalid_request_error",
            AppError::Authentication(_) => "authentication_error",
            AppError::InternalError(_) => "api_error",
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ModelNotFound(_) => StatusCode::NOT_FOUND,
            AppError::UnknownModel(_) => StatusCode::BAD_REQUEST,
            AppError::Authentication(_) => StatusCode::UNAUTHORIZED,
            AppError::InvalidIdentity(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();
        if status_code.is_server_error() {
            tracing::error!("{}", self);
        }
        let error_response = JsonErrorWrapper {
            error: JsonError {
                message: self.to_string(),
                r#type: self.error_type().to_string(),
            },
        };
        HttpResponse::build(status_code).json(error_response)
    }
}
