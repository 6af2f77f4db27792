use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error as ThisError;

use crate::forms::ValidationRejection;

/// Application error taxonomy. Every storage-layer failure path (uniqueness
/// violation, missing row on get/update/delete) is converted into one of the
/// explicit variants before it can reach a client.
#[derive(Debug, ThisError)]
pub enum AppError {
    #[error("an account with that email already exists")]
    DuplicateEmail,

    #[error("no account with that email")]
    InvalidEmail,

    #[error("incorrect password")]
    InvalidPassword,

    #[error("a cafe with that name already exists")]
    DuplicateName,

    #[error("record not found")]
    NotFound,

    #[error("form validation failed")]
    Validation(ValidationRejection),

    #[error("password hash error: {0}")]
    PasswordHash(String),

    #[error("actor RPC error: {0}")]
    ActorError(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_body) = match self {
            AppError::Database(_) | AppError::ActorError(_) | AppError::PasswordHash(_) => {
                let body = ApiErrorObject {
                    code: "INTERNAL_ERROR".to_string(),
                    message: "An internal server error occurred.".to_string(),
                    details: None,
                };
                (StatusCode::INTERNAL_SERVER_ERROR, body)
            }

            AppError::Validation(rejection) => {
                let details = serde_json::to_value(&rejection).ok();
                let body = ApiErrorObject {
                    code: "VALIDATION_FAILED".to_string(),
                    message: "One or more form fields were invalid.".to_string(),
                    details,
                };
                (StatusCode::UNPROCESSABLE_ENTITY, body)
            }

            AppError::NotFound => {
                let body = ApiErrorObject {
                    code: "NOT_FOUND".to_string(),
                    message: "No record with that id.".to_string(),
                    details: None,
                };
                (StatusCode::NOT_FOUND, body)
            }

            AppError::DuplicateName => {
                let body = ApiErrorObject {
                    code: "DUPLICATE_CAFE_NAME".to_string(),
                    message: "A cafe with that name is already listed.".to_string(),
                    details: None,
                };
                (StatusCode::CONFLICT, body)
            }

            AppError::DuplicateEmail => {
                let body = ApiErrorObject {
                    code: "EMAIL_TAKEN".to_string(),
                    message: "There is already an account with that email. Please log in."
                        .to_string(),
                    details: None,
                };
                (StatusCode::CONFLICT, body)
            }

            AppError::InvalidEmail => {
                let body = ApiErrorObject {
                    code: "UNKNOWN_EMAIL".to_string(),
                    message: "That email does not exist. Try again.".to_string(),
                    details: None,
                };
                (StatusCode::UNAUTHORIZED, body)
            }

            AppError::InvalidPassword => {
                let body = ApiErrorObject {
                    code: "WRONG_PASSWORD".to_string(),
                    message: "Incorrect password. Try again".to_string(),
                    details: None,
                };
                (StatusCode::UNAUTHORIZED, body)
            }
        };
        (status, Json(ApiErrorBody { inner: error_body })).into_response()
    }
}

/// Standardized API error response payload.
#[derive(Serialize)]
pub struct ApiErrorObject {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

#[derive(Serialize)]
pub struct ApiErrorBody {
    #[serde(rename = "error")]
    pub inner: ApiErrorObject,
}
