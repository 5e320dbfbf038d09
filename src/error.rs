use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] redb::Error),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::error::EncodeError),

    #[error("Deserialization error: {0}")]
    Deserialization(#[from] bincode::error::DecodeError),

    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),

    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User not authorized")]
    Forbidden,

    #[error("User already exists")]
    UserAlreadyExists,

    #[error("Email is already in use")]
    EmailInUse,

    #[error("User not found")]
    UserNotFound,

    #[error("Set not found")]
    SetNotFound,

    #[error("Card not found")]
    CardNotFound,
}

impl AppError {
    /// Whether this error came from the persistence layer rather than the request
    pub fn is_storage_failure(&self) -> bool {
        matches!(
            self,
            AppError::Database(_)
                | AppError::Transaction(_)
                | AppError::Table(_)
                | AppError::Storage(_)
                | AppError::Commit(_)
                | AppError::Serialization(_)
                | AppError::Deserialization(_)
                | AppError::TaskJoin(_)
        )
    }
}

/// Implement IntoResponse to convert AppError into HTTP responses
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_storage_failure() {
            tracing::error!("{}", self);
            return internal_error();
        }

        let (status, error_message) = match self {
            AppError::Token(ref e) => {
                tracing::error!("Token error: {:?}", e);
                return internal_error();
            }
            AppError::InvalidInput(ref msg) => (StatusCode::BAD_REQUEST, msg.as_str()),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "No valid token, authorization denied"),
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "Invalid credentials"),
            AppError::Forbidden => (StatusCode::FORBIDDEN, "User not authorized"),
            AppError::UserAlreadyExists => (StatusCode::CONFLICT, "User already exists"),
            AppError::EmailInUse => (StatusCode::CONFLICT, "Email is already in use"),
            AppError::UserNotFound => (StatusCode::NOT_FOUND, "User not found"),
            AppError::SetNotFound => (StatusCode::NOT_FOUND, "Set not found"),
            AppError::CardNotFound => (StatusCode::NOT_FOUND, "Card not found"),
            _ => return internal_error(),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}

fn internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Internal server error" })),
    )
        .into_response()
}

/// Result type alias for application results
pub type Result<T> = std::result::Result<T, AppError>;
