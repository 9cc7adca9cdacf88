use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use tower_sessions::session;

use crate::db;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid_credentials")]
    InvalidCredentials,
    #[error("username_taken")]
    UsernameTaken,
    #[error("validation")]
    Validation(String),

    #[error("password_hash")]
    PasswordHash(String),

    #[error(transparent)]
    DB(#[from] db::Error),

    #[error(transparent)]
    Session(#[from] session::Error),
    #[error(transparent)]
    Task(#[from] tokio::task::JoinError),
}

impl From<argon2::password_hash::Error> for Error {
    fn from(error: argon2::password_hash::Error) -> Self {
        Self::PasswordHash(error.to_string())
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    pub error: String,
    pub message: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: Option<String>) -> Self {
        Self {
            error: error.into(),
            message,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        match self {
            Error::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse::new("invalid_credentials", None)),
            ),
            Error::UsernameTaken => (
                StatusCode::CONFLICT,
                Json(ErrorResponse::new("username_taken", None)),
            ),
            Error::Validation(message) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new("validation", Some(message))),
            ),
            err => {
                tracing::error!("{err:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::new("unexpected", Some("Unexpected error".into()))),
                )
            }
        }
        .into_response()
    }
}

pub type Result<T> = std::result::Result<T, Error>;
