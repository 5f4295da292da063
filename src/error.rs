use std::io;

use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Network unreachable, or a non-2xx answer without a readable body.
    #[error("{0}")]
    Transport(String),
    /// The mail service answered with a structured error.
    #[error("{0}")]
    Service(String),
    #[error("{0}")]
    EmptyResult(String),
    #[error("{0}")]
    Precondition(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("url parse error: {0}")]
    Url(#[from] url::ParseError),
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return AppError::Transport("mail service did not answer in time".to_string());
        }
        if err.is_connect() {
            return AppError::Transport("mail service is unreachable".to_string());
        }
        if err.is_decode() {
            return AppError::Transport(format!("malformed response from mail service: {err}"));
        }

        AppError::Transport(format!("request to mail service failed: {err}"))
    }
}
