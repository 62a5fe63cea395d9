use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // Exchange Errors
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("HTTP status {status}: {body}")]
    HttpStatus {
        status: u16,
        body: String,
    },

    #[error("exchange rejected request: ret_code={code}, ret_msg={message}")]
    ApiError {
        code: i64,
        message: String,
    },

    #[error("Deserialization failed: {0}")]
    DeserializationError(String),

    // Storage Errors
    #[error("Storage error: {0}")]
    StorageError(#[from] sqlx::Error),

    // System Errors
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

pub type Result<T> = std::result::Result<T, Error>;
