//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Storage error: {0}")]
    Storage(#[from] aerodesk_storage::StorageError),

    #[error("Session error: {0}")]
    Session(#[from] aerodesk_session::SessionError),

    #[error("API error: {0}")]
    Api(#[from] aerodesk_api::ApiError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}
