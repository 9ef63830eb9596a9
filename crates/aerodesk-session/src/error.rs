//! Session error types

use thiserror::Error;

pub(crate) const LOGIN_FAILED: &str = "login failed";
pub(crate) const INVALID_OAUTH_TOKENS: &str = "invalid oauth tokens";
pub(crate) const OAUTH_COMPLETION_FAILED: &str = "oauth completion failed";

#[derive(Error, Debug)]
pub enum SessionError {
    /// Credentials rejected or a token failed the shape check
    #[error("Authentication error: {0}")]
    Auth(String),

    /// The backend could not be reached
    #[error("Network error: {0}")]
    Network(String),

    #[error("Storage error: {0}")]
    Storage(#[from] aerodesk_storage::StorageError),
}

impl SessionError {
    pub fn auth(message: &str) -> Self {
        SessionError::Auth(message.to_string())
    }

    pub fn is_auth(&self) -> bool {
        matches!(self, SessionError::Auth(_))
    }

    /// Map a backend failure on a user-initiated call: unreachable backends
    /// stay network errors, anything the server answered becomes `Auth`.
    pub(crate) fn from_api(err: aerodesk_api::ApiError, message: &str) -> Self {
        match err {
            aerodesk_api::ApiError::Network(detail) => SessionError::Network(detail),
            _ => SessionError::auth(message),
        }
    }
}
