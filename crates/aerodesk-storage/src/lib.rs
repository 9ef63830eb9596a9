//! AeroDesk Storage Layer
//!
//! SQLite-backed durable storage for client credentials.
//! Storage is the source of truth across restarts; in-memory session
//! state is rebuilt from it on load.

mod credentials;
mod database;
mod error;
mod migrations;

pub use credentials::{
    CredentialStore, StoredCredentials, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, USERNAME_KEY,
};
pub use database::Database;
pub use error::StorageError;

pub type Result<T> = std::result::Result<T, StorageError>;
