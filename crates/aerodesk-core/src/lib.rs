//! AeroDesk Core
//!
//! Wires durable storage, the backend client, and the session manager
//! into one `Client` the application shell owns.

mod client;
mod config;
mod error;

pub use client::Client;
pub use config::Config;
pub use error::CoreError;

// Re-export core components
pub use aerodesk_api::{ApiError, Backend, HttpBackend, Profile};
pub use aerodesk_session::{
    RestoreOutcome, Route, Session, SessionError, SessionEvent, SessionManager, SessionOptions,
    SessionState,
};
pub use aerodesk_storage::{CredentialStore, Database, StorageError};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
