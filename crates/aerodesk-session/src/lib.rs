//! AeroDesk Session Management
//!
//! Owns the client's belief about the current user:
//! - Credentials persist in durable storage; memory is a cache of it
//! - Two states only: Anonymous and Authenticated
//! - A rejected access token gets exactly one silent refresh and one retry
//! - Background operations never fail past this crate; they fall back to
//!   an anonymous session or a zero cart count

mod error;
mod events;
mod manager;
mod retry;
mod session;
mod token;

#[cfg(test)]
mod testing;

pub use aerodesk_api::Profile;
pub use error::SessionError;
pub use events::{Route, SessionEvent};
pub use manager::{RestoreOutcome, SessionManager, SessionOptions};
pub use retry::RetryOn;
pub use session::{Session, SessionState};
pub use token::{is_well_formed, AccessToken};

pub type Result<T> = std::result::Result<T, SessionError>;
