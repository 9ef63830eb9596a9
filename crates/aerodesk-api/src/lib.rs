//! AeroDesk Backend API
//!
//! Typed view of the booking backend's authentication endpoints:
//! login, OAuth completion, profile, token refresh, cart, and logout.
//! `Backend` is the seam the session manager talks through;
//! `HttpBackend` is the reqwest implementation.

mod backend;
mod error;
mod http;
mod models;

pub use backend::Backend;
pub use error::ApiError;
pub use http::{paths, HttpBackend};
pub use models::{
    CartSummary, LoginProfile, LoginRequest, LoginResponse, Profile, RefreshRequest,
    RefreshResponse, TokenPair, ADMIN_ROLE,
};

pub type Result<T> = std::result::Result<T, ApiError>;
