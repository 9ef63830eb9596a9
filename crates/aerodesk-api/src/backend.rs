//! Backend trait

use async_trait::async_trait;

use crate::models::{CartSummary, LoginRequest, LoginResponse, Profile, RefreshResponse, TokenPair};
use crate::Result;

/// The booking backend as seen by the session manager.
///
/// Every method maps a non-2xx answer to `ApiError::Status` so callers can
/// decide on refresh-and-retry from the status alone.
#[async_trait]
pub trait Backend: Send + Sync {
    /// `POST /api/login` with credentials; cookies are kept by the client
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse>;

    /// `POST /api/oauth/complete`, authenticated by the provider's session cookie
    async fn complete_oauth(&self) -> Result<TokenPair>;

    /// `GET /api/user/me` with a bearer token
    async fn fetch_profile(&self, access_token: &str) -> Result<Profile>;

    /// `POST /api/token/refresh`
    async fn refresh_token(&self, refresh_token: &str) -> Result<RefreshResponse>;

    /// `GET /api/cart` with a bearer token
    async fn fetch_cart(&self, access_token: &str) -> Result<CartSummary>;

    /// `POST /api/logout`
    async fn logout(&self, access_token: Option<&str>) -> Result<()>;
}
