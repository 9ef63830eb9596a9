//! Statuses that trigger the one-shot refresh-and-retry

use aerodesk_api::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryOn {
    /// 401 only (profile fetch)
    Unauthorized,
    /// 401 or 403 (cart fetch)
    UnauthorizedOrForbidden,
}

impl RetryOn {
    pub fn matches(&self, err: &ApiError) -> bool {
        match self {
            RetryOn::Unauthorized => err.is_unauthorized(),
            RetryOn::UnauthorizedOrForbidden => err.is_unauthorized() || err.is_forbidden(),
        }
    }
}
