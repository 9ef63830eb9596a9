//! Session data structure

use aerodesk_api::Profile;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::token::AccessToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Anonymous,
    Authenticated,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Anonymous => "anonymous",
            SessionState::Authenticated => "authenticated",
        }
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The client's belief about the current user.
///
/// A session is authenticated exactly when it holds both a profile and a
/// well-formed access token; the constructors are the only way to get
/// either, so the two can't drift apart.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    user: Option<Profile>,
    access_token: Option<AccessToken>,
    refresh_token: Option<String>,
    cart_item_count: u32,
    established_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(
        user: Profile,
        access_token: AccessToken,
        refresh_token: Option<String>,
    ) -> Self {
        Self {
            user: Some(user),
            access_token: Some(access_token),
            refresh_token,
            cart_item_count: 0,
            established_at: Some(Utc::now()),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some() && self.access_token.is_some()
    }

    pub fn state(&self) -> SessionState {
        if self.is_authenticated() {
            SessionState::Authenticated
        } else {
            SessionState::Anonymous
        }
    }

    pub fn user(&self) -> Option<&Profile> {
        self.user.as_ref()
    }

    pub fn username(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.username.as_str())
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_ref().map(AccessToken::as_str)
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    pub fn cart_item_count(&self) -> u32 {
        self.cart_item_count
    }

    pub fn established_at(&self) -> Option<DateTime<Utc>> {
        self.established_at
    }

    pub(crate) fn set_cart_item_count(&mut self, count: u32) {
        self.cart_item_count = count;
    }

    /// Swap in a refreshed access token; anonymous sessions have nothing to update
    pub(crate) fn replace_access_token(&mut self, token: AccessToken) -> bool {
        if self.is_authenticated() {
            self.access_token = Some(token);
            true
        } else {
            false
        }
    }
}
