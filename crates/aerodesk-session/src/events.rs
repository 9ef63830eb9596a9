//! Session events

use serde::Serialize;

/// Views the session manager can send the UI to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Route {
    Home,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    Authenticated { username: String },
    SignedOut,
    CartUpdated { count: u32 },
    Navigate { route: Route },
}
