//! Session inspection commands
use aerodesk_core::{Profile, RestoreOutcome, Session};
use serde::Serialize;

use super::CommandResult;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SessionInfo {
    pub state: String,
    pub is_authenticated: bool,
    pub user: Option<Profile>,
    pub is_admin: bool,
    pub cart_item_count: u32,
    pub established_at: Option<String>,
}

impl From<Session> for SessionInfo {
    fn from(session: Session) -> Self {
        let is_admin = session.user().is_some_and(Profile::is_admin);
        Self {
            state: session.state().as_str().to_string(),
            is_authenticated: session.is_authenticated(),
            user: session.user().cloned(),
            is_admin,
            cart_item_count: session.cart_item_count(),
            established_at: session.established_at().map(|t| t.to_rfc3339()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StatusInfo {
    pub restore: &'static str,
    pub session: SessionInfo,
}

pub fn restore_label(outcome: &RestoreOutcome) -> &'static str {
    match outcome {
        RestoreOutcome::Anonymous => "anonymous",
        RestoreOutcome::Restored(_) => "restored",
        RestoreOutcome::ServiceUnavailable => "service_unavailable",
    }
}

pub fn status(state: &AppState, outcome: &RestoreOutcome) -> CommandResult<StatusInfo> {
    CommandResult::ok(StatusInfo {
        restore: restore_label(outcome),
        session: state.sessions().session().into(),
    })
}

#[derive(Debug, Serialize)]
pub struct RefreshInfo {
    pub refreshed: bool,
}

pub async fn refresh(state: &AppState) -> CommandResult<RefreshInfo> {
    let refreshed = state.sessions().refresh_silently().await;
    if refreshed {
        CommandResult::ok(RefreshInfo { refreshed })
    } else {
        CommandResult::err("token refresh failed".to_string())
    }
}
