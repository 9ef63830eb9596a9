//! Sign-in and sign-out commands
use aerodesk_core::Profile;

use super::session::SessionInfo;
use super::CommandResult;
use crate::state::AppState;

pub async fn login(state: &AppState, username: String, password: String) -> CommandResult<SessionInfo> {
    match state.sessions().login(&username, &password).await {
        Ok(session) => CommandResult::ok(session.into()),
        Err(e) => {
            tracing::warn!(username = %username, error = %e, "Login command failed");
            CommandResult::err(e.to_string())
        }
    }
}

pub async fn oauth(
    state: &AppState,
    access_token: String,
    refresh_token: String,
) -> CommandResult<Profile> {
    match state
        .sessions()
        .handle_oauth_login(&access_token, &refresh_token)
        .await
    {
        Ok(profile) => CommandResult::ok(profile),
        Err(e) => CommandResult::err(e.to_string()),
    }
}

pub async fn oauth_complete(state: &AppState) -> CommandResult<Profile> {
    match state.sessions().complete_oauth().await {
        Ok(profile) => CommandResult::ok(profile),
        Err(e) => CommandResult::err(e.to_string()),
    }
}

pub async fn logout(state: &AppState) -> CommandResult<SessionInfo> {
    state.sessions().logout().await;
    CommandResult::ok(state.sessions().session().into())
}
