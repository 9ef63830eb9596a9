//! Session Manager
//!
//! Mediates every authenticated call to the backend and keeps the session
//! cache in step with durable storage. Storage is written first; memory is
//! updated after, and every change is published to subscribers.

use parking_lot::RwLock;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{broadcast, watch, Mutex};

use aerodesk_api::{ApiError, Backend, LoginRequest, Profile};
use aerodesk_storage::{CredentialStore, Database};

use crate::error::{SessionError, INVALID_OAUTH_TOKENS, LOGIN_FAILED, OAUTH_COMPLETION_FAILED};
use crate::events::{Route, SessionEvent};
use crate::retry::RetryOn;
use crate::session::{Session, SessionState};
use crate::token::{self, AccessToken};
use crate::Result;

const EVENT_CAPACITY: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    /// On restore, treat an unreachable or failing backend as an outage and
    /// keep the stored credentials for the next attempt.
    pub keep_credentials_on_outage: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            keep_credentials_on_outage: true,
        }
    }
}

/// Result of restoring the session at application load
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// No usable credentials; storage is empty
    Anonymous,
    /// Stored credentials were accepted
    Restored(Profile),
    /// The backend could not answer; stored credentials were kept
    ServiceUnavailable,
}

/// Why stored credentials are being dropped
#[derive(Debug, Clone, Copy)]
enum Invalidation {
    SignedOut,
    MalformedToken,
    Rejected,
    BackendUnavailable,
    OAuthRollback,
}

impl Invalidation {
    fn as_str(&self) -> &'static str {
        match self {
            Invalidation::SignedOut => "signed_out",
            Invalidation::MalformedToken => "malformed_token",
            Invalidation::Rejected => "rejected",
            Invalidation::BackendUnavailable => "backend_unavailable",
            Invalidation::OAuthRollback => "oauth_rollback",
        }
    }
}

pub struct SessionManager {
    /// In-memory cache of the session
    session: Arc<RwLock<Session>>,
    /// Durable credentials, the source of truth
    store: CredentialStore,
    backend: Arc<dyn Backend>,
    options: SessionOptions,
    /// One user-initiated auth operation at a time
    auth_lock: Arc<Mutex<()>>,
    snapshots: Arc<watch::Sender<Session>>,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionManager {
    pub fn new(db: Database, backend: Arc<dyn Backend>) -> Self {
        Self::with_options(db, backend, SessionOptions::default())
    }

    pub fn with_options(db: Database, backend: Arc<dyn Backend>, options: SessionOptions) -> Self {
        let (snapshots, _) = watch::channel(Session::anonymous());
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        Self {
            session: Arc::new(RwLock::new(Session::anonymous())),
            store: CredentialStore::new(db),
            backend,
            options,
            auth_lock: Arc::new(Mutex::new(())),
            snapshots: Arc::new(snapshots),
            events,
        }
    }

    // === Read access ===

    pub fn session(&self) -> Session {
        self.session.read().clone()
    }

    pub fn state(&self) -> SessionState {
        self.session.read().state()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.read().is_authenticated()
    }

    pub fn cart_item_count(&self) -> u32 {
        self.session.read().cart_item_count()
    }

    pub fn current_user(&self) -> Option<Profile> {
        self.session.read().user().cloned()
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.store
    }

    /// Snapshot stream; the receiver always holds the latest session
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.snapshots.subscribe()
    }

    pub fn events(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    // === User-initiated operations ===

    /// Sign in with a username and password.
    ///
    /// On failure the previous session and stored credentials are untouched.
    pub async fn login(&self, username: &str, password: &str) -> Result<Session> {
        let _guard = self.auth_lock.lock().await;

        if username.trim().is_empty() || password.is_empty() {
            return Err(SessionError::auth(LOGIN_FAILED));
        }

        let request = LoginRequest::new(username, password);
        let response = self.backend.login(&request).await.map_err(|e| {
            tracing::warn!(username = %request.username, error = %e, "Login rejected");
            SessionError::from_api(e, LOGIN_FAILED)
        })?;

        let access_token = AccessToken::parse(response.token).ok_or_else(|| {
            tracing::warn!(username = %request.username, "Login returned a malformed access token");
            SessionError::auth(LOGIN_FAILED)
        })?;

        let profile = response.profile.into_profile(username);

        self.store.store_login(
            access_token.as_str(),
            &response.refresh_token,
            &profile.username,
        )?;
        self.establish(profile, access_token, Some(response.refresh_token));

        self.fetch_cart_count().await;
        self.emit(SessionEvent::Navigate { route: Route::Home });

        Ok(self.session())
    }

    /// Finish an OAuth redirect that delivered a token pair.
    ///
    /// Both tokens are checked before anything is written. Once written, any
    /// failure clears every stored credential again.
    pub async fn handle_oauth_login(&self, access_token: &str, refresh_token: &str) -> Result<Profile> {
        let _guard = self.auth_lock.lock().await;
        self.establish_from_tokens(access_token, refresh_token).await
    }

    /// Exchange the provider's session cookie for a token pair, then sign in
    pub async fn complete_oauth(&self) -> Result<Profile> {
        let _guard = self.auth_lock.lock().await;

        let pair = self.backend.complete_oauth().await.map_err(|e| {
            tracing::warn!(error = %e, "OAuth completion rejected");
            SessionError::from_api(e, OAUTH_COMPLETION_FAILED)
        })?;

        self.establish_from_tokens(&pair.token, &pair.refresh_token)
            .await
    }

    /// Sign out. Never fails: the backend call is best-effort and local
    /// state is cleared regardless.
    pub async fn logout(&self) {
        let _guard = self.auth_lock.lock().await;

        let token = match self.store.access_token() {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(error = %e, "Could not read stored token for logout");
                self.session.read().access_token().map(str::to_string)
            }
        };

        if let Err(e) = self.backend.logout(token.as_deref()).await {
            tracing::warn!(error = %e, "Logout request failed; clearing session anyway");
        }

        self.invalidate(Invalidation::SignedOut);
        self.emit(SessionEvent::Navigate { route: Route::Home });
    }

    // === Background operations ===

    /// Rebuild the session from stored credentials at application load
    pub async fn restore(&self) -> RestoreOutcome {
        let _guard = self.auth_lock.lock().await;

        let stored = match self.store.load() {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!(error = %e, "Could not read stored credentials");
                self.replace_session(Session::anonymous());
                return RestoreOutcome::Anonymous;
            }
        };

        let Some(token) = stored.access_token else {
            self.replace_session(Session::anonymous());
            return RestoreOutcome::Anonymous;
        };

        if !token::is_well_formed(&token) {
            tracing::warn!("Stored access token is malformed");
            self.invalidate(Invalidation::MalformedToken);
            return RestoreOutcome::Anonymous;
        }

        tracing::debug!(username = ?stored.username, "Restoring session");

        let backend = Arc::clone(&self.backend);
        let result = self
            .authorized(token, RetryOn::Unauthorized, |token| {
                let backend = Arc::clone(&backend);
                async move {
                    let profile = backend.fetch_profile(&token).await?;
                    Ok::<_, ApiError>((profile, token))
                }
            })
            .await;

        match result {
            Ok((profile, token)) => {
                let Some(access_token) = AccessToken::parse(token) else {
                    self.invalidate(Invalidation::MalformedToken);
                    return RestoreOutcome::Anonymous;
                };

                if let Err(e) = self.store.set_username(&profile.username) {
                    tracing::warn!(error = %e, "Could not persist username");
                }

                // The refresh token may have been re-read after a silent refresh
                let refresh_token = self.store.refresh_token().ok().flatten();
                self.establish(profile.clone(), access_token, refresh_token);
                self.fetch_cart_count().await;

                RestoreOutcome::Restored(profile)
            }
            Err(e) if e.is_transient() => {
                if self.options.keep_credentials_on_outage {
                    tracing::warn!(error = %e, "Backend unavailable; keeping stored credentials");
                    self.replace_session(Session::anonymous());
                    RestoreOutcome::ServiceUnavailable
                } else {
                    tracing::warn!(error = %e, "Backend unavailable; dropping stored credentials");
                    self.invalidate(Invalidation::BackendUnavailable);
                    RestoreOutcome::Anonymous
                }
            }
            Err(e) => {
                tracing::info!(error = %e, "Stored session rejected");
                self.invalidate(Invalidation::Rejected);
                RestoreOutcome::Anonymous
            }
        }
    }

    /// Refresh the cart badge. Failures degrade to zero and never sign the
    /// user out.
    pub async fn fetch_cart_count(&self) -> u32 {
        if !self.is_authenticated() {
            self.set_cart_count(0);
            return 0;
        }

        let token = match self.store.access_token() {
            Ok(Some(token)) => token,
            Ok(None) => {
                self.set_cart_count(0);
                return 0;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Could not read stored token for cart");
                self.set_cart_count(0);
                return 0;
            }
        };

        let backend = Arc::clone(&self.backend);
        let result = self
            .authorized(token, RetryOn::UnauthorizedOrForbidden, |token| {
                let backend = Arc::clone(&backend);
                async move { backend.fetch_cart(&token).await }
            })
            .await;

        let count = match result {
            Ok(cart) => cart.total_quantity,
            Err(e) => {
                tracing::warn!(error = %e, "Cart count unavailable");
                0
            }
        };

        self.set_cart_count(count);
        count
    }

    /// Trade the stored refresh token for a new access token.
    ///
    /// Returns false on any failure, leaving storage as it was.
    pub async fn refresh_silently(&self) -> bool {
        self.refresh_access_token().await.is_some()
    }

    /// Run an authenticated request with one-shot refresh-and-retry.
    ///
    /// `op` is called with `access_token`. If it fails with a status
    /// `retry_on` covers, the access token is refreshed once and `op` is
    /// called once more with the new token. A failed refresh returns the
    /// original error.
    pub async fn authorized<T, F, Fut>(
        &self,
        access_token: String,
        retry_on: RetryOn,
        op: F,
    ) -> std::result::Result<T, ApiError>
    where
        F: Fn(String) -> Fut,
        Fut: Future<Output = aerodesk_api::Result<T>>,
    {
        match op(access_token).await {
            Err(err) if retry_on.matches(&err) => {
                tracing::debug!(status = ?err.status(), "Access token rejected, refreshing");
                match self.refresh_access_token().await {
                    Some(fresh) => op(fresh.into_inner()).await,
                    None => Err(err),
                }
            }
            other => other,
        }
    }

    // === Internals ===

    async fn refresh_access_token(&self) -> Option<AccessToken> {
        let refresh_token = match self.store.refresh_token() {
            Ok(Some(token)) if !token.is_empty() => token,
            Ok(_) => {
                tracing::debug!("No refresh token stored");
                return None;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Could not read stored refresh token");
                return None;
            }
        };

        let response = match self.backend.refresh_token(&refresh_token).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, "Silent refresh failed");
                return None;
            }
        };

        let Some(access_token) = AccessToken::parse(response.access_token) else {
            tracing::warn!("Silent refresh returned a malformed access token");
            return None;
        };

        match self
            .store
            .rotate_access_token(&refresh_token, access_token.as_str())
        {
            Ok(true) => {}
            Ok(false) => {
                tracing::info!("Credentials changed during refresh; discarding new access token");
                return None;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Could not persist refreshed access token");
                return None;
            }
        }

        let updated = self
            .session
            .write()
            .replace_access_token(access_token.clone());
        if updated {
            self.publish();
        }

        tracing::debug!("Access token refreshed");
        Some(access_token)
    }

    async fn establish_from_tokens(&self, access_token: &str, refresh_token: &str) -> Result<Profile> {
        if access_token.is_empty() || refresh_token.is_empty() {
            return Err(SessionError::auth(INVALID_OAUTH_TOKENS));
        }
        let Some(access_token) = AccessToken::parse(access_token) else {
            return Err(SessionError::auth(INVALID_OAUTH_TOKENS));
        };

        match self.try_establish(access_token, refresh_token).await {
            Ok(profile) => Ok(profile),
            Err(e) => {
                tracing::warn!(error = %e, "OAuth sign-in failed, rolling back");
                self.invalidate(Invalidation::OAuthRollback);
                Err(e)
            }
        }
    }

    async fn try_establish(&self, access_token: AccessToken, refresh_token: &str) -> Result<Profile> {
        self.store
            .store_tokens(access_token.as_str(), refresh_token)?;

        let profile = self
            .backend
            .fetch_profile(access_token.as_str())
            .await
            .map_err(|e| SessionError::from_api(e, INVALID_OAUTH_TOKENS))?;

        self.store.set_username(&profile.username)?;
        self.establish(profile.clone(), access_token, Some(refresh_token.to_string()));
        self.fetch_cart_count().await;

        Ok(profile)
    }

    fn establish(&self, profile: Profile, access_token: AccessToken, refresh_token: Option<String>) {
        let username = profile.username.clone();
        self.replace_session(Session::authenticated(profile, access_token, refresh_token));

        tracing::info!(username = %username, "Session authenticated");
        self.emit(SessionEvent::Authenticated { username });
    }

    /// Drop every stored credential and fall back to an anonymous session
    fn invalidate(&self, reason: Invalidation) {
        if let Err(e) = self.store.clear() {
            tracing::error!(error = %e, "Failed to clear stored credentials");
        }

        let was_authenticated = self.is_authenticated();
        self.replace_session(Session::anonymous());

        tracing::info!(
            reason = reason.as_str(),
            was_authenticated,
            "Session invalidated"
        );
        self.emit(SessionEvent::SignedOut);
    }

    fn set_cart_count(&self, count: u32) {
        let changed = {
            let mut session = self.session.write();
            let changed = session.cart_item_count() != count;
            session.set_cart_item_count(count);
            changed
        };

        if changed {
            self.publish();
        }
        self.emit(SessionEvent::CartUpdated { count });
    }

    fn replace_session(&self, session: Session) {
        *self.session.write() = session;
        self.publish();
    }

    fn publish(&self) {
        let snapshot = self.session.read().clone();
        self.snapshots.send_replace(snapshot);
    }

    fn emit(&self, event: SessionEvent) {
        // No receivers is fine
        let _ = self.events.send(event);
    }
}

impl Clone for SessionManager {
    fn clone(&self) -> Self {
        Self {
            session: Arc::clone(&self.session),
            store: self.store.clone(),
            backend: Arc::clone(&self.backend),
            options: self.options,
            auth_lock: Arc::clone(&self.auth_lock),
            snapshots: Arc::clone(&self.snapshots),
            events: self.events.clone(),
        }
    }
}
