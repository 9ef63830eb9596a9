//! Scripted backend for session manager tests

use aerodesk_api::{
    ApiError, Backend, CartSummary, LoginRequest, LoginResponse, Profile, RefreshResponse,
    Result, TokenPair,
};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Notify;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Login(String),
    CompleteOAuth,
    Profile(String),
    Refresh(String),
    Cart(String),
    Logout(Option<String>),
}

/// Each endpoint pops its next scripted answer. An endpoint with nothing
/// scripted fails as unreachable, except logout which succeeds.
#[derive(Default)]
pub struct FakeBackend {
    login: Mutex<VecDeque<Result<LoginResponse>>>,
    oauth: Mutex<VecDeque<Result<TokenPair>>>,
    profile: Mutex<VecDeque<Result<Profile>>>,
    refresh: Mutex<VecDeque<Result<RefreshResponse>>>,
    cart: Mutex<VecDeque<Result<CartSummary>>>,
    logout: Mutex<VecDeque<Result<()>>>,
    calls: Mutex<Vec<Call>>,
    /// Next login waits here after being recorded
    login_gate: Mutex<Option<Arc<Notify>>>,
    /// Runs while a refresh request is in flight
    refresh_hook: Mutex<Option<Box<dyn Fn() + Send + Sync>>>,
}

fn unscripted<T>() -> Result<T> {
    Err(ApiError::Network("no scripted response".to_string()))
}

impl FakeBackend {
    pub fn login_ok(&self, token: &str, refresh: &str, profile: Profile) -> &Self {
        self.login_response(LoginResponse {
            token: token.to_string(),
            refresh_token: refresh.to_string(),
            profile: profile.into(),
        })
    }

    pub fn login_response(&self, response: LoginResponse) -> &Self {
        self.login.lock().push_back(Ok(response));
        self
    }

    /// Hold the next login in flight until the returned handle is notified
    pub fn hold_login(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.login_gate.lock() = Some(Arc::clone(&gate));
        gate
    }

    pub fn on_refresh<F>(&self, hook: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        *self.refresh_hook.lock() = Some(Box::new(hook));
    }

    pub fn login_err(&self, err: ApiError) -> &Self {
        self.login.lock().push_back(Err(err));
        self
    }

    pub fn oauth(&self, result: Result<TokenPair>) -> &Self {
        self.oauth.lock().push_back(result);
        self
    }

    pub fn profile(&self, result: Result<Profile>) -> &Self {
        self.profile.lock().push_back(result);
        self
    }

    pub fn refresh_ok(&self, access_token: &str) -> &Self {
        self.refresh.lock().push_back(Ok(RefreshResponse {
            access_token: access_token.to_string(),
        }));
        self
    }

    pub fn refresh_err(&self, err: ApiError) -> &Self {
        self.refresh.lock().push_back(Err(err));
        self
    }

    pub fn cart(&self, result: Result<u32>) -> &Self {
        self.cart.lock().push_back(result.map(|total_quantity| CartSummary { total_quantity }));
        self
    }

    pub fn logout(&self, result: Result<()>) -> &Self {
        self.logout.lock().push_back(result);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn cart_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Cart(token) => Some(token),
                _ => None,
            })
            .collect()
    }

    pub fn profile_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Profile(token) => Some(token),
                _ => None,
            })
            .collect()
    }

    pub fn refresh_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Refresh(_)))
            .count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().push(call);
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse> {
        self.record(Call::Login(request.username.clone()));
        let gate = self.login_gate.lock().take();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.login.lock().pop_front().unwrap_or_else(unscripted)
    }

    async fn complete_oauth(&self) -> Result<TokenPair> {
        self.record(Call::CompleteOAuth);
        self.oauth.lock().pop_front().unwrap_or_else(unscripted)
    }

    async fn fetch_profile(&self, access_token: &str) -> Result<Profile> {
        self.record(Call::Profile(access_token.to_string()));
        self.profile.lock().pop_front().unwrap_or_else(unscripted)
    }

    async fn refresh_token(&self, refresh_token: &str) -> Result<RefreshResponse> {
        self.record(Call::Refresh(refresh_token.to_string()));
        if let Some(hook) = self.refresh_hook.lock().as_ref() {
            hook();
        }
        self.refresh.lock().pop_front().unwrap_or_else(unscripted)
    }

    async fn fetch_cart(&self, access_token: &str) -> Result<CartSummary> {
        self.record(Call::Cart(access_token.to_string()));
        self.cart.lock().pop_front().unwrap_or_else(unscripted)
    }

    async fn logout(&self, access_token: Option<&str>) -> Result<()> {
        self.record(Call::Logout(access_token.map(|t| t.to_string())));
        self.logout.lock().pop_front().unwrap_or(Ok(()))
    }
}

pub fn alice() -> Profile {
    Profile {
        id: Some(1),
        username: "alice".to_string(),
        email: Some("alice@example.com".to_string()),
        firstname: None,
        lastname: None,
        roles: vec!["ROLE_USER".to_string()],
    }
}
