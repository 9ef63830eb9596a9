//! reqwest implementation of the backend contract

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

use crate::backend::Backend;
use crate::error::ApiError;
use crate::models::{
    CartSummary, LoginRequest, LoginResponse, Profile, RefreshRequest, RefreshResponse, TokenPair,
};
use crate::Result;

/// Endpoint paths, relative to the configured base URL
pub mod paths {
    pub const LOGIN: &str = "api/login";
    pub const OAUTH_COMPLETE: &str = "api/oauth/complete";
    pub const PROFILE: &str = "api/user/me";
    pub const TOKEN_REFRESH: &str = "api/token/refresh";
    pub const CART: &str = "api/cart";
    pub const LOGOUT: &str = "api/logout";
}

pub struct HttpBackend {
    client: Client,
    base_url: Url,
}

impl HttpBackend {
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self> {
        // Login and logout rely on the backend's session cookie
        let client = Client::builder()
            .cookie_store(true)
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, mut base_url: Url) -> Self {
        // Url::join drops the last segment unless the base ends in '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Self { client, base_url }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", path, e)))
    }

    async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), url = %response.url(), "Backend rejected request");
            return Err(ApiError::Status(status.as_u16()));
        }

        Ok(response)
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = self.send(request).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse> {
        let url = self.endpoint(paths::LOGIN)?;
        self.send_json(self.client.post(url).json(request)).await
    }

    async fn complete_oauth(&self) -> Result<TokenPair> {
        let url = self.endpoint(paths::OAUTH_COMPLETE)?;
        self.send_json(self.client.post(url)).await
    }

    async fn fetch_profile(&self, access_token: &str) -> Result<Profile> {
        let url = self.endpoint(paths::PROFILE)?;
        self.send_json(self.client.get(url).bearer_auth(access_token))
            .await
    }

    async fn refresh_token(&self, refresh_token: &str) -> Result<RefreshResponse> {
        let url = self.endpoint(paths::TOKEN_REFRESH)?;
        let body = RefreshRequest {
            refresh_token: refresh_token.to_string(),
        };
        self.send_json(self.client.post(url).json(&body)).await
    }

    async fn fetch_cart(&self, access_token: &str) -> Result<CartSummary> {
        let url = self.endpoint(paths::CART)?;
        self.send_json(self.client.get(url).bearer_auth(access_token))
            .await
    }

    async fn logout(&self, access_token: Option<&str>) -> Result<()> {
        let url = self.endpoint(paths::LOGOUT)?;
        let mut request = self.client.post(url);
        if let Some(token) = access_token {
            request = request.bearer_auth(token);
        }

        self.send(request).await?;
        Ok(())
    }
}
