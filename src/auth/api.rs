//! Unauthenticated client for the `api/accounts/` endpoints.

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;
use reqwest::{Client, StatusCode, Url};

use super::types::{
    Availability, LoginRequest, LoginResponse, RefreshRequest, RefreshResponse, SignupRequest,
};
use crate::http::check_status;

const LOGIN_PATH: &str = "api/accounts/token/";
const REFRESH_PATH: &str = "api/accounts/token/refresh/";
const SIGNUP_PATH: &str = "api/accounts/signup/";
const CHECK_USERNAME_PATH: &str = "api/accounts/check_username/";
const CHECK_EMAIL_PATH: &str = "api/accounts/check_email/";

/// Why a refresh exchange failed. Every variant means the refresh token is
/// no longer usable.
#[derive(Debug, thiserror::Error)]
pub enum RefreshError {
    #[error("refresh endpoint rejected the token (HTTP {0})")]
    Rejected(StatusCode),
    #[error("refresh request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid refresh endpoint URL: {0}")]
    Url(String),
}

/// Exchanges a refresh token for a new access token.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    async fn refresh(&self, refresh_token: &str) -> Result<String, RefreshError>;
}

/// Talks to the account endpoints over a client that never attaches
/// credentials on its own.
#[derive(Clone)]
pub struct AuthApi {
    client: Client,
    base_url: Url,
}

impl AuthApi {
    pub fn new(client: Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    #[tracing::instrument(skip(self, request), fields(username = %request.username))]
    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse> {
        let url = self.base_url.join(LOGIN_PATH)?;
        debug!("POST {}", url);

        let response = self
            .client
            .post(url)
            .json(request)
            .send()
            .await
            .context("Failed to send login request")?;

        let response = check_status(response).await?;
        response
            .json::<LoginResponse>()
            .await
            .context("Failed to parse login response")
    }

    #[tracing::instrument(skip(self, request), fields(username = %request.username))]
    pub async fn signup(&self, request: &SignupRequest) -> Result<()> {
        let url = self.base_url.join(SIGNUP_PATH)?;
        debug!("POST {}", url);

        let response = self
            .client
            .post(url)
            .json(request)
            .send()
            .await
            .context("Failed to send signup request")?;

        check_status(response).await?;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub async fn check_username(&self, username: &str) -> Result<bool> {
        self.check_available(CHECK_USERNAME_PATH, "username", username)
            .await
    }

    #[tracing::instrument(skip(self))]
    pub async fn check_email(&self, email: &str) -> Result<bool> {
        self.check_available(CHECK_EMAIL_PATH, "email", email).await
    }

    async fn check_available(&self, path: &str, key: &str, value: &str) -> Result<bool> {
        let url = self.base_url.join(path)?;
        let response = self
            .client
            .get(url)
            .query(&[(key, value)])
            .send()
            .await
            .context("Failed to send availability check")?;

        let response = check_status(response).await?;
        let availability = response
            .json::<Availability>()
            .await
            .context("Failed to parse availability response")?;
        Ok(availability.available)
    }
}

#[async_trait]
impl TokenRefresher for AuthApi {
    #[tracing::instrument(skip(self, refresh_token))]
    async fn refresh(&self, refresh_token: &str) -> Result<String, RefreshError> {
        let url = self
            .base_url
            .join(REFRESH_PATH)
            .map_err(|e| RefreshError::Url(e.to_string()))?;
        debug!("POST {}", url);

        let response = self
            .client
            .post(url)
            .json(&RefreshRequest { refresh_token })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RefreshError::Rejected(status));
        }

        let body = response.json::<RefreshResponse>().await?;
        Ok(body.access_token)
    }
}
