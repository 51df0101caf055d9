//! Session management on top of [`AuthApi`] and the credential store.

use anyhow::Result;
use log::{debug, info};
use std::sync::Arc;

use super::api::AuthApi;
use super::types::{LoginRequest, SignupRequest};
use crate::store::TokenStore;

pub struct AuthRepository {
    api: AuthApi,
    tokens: Arc<dyn TokenStore>,
}

impl AuthRepository {
    pub fn new(api: AuthApi, tokens: Arc<dyn TokenStore>) -> Self {
        Self { api, tokens }
    }

    /// Exchanges username and password for a token pair and stores it.
    #[tracing::instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<()> {
        let response = self
            .api
            .login(&LoginRequest {
                username: username.to_string(),
                password: password.to_string(),
            })
            .await?;

        self.tokens
            .save(&response.access, Some(response.refresh))
            .await?;
        info!("Logged in as {}", username);
        Ok(())
    }

    #[tracing::instrument(skip(self, request), fields(username = %request.username))]
    pub async fn signup(&self, request: &SignupRequest) -> Result<()> {
        self.api.signup(request).await
    }

    /// Forgets the stored tokens. The backend keeps no session to end.
    #[tracing::instrument(skip(self))]
    pub async fn logout(&self) -> Result<()> {
        self.tokens.clear().await?;
        info!("Logged out");
        Ok(())
    }

    pub async fn is_logged_in(&self) -> Result<bool> {
        Ok(self
            .tokens
            .access()
            .await?
            .is_some_and(|t| !t.trim().is_empty()))
    }

    /// `None` when the check itself failed.
    pub async fn is_username_available(&self, username: &str) -> Option<bool> {
        self.api
            .check_username(username)
            .await
            .inspect_err(|e| debug!("Username availability check failed: {:#}", e))
            .ok()
    }

    /// `None` when the check itself failed.
    pub async fn is_email_available(&self, email: &str) -> Option<bool> {
        self.api
            .check_email(email)
            .await
            .inspect_err(|e| debug!("Email availability check failed: {:#}", e))
            .ok()
    }
}
