//! Credential storage for the access/refresh token pair.
//!
//! The store is constructed once per process and shared through an
//! `Arc<dyn TokenStore>` by the API client, the auth repository and the CLI.

mod file;
mod memory;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use file::FileTokenStore;
pub use memory::MemoryTokenStore;

/// The persisted token pair. Either half may be absent.
#[derive(Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct Credentials {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

impl Credentials {
    pub fn new(access_token: impl Into<String>, refresh_token: Option<String>) -> Self {
        Self {
            access_token: Some(access_token.into()),
            refresh_token,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.access_token.is_none() && self.refresh_token.is_none()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_token", &self.access_token.as_deref().map(mask_token))
            .field("refresh_token", &self.refresh_token.as_deref().map(mask_token))
            .finish()
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Current access token, if any.
    async fn access(&self) -> Result<Option<String>>;

    /// Current refresh token, if any.
    async fn refresh(&self) -> Result<Option<String>>;

    /// Store a new access token. The refresh token is replaced only when one
    /// is given, otherwise the stored one is kept.
    async fn save(&self, access: &str, refresh: Option<String>) -> Result<()>;

    /// Replace the access token and leave the refresh token alone.
    async fn update_access(&self, access: &str) -> Result<()>;

    /// Forget both tokens.
    async fn clear(&self) -> Result<()>;
}

/// Renders a token for log output without revealing it.
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}****{}", head, tail)
}
