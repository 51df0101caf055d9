//! In-process credential store.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::RwLock;

use super::{Credentials, TokenStore};

/// Keeps the token pair in memory. Nothing survives the process.
#[derive(Default)]
pub struct MemoryTokenStore {
    credentials: RwLock<Credentials>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credentials(credentials: Credentials) -> Self {
        Self {
            credentials: RwLock::new(credentials),
        }
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> Credentials {
        self.credentials
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn update(&self, f: impl FnOnce(&mut Credentials)) {
        let mut guard = self.credentials.write().unwrap_or_else(|e| e.into_inner());
        f(&mut guard);
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn access(&self) -> Result<Option<String>> {
        Ok(self.snapshot().access_token)
    }

    async fn refresh(&self) -> Result<Option<String>> {
        Ok(self.snapshot().refresh_token)
    }

    async fn save(&self, access: &str, refresh: Option<String>) -> Result<()> {
        self.update(|creds| {
            creds.access_token = Some(access.to_string());
            if refresh.is_some() {
                creds.refresh_token = refresh;
            }
        });
        Ok(())
    }

    async fn update_access(&self, access: &str) -> Result<()> {
        self.update(|creds| creds.access_token = Some(access.to_string()));
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.update(|creds| *creds = Credentials::default());
        Ok(())
    }
}
