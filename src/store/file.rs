//! Durable credential store backed by a JSON file.

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{debug, warn};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

use super::{Credentials, TokenStore};
use crate::runtime::Runtime;

pub const CREDENTIALS_FILE: &str = "credentials.json";

/// Stores the token pair in `<dir>/credentials.json`.
///
/// Writes go to a sibling temp file that is renamed over the target, so a
/// crash never leaves a half-written file behind. The file is created with
/// mode 600 on Unix.
pub struct FileTokenStore<R: Runtime> {
    runtime: R,
    path: PathBuf,
    lock: Mutex<()>,
}

impl<R: Runtime> FileTokenStore<R> {
    pub fn new(runtime: R, dir: &Path) -> Self {
        Self {
            runtime,
            path: dir.join(CREDENTIALS_FILE),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Option<String>> {
        if !self.runtime.exists(&self.path) {
            return Ok(None);
        }
        self.runtime
            .read_to_string(&self.path)
            .map(Some)
            .with_context(|| format!("Failed to read credentials from {:?}", self.path))
    }

    fn parse(&self, content: &str) -> Result<Credentials> {
        serde_json::from_str(content).with_context(|| {
            format!(
                "Malformed credentials file {:?}, run `snote login` to replace it",
                self.path
            )
        })
    }

    fn load(&self) -> Result<Credentials> {
        match self.read()? {
            Some(content) => self.parse(&content),
            None => Ok(Credentials::default()),
        }
    }

    fn persist(&self, credentials: &Credentials) -> Result<()> {
        if credentials.is_empty() {
            return self.remove();
        }

        if let Some(parent) = self.path.parent() {
            self.runtime.create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(credentials)?;
        let tmp = self.path.with_extension("json.tmp");
        self.runtime.write_private(&tmp, json.as_bytes())?;
        self.runtime
            .rename(&tmp, &self.path)
            .with_context(|| format!("Failed to store credentials at {:?}", self.path))?;

        debug!("Stored credentials at {:?}", self.path);
        Ok(())
    }

    fn remove(&self) -> Result<()> {
        if self.runtime.exists(&self.path) {
            self.runtime.remove_file(&self.path)?;
            debug!("Removed credentials file {:?}", self.path);
        }
        Ok(())
    }

    /// Read-modify-write under the lock. An unparseable file is overwritten.
    async fn modify(&self, f: impl FnOnce(&mut Credentials) + Send) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut credentials = match self.read()? {
            Some(content) => self.parse(&content).unwrap_or_else(|e| {
                warn!("{:#}; overwriting it", e);
                Credentials::default()
            }),
            None => Credentials::default(),
        };
        f(&mut credentials);
        self.persist(&credentials)
    }
}

#[async_trait]
impl<R: Runtime> TokenStore for FileTokenStore<R> {
    async fn access(&self) -> Result<Option<String>> {
        let _guard = self.lock.lock().await;
        Ok(self.load()?.access_token)
    }

    async fn refresh(&self) -> Result<Option<String>> {
        let _guard = self.lock.lock().await;
        Ok(self.load()?.refresh_token)
    }

    async fn save(&self, access: &str, refresh: Option<String>) -> Result<()> {
        self.modify(|creds| {
            creds.access_token = Some(access.to_string());
            if refresh.is_some() {
                creds.refresh_token = refresh;
            }
        })
        .await
    }

    async fn update_access(&self, access: &str) -> Result<()> {
        self.modify(|creds| creds.access_token = Some(access.to_string()))
            .await
    }

    async fn clear(&self) -> Result<()> {
        let _guard = self.lock.lock().await;
        self.remove()
    }
}
