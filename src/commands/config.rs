use anyhow::{Context, Result};
use log::debug;
use reqwest::Client;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::{
    auth::{AuthApi, AuthRepository},
    http::{ApiClient, parse_base_url},
    notes::NotesApi,
    profile::ProfileApi,
    runtime::Runtime,
    store::{FileTokenStore, TokenStore},
};

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000/";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Settings collected from the command line and environment.
#[derive(Debug, Clone, Default)]
pub struct Options {
    pub api_url: Option<String>,
    pub config_dir: Option<PathBuf>,
    pub timeout: Option<Duration>,
}

/// Everything a command needs, wired around one shared credential store.
pub struct Config {
    pub auth: AuthRepository,
    pub notes: NotesApi,
    pub profile: ProfileApi,
}

impl Config {
    pub fn new<R: Runtime + 'static>(runtime: R, options: &Options) -> Result<Self> {
        let dir = match &options.config_dir {
            Some(dir) => dir.clone(),
            None => default_config_dir(&runtime)?,
        };
        debug!("Using credentials directory {:?}", dir);

        let tokens = Arc::new(FileTokenStore::new(runtime, &dir));
        Self::with_store(tokens, options)
    }

    pub fn with_store(tokens: Arc<dyn TokenStore>, options: &Options) -> Result<Self> {
        let base_url = parse_base_url(options.api_url.as_deref().unwrap_or(DEFAULT_API_URL))?;
        let timeout = options
            .timeout
            .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS));

        let client = Client::builder()
            .user_agent(concat!("snote-cli/", env!("SNOTE_VERSION")))
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        // Login and refresh go over the same transport but never through the
        // decorating client.
        let auth_api = AuthApi::new(client.clone(), base_url.clone());
        let api = ApiClient::new(
            client,
            base_url,
            tokens.clone(),
            Arc::new(auth_api.clone()),
        );

        Ok(Self {
            auth: AuthRepository::new(auth_api, tokens),
            notes: NotesApi::new(api.clone()),
            profile: ProfileApi::new(api),
        })
    }
}

pub fn default_config_dir<R: Runtime>(runtime: &R) -> Result<PathBuf> {
    runtime
        .config_dir()
        .map(|dir| dir.join("snote"))
        .context("Could not determine the config directory; pass --config-dir or set SNOTE_CONFIG_DIR")
}
