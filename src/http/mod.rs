//! HTTP layer: the authenticated API client and status classification.

mod client;
mod error;

pub use client::{ApiClient, BEARER_PREFIX};
pub use error::{ApiError, check_status, classify_status};

use anyhow::{Context, Result};
use reqwest::Url;

/// Parses a backend base URL, making sure relative joins keep its path.
pub fn parse_base_url(raw: &str) -> Result<Url> {
    let mut normalized = raw.trim().to_string();
    if !normalized.ends_with('/') {
        normalized.push('/');
    }
    Url::parse(&normalized).with_context(|| format!("Invalid API URL: {}", raw))
}
