//! HTTP client that authenticates requests with the stored bearer token and
//! recovers once from an expired access token.

use anyhow::{Context, Result};
use log::{debug, warn};
use reqwest::header::{AUTHORIZATION, HeaderValue};
use reqwest::{Client, Method, Request, RequestBuilder, Response, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::error::check_status;
use crate::auth::TokenRefresher;
use crate::store::{TokenStore, mask_token};

/// Scheme prefix this client writes into `Authorization`.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Authenticated client for the notes backend.
///
/// Every request without an `Authorization` header is decorated with the
/// current access token. If the backend answers a decorated request with 401,
/// the refresh token is exchanged for a new access token once and the request
/// is replayed with it. A failed exchange clears the stored credentials and
/// the original 401 is handed back to the caller.
///
/// Requests that already carry `Authorization` are left alone entirely.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    store: Arc<dyn TokenStore>,
    refresher: Arc<dyn TokenRefresher>,
    // Held while refreshing so concurrent 401s share one exchange.
    refresh_gate: Arc<Mutex<()>>,
}

impl ApiClient {
    pub fn new(
        client: Client,
        base_url: Url,
        store: Arc<dyn TokenStore>,
        refresher: Arc<dyn TokenRefresher>,
    ) -> Self {
        Self {
            client,
            base_url,
            store,
            refresher,
            refresh_gate: Arc::new(Mutex::new(())),
        }
    }

    /// Starts a request against a path relative to the base URL.
    pub fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self
            .base_url
            .join(path)
            .with_context(|| format!("Invalid request path: {}", path))?;
        Ok(self.client.request(method, url))
    }

    /// Sends a request through the decorate / refresh / retry cycle.
    ///
    /// The result is whatever the transport produced for the last request
    /// sent: the replayed request if a refresh happened, otherwise the
    /// original one. Non-success statuses are not turned into errors here.
    #[tracing::instrument(skip(self, request), fields(method = %request.method(), url = %request.url()))]
    pub async fn execute(&self, request: Request) -> reqwest::Result<Response> {
        let (request, decorated) = self.decorate(request).await;

        // Keep a copy for replay; streaming bodies can't be cloned and are
        // never retried.
        let replay = if decorated { request.try_clone() } else { None };

        let response = self.client.execute(request).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        let Some(failed) = replay else {
            debug!("401 on an undecorated or non-replayable request, passing it through");
            return Ok(response);
        };

        match self.authenticate(&failed).await {
            Some(retry) => {
                debug!("Retrying {} {} with refreshed token", retry.method(), retry.url());
                self.client.execute(retry).await
            }
            None => Ok(response),
        }
    }

    /// Adds `Authorization: Bearer <access>` unless the request already has
    /// an `Authorization` header or no access token is stored.
    ///
    /// Returns the request and whether this call added the header.
    pub async fn decorate(&self, mut request: Request) -> (Request, bool) {
        if request.headers().contains_key(AUTHORIZATION) {
            return (request, false);
        }

        let access = match self.store.access().await {
            Ok(Some(token)) if !token.trim().is_empty() => token,
            Ok(_) => return (request, false),
            Err(e) => {
                warn!("Failed to read access token, sending request unauthenticated: {:#}", e);
                return (request, false);
            }
        };

        match bearer(&access) {
            Some(value) => {
                request.headers_mut().insert(AUTHORIZATION, value);
                (request, true)
            }
            None => {
                warn!(
                    "Stored access token {} is not a valid header value, sending request unauthenticated",
                    mask_token(&access)
                );
                (request, false)
            }
        }
    }

    /// Handles a 401 on `failed`, a request this client decorated.
    ///
    /// Returns the request to send instead, or `None` to give up and surface
    /// the original response.
    async fn authenticate(&self, failed: &Request) -> Option<Request> {
        let stale = failed
            .headers()
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix(BEARER_PREFIX))?
            .to_string();

        let _gate = self.refresh_gate.lock().await;

        // Someone else refreshed while we waited for the gate.
        if let Ok(Some(current)) = self.store.access().await {
            if !current.trim().is_empty() && current != stale {
                debug!("Access token was refreshed by a concurrent request, reusing it");
                return with_bearer(failed, &current);
            }
        }

        let refresh = match self.store.refresh().await {
            Ok(Some(token)) if !token.trim().is_empty() => token,
            Ok(_) => {
                debug!("No refresh token stored, not attempting a refresh");
                return None;
            }
            Err(e) => {
                warn!("Failed to read refresh token: {:#}", e);
                return None;
            }
        };

        match self.refresher.refresh(&refresh).await {
            Ok(access) => {
                debug!("Obtained new access token {}", mask_token(&access));
                if let Err(e) = self.store.update_access(&access).await {
                    warn!("Failed to persist refreshed access token: {:#}", e);
                }
                with_bearer(failed, &access)
            }
            Err(e) => {
                warn!("Token refresh failed ({}), clearing stored credentials", e);
                if let Err(e) = self.store.clear().await {
                    warn!("Failed to clear stored credentials: {:#}", e);
                }
                None
            }
        }
    }

    /// Sends a request built from `builder` and fails on non-success statuses.
    async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let request = builder.build().context("Failed to build request")?;
        let response = self
            .execute(request)
            .await
            .context("Failed to send request")?;
        Ok(check_status(response).await?)
    }

    /// Performs a GET request and deserializes the JSON response.
    #[tracing::instrument(skip(self, query))]
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        debug!("GET JSON from {} with query {:?}...", path, query);

        let builder = self.request(Method::GET, path)?.query(query);
        let response = self.send(builder).await?;
        response
            .json::<T>()
            .await
            .context("Failed to parse JSON response")
    }

    /// Sends `body` as JSON and deserializes the JSON response.
    #[tracing::instrument(skip(self, body))]
    pub async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!("{} JSON to {}...", method, path);

        let builder = self.request(method, path)?.json(body);
        let response = self.send(builder).await?;
        response
            .json::<T>()
            .await
            .context("Failed to parse JSON response")
    }

    /// Sends an optional JSON body and ignores the response body.
    #[tracing::instrument(skip(self, body))]
    pub async fn send_no_content<B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        debug!("{} {}...", method, path);

        let mut builder = self.request(method, path)?;
        if let Some(body) = body {
            builder = builder.json(body);
        }
        self.send(builder).await?;
        Ok(())
    }
}

fn bearer(token: &str) -> Option<HeaderValue> {
    let mut value = HeaderValue::from_str(&format!("{}{}", BEARER_PREFIX, token)).ok()?;
    value.set_sensitive(true);
    Some(value)
}

fn with_bearer(request: &Request, token: &str) -> Option<Request> {
    let mut retry = request.try_clone()?;
    retry.headers_mut().insert(AUTHORIZATION, bearer(token)?);
    Some(retry)
}
