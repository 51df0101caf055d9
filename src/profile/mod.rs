//! Profile endpoints (`api/accounts/me/`, password change).

use anyhow::Result;
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::http::ApiClient;

const ME_PATH: &str = "api/accounts/me/";

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Me {
    pub username: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl Me {
    pub fn display_name(&self) -> String {
        let full = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.trim().is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if full.is_empty() {
            self.username.clone()
        } else {
            full
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: String,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

#[derive(Clone)]
pub struct ProfileApi {
    client: ApiClient,
}

impl ProfileApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    #[tracing::instrument(skip(self))]
    pub async fn me(&self) -> Result<Me> {
        self.client.get_json(ME_PATH, &[]).await
    }

    #[tracing::instrument(skip(self, request))]
    pub async fn update(&self, request: &UpdateProfileRequest) -> Result<Me> {
        self.client.send_json(Method::PATCH, ME_PATH, request).await
    }

    #[tracing::instrument(skip_all)]
    pub async fn change_password(&self, old_password: &str, new_password: &str) -> Result<()> {
        let body = ChangePasswordRequest {
            old_password: old_password.to_string(),
            new_password: new_password.to_string(),
        };
        self.client
            .send_no_content(Method::POST, "api/accounts/change-password/", Some(&body))
            .await
    }
}
