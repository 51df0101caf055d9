use serde::{Deserialize, Serialize};

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct LoginResponse {
    pub access: String,
    pub refresh: String,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SignupRequest {
    pub username: String,
    pub password: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct RefreshRequest<'a> {
    pub refresh_token: &'a str,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct RefreshResponse {
    #[serde(alias = "access")]
    pub access_token: String,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Availability {
    pub available: bool,
}
