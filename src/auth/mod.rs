//! Account endpoints: login, signup, availability checks and token refresh.

mod api;
mod repository;
mod types;

pub use api::{AuthApi, RefreshError, TokenRefresher};
#[cfg(test)]
pub use api::MockTokenRefresher;
pub use repository::AuthRepository;
pub use types::{
    Availability, LoginRequest, LoginResponse, RefreshRequest, RefreshResponse, SignupRequest,
};
