use anyhow::Result;
use log::debug;

use super::config::Config;
use crate::auth::SignupRequest;

#[tracing::instrument(skip(config, password))]
pub async fn login(config: &Config, username: &str, password: &str) -> Result<()> {
    config.auth.login(username, password).await?;
    println!("Logged in as {}", username);
    Ok(())
}

#[tracing::instrument(skip(config))]
pub async fn logout(config: &Config) -> Result<()> {
    config.auth.logout().await?;
    println!("Logged out");
    Ok(())
}

#[tracing::instrument(skip(config, request), fields(username = %request.username))]
pub async fn signup(config: &Config, request: &SignupRequest) -> Result<()> {
    if config.auth.is_username_available(&request.username).await == Some(false) {
        anyhow::bail!("Username '{}' is already taken", request.username);
    }
    if config.auth.is_email_available(&request.email).await == Some(false) {
        anyhow::bail!("Email '{}' is already registered", request.email);
    }

    config.auth.signup(request).await?;
    println!(
        "Account '{}' created. Run `snote login {}` to sign in.",
        request.username, request.username
    );
    Ok(())
}

#[tracing::instrument(skip(config))]
pub async fn whoami(config: &Config) -> Result<()> {
    let me = config.profile.me().await?;
    println!("{} <{}>", me.display_name(), me.email);
    Ok(())
}

/// Reports whether credentials are stored; does not contact the backend.
#[tracing::instrument(skip(config))]
pub async fn status(config: &Config) -> Result<()> {
    if config.auth.is_logged_in().await? {
        println!("Logged in");
    } else {
        println!("Not logged in");
    }
    Ok(())
}

#[tracing::instrument(skip_all)]
pub async fn change_password(config: &Config, old_password: &str, new_password: &str) -> Result<()> {
    config
        .profile
        .change_password(old_password, new_password)
        .await?;
    debug!("Password changed");
    println!("Password changed");
    Ok(())
}
