pub mod auth;
pub mod commands;
pub mod http;
pub mod notes;
pub mod profile;
pub mod runtime;
pub mod store;
