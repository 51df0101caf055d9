//! Command implementations behind the `snote` CLI.

pub mod config;
mod account;
mod notes;

pub use account::{change_password, login, logout, signup, status, whoami};
pub use config::{Config, Options};
pub use notes::{
    NoteListing, build_upsert, create_note, delete_note, format_note_line, list_notes, set_done,
    set_pinned, show_note,
};
