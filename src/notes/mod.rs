//! Note endpoints (`api/notes/`).

mod api;
mod types;

pub use api::{NoteFilter, NotesApi};
pub use types::{NoteDto, NoteKind, NoteUpsert};
