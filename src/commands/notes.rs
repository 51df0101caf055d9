use anyhow::{Result, bail};
use log::debug;

use super::config::Config;
use crate::notes::{NoteDto, NoteFilter, NoteKind, NoteUpsert};

/// Which list endpoint to read.
#[derive(Debug, Clone, PartialEq)]
pub enum NoteListing {
    All(NoteFilter),
    Recent,
    Finished,
}

/// One line per note: id, kind, flags and title.
pub fn format_note_line(note: &NoteDto) -> String {
    let mut flags = String::new();
    if note.pinned {
        flags.push('*');
    }
    if note.is_done {
        flags.push('x');
    }
    let title = if note.title.is_empty() {
        "(untitled)"
    } else {
        note.title.as_str()
    };
    let mut line = format!("{}  {:<8}  {:<2} {}", note.id, note.kind, flags, title);
    if !note.labels.is_empty() {
        line.push_str(&format!("  [{}]", note.labels.join(", ")));
    }
    line
}

#[tracing::instrument(skip(config))]
pub async fn list_notes(config: &Config, listing: &NoteListing) -> Result<()> {
    let notes = match listing {
        NoteListing::All(filter) => config.notes.list(filter).await?,
        NoteListing::Recent => config.notes.recent().await?,
        NoteListing::Finished => config.notes.finished().await?,
    };

    if notes.is_empty() {
        println!("No notes.");
        return Ok(());
    }

    debug!("Found {} note(s)", notes.len());
    for note in &notes {
        println!("{}", format_note_line(note));
    }
    Ok(())
}

#[tracing::instrument(skip(config))]
pub async fn show_note(config: &Config, id: &str) -> Result<()> {
    let note = config.notes.get(id).await?;
    println!("{}", serde_json::to_string_pretty(&note)?);
    Ok(())
}

/// Builds the create body. A free-text body is only meaningful for ideas.
pub fn build_upsert(
    kind: NoteKind,
    title: &str,
    body: Option<&str>,
    pinned: bool,
    labels: &[String],
) -> Result<NoteUpsert> {
    let mut upsert = NoteUpsert::new(kind, title);
    upsert.pinned = pinned;
    upsert.labels = labels.to_vec();
    if let Some(body) = body {
        if kind != NoteKind::Ideas {
            bail!("--body is only supported for ideas notes, not {}", kind);
        }
        upsert.data = Some(serde_json::json!({ "body": body }));
    }
    Ok(upsert)
}

#[tracing::instrument(skip(config, upsert), fields(kind = %upsert.kind))]
pub async fn create_note(config: &Config, upsert: &NoteUpsert) -> Result<()> {
    let note = config.notes.create(upsert).await?;
    println!("Created {}", format_note_line(&note));
    Ok(())
}

#[tracing::instrument(skip(config))]
pub async fn delete_note(config: &Config, id: &str) -> Result<()> {
    config.notes.delete(id).await?;
    println!("Deleted {}", id);
    Ok(())
}

#[tracing::instrument(skip(config))]
pub async fn set_pinned(config: &Config, id: &str, pinned: bool) -> Result<()> {
    let note = config.notes.set_pinned(id, pinned).await?;
    println!("{}", format_note_line(&note));
    Ok(())
}

#[tracing::instrument(skip(config))]
pub async fn set_done(config: &Config, id: &str, done: bool) -> Result<()> {
    let note = config.notes.set_done(id, done).await?;
    println!("{}", format_note_line(&note));
    Ok(())
}
