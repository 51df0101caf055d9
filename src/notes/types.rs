use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Note flavour; decides the shape of `data`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum NoteKind {
    Shopping,
    Ideas,
    Goals,
    Routine,
}

impl NoteKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoteKind::Shopping => "shopping",
            NoteKind::Ideas => "ideas",
            NoteKind::Goals => "goals",
            NoteKind::Routine => "routine",
        }
    }
}

impl fmt::Display for NoteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for NoteKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "shopping" => Ok(NoteKind::Shopping),
            "ideas" => Ok(NoteKind::Ideas),
            "goals" => Ok(NoteKind::Goals),
            "routine" => Ok(NoteKind::Routine),
            other => anyhow::bail!(
                "Unknown note kind '{}' (expected shopping, ideas, goals or routine)",
                other
            ),
        }
    }
}

/// A note as the backend returns it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct NoteDto {
    pub id: String,
    pub kind: NoteKind,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default)]
    pub is_done: bool,
    pub finished_at: Option<String>,
    pub bg_color: Option<String>,
    pub reminder_at: Option<String>,
    #[serde(default)]
    pub labels: Vec<String>,
    pub data: Option<serde_json::Value>,
    pub created_at: String,
    pub updated_at: String,
}

impl NoteDto {
    /// Free text of an `ideas` note, if present.
    pub fn body(&self) -> Option<&str> {
        self.data.as_ref()?.get("body")?.as_str()
    }
}

/// Body for create and full replace.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct NoteUpsert {
    pub kind: NoteKind,
    pub title: String,
    pub pinned: bool,
    pub is_done: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bg_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reminder_at: Option<String>,
    pub labels: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl NoteUpsert {
    pub fn new(kind: NoteKind, title: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            pinned: false,
            is_done: false,
            bg_color: None,
            reminder_at: None,
            labels: Vec::new(),
            data: None,
        }
    }
}
