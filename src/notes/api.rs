//! Repository for the notes endpoints, routed through [`ApiClient`].

use anyhow::Result;
use reqwest::Method;
use serde_json::{Map, Value};

use super::types::{NoteDto, NoteUpsert};
use crate::http::ApiClient;

const NOTES_PATH: &str = "api/notes/";

/// Query parameters for the note list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoteFilter {
    pub pinned: Option<bool>,
    pub search: Option<String>,
}

#[derive(Clone)]
pub struct NotesApi {
    client: ApiClient,
}

impl NotesApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    fn note_path(id: &str) -> String {
        format!("{}{}/", NOTES_PATH, id)
    }

    /// All notes of the current user, most recently updated first.
    #[tracing::instrument(skip(self))]
    pub async fn list(&self, filter: &NoteFilter) -> Result<Vec<NoteDto>> {
        let mut query: Vec<(&str, &str)> = Vec::new();
        if let Some(pinned) = filter.pinned {
            query.push(("pinned", if pinned { "true" } else { "false" }));
        }
        if let Some(search) = filter.search.as_deref() {
            query.push(("search", search));
        }
        self.client.get_json(NOTES_PATH, &query).await
    }

    /// The 20 most recently updated notes.
    #[tracing::instrument(skip(self))]
    pub async fn recent(&self) -> Result<Vec<NoteDto>> {
        self.client.get_json("api/notes/recent/", &[]).await
    }

    /// The 10 most recently finished notes.
    #[tracing::instrument(skip(self))]
    pub async fn finished(&self) -> Result<Vec<NoteDto>> {
        self.client.get_json("api/notes/finished/", &[]).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn get(&self, id: &str) -> Result<NoteDto> {
        self.client.get_json(&Self::note_path(id), &[]).await
    }

    #[tracing::instrument(skip(self, body), fields(kind = %body.kind))]
    pub async fn create(&self, body: &NoteUpsert) -> Result<NoteDto> {
        self.client.send_json(Method::POST, NOTES_PATH, body).await
    }

    #[tracing::instrument(skip(self, body))]
    pub async fn replace(&self, id: &str, body: &NoteUpsert) -> Result<NoteDto> {
        self.client
            .send_json(Method::PUT, &Self::note_path(id), body)
            .await
    }

    /// Partial update; only the given fields change.
    #[tracing::instrument(skip(self, patch))]
    pub async fn patch(&self, id: &str, patch: &Map<String, Value>) -> Result<NoteDto> {
        self.client
            .send_json(Method::PATCH, &Self::note_path(id), patch)
            .await
    }

    pub async fn set_pinned(&self, id: &str, pinned: bool) -> Result<NoteDto> {
        let mut patch = Map::new();
        patch.insert("pinned".to_string(), Value::Bool(pinned));
        self.patch(id, &patch).await
    }

    pub async fn set_done(&self, id: &str, done: bool) -> Result<NoteDto> {
        let mut patch = Map::new();
        patch.insert("is_done".to_string(), Value::Bool(done));
        self.patch(id, &patch).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.client
            .send_no_content::<()>(Method::DELETE, &Self::note_path(id), None)
            .await
    }
}
