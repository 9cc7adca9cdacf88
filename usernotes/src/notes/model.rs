use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{config::Config, users::UserId};

pub type NoteId = Uuid;

pub const TITLE_MAX_LEN: usize = 200;
pub const TEXT_MAX_LEN: usize = 10_000;

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Note {
    pub id: NoteId,
    pub owner: UserId,
    pub title: String,
    pub text: String,
    pub published: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Create payload. `owner` is the caller's claim and must name the requester.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateNote {
    pub owner: UserId,
    pub title: String,
    pub text: String,
    pub published: Option<bool>,
}

/// Full replacement of title and text. `owner` is checked but never written.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct UpdateNote {
    pub owner: UserId,
    pub title: String,
    pub text: String,
    pub published: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct FindNotesResponse {
    pub results: Vec<Note>,
}

/// Fields handed to the store once a request has been authorized and validated.
#[derive(Debug, Clone)]
pub struct NoteFields {
    pub title: String,
    pub text: String,
    pub published: Option<bool>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NoteSettings {
    /// `published` for create requests that leave it out.
    pub published_by_default: bool,
    /// Treat unpublished notes as missing when a non-owner asks for them by id.
    pub hide_unpublished_detail: bool,
}

impl From<&Config> for NoteSettings {
    fn from(config: &Config) -> Self {
        Self {
            published_by_default: config.notes_published_by_default,
            hide_unpublished_detail: config.notes_hide_unpublished_detail,
        }
    }
}

/// Trims the title and checks lengths.
pub fn validate_fields(title: String, text: String, published: Option<bool>) -> Result<NoteFields, String> {
    let title = title.trim().to_string();
    if title.is_empty() {
        return Err("title must not be empty".into());
    }
    if title.chars().count() > TITLE_MAX_LEN {
        return Err(format!("title must be at most {TITLE_MAX_LEN} characters"));
    }
    if text.chars().count() > TEXT_MAX_LEN {
        return Err(format!("text must be at most {TEXT_MAX_LEN} characters"));
    }

    Ok(NoteFields { title, text, published })
}
