use crate::users::UserId;

use super::Note;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ListScope {
    /// Every owner.
    Global,
    /// Notes of a single owner.
    Owner(UserId),
}

/// Which notes a list request may expose. Translated into SQL by the store,
/// and usable in memory through [`NoteFilter::matches`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteFilter {
    pub owner: Option<UserId>,
    pub published_only: bool,
}

impl NoteFilter {
    /// Global lists only ever show published notes. An owner list shows drafts
    /// only when the owner is the one asking.
    pub fn for_request(requester: Option<UserId>, scope: ListScope) -> Self {
        match scope {
            ListScope::Global => Self {
                owner: None,
                published_only: true,
            },
            ListScope::Owner(owner) => Self {
                owner: Some(owner),
                published_only: requester != Some(owner),
            },
        }
    }

    /// In-memory form of the store query. The store runs the same rules in
    /// SQL; this is what its results are checked against.
    pub fn matches(&self, note: &Note) -> bool {
        let owner_ok = self.owner.map_or(true, |owner| note.owner == owner);
        let published_ok = !self.published_only || note.published;

        owner_ok && published_ok
    }

    /// Keeps the notes that [`NoteFilter::matches`], in their given order.
    pub fn apply(&self, notes: impl IntoIterator<Item = Note>) -> Vec<Note> {
        notes.into_iter().filter(|note| self.matches(note)).collect()
    }
}
