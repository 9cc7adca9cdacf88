//! Who may do what to a note.
//!
//! Every check is a pure predicate over the requester, the stored note and,
//! for writes that carry one, the submitted owner claim. Callers decide what
//! a denial looks like; nothing here touches the store.

use crate::users::UserId;

use super::{Note, NoteSettings};

/// Requester is logged in and claims to be the owner of what they submit.
pub fn owner_claim_matches(requester: Option<UserId>, owner_claim: UserId) -> bool {
    requester == Some(owner_claim)
}

pub fn is_owner(requester: Option<UserId>, note: &Note) -> bool {
    requester == Some(note.owner)
}

pub fn can_create(requester: Option<UserId>, owner_claim: UserId) -> bool {
    owner_claim_matches(requester, owner_claim)
}

/// Detail fetch by id. Unrestricted unless `hide_unpublished_detail` is set,
/// in which case unpublished notes are visible to their owner only.
pub fn can_view(requester: Option<UserId>, note: &Note, settings: &NoteSettings) -> bool {
    !settings.hide_unpublished_detail || note.published || is_owner(requester, note)
}

/// The claim is evaluated first: a true owner submitting someone else's id is
/// still denied.
pub fn can_update(requester: Option<UserId>, note: &Note, owner_claim: UserId) -> bool {
    owner_claim_matches(requester, owner_claim) && is_owner(requester, note)
}

pub fn can_delete(requester: Option<UserId>, note: &Note) -> bool {
    is_owner(requester, note)
}

pub fn can_publish(requester: Option<UserId>, note: &Note) -> bool {
    is_owner(requester, note)
}

pub fn can_unpublish(requester: Option<UserId>, note: &Note) -> bool {
    is_owner(requester, note)
}
