use crate::{ctx::BaseParams, Error, Result};

use super::{
    policy, store, validate_fields, CreateNote, FindNotesResponse, ListScope, Note, NoteFilter, NoteId, UpdateNote,
};

pub async fn find_notes(scope: ListScope, BaseParams { db, ctx, .. }: BaseParams) -> Result<FindNotesResponse> {
    let filter = NoteFilter::for_request(ctx.get_user_id(), scope);
    let notes = store::filter(&db, filter).await?;

    Ok(FindNotesResponse { results: notes })
}

pub async fn get_note(note_id: NoteId, BaseParams { db, ctx, settings }: BaseParams) -> Result<Note> {
    let note = store::get(&db, note_id).await?;

    if !policy::can_view(ctx.get_user_id(), &note, &settings) {
        return Err(Error::NotFound("Note not found".into()));
    }

    Ok(note)
}

pub async fn create_note(
    CreateNote {
        owner,
        title,
        text,
        published,
    }: CreateNote,
    BaseParams { db, ctx, settings }: BaseParams,
) -> Result<Note> {
    let requester = ctx.get_user_id().ok_or(Error::Unauthorized)?;

    if !policy::can_create(Some(requester), owner) {
        tracing::info!(%requester, claim = %owner, "note create denied");
        return Err(Error::Forbidden);
    }

    let fields = validate_fields(title, text, published).map_err(Error::Validation)?;
    let note = store::create(&db, requester, fields, settings.published_by_default).await?;

    tracing::debug!(note_id = %note.id, owner = %note.owner, "note created");

    Ok(note)
}

pub async fn update_note(
    note_id: NoteId,
    UpdateNote {
        owner,
        title,
        text,
        published,
    }: UpdateNote,
    BaseParams { db, ctx, .. }: BaseParams,
) -> Result<Note> {
    let requester = ctx.get_user_id().ok_or(Error::Unauthorized)?;

    // checked before the note is loaded
    if !policy::owner_claim_matches(Some(requester), owner) {
        tracing::info!(%note_id, %requester, claim = %owner, "note update denied");
        return Err(Error::Forbidden);
    }

    let note = store::get(&db, note_id).await?;
    if !policy::can_update(Some(requester), &note, owner) {
        tracing::info!(%note_id, %requester, "note update denied");
        return Err(Error::Forbidden);
    }

    let fields = validate_fields(title, text, published).map_err(Error::Validation)?;
    let note = store::update(&db, note_id, fields).await?;

    Ok(note)
}

pub async fn delete_note(note_id: NoteId, BaseParams { db, ctx, .. }: BaseParams) -> Result<Note> {
    let requester = ctx.get_user_id().ok_or(Error::Unauthorized)?;

    let note = store::get(&db, note_id).await?;
    if !policy::can_delete(Some(requester), &note) {
        tracing::info!(%note_id, %requester, "note delete denied");
        return Err(Error::Forbidden);
    }

    Ok(store::delete(&db, note_id).await?)
}

pub async fn publish_note(note_id: NoteId, base: BaseParams) -> Result<Note> {
    set_published(note_id, true, base).await
}

pub async fn unpublish_note(note_id: NoteId, base: BaseParams) -> Result<Note> {
    set_published(note_id, false, base).await
}

async fn set_published(note_id: NoteId, published: bool, BaseParams { db, ctx, .. }: BaseParams) -> Result<Note> {
    let requester = ctx.get_user_id().ok_or(Error::Unauthorized)?;

    let note = store::get(&db, note_id).await?;
    let allowed = if published {
        policy::can_publish(Some(requester), &note)
    } else {
        policy::can_unpublish(Some(requester), &note)
    };

    if !allowed {
        tracing::info!(%note_id, %requester, published, "note publish change denied");
        return Err(Error::Forbidden);
    }

    if note.published == published {
        return Ok(note);
    }

    Ok(store::set_published(&db, note_id, published).await?)
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::{
        ctx::{Ctx, User},
        db::{init_test_db, DB},
        notes::{store::tests::count, store::tests::insert_user, NoteSettings},
        users::UserId,
    };

    fn base(db: &DB, user: Option<UserId>) -> BaseParams {
        base_with(db, user, NoteSettings::default())
    }

    fn base_with(db: &DB, user: Option<UserId>, settings: NoteSettings) -> BaseParams {
        let user = user.map(|id| User {
            id,
            username: "someone".into(),
        });
        BaseParams::new(db.clone(), Ctx::new(user), settings)
    }

    fn create_args(owner: UserId, title: &str, published: Option<bool>) -> CreateNote {
        CreateNote {
            owner,
            title: title.into(),
            text: "basic note text".into(),
            published,
        }
    }

    fn update_args(owner: UserId) -> UpdateNote {
        UpdateNote {
            owner,
            title: "new note title".into(),
            text: "new note text".into(),
            published: None,
        }
    }

    #[tokio::test]
    async fn create_as_anonymous_is_unauthorized() -> Result<()> {
        let db = init_test_db().await?;
        let alice = insert_user(&db, "alice").await;

        let result = create_note(create_args(alice, "t", Some(true)), base(&db, None)).await;

        assert!(matches!(result, Err(Error::Unauthorized)));
        assert_eq!(count(&db).await, 0);
        Ok(())
    }

    #[tokio::test]
    async fn create_for_other_user_is_forbidden() -> Result<()> {
        let db = init_test_db().await?;
        let alice = insert_user(&db, "alice").await;
        let bob = insert_user(&db, "bob").await;

        let result = create_note(create_args(bob, "t", Some(true)), base(&db, Some(alice))).await;

        assert!(matches!(result, Err(Error::Forbidden)));
        assert_eq!(count(&db).await, 0);
        Ok(())
    }

    #[tokio::test]
    async fn create_validates_after_authorization() -> Result<()> {
        let db = init_test_db().await?;
        let alice = insert_user(&db, "alice").await;
        let bob = insert_user(&db, "bob").await;

        let result = create_note(create_args(bob, " ", Some(true)), base(&db, Some(alice))).await;
        assert!(matches!(result, Err(Error::Forbidden)));

        let result = create_note(create_args(alice, " ", Some(true)), base(&db, Some(alice))).await;
        assert!(matches!(result, Err(Error::Validation(_))));
        assert_eq!(count(&db).await, 0);
        Ok(())
    }

    #[tokio::test]
    async fn create_uses_configured_default() -> Result<()> {
        let db = init_test_db().await?;
        let alice = insert_user(&db, "alice").await;

        let note = create_note(create_args(alice, "a", None), base(&db, Some(alice))).await?;
        assert!(!note.published);

        let settings = NoteSettings {
            published_by_default: true,
            ..Default::default()
        };
        let note = create_note(create_args(alice, "b", None), base_with(&db, Some(alice), settings)).await?;
        assert!(note.published);
        Ok(())
    }

    #[tokio::test]
    async fn update_by_owner() -> Result<()> {
        let db = init_test_db().await?;
        let alice = insert_user(&db, "alice").await;
        let note = create_note(create_args(alice, "t", Some(true)), base(&db, Some(alice))).await?;

        let updated = update_note(note.id, update_args(alice), base(&db, Some(alice))).await?;

        assert_eq!(updated.text, "new note text");
        assert_eq!(updated.owner, alice);
        assert!(updated.published);
        Ok(())
    }

    #[tokio::test]
    async fn update_cannot_change_owner() -> Result<()> {
        let db = init_test_db().await?;
        let alice = insert_user(&db, "alice").await;
        let bob = insert_user(&db, "bob").await;
        let note = create_note(create_args(alice, "t", Some(true)), base(&db, Some(alice))).await?;

        let result = update_note(note.id, update_args(bob), base(&db, Some(alice))).await;
        assert!(matches!(result, Err(Error::Forbidden)));

        let stored = store::get(&db, note.id).await?;
        assert_eq!(stored.owner, alice);
        assert_eq!(stored.text, "basic note text");
        Ok(())
    }

    #[tokio::test]
    async fn update_of_other_users_note_is_forbidden() -> Result<()> {
        let db = init_test_db().await?;
        let alice = insert_user(&db, "alice").await;
        let bob = insert_user(&db, "bob").await;
        let note = create_note(create_args(alice, "t", Some(true)), base(&db, Some(alice))).await?;

        for claim in [alice, bob] {
            let result = update_note(note.id, update_args(claim), base(&db, Some(bob))).await;
            assert!(matches!(result, Err(Error::Forbidden)));
        }

        let result = update_note(note.id, update_args(alice), base(&db, None)).await;
        assert!(matches!(result, Err(Error::Unauthorized)));

        assert_eq!(store::get(&db, note.id).await?.text, "basic note text");
        Ok(())
    }

    #[tokio::test]
    async fn update_claim_is_checked_before_lookup() -> Result<()> {
        let db = init_test_db().await?;
        let alice = insert_user(&db, "alice").await;
        let bob = insert_user(&db, "bob").await;
        let missing = Uuid::now_v7();

        let result = update_note(missing, update_args(bob), base(&db, Some(alice))).await;
        assert!(matches!(result, Err(Error::Forbidden)));

        let result = update_note(missing, update_args(alice), base(&db, Some(alice))).await;
        assert!(matches!(result, Err(Error::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn delete_rules() -> Result<()> {
        let db = init_test_db().await?;
        let alice = insert_user(&db, "alice").await;
        let bob = insert_user(&db, "bob").await;
        let note = create_note(create_args(alice, "t", Some(true)), base(&db, Some(alice))).await?;

        assert!(matches!(delete_note(note.id, base(&db, None)).await, Err(Error::Unauthorized)));
        assert!(matches!(delete_note(note.id, base(&db, Some(bob))).await, Err(Error::Forbidden)));
        assert_eq!(count(&db).await, 1);

        delete_note(note.id, base(&db, Some(alice))).await?;
        assert_eq!(count(&db).await, 0);

        assert!(matches!(
            delete_note(note.id, base(&db, Some(alice))).await,
            Err(Error::NotFound(_))
        ));
        Ok(())
    }

    #[tokio::test]
    async fn publish_and_unpublish_rules() -> Result<()> {
        let db = init_test_db().await?;
        let alice = insert_user(&db, "alice").await;
        let bob = insert_user(&db, "bob").await;
        let note = create_note(create_args(alice, "t", Some(false)), base(&db, Some(alice))).await?;

        assert!(matches!(publish_note(note.id, base(&db, Some(bob))).await, Err(Error::Forbidden)));
        assert!(!store::get(&db, note.id).await?.published);

        assert!(publish_note(note.id, base(&db, Some(alice))).await?.published);
        assert!(publish_note(note.id, base(&db, Some(alice))).await?.published);

        assert!(matches!(unpublish_note(note.id, base(&db, None)).await, Err(Error::Unauthorized)));
        assert!(matches!(unpublish_note(note.id, base(&db, Some(bob))).await, Err(Error::Forbidden)));
        assert!(store::get(&db, note.id).await?.published);

        assert!(!unpublish_note(note.id, base(&db, Some(alice))).await?.published);
        assert!(!unpublish_note(note.id, base(&db, Some(alice))).await?.published);
        Ok(())
    }

    #[tokio::test]
    async fn detail_visibility_follows_settings() -> Result<()> {
        let db = init_test_db().await?;
        let alice = insert_user(&db, "alice").await;
        let bob = insert_user(&db, "bob").await;
        let draft = create_note(create_args(alice, "draft", Some(false)), base(&db, Some(alice))).await?;

        assert_eq!(get_note(draft.id, base(&db, None)).await?.title, "draft");

        let hidden = NoteSettings {
            hide_unpublished_detail: true,
            ..Default::default()
        };
        assert!(matches!(
            get_note(draft.id, base_with(&db, Some(bob), hidden)).await,
            Err(Error::NotFound(_))
        ));
        assert_eq!(get_note(draft.id, base_with(&db, Some(alice), hidden)).await?.title, "draft");
        Ok(())
    }

    #[tokio::test]
    async fn list_scopes() -> Result<()> {
        let db = init_test_db().await?;
        let alice = insert_user(&db, "alice").await;
        let bob = insert_user(&db, "bob").await;
        create_note(create_args(alice, "alice-published", Some(true)), base(&db, Some(alice))).await?;
        create_note(create_args(alice, "alice-draft", Some(false)), base(&db, Some(alice))).await?;
        create_note(create_args(bob, "bob-published", Some(true)), base(&db, Some(bob))).await?;

        let titles = |response: FindNotesResponse| response.results.into_iter().map(|n| n.title).collect::<Vec<_>>();

        let global = find_notes(ListScope::Global, base(&db, Some(alice))).await?;
        assert_eq!(titles(global), vec!["alice-published", "bob-published"]);

        let own = find_notes(ListScope::Owner(alice), base(&db, Some(alice))).await?;
        assert_eq!(titles(own), vec!["alice-published", "alice-draft"]);

        let other = find_notes(ListScope::Owner(alice), base(&db, Some(bob))).await?;
        assert_eq!(titles(other), vec!["alice-published"]);

        let anonymous = find_notes(ListScope::Owner(alice), base(&db, None)).await?;
        assert_eq!(titles(anonymous), vec!["alice-published"]);
        Ok(())
    }
}
