use rusqlite::{params, Row};
use sea_query::{Cond, Expr, Iden, Order, Query, SqliteQueryBuilder};
use sea_query_rusqlite::RusqliteBinder;

use crate::{
    db::{self, DB},
    users::UserId,
};

use super::{Note, NoteFields, NoteFilter, NoteId};

#[derive(Iden)]
pub enum Notes {
    Table,
    Id,
    Owner,
    Title,
    Text,
    Published,
    CreatedAt,
    UpdatedAt,
    Rowid,
}

const COLUMNS: &str = "id, owner, title, text, published, created_at, updated_at";

impl<'a> TryFrom<&Row<'a>> for Note {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'a>) -> std::result::Result<Self, Self::Error> {
        Ok(Self {
            id: row.get(0)?,
            owner: row.get(1)?,
            title: row.get(2)?,
            text: row.get(3)?,
            published: row.get(4)?,
            created_at: row.get(5)?,
            updated_at: row.get(6)?,
        })
    }
}

pub async fn get(db: &DB, note_id: NoteId) -> db::Result<Note> {
    db.call(move |conn| {
        let note = conn.query_row(
            &format!("SELECT {COLUMNS} FROM notes WHERE id = ?"),
            params![note_id],
            |row| Note::try_from(row),
        )?;
        Ok(note)
    })
    .await
    .map_err(db::Error::from)
    .map_err(|e| e.not_found_message("Note not found"))
}

pub async fn create(
    db: &DB,
    owner: UserId,
    NoteFields { title, text, published }: NoteFields,
    published_by_default: bool,
) -> db::Result<Note> {
    let published = published.unwrap_or(published_by_default);

    db.call(move |conn| {
        conn.query_row(
            &format!("INSERT INTO notes (owner, title, text, published) VALUES (?, ?, ?, ?) RETURNING {COLUMNS}"),
            params![owner, title, text, published],
            |row| Note::try_from(row),
        )
        .map_err(|e| e.into())
    })
    .await
    .map_err(db::Error::from)
}

/// Replaces title and text. `published` is kept when not given. The owner
/// column is never written.
pub async fn update(db: &DB, note_id: NoteId, NoteFields { title, text, published }: NoteFields) -> db::Result<Note> {
    db.call(move |conn| {
        conn.query_row(
            &format!(
                r#"UPDATE notes SET title = ?, text = ?, published = coalesce(?, published), updated_at = ?
                WHERE id = ?
                RETURNING {COLUMNS}"#
            ),
            params![title, text, published, chrono::Utc::now(), note_id],
            |row| Note::try_from(row),
        )
        .map_err(|e| e.into())
    })
    .await
    .map_err(db::Error::from)
    .map_err(|e| e.not_found_message("Note not found"))
}

pub async fn set_published(db: &DB, note_id: NoteId, published: bool) -> db::Result<Note> {
    db.call(move |conn| {
        conn.query_row(
            &format!(
                r#"UPDATE notes SET published = ?, updated_at = ?
                WHERE id = ?
                RETURNING {COLUMNS}"#
            ),
            params![published, chrono::Utc::now(), note_id],
            |row| Note::try_from(row),
        )
        .map_err(|e| e.into())
    })
    .await
    .map_err(db::Error::from)
    .map_err(|e| e.not_found_message("Note not found"))
}

pub async fn delete(db: &DB, note_id: NoteId) -> db::Result<Note> {
    db.call(move |conn| {
        conn.query_row(
            &format!(
                r#"DELETE FROM notes
                WHERE id = ?
                RETURNING {COLUMNS}"#
            ),
            params![note_id],
            |row| Note::try_from(row),
        )
        .map_err(|e| e.into())
    })
    .await
    .map_err(db::Error::from)
    .map_err(|e| e.not_found_message("Note not found"))
}

/// Notes matching `filter` in insertion order.
pub async fn filter(db: &DB, note_filter: NoteFilter) -> db::Result<Vec<Note>> {
    db.call(move |conn| {
        let (sql, values) = Query::select()
            .columns({
                use Notes::*;
                [Id, Owner, Title, Text, Published, CreatedAt, UpdatedAt]
            })
            .from(Notes::Table)
            .cond_where(
                Cond::all()
                    .add_option(note_filter.owner.map(|owner| Expr::col(Notes::Owner).eq(owner)))
                    .add_option(note_filter.published_only.then(|| Expr::col(Notes::Published).eq(true))),
            )
            .order_by(Notes::Rowid, Order::Asc)
            .build_rusqlite(SqliteQueryBuilder);

        let notes = conn
            .prepare(&sql)?
            .query_map(&*values.as_params(), |row| Note::try_from(row))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(notes)
    })
    .await
    .map_err(db::Error::from)
}
