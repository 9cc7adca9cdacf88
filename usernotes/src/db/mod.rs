mod migrations;

use rusqlite::functions::FunctionFlags;
use tokio_rusqlite::Connection;
use uuid::Uuid;

use crate::config::config;

use migrations::MIGRATIONS;

pub use rusqlite;
pub use tokio_rusqlite;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("not_found")]
    NotFound(String),
    #[error(transparent)]
    TokioRusqlite(tokio_rusqlite::Error),
    #[error(transparent)]
    Rusqlite(rusqlite::Error),
}

impl Error {
    pub fn not_found_message(self, message: impl Into<String>) -> Self {
        if matches!(self, Self::NotFound(_)) {
            return Self::NotFound(message.into());
        }
        self
    }
}

impl From<tokio_rusqlite::Error> for Error {
    fn from(error: tokio_rusqlite::Error) -> Self {
        match error {
            tokio_rusqlite::Error::Rusqlite(rusqlite::Error::QueryReturnedNoRows) => Self::NotFound("Not found".into()),
            error => Self::TokioRusqlite(error),
        }
    }
}

impl From<rusqlite::Error> for Error {
    fn from(error: rusqlite::Error) -> Self {
        match error {
            rusqlite::Error::QueryReturnedNoRows => Self::NotFound("Not found".into()),
            error => Self::Rusqlite(error),
        }
    }
}

pub type DB = Connection;

pub async fn init_db() -> Result<DB> {
    let conn = tokio_rusqlite::Connection::open(&config().database_url).await?;

    conn.call(|conn| {
        add_uuid_functions(conn)?;

        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;

        migrate(conn)
    })
    .await?;

    tracing::debug!("database ready at {}", config().database_url);

    Ok(conn)
}

#[cfg(test)]
pub async fn init_test_db() -> Result<DB> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;

    conn.call(|conn| {
        add_uuid_functions(conn)?;
        conn.pragma_update(None, "foreign_keys", "ON")?;

        migrate(conn)
    })
    .await?;

    Ok(conn)
}

fn migrate(conn: &mut rusqlite::Connection) -> std::result::Result<(), tokio_rusqlite::Error> {
    MIGRATIONS
        .to_latest(conn)
        .map_err(|e| tokio_rusqlite::Error::Other(Box::new(e)))
}

fn add_uuid_functions(conn: &mut rusqlite::Connection) -> rusqlite::Result<()> {
    conn.create_scalar_function("uuid7_now", 0, FunctionFlags::SQLITE_UTF8, |_| Ok(Uuid::now_v7()))?;

    conn.create_scalar_function(
        "uuid_blob",
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let value = ctx.get::<String>(0)?;
            let uuid = Uuid::parse_str(&value).map_err(|e| rusqlite::Error::UserFunctionError(e.into()))?;

            Ok(uuid)
        },
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn migrations_create_tables() -> Result<()> {
        let db = init_test_db().await?;

        let tables = db
            .call(|conn| {
                let tables = conn
                    .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")?
                    .query_map([], |row| row.get::<_, String>(0))?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(tables)
            })
            .await?;

        assert!(tables.contains(&"users".to_string()));
        assert!(tables.contains(&"notes".to_string()));
        Ok(())
    }

    #[tokio::test]
    async fn notes_require_an_existing_owner() -> Result<()> {
        let db = init_test_db().await?;

        let inserted = db
            .call(|conn| {
                Ok(conn.execute(
                    "INSERT INTO notes (owner, title, text) VALUES (uuid_blob('018f6146-32f4-7948-8289-cfb5cdb2b2af'), 't', 'x')",
                    [],
                ))
            })
            .await?;

        assert!(inserted.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn missing_row_maps_to_not_found() -> Result<()> {
        let db = init_test_db().await?;

        let error = db
            .call(|conn| {
                conn.query_row("SELECT id FROM notes WHERE id = uuid7_now()", [], |row| {
                    row.get::<_, Uuid>(0)
                })
                .map_err(|e| e.into())
            })
            .await
            .map_err(Error::from)
            .map_err(|e| e.not_found_message("Note not found"))
            .unwrap_err();

        assert!(matches!(error, Error::NotFound(message) if message == "Note not found"));
        Ok(())
    }
}
