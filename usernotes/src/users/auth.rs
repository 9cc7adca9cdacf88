use argon2::{
    password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rusqlite::{named_params, OptionalExtension, Row};

use crate::db::{self, DB};

use super::*;

#[derive(Clone)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub password: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .field("password", &"[redacted]")
            .finish()
    }
}

impl<'a> TryFrom<&Row<'a>> for User {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'a>) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.get(0)?,
            username: row.get(1)?,
            email: row.get(2)?,
            password: row.get(3)?,
            created_at: row.get(4)?,
            updated_at: row.get(5)?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct CreateUserParameters {
    pub username: String,
    pub email: String,
    /// Already hashed, see [`hash_password`].
    pub password_hash: String,
}

#[derive(Debug, Clone)]
pub struct GetUserByUsernameParameters {
    pub username: String,
}

#[derive(Debug, Clone)]
pub struct GetUserByIdParameters {
    pub user_id: UserId,
}

pub type GetUserResponse = User;

/// Inserts a new account. Returns `None` when the username is already taken.
pub async fn create_user(db: DB, args: CreateUserParameters) -> db::Result<Option<User>> {
    let user = db
        .call(move |conn| {
            conn.query_row(
                r#"INSERT INTO users (username, email, password) VALUES (:username, :email, :password)
                    ON CONFLICT(username) DO NOTHING
                    RETURNING id, username, email, password, created_at, updated_at"#,
                named_params! {
                    ":username": args.username,
                    ":email": args.email,
                    ":password": args.password_hash,
                },
                |r| User::try_from(r),
            )
            .optional()
            .map_err(|e| e.into())
        })
        .await?;

    Ok(user)
}

pub async fn find_one_by_id(db: DB, args: GetUserByIdParameters) -> db::Result<GetUserResponse> {
    let user_id = args.user_id;
    let user = db
        .call(move |conn| {
            conn.query_row(
                "SELECT id, username, email, password, created_at, updated_at FROM users WHERE id = ?",
                [args.user_id],
                |r| User::try_from(r),
            )
            .map_err(|e| e.into())
        })
        .await
        .map_err(db::Error::from)
        .map_err(|e| e.not_found_message(format!("User '{}' not found", user_id)))?;

    Ok(user)
}

pub async fn find_one_by_username(db: DB, args: GetUserByUsernameParameters) -> db::Result<GetUserResponse> {
    let username = args.username.to_owned();
    let user = db
        .call(|conn| {
            conn.query_row(
                "SELECT id, username, email, password, created_at, updated_at FROM users WHERE username = ?",
                [args.username],
                |r| User::try_from(r),
            )
            .map_err(|e| e.into())
        })
        .await
        .map_err(db::Error::from)
        .map_err(|e| e.not_found_message(format!("User '{}' not found", username)))?;

    Ok(user)
}

/// Produces an argon2id PHC string. CPU bound, call from a blocking task.
pub fn hash_password(password: &str) -> password_hash::Result<String> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;

    Ok(hash.to_string())
}

/// CPU bound, call from a blocking task.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    PasswordHash::new(password_hash)
        .map(|parsed| Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok())
        .unwrap_or(false)
}
