use async_trait::async_trait;
use axum_login::AuthUser;
use serde::Deserialize;

use crate::{
    db::{self, DB},
    users::{
        auth::{
            find_one_by_id, find_one_by_username, verify_password, GetUserByIdParameters, GetUserByUsernameParameters,
            User,
        },
        UserId,
    },
};

use super::Error;

#[derive(Clone, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[redacted]")
            .finish()
    }
}

impl AuthUser for User {
    type Id = UserId;

    fn id(&self) -> Self::Id {
        self.id
    }

    fn session_auth_hash(&self) -> &[u8] {
        self.password.as_bytes()
    }
}

#[derive(Clone)]
pub struct AuthBackend {
    db: DB,
}

impl AuthBackend {
    pub fn new(db: DB) -> Self {
        Self { db }
    }

    pub fn db(&self) -> DB {
        self.db.clone()
    }
}

#[async_trait]
impl axum_login::AuthnBackend for AuthBackend {
    type User = User;
    type Credentials = Credentials;
    type Error = Error;

    async fn authenticate(&self, creds: Self::Credentials) -> Result<Option<Self::User>, Self::Error> {
        let user = match find_one_by_username(
            self.db.clone(),
            GetUserByUsernameParameters {
                username: creds.username.clone(),
            },
        )
        .await
        {
            Ok(user) => user,
            Err(db::Error::NotFound(_)) => return Ok(None),
            Err(error) => return Err(error.into()),
        };

        let password_hash = user.password.clone();
        let verified = tokio::task::spawn_blocking(move || verify_password(&creds.password, &password_hash)).await?;

        if !verified {
            tracing::info!("failed login for {}", user.username);
            return Ok(None);
        }

        tracing::info!("{} logged in", user.username);

        Ok(Some(user))
    }

    async fn get_user(&self, user_id: &axum_login::UserId<Self>) -> Result<Option<Self::User>, Self::Error> {
        let user = find_one_by_id(
            self.db.clone(),
            GetUserByIdParameters {
                user_id: user_id.to_owned(),
            },
        )
        .await;

        match user {
            Ok(user) => Ok(Some(user)),
            Err(db::Error::NotFound(_)) => Ok(None),
            Err(error) => Err(error.into()),
        }
    }
}

impl<AuthBackend> From<axum_login::Error<AuthBackend>> for Error
where
    AuthBackend: axum_login::AuthnBackend<Error = Error>,
{
    fn from(error: axum_login::Error<AuthBackend>) -> Self {
        match error {
            axum_login::Error::Session(err) => Error::Session(err),
            axum_login::Error::Backend(err) => err,
        }
    }
}

pub type AuthSession = axum_login::AuthSession<AuthBackend>;
