use axum::{
    extract::{Extension, FromRequestParts},
    http::request::Parts,
    response::{IntoResponse, Response},
    RequestPartsExt,
};
use schemars::JsonSchema;
use serde::Serialize;

use crate::{auth::AuthSession, notes::NoteSettings, users::UserId, DB};

#[derive(Clone, Debug, FromRequestParts)]
pub struct BaseParams {
    pub ctx: Ctx,
    #[from_request(via(Extension))]
    pub db: DB,
    #[from_request(via(Extension))]
    pub settings: NoteSettings,
}

impl BaseParams {
    /// Builds the params by hand for calling handlers without a request.
    pub fn new(db: DB, ctx: Ctx, settings: NoteSettings) -> Self {
        Self { db, ctx, settings }
    }
}

#[derive(Debug, Serialize, Clone, JsonSchema)]
pub struct User {
    pub id: UserId,
    pub username: String,
}

/// Identity of the requester, `None` for anonymous requests.
#[derive(Clone, Debug)]
pub struct Ctx {
    pub user: Option<User>,
}

impl Ctx {
    pub fn new(user: Option<User>) -> Self {
        Self { user }
    }

    pub fn get_user_id(&self) -> Option<UserId> {
        self.user.as_ref().map(|u| u.id)
    }
}

impl<S> FromRequestParts<S> for Ctx
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extract::<AuthSession>()
            .await
            .map_err(|e| e.into_response())?
            .user
            .map(|u| User {
                id: u.id,
                username: u.username,
            });

        Ok(Self { user })
    }
}
