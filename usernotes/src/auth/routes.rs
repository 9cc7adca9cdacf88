use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::{
    auth::{Error, Result},
    state::AppState,
    users::{
        auth::{create_user, hash_password, CreateUserParameters},
        UserInfo,
    },
};

use super::backend::{AuthSession, Credentials};

const MIN_PASSWORD_LEN: usize = 8;
const USERNAME_LEN: std::ops::RangeInclusive<usize> = 3..=150;

#[derive(Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl SignupRequest {
    fn validate(&self) -> Result<()> {
        let username_len = self.username.chars().count();
        if !USERNAME_LEN.contains(&username_len) {
            return Err(Error::Validation(format!(
                "username must be {} to {} characters",
                USERNAME_LEN.start(),
                USERNAME_LEN.end()
            )));
        }
        if !self
            .username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
        {
            return Err(Error::Validation(
                "username may only contain letters, digits and @/./+/-/_".into(),
            ));
        }
        if !self.email.contains('@') {
            return Err(Error::Validation("email is not valid".into()));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(Error::Validation(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct MeResponse {
    pub user: Option<UserInfo>,
}

pub fn router(state: AppState) -> Router<()> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/me", get(me))
        .with_state(state)
}

pub async fn signup(auth_session: AuthSession, Json(args): Json<SignupRequest>) -> Result<impl IntoResponse> {
    args.validate()?;

    let SignupRequest {
        username,
        email,
        password,
    } = args;

    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password)).await??;

    let user = create_user(
        auth_session.backend.db(),
        CreateUserParameters {
            username,
            email,
            password_hash,
        },
    )
    .await?
    .ok_or(Error::UsernameTaken)?;

    tracing::info!("{} signed up", user.username);

    Ok((StatusCode::CREATED, Json(UserInfo::from(&user))))
}

pub async fn login(mut auth_session: AuthSession, Json(creds): Json<Credentials>) -> Result<Json<UserInfo>> {
    let user = auth_session
        .authenticate(creds)
        .await?
        .ok_or(Error::InvalidCredentials)?;

    auth_session.login(&user).await?;

    Ok(Json(UserInfo::from(&user)))
}

pub async fn logout(mut auth_session: AuthSession) -> Result<Redirect> {
    auth_session.logout().await?;
    Ok(Redirect::to("/api/v1/notes"))
}

pub async fn me(auth_session: AuthSession) -> Json<MeResponse> {
    Json(MeResponse {
        user: auth_session.user.as_ref().map(UserInfo::from),
    })
}
