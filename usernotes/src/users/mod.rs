use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type UserId = Uuid;

/// Public view of an account, safe to serialize into responses.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
pub struct UserInfo {
    pub id: UserId,
    pub username: String,
    pub email: String,
}

impl From<&auth::User> for UserInfo {
    fn from(user: &auth::User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
        }
    }
}

pub mod auth;
