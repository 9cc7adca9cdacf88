mod handlers;
mod model;
pub mod policy;
mod routes;
pub(crate) mod store;
mod visibility;

pub use model::*;
pub use visibility::{ListScope, NoteFilter};

use crate::{openapi::aide::axum::ApiRouter, state::AppState};

pub fn router(state: AppState) -> ApiRouter {
    ApiRouter::new().merge(routes::router(state))
}
