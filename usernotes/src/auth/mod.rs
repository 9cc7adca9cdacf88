mod backend;
mod errors;
mod routes;

use axum::Router;
use axum_login::AuthManagerLayerBuilder;
use tower_sessions::{
    cookie::{time::Duration, SameSite},
    Expiry, MemoryStore, SessionManagerLayer,
};

pub use backend::{AuthSession, Credentials};
pub use errors::{Error, Result};
pub use routes::router;

use crate::db::DB;

use self::backend::AuthBackend;

pub fn session_layer(expiry_days: i64) -> SessionManagerLayer<MemoryStore> {
    SessionManagerLayer::new(MemoryStore::default())
        .with_secure(false)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(Duration::days(expiry_days)))
}

pub fn add_auth_layer(app: Router, session_layer: SessionManagerLayer<MemoryStore>, db: DB) -> Router {
    let auth_backend = AuthBackend::new(db);
    let auth_layer = AuthManagerLayerBuilder::new(auth_backend, session_layer).build();

    app.layer(auth_layer)
}

pub mod middleware {
    use axum::{extract::Request, middleware::Next, response::Response};

    use super::AuthSession;

    /// Turns anonymous writes away before the route's extractors run, so a
    /// malformed body or id from an anonymous requester still ends at the
    /// login redirect. Safe methods pass through.
    pub async fn login_required(auth_session: AuthSession, request: Request, next: Next) -> crate::Result<Response> {
        if !request.method().is_safe() && auth_session.user.is_none() {
            return Err(crate::Error::Unauthorized);
        }

        Ok(next.run(request).await)
    }
}
