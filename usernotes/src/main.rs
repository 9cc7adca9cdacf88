mod config;

mod app;
mod auth;
mod ctx;
mod db;
mod errors;
mod notes;
mod openapi;
mod shared;
mod state;
mod users;

use std::net::SocketAddr;

use aide::axum::ApiRouter;
use app::AppParams;
pub use config::config;
pub use db::{init_db, DB};
pub use errors::{Error, Result};
use notes::NoteSettings;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> errors::Result<()> {
    let config = config();

    shared::tracing::setup_tracing(config.log_json);

    let conn = init_db().await?;

    let (app, _) = app::create(AppParams {
        db: conn,
        settings: NoteSettings::from(config),
        session_expiry_days: config.session_expiry_days,
        router: |state| ApiRouter::new().merge(notes::router(state)),
    })
    .await?;

    let app = shared::tracing::add_tracing_layer(app);

    let port = config.port;
    let listener = TcpListener::bind(format!("127.0.0.1:{port}"))
        .await
        .map_err(|e| Error::Unexpected(format!("failed to bind port {port}: {e}")))?;

    if let Ok(addr) = listener.local_addr() {
        tracing::info!("listening on http://{addr}");
    }

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .await
        .map_err(|e| Error::Unexpected(format!("server error: {e}")))?;

    Ok(())
}
