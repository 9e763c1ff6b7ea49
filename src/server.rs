use axum::extract::DefaultBodyLimit;
use axum::Router;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::db::{bootstrap, create_pool, migrations};
use crate::handlers;
use crate::state::AppState;

/// Largest accepted request body; icon uploads are the only big payloads.
const MAX_BODY_BYTES: usize = 8 * 1024 * 1024;

/// Build the application state and Axum router from a [`Config`].
///
/// Creates the database pool, runs migrations, seeds the default category
/// rows, prepares the icon directory, and assembles the middleware stack.
pub fn build_app(config: Config) -> Result<(AppState, Router), Box<dyn std::error::Error>> {
    let db = create_pool(&config.database_path)?;

    {
        let conn = db.get()?;
        migrations::run_migrations(&conn, &config.migrations_path)?;
        let defaults = bootstrap::ensure_defaults(&conn)?;
        tracing::debug!(?defaults, "Default categories ready");
    }

    let state = AppState::new(db, config);
    state.icons.ensure_dir()?;

    Ok((state.clone(), router(state)))
}

/// Routes plus middleware, without touching the database.
pub fn router(state: AppState) -> Router {
    handlers::routes()
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind the router to `host:port` and spawn the server as a tokio task.
///
/// Returns the actual port the server bound to (useful when `port` is 0 for
/// OS-assigned ports) and a [`JoinHandle`] for the server task.
pub async fn serve(
    app: Router,
    host: &str,
    port: u16,
) -> Result<(u16, JoinHandle<()>), Box<dyn std::error::Error>> {
    let addr = format!("{host}:{port}");
    let listener = TcpListener::bind(&addr).await?;
    let actual_port = listener.local_addr()?.port();

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("Server error: {}", e);
        }
    });

    Ok((actual_port, handle))
}
