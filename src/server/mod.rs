//! # HTTP Server for Project Storage, Preview and Export
//!
//! ## Usage
//!
//! ```bash
//! knitgrid serve --listen 127.0.0.1:3000 --data-dir data/projects
//! ```
//!
//! ## Routes
//!
//! | Method | Path | Response |
//! |--------|------|----------|
//! | GET | `/api/projects` | `[{id, name}]` |
//! | POST | `/api/projects` | 201 `{id}` |
//! | GET | `/api/projects/:id` | project document or 404 |
//! | PUT | `/api/projects/:id` | `{id, message}` (id changes on rename) |
//! | DELETE | `/api/projects/:id` | `{message}`, idempotent |
//! | GET | `/api/projects/:id/preview` | PNG of a viewport |
//! | GET | `/api/projects/:id/export` | PDF download |
//! | POST | `/api/export/pdf` | PDF download of the posted document |

mod handlers;
mod state;

pub use state::{AppState, ServerConfig};

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::KnitError;

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/api/projects",
            get(handlers::projects::list).post(handlers::projects::create),
        )
        .route(
            "/api/projects/:id",
            get(handlers::projects::get)
                .put(handlers::projects::update)
                .delete(handlers::projects::delete),
        )
        .route("/api/projects/:id/preview", get(handlers::export::preview))
        .route("/api/projects/:id/export", get(handlers::export::project_pdf))
        .route("/api/export/pdf", post(handlers::export::document_pdf))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server.
///
/// ## Example
///
/// ```no_run
/// use knitgrid::server::{serve, ServerConfig};
///
/// # async fn example() -> Result<(), knitgrid::error::KnitError> {
/// let config = ServerConfig {
///     listen_addr: "127.0.0.1:3000".to_string(),
///     data_dir: "data/projects".into(),
/// };
///
/// serve(config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn serve(config: ServerConfig) -> Result<(), KnitError> {
    let app_state = Arc::new(AppState::new(config.clone())?);
    let app = router(app_state);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .map_err(|e| KnitError::Server(format!("Failed to bind to {}: {}", config.listen_addr, e)))?;

    info!(
        listen = %config.listen_addr,
        data_dir = %config.data_dir.display(),
        "knitgrid HTTP server started"
    );

    axum::serve(listener, app)
        .await
        .map_err(|e| KnitError::Server(format!("Server error: {}", e)))?;

    Ok(())
}
