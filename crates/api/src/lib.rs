//! `api` crate — HTTP REST API layer.
//!
//! Exposes:
//!   POST   /jobs
//!   GET    /jobs?title=&minSalary=&hasEquity=true
//!   GET    /jobs/{id}
//!   PATCH  /jobs/{id}
//!   DELETE /jobs/{id}
//!   GET    /companies/{handle}/jobs
//!   GET    /healthz

pub mod error;
pub mod handlers;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use db::DbPool;

pub use error::ApiError;

/// State shared by every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub pool: DbPool,
}

/// Build the application router over `pool`.
pub fn router(pool: DbPool) -> Router {
    Router::new()
        .route("/jobs", get(handlers::jobs::list).post(handlers::jobs::create))
        .route(
            "/jobs/:id",
            get(handlers::jobs::get)
                .patch(handlers::jobs::update)
                .delete(handlers::jobs::delete),
        )
        .route("/companies/:handle/jobs", get(handlers::jobs::list_for_company))
        .route("/healthz", get(handlers::probes::healthz))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(AppState { pool })
}

/// Bind to `bind` and serve until Ctrl-C.
pub async fn serve(bind: &str, pool: DbPool) -> std::io::Result<()> {
    let listener = TcpListener::bind(bind).await?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, router(pool))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("received ctrl+c interrupt, closing server");
    }
}
