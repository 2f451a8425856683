use std::sync::Arc;

use axum::http::{header, Method};
use configs::AppConfig;
use service::storage::{DocumentStore, MongoStore};
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{error, info};

use crate::routes::{self, ServerState};

/// Any origin (mirrored so credentials stay allowed), the four CRUD methods,
/// and the two headers clients send.
pub fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "cannot listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!(event = "shutdown_signal", "received Ctrl+C, draining connections");
}

/// Public entry: connect the database, build the app and serve until Ctrl+C.
/// The database handle is torn down once, after the server has drained.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let addr = cfg.server.bind_addr()?;
    let db = models::db::connect(&cfg.database).await?;
    let store: Arc<dyn DocumentStore> = Arc::new(MongoStore::new(db.clone()));
    let state = ServerState::new(store, &cfg.auth);
    let app = routes::build_router(state, build_cors());

    let listener = match TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            db.shutdown().await;
            return Err(e.into());
        }
    };
    info!(%addr, "Server is running");

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;
    db.shutdown().await;
    served?;
    Ok(())
}
