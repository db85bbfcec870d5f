mod auth;
pub mod routes;

use std::net::SocketAddr;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use common::{Error, Result, TradingMode};
use engine::{OrchestratorHandle, SqliteJournal};

/// Shared application state injected into every route handler.
#[derive(Clone)]
pub struct AppState {
    pub journal: SqliteJournal,
    /// Read-only view of the trade gate.
    pub gate: OrchestratorHandle,
    pub trading_mode: TradingMode,
    pub dashboard_token: String,
}

/// Assemble the full router. Split from `serve` so tests can drive it directly.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_headers(Any)
        .allow_methods(Any);

    Router::new()
        .merge(routes::api_router(state.clone()))
        .merge(routes::health_router())
        .with_state(state)
        .layer(cors)
}

/// Build and run the Axum API server.
pub async fn serve(state: AppState, port: u16) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!(%addr, "Dashboard API listening");
    axum::serve(listener, app(state))
        .await
        .map_err(|e| Error::Other(format!("dashboard server stopped: {e}")))
}
