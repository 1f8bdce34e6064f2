use axum::{routing::get, Router};

use crate::state::AppState;
use crate::ws::handler as ws_handler;

/// Build the axum Router.
///
/// The signaling protocol is the only surface this server exposes: a single
/// WebSocket upgrade endpoint. No REST routes, no persisted files.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/ws", get(ws_handler::ws_upgrade))
        .with_state(state)
}
