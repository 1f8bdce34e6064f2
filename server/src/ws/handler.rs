use axum::{
    extract::{ws::WebSocketUpgrade, State},
    response::Response,
};

use crate::state::AppState;
use crate::ws::actor;

/// GET /ws
///
/// WebSocket upgrade endpoint. Clients are anonymous and exist only for the
/// lifetime of the connection, so there is no authentication step; every
/// upgrade spawns a connection actor directly.
pub async fn ws_upgrade(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| actor::run_connection(socket, state))
}
