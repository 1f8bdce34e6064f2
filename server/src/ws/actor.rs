//! Actor-per-connection WebSocket handling.

use axum::extract::ws::{CloseFrame, Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{interval, timeout};

use crate::pairing::signaling;
use crate::state::AppState;
use crate::ws::protocol::{self, ServerMessage};

/// Ping interval: server sends a WebSocket ping every 30 seconds so
/// abruptly dropped clients cannot leak registry or pool entries.
const PING_INTERVAL: Duration = Duration::from_secs(30);

/// Pong timeout: if no pong arrives within 10 seconds after a ping, close.
const PONG_TIMEOUT: Duration = Duration::from_secs(10);

/// Run the actor for one client connection.
///
/// Splits the WebSocket into reader and writer halves:
/// - Writer task: owns the sink, forwards messages from an mpsc channel
/// - Reader loop: parses incoming frames and dispatches them
///
/// The mpsc sender is what the registry hands out, so the matchmaker and
/// router can push messages to this client from any task.
pub async fn run_connection(socket: WebSocket, state: AppState) {
    let (ws_sender, mut ws_receiver) = socket.split();
    let (tx, rx) = mpsc::unbounded_channel::<Message>();

    // Register, then immediately tell the client its id — it tags every
    // negotiation message it sends with it.
    let client_id = state.connections.register(tx.clone());
    protocol::send_message(
        &tx,
        &ServerMessage::Id {
            id: client_id.clone(),
        },
    );

    tracing::info!(client = %client_id, "connection actor started");

    // Writer task: forwards mpsc messages to the WebSocket sink.
    let writer_handle = tokio::spawn(writer_task(ws_sender, rx));

    // Track pong reception for the keepalive.
    let (pong_tx, mut pong_rx) = mpsc::unbounded_channel::<()>();

    let ping_tx = tx.clone();
    let ping_handle = tokio::spawn(async move {
        let mut ping_timer = interval(PING_INTERVAL);
        // Skip the first immediate tick
        ping_timer.tick().await;

        loop {
            ping_timer.tick().await;

            if ping_tx.send(Message::Ping(vec![1, 2, 3, 4].into())).is_err() {
                // Writer task has died — connection is gone
                break;
            }

            match timeout(PONG_TIMEOUT, pong_rx.recv()).await {
                Ok(Some(())) => {}
                _ => {
                    tracing::warn!("pong timeout, closing connection");
                    let _ = ping_tx.send(Message::Close(Some(CloseFrame {
                        code: 1001,
                        reason: "Pong timeout".into(),
                    })));
                    break;
                }
            }
        }
    });

    // Reader loop: all session state transitions are driven from here.
    loop {
        match ws_receiver.next().await {
            Some(Ok(msg)) => match msg {
                Message::Text(text) => {
                    protocol::handle_text_message(text.as_str(), &state, &client_id);
                }
                Message::Binary(_) => {
                    tracing::debug!(
                        client = %client_id,
                        "ignoring binary frame (protocol is JSON text)"
                    );
                }
                Message::Pong(_) => {
                    let _ = pong_tx.send(());
                }
                Message::Ping(data) => {
                    let _ = tx.send(Message::Pong(data));
                }
                Message::Close(frame) => {
                    tracing::info!(
                        client = %client_id,
                        reason = ?frame,
                        "client initiated close"
                    );
                    break;
                }
            },
            Some(Err(e)) => {
                tracing::warn!(
                    client = %client_id,
                    error = %e,
                    "websocket receive error"
                );
                break;
            }
            None => {
                tracing::info!(client = %client_id, "websocket stream ended");
                break;
            }
        }
    }

    writer_handle.abort();
    ping_handle.abort();

    // Exactly-once unwind, regardless of how the loop exited: leave the
    // waiting pool, dissolve any pairing (notifying the partner), then drop
    // the registry entry itself.
    signaling::end_session(&state, &client_id);
    state.connections.deregister(&client_id);

    tracing::info!(client = %client_id, "connection actor stopped");
}

/// Writer task: receives messages from the mpsc channel and forwards them to
/// the WebSocket sink.
async fn writer_task(
    mut ws_sender: futures_util::stream::SplitSink<WebSocket, Message>,
    mut rx: mpsc::UnboundedReceiver<Message>,
) {
    while let Some(msg) = rx.recv().await {
        if ws_sender.send(msg).await.is_err() {
            // WebSocket send failed — connection is broken
            break;
        }
    }
}
