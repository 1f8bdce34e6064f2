pub mod actor;
pub mod handler;
pub mod protocol;
pub mod registry;

use tokio::sync::mpsc;

/// Sender half of a connection's outbound channel. The registry hands out
/// clones so any part of the system can push messages to a specific client.
pub type ConnectionSender = mpsc::UnboundedSender<axum::extract::ws::Message>;
