use crate::pairing::state::PairingState;
use crate::ws::registry::ConnectionRegistry;

/// Shared application state passed to all handlers via axum State extractor.
///
/// Everything is in-memory; nothing survives a restart.
#[derive(Clone, Default)]
pub struct AppState {
    /// Active connections keyed by assigned client id.
    pub connections: ConnectionRegistry,
    /// Waiting pool and pairing table, one lock for both.
    pub pairing: PairingState,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}
