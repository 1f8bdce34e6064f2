//! Connection registry: direct id -> client lookup for every live connection.

use dashmap::DashMap;
use std::sync::Arc;
use uuid::Uuid;

use super::ConnectionSender;

/// Per-client record. The registry owns the only long-lived reference to a
/// client's sender; everything else refers to clients by id and resolves at
/// the moment of use.
#[derive(Debug)]
struct ClientEntry {
    tx: ConnectionSender,
    display_name: Option<String>,
}

/// Registry of all connected clients, keyed by server-assigned id.
///
/// Ids are UUID v4: unique among live clients and never reused while a
/// reference to one can still be in flight.
#[derive(Debug, Clone, Default)]
pub struct ConnectionRegistry {
    clients: Arc<DashMap<String, ClientEntry>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new client and return its assigned id.
    pub fn register(&self, tx: ConnectionSender) -> String {
        let id = Uuid::new_v4().to_string();
        self.clients.insert(
            id.clone(),
            ClientEntry {
                tx,
                display_name: None,
            },
        );
        tracing::debug!(client = %id, connections = self.clients.len(), "client registered");
        id
    }

    /// Store or update a client's display name. Unknown ids are ignored.
    pub fn set_display_name(&self, id: &str, name: String) {
        if let Some(mut entry) = self.clients.get_mut(id) {
            entry.display_name = Some(name);
        }
    }

    /// Current display name for a client, if it supplied one.
    pub fn display_name(&self, id: &str) -> Option<String> {
        self.clients.get(id).and_then(|e| e.display_name.clone())
    }

    /// Live sender for a client, or `None` if it already disconnected.
    /// Absence is an expected race outcome, not an error.
    pub fn resolve(&self, id: &str) -> Option<ConnectionSender> {
        self.clients.get(id).map(|e| e.tx.clone())
    }

    /// Remove a client. Idempotent.
    pub fn deregister(&self, id: &str) {
        self.clients.remove(id);
        tracing::debug!(client = %id, connections = self.clients.len(), "client deregistered");
    }

    /// Number of currently connected clients.
    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}
