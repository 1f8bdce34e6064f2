//! JSON wire protocol: envelope types and per-message dispatch.
//!
//! Every frame is a JSON object with a `type` discriminator. Negotiation
//! payloads (`offer`, `answer`, `candidate`) are opaque values the server
//! relays without inspection.

use axum::extract::ws::Message;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::pairing::signaling;
use crate::state::AppState;
use crate::ws::ConnectionSender;

/// Client -> server envelopes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientMessage {
    /// Request to be matched. `from` is accepted on the wire but the
    /// connection's registered id is authoritative for matching.
    Waiting {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        from: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        username: Option<String>,
    },
    Offer {
        offer: Value,
        from: String,
    },
    Answer {
        answer: Value,
        from: String,
    },
    IceCandidate {
        candidate: Value,
        from: String,
    },
    /// Explicit end-of-session; the connection itself stays open.
    Disconnect,
}

impl ClientMessage {
    /// Sender id embedded in a negotiation message, if this is one.
    pub fn sender(&self) -> Option<&str> {
        match self {
            ClientMessage::Offer { from, .. }
            | ClientMessage::Answer { from, .. }
            | ClientMessage::IceCandidate { from, .. } => Some(from),
            ClientMessage::Waiting { .. } | ClientMessage::Disconnect => None,
        }
    }
}

/// Server -> client envelopes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerMessage {
    /// Assigned identifier, pushed as the first message after connect.
    Id { id: String },
    PartnerFound {
        initiator: bool,
        #[serde(
            rename = "partnerName",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        partner_name: Option<String>,
    },
    PartnerDisconnected,
}

/// Handle one inbound text frame: parse the envelope and dispatch.
///
/// Malformed frames are dropped without a response; the connection stays
/// open.
pub fn handle_text_message(text: &str, state: &AppState, client_id: &str) {
    let message: ClientMessage = match serde_json::from_str(text) {
        Ok(message) => message,
        Err(e) => {
            tracing::debug!(
                client = %client_id,
                error = %e,
                "dropping malformed message"
            );
            return;
        }
    };

    match &message {
        ClientMessage::Waiting { username, .. } => {
            signaling::handle_waiting(state, client_id, username.clone());
        }
        ClientMessage::Offer { .. }
        | ClientMessage::Answer { .. }
        | ClientMessage::IceCandidate { .. } => {
            signaling::forward(state, &message);
        }
        ClientMessage::Disconnect => {
            signaling::end_session(state, client_id);
        }
    }
}

/// Serialize a message and push it onto a client's outbound channel.
///
/// A failed send means the client's writer is gone; the message is dropped.
pub fn send_message<T: Serialize>(tx: &ConnectionSender, message: &T) {
    if let Ok(json) = serde_json::to_string(message) {
        let _ = tx.send(Message::Text(json.into()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn client_envelopes_use_wire_tags() {
        let msg: ClientMessage = serde_json::from_value(json!({
            "type": "ice-candidate",
            "candidate": {"candidate": "candidate:1 1 UDP 2122252543 192.0.2.1 54321 typ host"},
            "from": "abc123",
        }))
        .unwrap();
        assert_eq!(msg.sender(), Some("abc123"));

        // Relayed envelopes serialize back with the same tag and payload.
        let out = serde_json::to_value(&msg).unwrap();
        assert_eq!(out["type"], "ice-candidate");
        assert_eq!(
            out["candidate"]["candidate"],
            "candidate:1 1 UDP 2122252543 192.0.2.1 54321 typ host"
        );
        assert_eq!(out["from"], "abc123");
    }

    #[test]
    fn waiting_envelope_tolerates_missing_optional_fields() {
        let msg: ClientMessage = serde_json::from_str(r#"{"type":"waiting"}"#).unwrap();
        assert!(matches!(
            msg,
            ClientMessage::Waiting {
                from: None,
                username: None
            }
        ));
    }

    #[test]
    fn partner_found_uses_camel_case_partner_name() {
        let out = serde_json::to_value(ServerMessage::PartnerFound {
            initiator: true,
            partner_name: Some("HappyPanda".into()),
        })
        .unwrap();
        assert_eq!(out["type"], "partner-found");
        assert_eq!(out["partnerName"], "HappyPanda");

        // Absent name omits the field entirely.
        let out = serde_json::to_value(ServerMessage::PartnerFound {
            initiator: false,
            partner_name: None,
        })
        .unwrap();
        assert!(out.get("partnerName").is_none());
    }
}
