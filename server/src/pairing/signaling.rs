//! Matchmaking and relay handlers for the signaling protocol.
//!
//! All state changes go through [`PairingState`](crate::pairing::state::PairingState);
//! this module turns the outcomes into notifications. Sends happen after the
//! pairing lock is released, and a failed send means the recipient is gone —
//! it is dropped, never retried.

use crate::pairing::state::MatchDecision;
use crate::state::AppState;
use crate::ws::protocol::{send_message, ClientMessage, ServerMessage};

/// Handle a `waiting` request: dissolve any current pairing, then pair the
/// requester with a waiting client or enqueue it.
///
/// The requester whose request completes a match becomes the initiator; its
/// counterpart does not. Both `partner-found` notifications carry the other
/// side's display name, if one was ever supplied.
pub fn handle_waiting(state: &AppState, client_id: &str, username: Option<String>) {
    if let Some(name) = username {
        state.connections.set_display_name(client_id, name);
    }

    let outcome = state.pairing.request_match(client_id);

    if let Some(former) = outcome.dissolved {
        notify_partner_disconnected(state, &former);
    }

    match outcome.decision {
        MatchDecision::Paired(partner_id) => {
            tracing::info!(
                client = %client_id,
                partner = %partner_id,
                "clients paired"
            );
            if let Some(tx) = state.connections.resolve(client_id) {
                send_message(
                    &tx,
                    &ServerMessage::PartnerFound {
                        initiator: true,
                        partner_name: state.connections.display_name(&partner_id),
                    },
                );
            }
            if let Some(tx) = state.connections.resolve(&partner_id) {
                send_message(
                    &tx,
                    &ServerMessage::PartnerFound {
                        initiator: false,
                        partner_name: state.connections.display_name(client_id),
                    },
                );
            }
        }
        MatchDecision::Enqueued => {
            tracing::debug!(client = %client_id, "no partner available, waiting");
        }
    }
}

/// Unwind a session: drop the client from the waiting pool, dissolve its
/// pairing, and tell the former partner.
///
/// Shared by the explicit `disconnect` message and transport-level close;
/// idempotent, so a `disconnect` followed by a close is harmless.
pub fn end_session(state: &AppState, client_id: &str) {
    if let Some(former) = state.pairing.remove(client_id) {
        tracing::info!(
            client = %client_id,
            partner = %former,
            "pairing dissolved"
        );
        notify_partner_disconnected(state, &former);
    }
}

/// Relay a negotiation message to the sender's partner, unchanged.
///
/// The payload is opaque; the server never looks inside it. Messages with
/// no usable sender id, from unpaired senders, or whose partner is already
/// gone are dropped without a response — all three are expected races, not
/// errors.
pub fn forward(state: &AppState, message: &ClientMessage) {
    let from = match message.sender() {
        Some(from) if !from.is_empty() => from,
        _ => return,
    };

    let Some(partner_id) = state.pairing.partner_of(from) else {
        tracing::debug!(from = %from, "dropping negotiation message from unpaired sender");
        return;
    };

    let Some(tx) = state.connections.resolve(&partner_id) else {
        return;
    };

    send_message(&tx, message);
}

fn notify_partner_disconnected(state: &AppState, partner_id: &str) {
    if let Some(tx) = state.connections.resolve(partner_id) {
        send_message(&tx, &ServerMessage::PartnerDisconnected);
    }
}
