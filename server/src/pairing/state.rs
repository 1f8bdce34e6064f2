//! In-memory matchmaking state: the waiting pool and the pairing table.
//!
//! Both structures live behind a single mutex. Every compound operation
//! (dissolve-then-match, disconnect unwind) reads and writes both, and must
//! not interleave with another client's request.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Result of a match request. Notifications are the caller's job, sent after
/// the lock is released.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchOutcome {
    /// Former partner whose pairing this request dissolved, if any.
    pub dissolved: Option<String>,
    pub decision: MatchDecision,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchDecision {
    /// A candidate was found and the symmetric pairing was recorded.
    /// The requester is the initiator side.
    Paired(String),
    /// No candidate available; the requester joined the waiting pool.
    Enqueued,
}

#[derive(Debug, Default)]
struct Tables {
    /// Waiting clients in arrival order; scanned front-to-back on match.
    waiting: Vec<String>,
    /// client id -> partner id, always symmetric.
    pairs: HashMap<String, String>,
}

impl Tables {
    /// Remove both directions of `id`'s pairing, returning the former partner.
    fn unlink(&mut self, id: &str) -> Option<String> {
        let partner = self.pairs.remove(id)?;
        self.pairs.remove(&partner);
        Some(partner)
    }
}

/// Waiting pool and pairing table under one lock.
///
/// Cheap to clone; all clones share the same tables.
#[derive(Debug, Clone, Default)]
pub struct PairingState {
    inner: Arc<Mutex<Tables>>,
}

impl PairingState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a match request from `id`.
    ///
    /// Dissolves any existing pairing of `id` first, then pairs it with the
    /// first waiting client other than itself (FIFO over arrival order), or
    /// appends it to the pool when no candidate exists. A repeated request
    /// from a client already in the pool re-enqueues it rather than
    /// duplicating the entry.
    pub fn request_match(&self, id: &str) -> MatchOutcome {
        let mut t = self.inner.lock().expect("pairing state mutex");

        let dissolved = t.unlink(id);
        t.waiting.retain(|w| w != id);

        let decision = match t.waiting.iter().position(|w| w != id) {
            Some(idx) => {
                let partner = t.waiting.remove(idx);
                t.pairs.insert(id.to_string(), partner.clone());
                t.pairs.insert(partner.clone(), id.to_string());
                MatchDecision::Paired(partner)
            }
            None => {
                t.waiting.push(id.to_string());
                MatchDecision::Enqueued
            }
        };

        MatchOutcome { dissolved, decision }
    }

    /// Drop `id` from the waiting pool and dissolve its pairing, if any.
    ///
    /// Returns the former partner so the caller can notify it. Idempotent:
    /// a second call for the same id returns `None` and changes nothing.
    pub fn remove(&self, id: &str) -> Option<String> {
        let mut t = self.inner.lock().expect("pairing state mutex");
        t.waiting.retain(|w| w != id);
        t.unlink(id)
    }

    /// Current partner of `id`, if paired.
    pub fn partner_of(&self, id: &str) -> Option<String> {
        let t = self.inner.lock().expect("pairing state mutex");
        t.pairs.get(id).cloned()
    }

    /// Whether `id` is currently in the waiting pool.
    pub fn is_waiting(&self, id: &str) -> bool {
        let t = self.inner.lock().expect("pairing state mutex");
        t.waiting.iter().any(|w| w == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_request_enqueues_second_pairs() {
        let state = PairingState::new();

        let a = state.request_match("a");
        assert_eq!(a.decision, MatchDecision::Enqueued);
        assert!(a.dissolved.is_none());
        assert!(state.is_waiting("a"));

        let b = state.request_match("b");
        assert_eq!(b.decision, MatchDecision::Paired("a".into()));
        assert_eq!(state.partner_of("a").as_deref(), Some("b"));
        assert_eq!(state.partner_of("b").as_deref(), Some("a"));
        assert!(!state.is_waiting("a"));
        assert!(!state.is_waiting("b"));
    }

    #[test]
    fn never_matches_self_and_never_duplicates_pool_entry() {
        let state = PairingState::new();
        state.request_match("a");

        let again = state.request_match("a");
        assert_eq!(again.decision, MatchDecision::Enqueued);
        assert!(state.partner_of("a").is_none());

        // Still exactly one pool entry: the next arrival pairs and the one
        // after that waits alone.
        assert_eq!(
            state.request_match("b").decision,
            MatchDecision::Paired("a".into())
        );
        assert_eq!(state.request_match("c").decision, MatchDecision::Enqueued);
    }

    #[test]
    fn rematch_dissolves_previous_pairing() {
        let state = PairingState::new();
        state.request_match("a");
        state.request_match("b");

        let outcome = state.request_match("a");
        assert_eq!(outcome.dissolved.as_deref(), Some("b"));
        assert_eq!(outcome.decision, MatchDecision::Enqueued);

        // Both directions are gone; only the requester waits.
        assert!(state.partner_of("a").is_none());
        assert!(state.partner_of("b").is_none());
        assert!(state.is_waiting("a"));
        assert!(!state.is_waiting("b"));
    }

    #[test]
    fn dissolved_partner_can_repair_with_requester() {
        let state = PairingState::new();
        state.request_match("a");
        state.request_match("b");

        state.request_match("a");
        let b = state.request_match("b");
        assert!(b.dissolved.is_none());
        assert_eq!(b.decision, MatchDecision::Paired("a".into()));
    }

    #[test]
    fn remove_is_idempotent_and_reports_partner_once() {
        let state = PairingState::new();
        state.request_match("a");
        state.request_match("b");

        assert_eq!(state.remove("a").as_deref(), Some("b"));
        assert_eq!(state.remove("a"), None);
        assert_eq!(state.remove("b"), None);
    }

    #[test]
    fn remove_drops_waiting_entry() {
        let state = PairingState::new();
        state.request_match("a");

        assert_eq!(state.remove("a"), None);
        assert!(!state.is_waiting("a"));

        // The pool is empty again, so the next client waits.
        assert_eq!(state.request_match("b").decision, MatchDecision::Enqueued);
    }

    #[test]
    fn third_client_waits_until_fourth_arrives() {
        let state = PairingState::new();
        state.request_match("a");
        state.request_match("b");

        assert_eq!(state.request_match("c").decision, MatchDecision::Enqueued);
        assert_eq!(
            state.request_match("d").decision,
            MatchDecision::Paired("c".into())
        );
    }

    #[test]
    fn waiting_and_paired_stay_mutually_exclusive() {
        let state = PairingState::new();
        let ids = ["a", "b", "c", "d", "e"];

        state.request_match("a");
        state.request_match("b");
        state.request_match("c");
        state.request_match("a"); // dissolve a-b, a pairs with c
        state.request_match("d");
        state.remove("c");
        state.request_match("e");

        for id in ids {
            let paired = state.partner_of(id).is_some();
            let waiting = state.is_waiting(id);
            assert!(
                !(paired && waiting),
                "{id} is both waiting and paired"
            );
            if let Some(partner) = state.partner_of(id) {
                assert_eq!(
                    state.partner_of(&partner).as_deref(),
                    Some(id),
                    "pairing table asymmetric for {id}"
                );
            }
        }
    }
}
