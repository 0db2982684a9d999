//! Matchmaking Queue
//!
//! A single waiting slot, not a general queue: the first unmatched
//! connection waits, the next arrival is paired against it. Role order
//! within the pair comes from a fair coin flip.

use tracing::{debug, warn};

use crate::broker::ConnId;
use crate::core::rng::DeterministicRng;

/// The two connections of a freshly matched session.
///
/// `first` won the coin flip for the first-mover role; `second` takes the
/// other role. The broker only relays these as opaque role tokens.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pairing {
    /// Connection assigned the first-mover role.
    pub first: ConnId,
    /// Connection assigned the second-mover role.
    pub second: ConnId,
}

/// Holds at most one waiting connection and pairs it with the next arrival.
#[derive(Debug)]
pub struct MatchmakingQueue {
    waiting: Option<ConnId>,
    rng: DeterministicRng,
}

impl MatchmakingQueue {
    /// Create an empty queue using `rng` for role assignment.
    pub fn new(rng: DeterministicRng) -> Self {
        Self { waiting: None, rng }
    }

    /// Enqueue `conn` for a match.
    ///
    /// With an empty slot, `conn` becomes the waiter and `None` is
    /// returned. With an occupied slot, the waiter is popped, the slot is
    /// cleared, and the resulting pairing is returned with roles decided by
    /// coin flip. Enqueueing the connection already in the slot is a
    /// logged no-op.
    pub fn enqueue(&mut self, conn: ConnId) -> Option<Pairing> {
        if self.waiting == Some(conn) {
            warn!(conn, "connection is already waiting for a match");
            return None;
        }

        match self.waiting.take() {
            Some(waiter) => {
                let pairing = if self.rng.coin_flip() {
                    Pairing {
                        first: waiter,
                        second: conn,
                    }
                } else {
                    Pairing {
                        first: conn,
                        second: waiter,
                    }
                };
                debug!(first = pairing.first, second = pairing.second, "paired");
                Some(pairing)
            }
            None => {
                self.waiting = Some(conn);
                debug!(conn, "waiting for an opponent");
                None
            }
        }
    }

    /// Clear the slot if it holds `conn`. Returns whether it did.
    ///
    /// Used by disconnect cleanup so a dead connection never gets matched.
    pub fn cancel(&mut self, conn: ConnId) -> bool {
        if self.waiting == Some(conn) {
            self.waiting = None;
            true
        } else {
            false
        }
    }

    /// The connection currently waiting, if any.
    pub fn waiting(&self) -> Option<ConnId> {
        self.waiting
    }
}
