//! Session Registry
//!
//! Owns every active two-player session and the hashed indices that make
//! participant, spectator, and id lookups O(1). The registry also owns the
//! monotonic session-id counter; ids are never reused.

use std::collections::{HashMap, HashSet};

use crate::broker::ConnId;

/// Unique session identifier, assigned monotonically at creation.
pub type SessionId = u64;

/// State a session starts with before the first turn arrives.
///
/// Opaque to the broker; clients overwrite it with their own board
/// serialization on the first play.
pub const INITIAL_STATE: &str = "---------";

/// A paired two-player game instance plus its observers.
///
/// The broker never interprets `state`; it only stores and relays it.
#[derive(Clone, Debug)]
pub struct Session {
    /// Registry-assigned identifier.
    pub id: SessionId,
    /// Participant holding the first-mover role.
    pub player_a: ConnId,
    /// Participant holding the second-mover role.
    pub player_b: ConnId,
    /// Latest game-state string relayed through the session.
    pub state: String,
    /// Connections observing the session without participating.
    pub spectators: HashSet<ConnId>,
}

impl Session {
    /// Whether `conn` is one of the two participants.
    pub fn is_participant(&self, conn: ConnId) -> bool {
        self.player_a == conn || self.player_b == conn
    }

    /// The participant that is not `conn`, if `conn` is a participant.
    pub fn other_participant(&self, conn: ConnId) -> Option<ConnId> {
        if conn == self.player_a {
            Some(self.player_b)
        } else if conn == self.player_b {
            Some(self.player_a)
        } else {
            None
        }
    }
}

/// Owns all active sessions with id, participant, and spectator indices.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    next_id: SessionId,
    sessions: HashMap<SessionId, Session>,
    /// Session ids in creation order, for insertion-stable listing.
    order: Vec<SessionId>,
    by_participant: HashMap<ConnId, SessionId>,
    by_spectator: HashMap<ConnId, SessionId>,
}

impl SessionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session pairing `player_a` (first-mover) with `player_b`.
    ///
    /// Assigns the next id from the registry counter and indexes both
    /// participants.
    pub fn create(&mut self, player_a: ConnId, player_b: ConnId) -> SessionId {
        self.next_id += 1;
        let id = self.next_id;

        self.sessions.insert(
            id,
            Session {
                id,
                player_a,
                player_b,
                state: INITIAL_STATE.to_string(),
                spectators: HashSet::new(),
            },
        );
        self.order.push(id);
        self.by_participant.insert(player_a, id);
        self.by_participant.insert(player_b, id);

        id
    }

    /// Remove a session and all of its index entries.
    ///
    /// Touches nothing outside the session being removed; callers notify
    /// affected connections first.
    pub fn remove(&mut self, id: SessionId) -> Option<Session> {
        let session = self.sessions.remove(&id)?;
        self.order.retain(|&sid| sid != id);
        self.by_participant.remove(&session.player_a);
        self.by_participant.remove(&session.player_b);
        for spectator in &session.spectators {
            self.by_spectator.remove(spectator);
        }
        Some(session)
    }

    /// Session `conn` participates in, if any.
    pub fn find_by_participant(&self, conn: ConnId) -> Option<&Session> {
        let id = self.by_participant.get(&conn)?;
        self.sessions.get(id)
    }

    /// Session `conn` spectates, if any.
    pub fn find_by_spectator(&self, conn: ConnId) -> Option<&Session> {
        let id = self.by_spectator.get(&conn)?;
        self.sessions.get(id)
    }

    /// Session with the given id, if present.
    pub fn find_by_id(&self, id: SessionId) -> Option<&Session> {
        self.sessions.get(&id)
    }

    /// Overwrite a session's opaque state. Returns whether it existed.
    pub fn set_state(&mut self, id: SessionId, state: String) -> bool {
        match self.sessions.get_mut(&id) {
            Some(session) => {
                session.state = state;
                true
            }
            None => false,
        }
    }

    /// Add `conn` as a spectator of session `id`.
    ///
    /// Returns whether the session existed. Callers enforce that `conn` is
    /// not a participant of the same session.
    pub fn add_spectator(&mut self, id: SessionId, conn: ConnId) -> bool {
        match self.sessions.get_mut(&id) {
            Some(session) => {
                session.spectators.insert(conn);
                self.by_spectator.insert(conn, id);
                true
            }
            None => false,
        }
    }

    /// Remove `conn` from whichever session it spectates.
    ///
    /// Returns that session's id, if any. The session itself continues.
    pub fn remove_spectator(&mut self, conn: ConnId) -> Option<SessionId> {
        let id = self.by_spectator.remove(&conn)?;
        if let Some(session) = self.sessions.get_mut(&id) {
            session.spectators.remove(&conn);
        }
        Some(id)
    }

    /// All session ids, in creation order.
    pub fn ids(&self) -> &[SessionId] {
        &self.order
    }

    /// Number of active sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether no session is active.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
