//! Message Router
//!
//! The broker context: one struct owning the account store, connection
//! index, matchmaking queue, and session registry, with a handler per
//! protocol message. Handlers are synchronous, mutate only through the
//! owned collections, and return the outbound batch to deliver; routing
//! failures are logged and the message is dropped, never a panic.

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::broker::account::{AccountStore, LoginResponse};
use crate::broker::connection::ConnectionIndex;
use crate::broker::matchmaking::MatchmakingQueue;
use crate::broker::session::{SessionId, SessionRegistry};
use crate::broker::ConnId;
use crate::core::rng::DeterministicRng;
use crate::network::protocol::{ClientMessage, PlayerRole, ServerMessage};

/// A message addressed to one connection, ready for the transport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Outbound {
    /// Destination connection.
    pub conn: ConnId,
    /// Message to deliver.
    pub message: ServerMessage,
}

/// Routing errors. All are log-and-drop; none reach the client.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    /// No session with the requested id.
    #[error("no session with id {0}")]
    SessionNotFound(SessionId),

    /// The connection is not a participant of any session.
    #[error("connection {0} is not a session participant")]
    NotParticipant(ConnId),

    /// The connection is neither participant nor spectator of any session.
    #[error("connection {0} is neither participant nor spectator")]
    NotParticipantOrSpectator(ConnId),
}

/// The broker context owning all mutable state.
///
/// Exactly one of these exists per server, owned by the broker task; every
/// handler runs to completion there before the next event is processed,
/// which is the only locking discipline the collections need.
pub struct Broker {
    accounts: AccountStore,
    connections: ConnectionIndex,
    queue: MatchmakingQueue,
    sessions: SessionRegistry,
}

impl Broker {
    /// Create a broker around a loaded account store.
    pub fn new(accounts: AccountStore, rng: DeterministicRng) -> Self {
        Self {
            accounts,
            connections: ConnectionIndex::new(),
            queue: MatchmakingQueue::new(rng),
            sessions: SessionRegistry::new(),
        }
    }

    /// Account store, for observability.
    pub fn accounts(&self) -> &AccountStore {
        &self.accounts
    }

    /// Connection index, for observability.
    pub fn connections(&self) -> &ConnectionIndex {
        &self.connections
    }

    /// Matchmaking queue, for observability.
    pub fn queue(&self) -> &MatchmakingQueue {
        &self.queue
    }

    /// Session registry, for observability.
    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    /// A new connection was accepted by the transport.
    pub fn handle_connect(&mut self, conn: ConnId) {
        debug!(conn, "connection registered");
    }

    /// Parse and dispatch one raw frame, returning the messages to send.
    ///
    /// This is the fail-closed boundary: malformed frames and routing
    /// failures are logged and yield an empty batch.
    pub fn handle_frame(&mut self, conn: ConnId, frame: &str) -> Vec<Outbound> {
        let message = match ClientMessage::decode(frame) {
            Ok(message) => message,
            Err(e) => {
                warn!(conn, "dropping malformed frame: {e}");
                return Vec::new();
            }
        };

        match self.handle_message(conn, message) {
            Ok(out) => out,
            Err(e) => {
                warn!(conn, "dropping message: {e}");
                Vec::new()
            }
        }
    }

    /// Dispatch a decoded message.
    pub fn handle_message(
        &mut self,
        conn: ConnId,
        message: ClientMessage,
    ) -> Result<Vec<Outbound>, RouteError> {
        match message {
            ClientMessage::Login { name, password } => Ok(self.login(conn, &name, &password)),
            ClientMessage::CreateAccount { name, password } => {
                Ok(self.create_account(conn, &name, &password))
            }
            ClientMessage::EnqueueForMatch => Ok(self.enqueue(conn)),
            ClientMessage::PlayTurn { state } => self.play_turn(conn, state),
            ClientMessage::LeaveSession => self.leave_session(conn),
            ClientMessage::RelayMessage { text } => self.relay(conn, &text),
            ClientMessage::ListSessionIds => Ok(vec![Outbound {
                conn,
                message: ServerMessage::SessionIdList {
                    ids: self.sessions.ids().to_vec(),
                },
            }]),
            ClientMessage::SpectateSession { session } => self.spectate(conn, session),
        }
    }

    /// The transport lost a connection. Cleanup is equivalent to an
    /// explicit leave: the waiting slot, session membership, and the
    /// account binding are all released.
    pub fn handle_disconnect(&mut self, conn: ConnId) -> Vec<Outbound> {
        if self.queue.cancel(conn) {
            debug!(conn, "disconnect cleared the matchmaking slot");
        }

        let mut out = self.leave_session(conn).unwrap_or_default();
        // The leaver is gone; only survivors get the notification.
        out.retain(|o| o.conn != conn);

        // A participant of one session may also spectate another; the
        // participant branch above does not cover that membership.
        self.sessions.remove_spectator(conn);

        if let Some(name) = self.connections.unbind(conn) {
            self.accounts.clear_connection(&name);
            info!(conn, name = %name, "logged out on disconnect");
        }

        out
    }

    fn create_account(&mut self, conn: ConnId, name: &str, password: &str) -> Vec<Outbound> {
        let code = self.accounts.register(name, password);
        match code {
            LoginResponse::Success => info!(conn, name, "account created"),
            _ => debug!(conn, name, "registration rejected, name in use"),
        }

        vec![Outbound {
            conn,
            message: ServerMessage::LoginResult { code },
        }]
    }

    fn login(&mut self, conn: ConnId, name: &str, password: &str) -> Vec<Outbound> {
        let code = self.accounts.authenticate(name, password);
        if code == LoginResponse::Success {
            if let Some(previous) = self.accounts.bind_connection(name, conn) {
                if previous != conn {
                    warn!(name, previous, conn, "account rebound to a newer connection");
                    self.connections.unbind(previous);
                }
            }
            if let Some(old_name) = self.connections.bind(conn, name.to_string()) {
                if old_name != name {
                    self.accounts.clear_connection(&old_name);
                }
            }
            info!(conn, name, "login ok");
        } else {
            debug!(conn, name, code = code as u8, "login rejected");
        }

        vec![Outbound {
            conn,
            message: ServerMessage::LoginResult { code },
        }]
    }

    fn enqueue(&mut self, conn: ConnId) -> Vec<Outbound> {
        // A connection participates in at most one session.
        if let Some(session) = self.sessions.find_by_participant(conn) {
            warn!(conn, session = session.id, "enqueue ignored, already in a session");
            return Vec::new();
        }

        match self.queue.enqueue(conn) {
            Some(pairing) => {
                let id = self.sessions.create(pairing.first, pairing.second);
                info!(
                    session = id,
                    first = pairing.first,
                    second = pairing.second,
                    "session started"
                );
                vec![
                    Outbound {
                        conn: pairing.first,
                        message: ServerMessage::SessionStarted {
                            role: PlayerRole::First,
                        },
                    },
                    Outbound {
                        conn: pairing.second,
                        message: ServerMessage::SessionStarted {
                            role: PlayerRole::Second,
                        },
                    },
                ]
            }
            // The caller is now the waiter; nothing to send.
            None => Vec::new(),
        }
    }

    fn play_turn(&mut self, conn: ConnId, state: String) -> Result<Vec<Outbound>, RouteError> {
        let Some(session) = self.sessions.find_by_participant(conn) else {
            return Err(RouteError::NotParticipant(conn));
        };
        let id = session.id;
        let Some(peer) = session.other_participant(conn) else {
            return Err(RouteError::NotParticipant(conn));
        };
        let spectators: Vec<ConnId> = session.spectators.iter().copied().collect();

        self.sessions.set_state(id, state.clone());
        debug!(conn, session = id, "turn relayed");

        let mut out = vec![Outbound {
            conn: peer,
            message: ServerMessage::OpponentPlayed {
                state: state.clone(),
            },
        }];
        for spectator in spectators {
            out.push(Outbound {
                conn: spectator,
                message: ServerMessage::SpectatorUpdate {
                    state: state.clone(),
                },
            });
        }
        Ok(out)
    }

    fn leave_session(&mut self, conn: ConnId) -> Result<Vec<Outbound>, RouteError> {
        if let Some(session) = self.sessions.find_by_participant(conn) {
            let id = session.id;
            let recipients: Vec<ConnId> = [session.player_a, session.player_b]
                .into_iter()
                .chain(session.spectators.iter().copied())
                .collect();

            self.sessions.remove(id);
            info!(conn, session = id, "participant left, session terminated");

            return Ok(recipients
                .into_iter()
                .map(|recipient| Outbound {
                    conn: recipient,
                    message: ServerMessage::SessionTerminated,
                })
                .collect());
        }

        if let Some(id) = self.sessions.remove_spectator(conn) {
            debug!(conn, session = id, "spectator left");
            return Ok(Vec::new());
        }

        Err(RouteError::NotParticipantOrSpectator(conn))
    }

    fn relay(&self, conn: ConnId, text: &str) -> Result<Vec<Outbound>, RouteError> {
        let session = self
            .sessions
            .find_by_participant(conn)
            .or_else(|| self.sessions.find_by_spectator(conn))
            .ok_or(RouteError::NotParticipantOrSpectator(conn))?;

        let out = [session.player_a, session.player_b]
            .into_iter()
            .chain(session.spectators.iter().copied())
            .filter(|&recipient| recipient != conn)
            .map(|recipient| Outbound {
                conn: recipient,
                message: ServerMessage::RelayedMessage {
                    text: text.to_string(),
                },
            })
            .collect();
        Ok(out)
    }

    fn spectate(&mut self, conn: ConnId, id: SessionId) -> Result<Vec<Outbound>, RouteError> {
        let Some(session) = self.sessions.find_by_id(id) else {
            return Err(RouteError::SessionNotFound(id));
        };

        if session.is_participant(conn) {
            warn!(conn, session = id, "participants cannot spectate their own session");
            return Ok(Vec::new());
        }
        let state = session.state.clone();

        // One spectated session per connection; a new request moves it.
        if let Some(previous) = self.sessions.remove_spectator(conn) {
            if previous != id {
                debug!(conn, from = previous, to = id, "spectator moved");
            }
        }
        self.sessions.add_spectator(id, conn);

        Ok(vec![Outbound {
            conn,
            message: ServerMessage::SpectateStarted { state },
        }])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn broker() -> Broker {
        Broker::new(AccountStore::new(), DeterministicRng::new(7))
    }

    fn enqueue(broker: &mut Broker, conn: ConnId) -> Vec<Outbound> {
        broker
            .handle_message(conn, ClientMessage::EnqueueForMatch)
            .unwrap()
    }

    /// Pair `a` and `b` into a session and return its id.
    fn start_session(broker: &mut Broker, a: ConnId, b: ConnId) -> SessionId {
        assert!(enqueue(broker, a).is_empty());
        let out = enqueue(broker, b);
        assert_eq!(out.len(), 2);
        broker.sessions().find_by_participant(a).unwrap().id
    }

    fn spectate(broker: &mut Broker, conn: ConnId, id: SessionId) -> Vec<Outbound> {
        broker
            .handle_message(conn, ClientMessage::SpectateSession { session: id })
            .unwrap()
    }

    #[test]
    fn test_duplicate_registration() {
        let mut broker = broker();

        let out = broker.handle_frame(1, "2,alice,secret");
        assert_eq!(
            out,
            vec![Outbound {
                conn: 1,
                message: ServerMessage::LoginResult {
                    code: LoginResponse::Success
                },
            }]
        );

        let out = broker.handle_frame(2, "2,alice,other");
        assert_eq!(
            out,
            vec![Outbound {
                conn: 2,
                message: ServerMessage::LoginResult {
                    code: LoginResponse::NameInUse
                },
            }]
        );

        assert_eq!(broker.accounts().len(), 1);
        assert_eq!(broker.accounts().get("alice").unwrap().password, "secret");
    }

    #[test]
    fn test_login_wrong_password_does_not_bind() {
        let mut broker = broker();
        broker.handle_frame(1, "2,alice,secret");

        let out = broker.handle_frame(1, "1,alice,wrong");
        assert_eq!(
            out,
            vec![Outbound {
                conn: 1,
                message: ServerMessage::LoginResult {
                    code: LoginResponse::IncorrectPassword
                },
            }]
        );
        assert_eq!(broker.connections().account(1), None);
        assert_eq!(broker.accounts().get("alice").unwrap().connection, None);
    }

    #[test]
    fn test_login_success_binds_connection() {
        let mut broker = broker();
        broker.handle_frame(1, "2,alice,secret");

        let out = broker.handle_frame(1, "1,alice,secret");
        assert_eq!(
            out[0].message,
            ServerMessage::LoginResult {
                code: LoginResponse::Success
            }
        );
        assert_eq!(broker.connections().account(1), Some("alice"));
        assert_eq!(broker.accounts().get("alice").unwrap().connection, Some(1));
    }

    #[test]
    fn test_relogin_from_new_connection_rebinds() {
        let mut broker = broker();
        broker.handle_frame(1, "2,alice,secret");
        broker.handle_frame(1, "1,alice,secret");

        broker.handle_frame(2, "1,alice,secret");
        assert_eq!(broker.accounts().get("alice").unwrap().connection, Some(2));
        assert_eq!(broker.connections().account(1), None);
        assert_eq!(broker.connections().account(2), Some("alice"));
    }

    #[test]
    fn test_two_enqueues_form_one_session_with_complementary_roles() {
        let mut broker = broker();

        assert!(enqueue(&mut broker, 10).is_empty());
        let out = enqueue(&mut broker, 20);

        assert_eq!(broker.sessions().len(), 1);
        let session = broker.sessions().find_by_participant(10).unwrap();
        assert!(session.is_participant(20));

        let mut roles = HashSet::new();
        let mut conns = HashSet::new();
        for outbound in &out {
            let ServerMessage::SessionStarted { role } = &outbound.message else {
                panic!("expected SessionStarted, got {:?}", outbound.message);
            };
            roles.insert(*role);
            conns.insert(outbound.conn);
        }
        assert_eq!(conns, HashSet::from([10, 20]));
        assert_eq!(roles.len(), 2, "roles must be complementary");
    }

    #[test]
    fn test_first_mover_matches_session_player_a() {
        let mut broker = broker();
        enqueue(&mut broker, 10);
        let out = enqueue(&mut broker, 20);

        let session = broker.sessions().find_by_participant(10).unwrap();
        let first = out
            .iter()
            .find(|o| {
                o.message
                    == ServerMessage::SessionStarted {
                        role: PlayerRole::First,
                    }
            })
            .unwrap();
        assert_eq!(first.conn, session.player_a);
    }

    #[test]
    fn test_third_enqueue_starts_new_wait() {
        let mut broker = broker();
        let id = start_session(&mut broker, 10, 20);

        assert!(enqueue(&mut broker, 30).is_empty());
        assert_eq!(broker.queue().waiting(), Some(30));
        assert_eq!(broker.sessions().len(), 1);

        let session = broker.sessions().find_by_id(id).unwrap();
        assert!(!session.is_participant(30));
    }

    #[test]
    fn test_enqueue_while_in_session_is_ignored() {
        let mut broker = broker();
        start_session(&mut broker, 10, 20);

        assert!(enqueue(&mut broker, 10).is_empty());
        assert_eq!(broker.queue().waiting(), None);
        assert_eq!(broker.sessions().len(), 1);
    }

    #[test]
    fn test_play_turn_updates_state_and_fans_out() {
        let mut broker = broker();
        let id = start_session(&mut broker, 10, 20);
        spectate(&mut broker, 5, id);

        let out = broker
            .handle_message(
                10,
                ClientMessage::PlayTurn {
                    state: "X--------".into(),
                },
            )
            .unwrap();

        assert_eq!(broker.sessions().find_by_id(id).unwrap().state, "X--------");
        assert!(out.contains(&Outbound {
            conn: 20,
            message: ServerMessage::OpponentPlayed {
                state: "X--------".into()
            },
        }));
        assert!(out.contains(&Outbound {
            conn: 5,
            message: ServerMessage::SpectatorUpdate {
                state: "X--------".into()
            },
        }));
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_play_turn_from_non_participant_is_silent_noop() {
        let mut broker = broker();
        let id = start_session(&mut broker, 10, 20);
        let before = broker.sessions().find_by_id(id).unwrap().state.clone();

        let result = broker.handle_message(
            99,
            ClientMessage::PlayTurn {
                state: "hijack".into(),
            },
        );
        assert_eq!(result, Err(RouteError::NotParticipant(99)));

        // Through the fail-closed boundary: no reply, no crash
        assert!(broker.handle_frame(99, "4,hijack").is_empty());
        assert_eq!(broker.sessions().find_by_id(id).unwrap().state, before);
    }

    #[test]
    fn test_leave_terminates_and_notifies_everyone_once() {
        let mut broker = broker();
        let id = start_session(&mut broker, 10, 20);
        spectate(&mut broker, 5, id);
        spectate(&mut broker, 6, id);

        let out = broker.handle_message(10, ClientMessage::LeaveSession).unwrap();

        assert!(broker.sessions().find_by_id(id).is_none());
        assert_eq!(out.len(), 4);
        let recipients: HashSet<ConnId> = out.iter().map(|o| o.conn).collect();
        assert_eq!(recipients, HashSet::from([10, 20, 5, 6]));
        assert!(out
            .iter()
            .all(|o| o.message == ServerMessage::SessionTerminated));
    }

    #[test]
    fn test_leave_as_spectator_keeps_session_open() {
        let mut broker = broker();
        let id = start_session(&mut broker, 10, 20);
        spectate(&mut broker, 5, id);

        let out = broker.handle_message(5, ClientMessage::LeaveSession).unwrap();

        assert!(out.is_empty());
        let session = broker.sessions().find_by_id(id).unwrap();
        assert!(session.spectators.is_empty());
    }

    #[test]
    fn test_leave_when_not_in_any_session() {
        let mut broker = broker();
        start_session(&mut broker, 10, 20);

        let result = broker.handle_message(99, ClientMessage::LeaveSession);
        assert_eq!(result, Err(RouteError::NotParticipantOrSpectator(99)));
        assert_eq!(broker.sessions().len(), 1);
    }

    #[test]
    fn test_spectate_unknown_id_sends_nothing_and_changes_nothing() {
        let mut broker = broker();
        let id = start_session(&mut broker, 10, 20);

        let result = broker.handle_message(5, ClientMessage::SpectateSession { session: 999 });
        assert_eq!(result, Err(RouteError::SessionNotFound(999)));

        assert!(broker.handle_frame(5, "8,999").is_empty());
        let session = broker.sessions().find_by_id(id).unwrap();
        assert!(session.spectators.is_empty());
    }

    #[test]
    fn test_spectate_replies_with_current_state() {
        let mut broker = broker();
        let id = start_session(&mut broker, 10, 20);
        broker
            .handle_message(
                10,
                ClientMessage::PlayTurn {
                    state: "X-O".into(),
                },
            )
            .unwrap();

        let out = spectate(&mut broker, 5, id);
        assert_eq!(
            out,
            vec![Outbound {
                conn: 5,
                message: ServerMessage::SpectateStarted {
                    state: "X-O".into()
                },
            }]
        );
        assert!(broker
            .sessions()
            .find_by_id(id)
            .unwrap()
            .spectators
            .contains(&5));
    }

    #[test]
    fn test_participant_cannot_spectate_own_session() {
        let mut broker = broker();
        let id = start_session(&mut broker, 10, 20);

        let out = spectate(&mut broker, 10, id);
        assert!(out.is_empty());
        assert!(broker
            .sessions()
            .find_by_id(id)
            .unwrap()
            .spectators
            .is_empty());
    }

    #[test]
    fn test_spectator_moves_between_sessions() {
        let mut broker = broker();
        let first = start_session(&mut broker, 10, 20);
        let second = start_session(&mut broker, 30, 40);

        spectate(&mut broker, 5, first);
        spectate(&mut broker, 5, second);

        assert!(broker
            .sessions()
            .find_by_id(first)
            .unwrap()
            .spectators
            .is_empty());
        assert_eq!(broker.sessions().find_by_spectator(5).unwrap().id, second);
    }

    #[test]
    fn test_relay_from_spectator_reaches_all_but_sender() {
        let mut broker = broker();
        let id = start_session(&mut broker, 10, 20);
        spectate(&mut broker, 5, id);
        spectate(&mut broker, 6, id);

        let out = broker
            .handle_message(5, ClientMessage::RelayMessage { text: "gg".into() })
            .unwrap();

        let recipients: HashSet<ConnId> = out.iter().map(|o| o.conn).collect();
        assert_eq!(recipients, HashSet::from([10, 20, 6]));
        assert!(out.iter().all(|o| {
            o.message
                == ServerMessage::RelayedMessage {
                    text: "gg".into(),
                }
        }));
    }

    #[test]
    fn test_relay_from_participant_excludes_sender() {
        let mut broker = broker();
        let id = start_session(&mut broker, 10, 20);
        spectate(&mut broker, 5, id);

        let out = broker
            .handle_message(10, ClientMessage::RelayMessage { text: "hi".into() })
            .unwrap();

        let recipients: HashSet<ConnId> = out.iter().map(|o| o.conn).collect();
        assert_eq!(recipients, HashSet::from([20, 5]));
    }

    #[test]
    fn test_relay_outside_any_session() {
        let mut broker = broker();
        let result = broker.handle_message(9, ClientMessage::RelayMessage { text: "x".into() });
        assert_eq!(result, Err(RouteError::NotParticipantOrSpectator(9)));
    }

    #[test]
    fn test_list_session_ids_is_insertion_stable() {
        let mut broker = broker();
        let first = start_session(&mut broker, 10, 20);
        let second = start_session(&mut broker, 30, 40);

        let out = broker.handle_message(9, ClientMessage::ListSessionIds).unwrap();
        assert_eq!(
            out,
            vec![Outbound {
                conn: 9,
                message: ServerMessage::SessionIdList {
                    ids: vec![first, second]
                },
            }]
        );
    }

    #[test]
    fn test_disconnect_participant_equals_leave() {
        let mut broker = broker();
        let id = start_session(&mut broker, 10, 20);
        spectate(&mut broker, 5, id);

        let out = broker.handle_disconnect(10);

        assert!(broker.sessions().find_by_id(id).is_none());
        let recipients: HashSet<ConnId> = out.iter().map(|o| o.conn).collect();
        // The leaver is gone and gets nothing
        assert_eq!(recipients, HashSet::from([20, 5]));
        assert!(out
            .iter()
            .all(|o| o.message == ServerMessage::SessionTerminated));
    }

    #[test]
    fn test_disconnect_clears_waiting_slot() {
        let mut broker = broker();
        enqueue(&mut broker, 10);

        assert!(broker.handle_disconnect(10).is_empty());
        assert_eq!(broker.queue().waiting(), None);

        // The next two arrivals pair with each other, not the ghost
        enqueue(&mut broker, 20);
        enqueue(&mut broker, 30);
        let session = broker.sessions().find_by_participant(20).unwrap();
        assert!(session.is_participant(30));
    }

    #[test]
    fn test_disconnect_spectator_and_account_binding() {
        let mut broker = broker();
        broker.handle_frame(5, "2,carol,pw");
        broker.handle_frame(5, "1,carol,pw");
        let id = start_session(&mut broker, 10, 20);
        spectate(&mut broker, 5, id);

        assert!(broker.handle_disconnect(5).is_empty());

        let session = broker.sessions().find_by_id(id).unwrap();
        assert!(session.spectators.is_empty());
        assert_eq!(broker.connections().account(5), None);
        assert_eq!(broker.accounts().get("carol").unwrap().connection, None);
    }

    #[test]
    fn test_disconnect_cleans_both_memberships() {
        let mut broker = broker();
        let own = start_session(&mut broker, 10, 20);
        let other = start_session(&mut broker, 30, 40);
        spectate(&mut broker, 10, other);

        broker.handle_disconnect(10);

        assert!(broker.sessions().find_by_id(own).is_none());
        assert!(broker
            .sessions()
            .find_by_id(other)
            .unwrap()
            .spectators
            .is_empty());
    }

    #[test]
    fn test_malformed_frames_are_dropped() {
        let mut broker = broker();
        start_session(&mut broker, 10, 20);

        assert!(broker.handle_frame(10, "").is_empty());
        assert!(broker.handle_frame(10, "garbage").is_empty());
        assert!(broker.handle_frame(10, "99,field").is_empty());
        assert!(broker.handle_frame(10, "1,missing-password").is_empty());
        assert_eq!(broker.sessions().len(), 1);
    }
}
