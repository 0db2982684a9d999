//! Protocol Messages
//!
//! Wire format for client-server communication: one logical message per
//! transport frame, text-based, comma-separated fields with an integer
//! signifier first.
//!
//! Client to server: `1=Login(name,password)`, `2=CreateAccount(name,password)`,
//! `3=EnqueueForMatch`, `4=PlayTurn(state)`, `5=LeaveSession`,
//! `6=RelayMessage(text)`, `7=ListSessionIds`, `8=SpectateSession(sessionId)`.
//!
//! Server to client: `1=LoginResult(code)`, `2=SessionStarted(role)`,
//! `3=OpponentPlayed(state)`, `4=SessionTerminated`, `5=RelayedMessage(text)`,
//! `6=SessionIdList(id,...)`, `7=SpectateStarted(state)`,
//! `8=SpectatorUpdate(state)`.
//!
//! Payload fields (`state`, `text`, passwords) take the remainder of the
//! frame, so opaque payloads may themselves contain commas.

use thiserror::Error;

use crate::broker::account::LoginResponse;
use crate::broker::session::SessionId;

/// Role token handed to each participant when a session starts.
///
/// Cosmetic to the broker; the numeric values are fixed by the wire format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PlayerRole {
    /// Moves second ("circles").
    Second = 1,
    /// Moves first ("crosses").
    First = 2,
}

impl PlayerRole {
    /// The role the opposing participant holds.
    pub fn opposite(self) -> PlayerRole {
        match self {
            PlayerRole::First => PlayerRole::Second,
            PlayerRole::Second => PlayerRole::First,
        }
    }
}

/// Messages sent from client to server.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClientMessage {
    /// Authenticate against an existing account.
    Login {
        /// Account name.
        name: String,
        /// Account password.
        password: String,
    },

    /// Register a new account.
    CreateAccount {
        /// Requested account name.
        name: String,
        /// Password to store.
        password: String,
    },

    /// Enter the matchmaking waiting slot.
    EnqueueForMatch,

    /// Publish a new game state to the session.
    PlayTurn {
        /// Opaque replacement state.
        state: String,
    },

    /// Leave the current session (participant) or stop spectating.
    LeaveSession,

    /// Forward a text message to everyone else in the session.
    RelayMessage {
        /// Opaque text to relay.
        text: String,
    },

    /// Ask for the ids of all active sessions.
    ListSessionIds,

    /// Start observing a session.
    SpectateSession {
        /// Target session id.
        session: SessionId,
    },
}

/// Messages sent from server to client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ServerMessage {
    /// Outcome of a `Login` or `CreateAccount` request.
    LoginResult {
        /// Typed response code.
        code: LoginResponse,
    },

    /// A match was found; carries the receiver's assigned role.
    SessionStarted {
        /// Role token for this participant.
        role: PlayerRole,
    },

    /// The opposing participant published a new state.
    OpponentPlayed {
        /// Opaque replacement state.
        state: String,
    },

    /// The session ended because a participant left.
    SessionTerminated,

    /// Text relayed from another member of the session.
    RelayedMessage {
        /// Opaque relayed text.
        text: String,
    },

    /// All active session ids, in creation order.
    SessionIdList {
        /// Session ids.
        ids: Vec<SessionId>,
    },

    /// Spectating begins; carries the session's current state.
    SpectateStarted {
        /// Current opaque state.
        state: String,
    },

    /// A participant published a new state in the spectated session.
    SpectatorUpdate {
        /// Opaque replacement state.
        state: String,
    },
}

/// Wire parsing errors. Malformed frames fail closed: log and drop.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    /// Frame was empty.
    #[error("empty message")]
    Empty,

    /// Leading signifier was not an integer.
    #[error("signifier is not an integer: {0:?}")]
    BadTag(String),

    /// Integer signifier with no assigned meaning.
    #[error("unknown signifier {0}")]
    UnknownTag(u8),

    /// A required field was absent.
    #[error("missing {0} field")]
    MissingField(&'static str),

    /// A field was present but unparseable.
    #[error("bad {0} field")]
    BadField(&'static str),
}

impl ClientMessage {
    /// Decode a frame into a typed message.
    pub fn decode(frame: &str) -> Result<Self, ProtocolError> {
        let (tag, rest) = split_tag(frame)?;

        match tag {
            1 => {
                let (name, password) = split_credentials(rest)?;
                Ok(ClientMessage::Login { name, password })
            }
            2 => {
                let (name, password) = split_credentials(rest)?;
                Ok(ClientMessage::CreateAccount { name, password })
            }
            3 => Ok(ClientMessage::EnqueueForMatch),
            4 => {
                let state = rest.ok_or(ProtocolError::MissingField("state"))?;
                Ok(ClientMessage::PlayTurn {
                    state: state.to_string(),
                })
            }
            5 => Ok(ClientMessage::LeaveSession),
            6 => {
                let text = rest.ok_or(ProtocolError::MissingField("text"))?;
                Ok(ClientMessage::RelayMessage {
                    text: text.to_string(),
                })
            }
            7 => Ok(ClientMessage::ListSessionIds),
            8 => {
                let session = rest
                    .ok_or(ProtocolError::MissingField("session id"))?
                    .parse::<SessionId>()
                    .map_err(|_| ProtocolError::BadField("session id"))?;
                Ok(ClientMessage::SpectateSession { session })
            }
            other => Err(ProtocolError::UnknownTag(other)),
        }
    }
}

impl ServerMessage {
    /// Encode into a wire frame.
    pub fn encode(&self) -> String {
        match self {
            ServerMessage::LoginResult { code } => format!("1,{}", *code as u8),
            ServerMessage::SessionStarted { role } => format!("2,{}", *role as u8),
            ServerMessage::OpponentPlayed { state } => format!("3,{state}"),
            ServerMessage::SessionTerminated => "4".to_string(),
            ServerMessage::RelayedMessage { text } => format!("5,{text}"),
            ServerMessage::SessionIdList { ids } => {
                let mut frame = String::from("6");
                for id in ids {
                    frame.push(',');
                    frame.push_str(&id.to_string());
                }
                frame
            }
            ServerMessage::SpectateStarted { state } => format!("7,{state}"),
            ServerMessage::SpectatorUpdate { state } => format!("8,{state}"),
        }
    }
}

/// Split the integer signifier off a frame. The remainder, if any, is the
/// message body.
fn split_tag(frame: &str) -> Result<(u8, Option<&str>), ProtocolError> {
    if frame.is_empty() {
        return Err(ProtocolError::Empty);
    }

    let (tag, rest) = match frame.split_once(',') {
        Some((tag, rest)) => (tag, Some(rest)),
        None => (frame, None),
    };

    let tag = tag
        .parse::<u8>()
        .map_err(|_| ProtocolError::BadTag(tag.to_string()))?;
    Ok((tag, rest))
}

/// Split a credential body into name and password. The first comma divides
/// them; the password is the remainder.
fn split_credentials(rest: Option<&str>) -> Result<(String, String), ProtocolError> {
    let rest = rest.ok_or(ProtocolError::MissingField("name"))?;
    let (name, password) = rest
        .split_once(',')
        .ok_or(ProtocolError::MissingField("password"))?;
    Ok((name.to_string(), password.to_string()))
}
