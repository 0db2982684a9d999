//! Broker Core
//!
//! The synchronous session-broker state machine: account store, connection
//! index, matchmaking queue, session registry, and the message router that
//! ties them together. Everything here is transport-free; the network
//! layer feeds it one event at a time, which is the only serialization the
//! collections need.

pub mod account;
pub mod connection;
pub mod matchmaking;
pub mod router;
pub mod session;

/// Transport-assigned connection identifier, stable for the link's
/// lifetime.
pub type ConnId = u64;

pub use account::{Account, AccountStore, LoginResponse, StoreError};
pub use connection::ConnectionIndex;
pub use matchmaking::{MatchmakingQueue, Pairing};
pub use router::{Broker, Outbound, RouteError};
pub use session::{Session, SessionId, SessionRegistry, INITIAL_STATE};
