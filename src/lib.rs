//! # Duel Broker
//!
//! Session broker for two-player matches: authenticates clients against a
//! flat account store, pairs waiting players into sessions, relays opaque
//! per-turn game state between participants, and fans updates out to
//! spectators. The broker never interprets game state; win detection and
//! rendering are entirely client concerns.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       DUEL BROKER                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/             - Transport-free primitives               │
//! │  └── rng.rs        - Deterministic Xorshift128+ PRNG         │
//! │                                                              │
//! │  broker/           - Synchronous state machine               │
//! │  ├── account.rs    - Flat-file account store                 │
//! │  ├── connection.rs - Connection id -> account index          │
//! │  ├── matchmaking.rs- Single-slot waiting queue               │
//! │  ├── session.rs    - Session registry with hashed indices    │
//! │  └── router.rs     - Per-message dispatch, outbound batches  │
//! │                                                              │
//! │  network/          - Async transport                         │
//! │  ├── protocol.rs   - Comma-separated text wire format        │
//! │  └── server.rs     - WebSocket server, single broker task    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Serialization Discipline
//!
//! All broker state is owned by one task reading a single event channel,
//! so handlers run strictly one at a time: a connection can never be
//! matched into two sessions, and no collection needs a lock.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod broker;
pub mod core;
pub mod network;

// Re-export commonly used types
pub use broker::{Account, AccountStore, Broker, ConnId, LoginResponse, Outbound, SessionId};
pub use core::rng::DeterministicRng;
pub use network::{BrokerServer, ClientMessage, PlayerRole, ServerConfig, ServerMessage};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
