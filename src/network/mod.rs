//! Network Layer
//!
//! WebSocket transport and the text wire protocol. Everything stateful
//! lives in `broker/`; this layer only moves frames.

pub mod protocol;
pub mod server;

pub use protocol::{ClientMessage, PlayerRole, ProtocolError, ServerMessage};
pub use server::{BrokerServer, ServerConfig, ServerError, TransportEvent};
