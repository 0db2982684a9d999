//! WebSocket Broker Server
//!
//! Async transport layer: accepts connections, assigns each a connection
//! id, and feeds frames into the single broker task that owns all mutable
//! state. Per-connection reader and writer tasks never touch the broker
//! directly, so every mutation is serialized through one event channel.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{broadcast, mpsc};
use tokio_tungstenite::{accept_async, tungstenite::Message};
use tracing::{debug, error, info, warn};

use crate::broker::account::AccountStore;
use crate::broker::{Broker, ConnId, Outbound};
use crate::core::rng::DeterministicRng;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address.
    pub bind_addr: SocketAddr,
    /// Maximum concurrent connections.
    pub max_connections: usize,
    /// Account file location.
    pub accounts_path: PathBuf,
    /// Server version string.
    pub version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:5491".parse().unwrap(),
            max_connections: 1000,
            accounts_path: PathBuf::from("accounts.txt"),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl ServerConfig {
    /// Create config from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(addr) = std::env::var("BROKER_BIND_ADDR") {
            match addr.parse() {
                Ok(parsed) => config.bind_addr = parsed,
                Err(_) => warn!(addr = %addr, "ignoring unparseable BROKER_BIND_ADDR"),
            }
        }
        if let Ok(max) = std::env::var("BROKER_MAX_CONNECTIONS") {
            match max.parse() {
                Ok(parsed) => config.max_connections = parsed,
                Err(_) => warn!(max = %max, "ignoring unparseable BROKER_MAX_CONNECTIONS"),
            }
        }
        if let Ok(path) = std::env::var("BROKER_ACCOUNTS_PATH") {
            config.accounts_path = PathBuf::from(path);
        }

        config
    }
}

/// Broker server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Failed to bind the listening socket.
    #[error("failed to bind: {0}")]
    BindFailed(#[from] std::io::Error),
}

/// Event delivered from a connection task to the broker task.
#[derive(Debug)]
pub enum TransportEvent {
    /// A connection completed its handshake; `sender` delivers outbound
    /// frames to its writer task.
    Connected {
        /// Transport-assigned connection id.
        conn: ConnId,
        /// Outbound frame channel for this connection.
        sender: mpsc::Sender<String>,
    },
    /// A text frame arrived.
    Frame {
        /// Source connection.
        conn: ConnId,
        /// Raw frame contents.
        text: String,
    },
    /// The connection closed or failed.
    Disconnected {
        /// The connection that went away.
        conn: ConnId,
    },
}

/// The broker server: accept loop plus the owning broker task.
pub struct BrokerServer {
    config: ServerConfig,
    broker: Broker,
    shutdown_tx: broadcast::Sender<()>,
}

impl BrokerServer {
    /// Create a server around a loaded account store.
    pub fn new(config: ServerConfig, accounts: AccountStore, rng: DeterministicRng) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);

        Self {
            config,
            broker: Broker::new(accounts, rng),
            shutdown_tx,
        }
    }

    /// Handle that stops the server when a unit is sent on it.
    pub fn shutdown_handle(&self) -> broadcast::Sender<()> {
        self.shutdown_tx.clone()
    }

    /// Run the accept loop until shutdown is signalled.
    pub async fn run(self) -> Result<(), ServerError> {
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        info!("broker listening on {}", self.config.bind_addr);

        let (event_tx, event_rx) = mpsc::channel::<TransportEvent>(256);
        let broker_handle = tokio::spawn(run_broker(self.broker, event_rx));

        let live = Arc::new(AtomicUsize::new(0));
        let mut next_conn: ConnId = 1;
        let mut shutdown_rx = self.shutdown_tx.subscribe();

        loop {
            tokio::select! {
                result = listener.accept() => {
                    match result {
                        Ok((stream, addr)) => {
                            if live.load(Ordering::Relaxed) >= self.config.max_connections {
                                warn!(%addr, "connection limit reached, rejecting");
                                continue;
                            }

                            let conn = next_conn;
                            next_conn += 1;
                            live.fetch_add(1, Ordering::Relaxed);

                            tokio::spawn(handle_connection(
                                conn,
                                stream,
                                addr,
                                event_tx.clone(),
                                self.shutdown_tx.subscribe(),
                                live.clone(),
                            ));
                        }
                        Err(e) => {
                            error!("accept error: {e}");
                        }
                    }
                }
                _ = shutdown_rx.recv() => {
                    info!("shutdown signal received");
                    break;
                }
            }
        }

        // Connection tasks exit on the shutdown broadcast; once the last
        // event sender drops, the broker task drains and finishes.
        drop(event_tx);
        let _ = broker_handle.await;

        Ok(())
    }
}

/// The single task owning the broker state.
///
/// Reads transport events in arrival order and forwards each handler's
/// outbound batch to the per-connection writer channels.
async fn run_broker(mut broker: Broker, mut events: mpsc::Receiver<TransportEvent>) {
    let mut writers: HashMap<ConnId, mpsc::Sender<String>> = HashMap::new();

    while let Some(event) = events.recv().await {
        match event {
            TransportEvent::Connected { conn, sender } => {
                writers.insert(conn, sender);
                broker.handle_connect(conn);
            }
            TransportEvent::Frame { conn, text } => {
                let batch = broker.handle_frame(conn, &text);
                deliver(&writers, batch).await;
            }
            TransportEvent::Disconnected { conn } => {
                writers.remove(&conn);
                let batch = broker.handle_disconnect(conn);
                deliver(&writers, batch).await;
            }
        }
    }

    debug!("broker task finished");
}

/// Send a handler's outbound batch to the matching writer tasks.
async fn deliver(writers: &HashMap<ConnId, mpsc::Sender<String>>, batch: Vec<Outbound>) {
    for outbound in batch {
        let Some(writer) = writers.get(&outbound.conn) else {
            debug!(conn = outbound.conn, "dropping message for unknown connection");
            continue;
        };
        if writer.send(outbound.message.encode()).await.is_err() {
            debug!(conn = outbound.conn, "writer closed, message dropped");
        }
    }
}

/// Drive one WebSocket connection: handshake, reader loop, writer task.
async fn handle_connection(
    conn: ConnId,
    stream: TcpStream,
    addr: SocketAddr,
    events: mpsc::Sender<TransportEvent>,
    mut shutdown_rx: broadcast::Receiver<()>,
    live: Arc<AtomicUsize>,
) {
    let ws_stream = match accept_async(stream).await {
        Ok(ws) => ws,
        Err(e) => {
            error!(conn, %addr, "websocket handshake failed: {e}");
            live.fetch_sub(1, Ordering::Relaxed);
            return;
        }
    };

    let (mut ws_sender, mut ws_receiver) = ws_stream.split();
    let (msg_tx, mut msg_rx) = mpsc::channel::<String>(64);

    if events
        .send(TransportEvent::Connected {
            conn,
            sender: msg_tx,
        })
        .await
        .is_err()
    {
        live.fetch_sub(1, Ordering::Relaxed);
        return;
    }
    info!(conn, %addr, "connection open");

    // Writer task: drains the outbound channel into the socket.
    let sender_task = tokio::spawn(async move {
        while let Some(text) = msg_rx.recv().await {
            if ws_sender.send(Message::Text(text)).await.is_err() {
                break;
            }
        }
    });

    loop {
        tokio::select! {
            msg = ws_receiver.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        if events.send(TransportEvent::Frame { conn, text }).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Binary(data))) => {
                        match String::from_utf8(data) {
                            Ok(text) => {
                                if events.send(TransportEvent::Frame { conn, text }).await.is_err() {
                                    break;
                                }
                            }
                            Err(_) => {
                                debug!(conn, "dropping non-utf8 binary frame");
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        debug!(conn, "client disconnected");
                        break;
                    }
                    Some(Err(e)) => {
                        debug!(conn, "websocket error: {e}");
                        break;
                    }
                    Some(Ok(_)) => {}
                }
            }
            _ = shutdown_rx.recv() => {
                break;
            }
        }
    }

    sender_task.abort();
    let _ = events.send(TransportEvent::Disconnected { conn }).await;
    live.fetch_sub(1, Ordering::Relaxed);
    info!(conn, %addr, "connection closed");
}
