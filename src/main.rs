//! Duel Broker binary.
//!
//! Loads the account store, then runs the WebSocket broker until ctrl-c.

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use duel_broker::{AccountStore, BrokerServer, DeterministicRng, ServerConfig, VERSION};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env();
    info!("duel broker v{VERSION}");
    info!("bind address: {}", config.bind_addr);

    let accounts =
        AccountStore::load(&config.accounts_path).context("loading account store")?;
    info!(
        "loaded {} accounts from {}",
        accounts.len(),
        config.accounts_path.display()
    );

    let server = BrokerServer::new(config, accounts, DeterministicRng::from_clock());

    let shutdown = server.shutdown_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("ctrl-c received, shutting down");
            let _ = shutdown.send(());
        }
    });

    server.run().await.context("running broker server")?;
    Ok(())
}
