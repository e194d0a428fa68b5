use std::net::SocketAddr;

use anyhow::Result;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{info, warn};
use unfurl_server::config::ServerConfig;

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServerConfig::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(config.default_log_filter())),
        )
        .init();

    if config.slack_signing_secret.is_none() {
        warn!("SLACK_SIGNING_SECRET not set, request verification disabled");
    }
    if config.debug {
        info!("debug mode: raw events and task responses will be logged");
    }

    let state = unfurl_server::build_state(&config)?;

    let addr = SocketAddr::new(config.bind.parse()?, config.port);
    let listener = TcpListener::bind(addr).await?;
    info!("unfurl-server listening on http://{addr}");

    unfurl_server::serve(listener, state).await
}
