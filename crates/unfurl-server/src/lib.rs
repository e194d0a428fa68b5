pub mod config;
pub mod routes;
pub mod signature;
pub mod test_helpers;

use std::sync::Arc;

use anyhow::Result;
use tokio::net::TcpListener;
use unfurl_service::{SlackClient, TeamworkSource};

use config::ServerConfig;
use routes::{AppState, InnerAppState};

/// Wire the Teamwork and Slack clients described by `config` into app state.
pub fn build_state(config: &ServerConfig) -> Result<AppState> {
    let mut source = TeamworkSource::new(&config.teamwork_api_token, config.request_timeout())?
        .with_allowed_domains(&config.teamwork_domains)
        .with_raw_dump(config.debug);
    if let Some(ref base) = config.teamwork_api_base {
        source = source.with_api_base(base);
    }

    let chat = SlackClient::new(
        &config.slack_bot_token,
        &config.slack_api_base,
        config.request_timeout(),
    )?;

    Ok(Arc::new(InnerAppState {
        source: Arc::new(source),
        chat: Arc::new(chat),
        signing_secret: config.slack_signing_secret.clone(),
        debug: config.debug,
    }))
}

pub async fn serve(listener: TcpListener, state: AppState) -> Result<()> {
    let app = routes::build_router(state);
    axum::serve(listener, app).await?;
    Ok(())
}
