use std::time::Duration;

use clap::Parser;
use unfurl_service::SLACK_API_BASE;

#[derive(Debug, Parser)]
#[command(name = "unfurl-server", about = "Unfurls Teamwork task links shared in Slack")]
pub struct ServerConfig {
    /// Slack bot token (xoxb-...) used for chat.unfurl
    #[arg(long, env = "SLACK_BOT_TOKEN", hide_env_values = true)]
    pub slack_bot_token: String,

    /// Slack signing secret. Request verification is disabled when unset.
    #[arg(long, env = "SLACK_SIGNING_SECRET", hide_env_values = true)]
    pub slack_signing_secret: Option<String>,

    /// Slack Web API base URL
    #[arg(long, env = "SLACK_API_BASE", default_value = SLACK_API_BASE)]
    pub slack_api_base: String,

    /// Teamwork API token
    #[arg(long, env = "TEAMWORK_API_TOKEN", hide_env_values = true)]
    pub teamwork_api_token: String,

    /// Send every Teamwork request here instead of the shared link's domain
    #[arg(long, env = "TEAMWORK_API_BASE")]
    pub teamwork_api_base: Option<String>,

    /// Teamwork hosts that may receive the API token, comma separated.
    /// Defaults to any `*.teamwork.com` host.
    #[arg(long, env = "TEAMWORK_DOMAINS", value_delimiter = ',')]
    pub teamwork_domains: Vec<String>,

    /// Address to bind
    #[arg(long, env = "UNFURL_BIND", default_value = "0.0.0.0")]
    pub bind: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value = "3000")]
    pub port: u16,

    /// Log raw Slack events and raw Teamwork responses
    #[arg(long, env = "UNFURL_DEBUG")]
    pub debug: bool,

    /// Timeout for each outbound HTTP request (seconds)
    #[arg(long, env = "UNFURL_REQUEST_TIMEOUT", default_value = "10")]
    pub request_timeout: u64,
}

impl ServerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    /// Default tracing filter when `RUST_LOG` is unset.
    pub fn default_log_filter(&self) -> &'static str {
        if self.debug {
            "debug"
        } else {
            "info"
        }
    }
}
