use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use unfurl_core::{Link, TaskRecord, UnfurlMap};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("request failed: {0}")]
    Http(String),

    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("decode failed: {0}")]
    Decode(String),

    #[error("api error: {0}")]
    Api(String),
}

/// Looks up the task a shared link points at.
///
/// `Ok(None)` means the service answered but has no usable task for the link.
#[async_trait]
pub trait TaskSource: Send + Sync {
    async fn fetch_task(&self, link: &Link) -> Result<Option<TaskRecord>, ServiceError>;
}

/// Payload of Slack's `chat.unfurl`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnfurlRequest {
    pub channel: String,
    pub ts: String,
    pub unfurls: UnfurlMap,
}

/// Pushes previews back to the chat platform.
#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn unfurl(&self, request: &UnfurlRequest) -> Result<(), ServiceError>;
}
