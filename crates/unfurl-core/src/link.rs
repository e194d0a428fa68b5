use serde::{Deserialize, Serialize};

/// A URL shared in a chat message, together with the domain Slack matched it on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Link {
    pub url: String,
    pub domain: String,
}

impl Link {
    pub fn new(url: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            domain: domain.into(),
        }
    }
}

/// The inner `link_shared` event of a Slack `event_callback`.
///
/// Slack may list the same URL more than once when it appears several
/// times in a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkSharedEvent {
    pub channel: String,
    pub message_ts: String,
    #[serde(default)]
    pub links: Vec<Link>,
}
