//! Turns the links of one `link_shared` event into a single `chat.unfurl` call.

use futures::future::join_all;
use tracing::{debug, error, info};
use unfurl_core::attachment::key_by_url;
use unfurl_core::{preview, Attachment, Link, LinkSharedEvent, UnfurlMap};

use crate::resolver::resolve;
use crate::{ChatClient, TaskSource, UnfurlRequest};

/// Resolve and build every link concurrently. Output order matches `links`.
pub async fn build_attachments(source: &dyn TaskSource, links: &[Link]) -> Vec<Attachment> {
    join_all(links.iter().map(|link| async move {
        let record = resolve(source, link).await;
        preview::build(link, record.as_ref())
    }))
    .await
}

/// Build the URL-keyed unfurls for `links`. For a URL listed more than once,
/// the attachment of its last occurrence is kept.
pub async fn build_unfurls(source: &dyn TaskSource, links: &[Link]) -> UnfurlMap {
    key_by_url(build_attachments(source, links).await)
}

/// Build the unfurls for `event` and submit them. Submission failures are
/// logged, not returned.
pub async fn handle_link_shared(
    source: &dyn TaskSource,
    chat: &dyn ChatClient,
    event: &LinkSharedEvent,
) -> UnfurlMap {
    if event.links.is_empty() {
        debug!(channel = %event.channel, "link_shared event without links");
        return UnfurlMap::new();
    }

    let request = UnfurlRequest {
        channel: event.channel.clone(),
        ts: event.message_ts.clone(),
        unfurls: build_unfurls(source, &event.links).await,
    };

    match chat.unfurl(&request).await {
        Ok(()) => info!(
            channel = %request.channel,
            ts = %request.ts,
            count = request.unfurls.len(),
            "unfurled links"
        ),
        Err(e) => error!(
            channel = %request.channel,
            ts = %request.ts,
            error = %e,
            "chat.unfurl failed"
        ),
    }

    request.unfurls
}
