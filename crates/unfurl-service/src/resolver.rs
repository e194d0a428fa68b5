//! Resolves a shared link to a task record, absorbing every failure.

use tracing::{debug, warn};
use unfurl_core::{Link, TaskRecord};

use crate::TaskSource;

/// Never fails: lookup errors and missing tasks both come back as `None`.
pub async fn resolve(source: &dyn TaskSource, link: &Link) -> Option<TaskRecord> {
    match source.fetch_task(link).await {
        Ok(Some(record)) => Some(record),
        Ok(None) => {
            debug!(url = %link.url, "task not found");
            None
        }
        Err(e) => {
            warn!(url = %link.url, error = %e, "task lookup failed");
            None
        }
    }
}
