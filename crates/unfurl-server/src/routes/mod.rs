pub mod events;
pub mod health;

use std::sync::Arc;

use axum::Router;
use tower_http::trace::TraceLayer;
use unfurl_service::{ChatClient, TaskSource};

pub struct InnerAppState {
    pub source: Arc<dyn TaskSource>,
    pub chat: Arc<dyn ChatClient>,
    /// When set, every Slack request must carry a valid signature.
    pub signing_secret: Option<String>,
    /// Log raw inbound events.
    pub debug: bool,
}

pub type AppState = Arc<InnerAppState>;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(health::routes())
        .merge(events::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
