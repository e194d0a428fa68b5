use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use unfurl_service::{ChatClient, TaskSource};

use tracing::subscriber::DefaultGuard;

use crate::routes::{build_router, AppState, InnerAppState};

/// App state over the given collaborators, with raw event logging off.
pub fn test_state(
    source: Arc<dyn TaskSource>,
    chat: Arc<dyn ChatClient>,
    signing_secret: Option<&str>,
) -> AppState {
    Arc::new(InnerAppState {
        source,
        chat,
        signing_secret: signing_secret.map(String::from),
        debug: false,
    })
}

pub fn test_router(
    source: Arc<dyn TaskSource>,
    chat: Arc<dyn ChatClient>,
    signing_secret: Option<&str>,
) -> Router {
    build_router(test_state(source, chat, signing_secret))
}

/// A running test server with base_url and background task handle.
pub struct TestServer {
    pub base_url: String,
    _handle: tokio::task::JoinHandle<()>,
}

/// Spawn the app on a random port. `base_url` looks like "http://127.0.0.1:12345".
pub async fn spawn_test_server(state: AppState) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://{addr}");
    let app = build_router(state);
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    TestServer {
        base_url,
        _handle: handle,
    }
}

/// Poll `check` for up to two seconds. Background unfurls finish after the ack.
pub async fn wait_until(check: impl Fn() -> bool) -> bool {
    for _ in 0..200 {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    check()
}

/// Collects formatted tracing output written on the current thread.
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    /// Install an INFO-level subscriber writing into this capture until the
    /// guard drops.
    pub fn install(&self) -> DefaultGuard {
        let writer = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn contents(&self) -> String {
        self.0
            .lock()
            .map(|buf| String::from_utf8_lossy(&buf).into_owned())
            .unwrap_or_default()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if let Ok(mut inner) = self.0.lock() {
            inner.extend_from_slice(buf);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
