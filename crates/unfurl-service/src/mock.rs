use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use unfurl_core::{Link, TaskRecord};

use crate::{ChatClient, ServiceError, TaskSource, UnfurlRequest};

enum Outcome {
    Task(TaskRecord),
    Error(String),
}

/// A task source for tests, keyed by link URL.
///
/// URLs with no configured outcome resolve to `Ok(None)`.
#[derive(Default)]
pub struct MockTaskSource {
    outcomes: HashMap<String, Outcome>,
    delays: HashMap<Link, Duration>,
    calls: AtomicUsize,
}

impl MockTaskSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_task(mut self, url: &str, task: TaskRecord) -> Self {
        self.outcomes.insert(url.to_string(), Outcome::Task(task));
        self
    }

    pub fn with_error(mut self, url: &str, message: &str) -> Self {
        self.outcomes
            .insert(url.to_string(), Outcome::Error(message.to_string()));
        self
    }

    /// Sleep before answering for `link`, to control completion order.
    pub fn with_delay(mut self, link: &Link, delay: Duration) -> Self {
        self.delays.insert(link.clone(), delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TaskSource for MockTaskSource {
    async fn fetch_task(&self, link: &Link) -> Result<Option<TaskRecord>, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delays.get(link) {
            tokio::time::sleep(*delay).await;
        }
        match self.outcomes.get(&link.url) {
            Some(Outcome::Task(task)) => Ok(Some(task.clone())),
            Some(Outcome::Error(msg)) => Err(ServiceError::Http(msg.clone())),
            None => Ok(None),
        }
    }
}

/// Records every unfurl request; optionally fails them all.
#[derive(Default)]
pub struct MockChatClient {
    requests: Mutex<Vec<UnfurlRequest>>,
    failure: Option<String>,
}

impl MockChatClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(error: &str) -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            failure: Some(error.to_string()),
        }
    }

    pub fn requests(&self) -> Vec<UnfurlRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ChatClient for MockChatClient {
    async fn unfurl(&self, request: &UnfurlRequest) -> Result<(), ServiceError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }
        match &self.failure {
            Some(error) => Err(ServiceError::Api(error.clone())),
            None => Ok(()),
        }
    }
}

/// A task with every mandatory field set and no optional ones.
pub fn sample_task(id: &str) -> TaskRecord {
    TaskRecord {
        id: id.to_string(),
        title: format!("Task {id}"),
        creator_first_name: "Ada".into(),
        creator_last_name: "Lovelace".into(),
        project_id: "7".into(),
        project_name: "Website".into(),
        status: "new".into(),
        list_id: "42".into(),
        list_name: "Bugs".into(),
        assignee_first_name: None,
        parent_task: None,
        board_column_name: None,
        due_date: None,
        estimated_minutes: None,
    }
}
