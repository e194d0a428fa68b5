use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};
use unfurl_core::{DueDate, Link, ParentTask, TaskRecord};

use crate::{ServiceError, TaskSource};

/// Hosts under this suffix receive the API token when no explicit
/// domains are configured.
const TEAMWORK_HOST_SUFFIX: &str = ".teamwork.com";

/// Teamwork v1 REST client. Tasks are read from `https://{link.domain}`
/// unless an API base override is set.
///
/// The link domain comes from the inbound event, so only allowed hosts are
/// ever contacted with the token.
pub struct TeamworkSource {
    client: Client,
    api_token: String,
    api_base: Option<String>,
    allowed_domains: Vec<String>,
    dump_raw: bool,
}

impl TeamworkSource {
    pub fn new(api_token: &str, timeout: Duration) -> Result<Self, ServiceError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ServiceError::Http(format!("build client: {e}")))?;
        Ok(Self {
            client,
            api_token: api_token.to_string(),
            api_base: None,
            allowed_domains: Vec::new(),
            dump_raw: false,
        })
    }

    pub fn with_api_base(mut self, api_base: &str) -> Self {
        self.api_base = Some(api_base.trim_end_matches('/').to_string());
        self
    }

    /// Log every raw task response body before it is normalized.
    pub fn with_raw_dump(mut self, enabled: bool) -> Self {
        self.dump_raw = enabled;
        self
    }

    /// Restrict lookups to exactly these hosts. Empty keeps the default of
    /// any `*.teamwork.com` host.
    pub fn with_allowed_domains<I, S>(mut self, domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.allowed_domains = domains
            .into_iter()
            .map(|d| d.as_ref().trim().to_ascii_lowercase())
            .filter(|d| !d.is_empty())
            .collect();
        self
    }

    fn is_allowed_domain(&self, domain: &str) -> bool {
        let domain = domain.trim_end_matches('/').to_ascii_lowercase();
        if self.allowed_domains.is_empty() {
            return domain.len() > TEAMWORK_HOST_SUFFIX.len()
                && domain.ends_with(TEAMWORK_HOST_SUFFIX)
                && !domain.contains(['/', ':', '@']);
        }
        self.allowed_domains.iter().any(|d| *d == domain)
    }

    fn base_url(&self, link: &Link) -> String {
        match &self.api_base {
            Some(base) => base.clone(),
            None => format!("https://{}", link.domain.trim_end_matches('/')),
        }
    }
}

/// Extract the numeric task id from a Teamwork task URL.
///
/// Handles both `/#/tasks/123` and `/app/tasks/123?c=9` forms; the last
/// `tasks/<digits>` pair wins.
pub fn task_id_from_url(url: &str) -> Option<&str> {
    let segments: Vec<&str> = url.split(['/', '?', '#']).collect();
    segments.windows(2).rev().find_map(|pair| {
        let is_id = !pair[1].is_empty() && pair[1].bytes().all(|b| b.is_ascii_digit());
        (pair[0] == "tasks" && is_id).then_some(pair[1])
    })
}

#[async_trait]
impl TaskSource for TeamworkSource {
    async fn fetch_task(&self, link: &Link) -> Result<Option<TaskRecord>, ServiceError> {
        let Some(task_id) = task_id_from_url(&link.url) else {
            debug!(url = %link.url, "no task id in link");
            return Ok(None);
        };
        if !self.is_allowed_domain(&link.domain) {
            warn!(domain = %link.domain, url = %link.url, "refusing task lookup on foreign domain");
            return Ok(None);
        }

        let resp = self
            .client
            .get(format!("{}/tasks/{task_id}.json", self.base_url(link)))
            .basic_auth(&self.api_token, Some("x"))
            .send()
            .await
            .map_err(|e| ServiceError::Http(e.to_string()))?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let body = resp
            .text()
            .await
            .map_err(|e| ServiceError::Http(format!("read body: {e}")))?;
        if !status.is_success() {
            return Err(ServiceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        if self.dump_raw {
            info!(task_id, body = %body, "raw task response");
        }

        let envelope: TaskEnvelope =
            serde_json::from_str(&body).map_err(|e| ServiceError::Decode(e.to_string()))?;
        Ok(envelope.todo_item.map(RawTask::normalize))
    }
}

#[derive(Debug, Deserialize)]
struct TaskEnvelope {
    #[serde(rename = "todo-item")]
    todo_item: Option<RawTask>,
}

/// Teamwork ids show up as numbers in some payloads and strings in others.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(u64),
    Text(String),
}

impl RawId {
    fn into_string(self) -> String {
        match self {
            RawId::Number(n) => n.to_string(),
            RawId::Text(s) => s,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct RawTask {
    id: RawId,
    content: String,
    #[serde(default)]
    creator_firstname: String,
    #[serde(default)]
    creator_lastname: String,
    project_id: RawId,
    project_name: String,
    #[serde(default)]
    status: String,
    todo_list_id: RawId,
    todo_list_name: String,
    #[serde(default)]
    responsible_party_firstname: Option<String>,
    #[serde(default, rename = "parentTask")]
    parent_task: Value,
    #[serde(default, rename = "boardColumn")]
    board_column: Value,
    #[serde(default)]
    due_date: Option<String>,
    #[serde(default)]
    estimated_minutes: Value,
}

impl RawTask {
    fn normalize(self) -> TaskRecord {
        TaskRecord {
            id: self.id.into_string(),
            title: self.content,
            creator_first_name: self.creator_firstname,
            creator_last_name: self.creator_lastname,
            project_id: self.project_id.into_string(),
            project_name: self.project_name,
            status: self.status,
            list_id: self.todo_list_id.into_string(),
            list_name: self.todo_list_name,
            assignee_first_name: non_empty(self.responsible_party_firstname),
            parent_task: parent_task(&self.parent_task),
            board_column_name: non_empty(
                self.board_column
                    .get("name")
                    .and_then(Value::as_str)
                    .map(String::from),
            ),
            due_date: self
                .due_date
                .as_deref()
                .and_then(|d| DueDate::parse(d).ok()),
            estimated_minutes: estimated_minutes(&self.estimated_minutes),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

fn id_text(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

fn parent_task(value: &Value) -> Option<ParentTask> {
    let id = id_text(value.get("id")?)?;
    let title = value
        .get("content")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    Some(ParentTask { id, title })
}

fn estimated_minutes(value: &Value) -> Option<u32> {
    let minutes = match value {
        Value::Number(n) => n.as_u64()?,
        Value::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    u32::try_from(minutes).ok().filter(|m| *m > 0)
}
