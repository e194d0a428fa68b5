use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{ChatClient, ServiceError, UnfurlRequest};

pub const SLACK_API_BASE: &str = "https://slack.com";

/// Slack Web API client authenticated with a bot token.
pub struct SlackClient {
    client: Client,
    bot_token: String,
    api_base: String,
}

impl SlackClient {
    pub fn new(bot_token: &str, api_base: &str, timeout: Duration) -> Result<Self, ServiceError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ServiceError::Http(format!("build client: {e}")))?;
        Ok(Self {
            client,
            bot_token: bot_token.to_string(),
            api_base: api_base.trim_end_matches('/').to_string(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct SlackResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

#[async_trait]
impl ChatClient for SlackClient {
    async fn unfurl(&self, request: &UnfurlRequest) -> Result<(), ServiceError> {
        let resp = self
            .client
            .post(format!("{}/api/chat.unfurl", self.api_base))
            .bearer_auth(&self.bot_token)
            .json(request)
            .send()
            .await
            .map_err(|e| ServiceError::Http(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ServiceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: SlackResponse = resp
            .json()
            .await
            .map_err(|e| ServiceError::Decode(e.to_string()))?;
        if body.ok {
            Ok(())
        } else {
            Err(ServiceError::Api(
                body.error.unwrap_or_else(|| "unknown".to_string()),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use unfurl_core::attachment::{key_by_url, Attachment};
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> UnfurlRequest {
        UnfurlRequest {
            channel: "C123".into(),
            ts: "1721609600.000100".into(),
            unfurls: key_by_url(vec![Attachment::fallback("https://acme.teamwork.com/app/tasks/1")]),
        }
    }

    fn client(server: &MockServer) -> SlackClient {
        SlackClient::new("xoxb-test", &server.uri(), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn unfurl_posts_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat.unfurl"))
            .and(header("authorization", "Bearer xoxb-test"))
            .and(body_json(json!({
                "channel": "C123",
                "ts": "1721609600.000100",
                "unfurls": {
                    "https://acme.teamwork.com/app/tasks/1": {
                        "blocks": [{
                            "type": "context",
                            "elements": [{ "type": "plain_text", "text": "TW API error or Invalid Task." }]
                        }]
                    }
                }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
            .expect(1)
            .mount(&server)
            .await;

        client(&server).unfurl(&request()).await.unwrap();
    }

    #[tokio::test]
    async fn unfurl_not_ok_is_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat.unfurl"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "ok": false, "error": "cannot_unfurl_url" })),
            )
            .mount(&server)
            .await;

        let err = client(&server).unfurl(&request()).await.unwrap_err();
        match err {
            ServiceError::Api(msg) => assert_eq!(msg, "cannot_unfurl_url"),
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unfurl_http_failure_is_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat.unfurl"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = client(&server).unfurl(&request()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Status { status: 503, .. }));
    }
}
