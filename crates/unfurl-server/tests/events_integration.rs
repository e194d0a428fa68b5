//! End-to-end tests: a real server, real Teamwork and Slack clients, and a
//! wiremock server standing in for both APIs.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};
use unfurl_server::routes::InnerAppState;
use unfurl_server::signature;
use unfurl_server::test_helpers::spawn_test_server;
use unfurl_service::{SlackClient, TeamworkSource};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SECRET: &str = "integration-secret";

async fn spawn_with_mocks(mock: &MockServer) -> String {
    let source = TeamworkSource::new("tw-token", Duration::from_secs(5))
        .unwrap()
        .with_api_base(&mock.uri());
    let chat = SlackClient::new("xoxb-test", &mock.uri(), Duration::from_secs(5)).unwrap();
    let state = Arc::new(InnerAppState {
        source: Arc::new(source),
        chat: Arc::new(chat),
        signing_secret: Some(SECRET.into()),
        debug: true,
    });
    spawn_test_server(state).await.base_url
}

async fn post_signed(base_url: &str, body: &Value) -> reqwest::Response {
    let raw = body.to_string();
    let ts = chrono::Utc::now().timestamp().to_string();
    let sig = signature::sign(SECRET, &ts, raw.as_bytes());
    reqwest::Client::new()
        .post(format!("{base_url}/slack/events"))
        .header("content-type", "application/json")
        .header("X-Slack-Request-Timestamp", ts)
        .header("X-Slack-Signature", sig)
        .body(raw)
        .send()
        .await
        .unwrap()
}

/// Wait for the background unfurl to reach Slack and return its JSON body.
async fn wait_for_unfurl(mock: &MockServer) -> Value {
    for _ in 0..200 {
        let requests = mock.received_requests().await.unwrap_or_default();
        if let Some(req) = requests
            .iter()
            .find(|r| r.url.path() == "/api/chat.unfurl")
        {
            return serde_json::from_slice(&req.body).unwrap();
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("chat.unfurl was never called");
}

fn link_shared(links: Value) -> Value {
    json!({
        "type": "event_callback",
        "team_id": "T1",
        "event": {
            "type": "link_shared",
            "channel": "C123",
            "message_ts": "1721609600.000100",
            "links": links
        }
    })
}

#[tokio::test]
async fn ping_over_http() {
    let mock = MockServer::start().await;
    let base_url = spawn_with_mocks(&mock).await;
    let resp = reqwest::get(format!("{base_url}/ping")).await.unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "pong");
}

#[tokio::test]
async fn found_and_missing_tasks_are_unfurled_together() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tasks/101.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "STATUS": "OK",
            "todo-item": {
                "id": 101,
                "content": "Fix login redirect",
                "creator-firstname": "Ada",
                "creator-lastname": "Lovelace",
                "project-id": 7,
                "project-name": "Website",
                "status": "new",
                "todo-list-id": 42,
                "todo-list-name": "Bugs",
                "due-date": "20230115",
                "estimated-minutes": 125
            }
        })))
        .mount(&mock)
        .await;
    Mock::given(method("GET"))
        .and(path("/tasks/404.json"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/chat.unfurl"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .expect(1)
        .mount(&mock)
        .await;

    let base_url = spawn_with_mocks(&mock).await;
    let found = "https://acme.teamwork.com/app/tasks/101";
    let missing = "https://acme.teamwork.com/app/tasks/404";
    let resp = post_signed(
        &base_url,
        &link_shared(json!([
            { "url": found, "domain": "acme.teamwork.com" },
            { "url": missing, "domain": "acme.teamwork.com" }
        ])),
    )
    .await;
    assert_eq!(resp.status(), 200);

    let body = wait_for_unfurl(&mock).await;
    assert_eq!(body["channel"], "C123");
    assert_eq!(body["ts"], "1721609600.000100");

    let unfurls = body["unfurls"].as_object().unwrap();
    assert_eq!(unfurls.len(), 2);

    let full = &unfurls[found];
    assert!(full.get("url").is_none());
    assert_eq!(
        full["blocks"][0]["text"]["text"],
        format!("*Task:* <{found}|Fix login redirect>")
    );
    assert_eq!(full["blocks"][1]["elements"][0]["text"], "Created by: Ada Lovelace");
    assert_eq!(full["blocks"][2], json!({ "type": "divider" }));
    let fields: Vec<&str> = full["blocks"][3]["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["text"].as_str().unwrap())
        .collect();
    assert_eq!(
        fields,
        [
            "*Project:*  <https://acme.teamwork.com/projects/7|Website>",
            "*Status:*  new",
            "*List:*  <https://acme.teamwork.com/tasklists/42|Bugs>",
            "*Due:*  202-0-1",
            "*Estimated:*  2:5",
        ]
    );

    assert_eq!(
        unfurls[missing],
        json!({
            "blocks": [{
                "type": "context",
                "elements": [{ "type": "plain_text", "text": "TW API error or Invalid Task." }]
            }]
        })
    );
}

#[tokio::test]
async fn slack_rejection_does_not_break_the_server() {
    let mock = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat.unfurl"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "ok": false, "error": "invalid_auth" })),
        )
        .mount(&mock)
        .await;

    let base_url = spawn_with_mocks(&mock).await;
    let resp = post_signed(
        &base_url,
        &link_shared(json!([
            { "url": "https://acme.teamwork.com/app/projects/7", "domain": "acme.teamwork.com" }
        ])),
    )
    .await;
    assert_eq!(resp.status(), 200);
    wait_for_unfurl(&mock).await;

    let resp = reqwest::get(format!("{base_url}/ping")).await.unwrap();
    assert_eq!(resp.status(), 200);
}
