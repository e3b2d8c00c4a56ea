//! Integration tests for the chat pipeline against a mock webhook.

use std::sync::Arc;
use std::time::Duration;

use weather_agent_core::chat::{AgentClient, FALLBACK_MESSAGE, WebhookAgentClient};
use weather_agent_core::{ChatStore, ClientError, HttpSettings};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const HOOK_PATH: &str = "/webhook/weather-agent";

fn client_for(server: &MockServer, settings: HttpSettings) -> WebhookAgentClient {
    let http = settings.build_client().unwrap();
    WebhookAgentClient::new(http, format!("{}{}", server.uri(), HOOK_PATH))
}

#[tokio::test]
async fn test_reply_is_cleaned() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(HOOK_PATH))
        .and(query_param("future", "Will it rain today?"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "myField": "Yes, expect rain.\\n"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let store = ChatStore::new(Arc::new(client_for(&mock_server, HttpSettings::default())));
    store.update_draft("Will it rain today?");
    assert!(store.send_message().await);

    let state = store.state();
    assert_eq!(state.messages.len(), 2);
    assert_eq!(state.messages[0].content, "Will it rain today?");
    assert!(state.messages[0].is_from_user);
    assert_eq!(state.messages[1].content, "Yes, expect rain.");
    assert!(!state.messages[1].is_from_user);
}

#[tokio::test]
async fn test_special_characters_are_encoded() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(HOOK_PATH))
        .and(query_param("future", "temp & wind in Nairobi? 100%"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "myField": "Breezy, 22°C"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, HttpSettings::default());
    let reply = client.ask("temp & wind in Nairobi? 100%").await.unwrap();

    assert_eq!(reply, "Breezy, 22°C");
}

#[tokio::test]
async fn test_missing_field() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(HOOK_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "output": "wrong key"
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, HttpSettings::default());
    let err = client.ask("hello").await.unwrap_err();

    assert_eq!(err, ClientError::MissingField("myField"));
}

#[tokio::test]
async fn test_non_json_body_is_decode_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(HOOK_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("Workflow was started"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, HttpSettings::default());
    let err = client.ask("hello").await.unwrap_err();

    assert!(matches!(err, ClientError::Decode(_)));
}

#[tokio::test]
async fn test_not_found_falls_back() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(HOOK_PATH))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "code": 404,
            "message": "The requested webhook is not registered."
        })))
        .mount(&mock_server)
        .await;

    let store = ChatStore::new(Arc::new(client_for(&mock_server, HttpSettings::default())));
    store.update_draft("hello");
    store.send_message().await;

    let state = store.state();
    assert_eq!(state.messages.len(), 2);
    assert_eq!(state.messages[1].content, FALLBACK_MESSAGE);
    assert_eq!(
        state.last_error.as_deref(),
        Some("server returned status 404 Not Found")
    );
    assert!(!state.is_loading);
}

#[tokio::test]
async fn test_timeout_is_network_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(HOOK_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "myField": "too late" }))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&mock_server)
        .await;

    let settings = HttpSettings {
        request_timeout: Some(Duration::from_millis(200)),
        ..HttpSettings::default()
    };
    let client = client_for(&mock_server, settings);
    let err = client.ask("hello").await.unwrap_err();

    assert_eq!(err, ClientError::Network("request timed out".to_string()));
}

#[tokio::test]
async fn test_slow_reply_hits_read_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(HOOK_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "myField": "too late" }))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&mock_server)
        .await;

    let settings = HttpSettings {
        read_timeout: Duration::from_millis(200),
        ..HttpSettings::default()
    };
    let store = ChatStore::new(Arc::new(client_for(&mock_server, settings)));
    store.update_draft("hello");
    store.send_message().await;

    let state = store.state();
    assert_eq!(state.messages[1].content, FALLBACK_MESSAGE);
    assert!(
        state
            .last_error
            .as_deref()
            .is_some_and(|e| e.starts_with("network error"))
    );
}
