use std::sync::Arc;
use std::time::Duration;

use novacall_rs::api::CallTaskApi;
use novacall_rs::call_task::{CallTaskForm, FormError};
use novacall_rs::helpers::build_api;
use novacall_rs::{App, ClientConfig};
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config(server: &MockServer) -> ClientConfig {
    ClientConfig {
        poll_interval_ms: 20,
        ..ClientConfig::default()
    }
    .with_backend(&server.uri())
}

fn filled_form() -> CallTaskForm {
    let mut form = CallTaskForm::new();
    form.target_phone = "  +11234567890 ".to_string();
    form.intent = "Follow up on job application at XYZ".to_string();
    form.voice_model_id = "manohar-voice-v1".to_string();
    form
}

#[tokio::test]
async fn submit_posts_one_normalized_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/call-tasks"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "abc123", "status": "pending"})))
        .expect(1)
        .mount(&server)
        .await;

    let api = build_api(&config(&server)).unwrap();
    let mut form = filled_form();
    form.talking_points = "Introduce, ask availability , propose time".to_string();
    form.consent_required = true;

    let id = form.submit(&api).await.unwrap();
    assert_eq!(id, "abc123");

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let body: Value = requests[0].body_json().unwrap();
    assert_eq!(
        body,
        json!({
            "target_phone": "+11234567890",
            "intent": "Follow up on job application at XYZ",
            "talking_points": ["Introduce", "ask availability", "propose time"],
            "fallback_conditions": ["If asked to speak to Manohar", "Silence > 5s", "Unclear response"],
            "voice_model_id": "manohar-voice-v1",
            "consent_required": true,
            "status": "pending"
        })
    );
}

#[tokio::test]
async fn empty_list_sources_are_left_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/call-tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "xyz"})))
        .mount(&server)
        .await;

    let api = build_api(&config(&server)).unwrap();
    let mut form = filled_form();
    form.fallback_conditions.clear();
    form.submit(&api).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let body: Value = requests[0].body_json().unwrap();
    let obj = body.as_object().unwrap();
    assert!(!obj.contains_key("script"));
    assert!(!obj.contains_key("talking_points"));
    assert!(!obj.contains_key("fallback_conditions"));
}

#[tokio::test]
async fn error_body_is_shown_and_no_id_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/call-tasks"))
        .respond_with(ResponseTemplate::new(422).set_body_string("target_phone must be E.164"))
        .expect(1)
        .mount(&server)
        .await;

    let cfg = config(&server);
    let api = Arc::new(build_api(&cfg).unwrap());
    let mut app = App::new(api, cfg.poll_settings());
    *app.form_mut() = filled_form();

    let err = app.submit().await.unwrap_err();
    assert_eq!(err, FormError::Create("target_phone must be E.164".to_string()));
    assert_eq!(app.form().error(), Some("target_phone must be E.164"));
    assert!(app.created_id().is_none());
    assert!(app.viewer().is_none());
}

#[tokio::test]
async fn empty_error_body_falls_back_to_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/call-tasks"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let api = build_api(&config(&server)).unwrap();
    let mut form = filled_form();
    let err = form.submit(&api).await.unwrap_err();
    assert_eq!(err, FormError::Create("Request failed with 500".to_string()));
}

#[tokio::test]
async fn missing_required_field_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "never"})))
        .expect(0)
        .mount(&server)
        .await;

    let api = build_api(&config(&server)).unwrap();
    let mut form = filled_form();
    form.voice_model_id = "   ".to_string();
    assert_eq!(
        form.submit(&api).await,
        Err(FormError::MissingField("voice_model_id"))
    );
}

#[tokio::test]
async fn unreachable_backend_is_a_creation_error() {
    // Nothing listens on the discard port.
    let cfg = ClientConfig {
        timeout_secs: 2,
        ..ClientConfig::default()
    }
    .with_backend("http://127.0.0.1:9");
    let api = build_api(&cfg).unwrap();
    let mut form = filled_form();
    let err = form.submit(&api).await.unwrap_err();
    assert!(matches!(err, FormError::Create(ref msg) if !msg.is_empty()));
    assert!(form.error().is_some());
}

#[tokio::test]
async fn created_id_mounts_the_viewer() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/call-tasks"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "abc123"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/transcripts/abc123"))
        .and(query_param("limit", "200"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
        .mount(&server)
        .await;

    let cfg = config(&server);
    let api: Arc<dyn CallTaskApi> = Arc::new(build_api(&cfg).unwrap());
    let mut app = App::new(api, cfg.poll_settings());
    *app.form_mut() = filled_form();

    app.submit().await.unwrap();
    assert_eq!(app.created_id(), Some("abc123"));
    let viewer = app.viewer().unwrap();
    assert_eq!(viewer.call_id(), "abc123");

    tokio::time::sleep(Duration::from_millis(100)).await;
    let polls = server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.url.path() == "/api/transcripts/abc123")
        .count();
    assert!(polls >= 1);
    assert!(app.viewer().unwrap().is_live());
    app.clear().await;
}
