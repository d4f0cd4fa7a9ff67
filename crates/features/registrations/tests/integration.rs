use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;
use trailhub_database::Database;
use trailhub_kernel::config::{AppConfig, AppConfigInner, DatabaseConfig, ServerConfig};
use trailhub_kernel::server::AppState;
use trailhub_mailer::{Mailer, MailerConfig};

const PATH: &str = "/api/registrations";

async fn test_app() -> (Router, Database) {
    test_app_with_mailer(MailerConfig::default()).await
}

async fn test_app_with_mailer(mail: MailerConfig) -> (Router, Database) {
    let db = Database::builder()
        .url("mem://")
        .session("test_ns", "test_db")
        .schema(trailhub_registrations::SCHEMA)
        .init()
        .await
        .expect("connect to mem://");

    let config = AppConfig::new(AppConfigInner {
        server: ServerConfig::default(),
        database: DatabaseConfig {
            url: "mem://".to_owned(),
            namespace: "test_ns".to_owned(),
            database: "test_db".to_owned(),
            credentials: None,
        },
        mail: mail.clone(),
    });

    let state = AppState::builder()
        .config(config)
        .db(db.clone())
        .mailer(Mailer::new(mail))
        .build()
        .expect("state builds");

    (trailhub_registrations::router().with_state(state), db)
}

fn post_body(event_title: &str) -> Value {
    json!({
        "event_title": event_title,
        "event_date": "2024-01-15",
        "name": "A. Ivanov",
        "phone": "+79001234567",
        "email": "a@x.com"
    })
}

async fn send_json(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = match body {
        Some(value) => Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .expect("request builds"),
        None => Request::builder().method(method).uri(uri).body(Body::empty()).expect("request builds"),
    };

    let response = app.clone().oneshot(request).await.expect("router responds");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body reads");
    let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).expect("json body") };
    (status, value)
}

#[tokio::test]
async fn create_returns_id_and_timestamp() {
    let (app, _db) = test_app().await;

    let (status, body) = send_json(&app, "POST", PATH, Some(post_body("Winter Trail"))).await;

    assert_eq!(status, StatusCode::CREATED);
    let id = body["id"].as_str().expect("id is a string");
    assert!(!id.is_empty());
    let created_at = body["created_at"].as_str().expect("created_at is a string");
    chrono::DateTime::parse_from_rfc3339(created_at).expect("created_at is ISO-8601");
}

#[tokio::test]
async fn missing_required_field_persists_nothing() {
    let (app, _db) = test_app().await;

    let mut payload = post_body("Winter Trail");
    payload.as_object_mut().unwrap().remove("phone");
    let (status, _) = send_json(&app, "POST", PATH, Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send_json(&app, "GET", PATH, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["registrations"].as_array().expect("array").len(), 0);
}

#[tokio::test]
async fn malformed_json_is_rejected_as_bad_request() {
    let (app, _db) = test_app().await;

    let request = Request::builder()
        .method("POST")
        .uri(PATH)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .expect("request builds");

    let response = app.clone().oneshot(request).await.expect("router responds");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body reads");
    let body: Value = serde_json::from_slice(&bytes).expect("json error body");
    assert!(!body["error"].as_str().expect("error message").is_empty());
}

#[tokio::test]
async fn listing_is_most_recent_first() {
    let (app, _db) = test_app().await;

    send_json(&app, "POST", PATH, Some(post_body("First Trip"))).await;
    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    send_json(&app, "POST", PATH, Some(post_body("Second Trip"))).await;

    let (status, body) = send_json(&app, "GET", PATH, None).await;
    assert_eq!(status, StatusCode::OK);

    let registrations = body["registrations"].as_array().expect("array");
    assert_eq!(registrations.len(), 2);
    assert_eq!(registrations[0]["event_title"], "Second Trip");
    assert_eq!(registrations[1]["event_title"], "First Trip");
    assert_eq!(registrations[0]["status"], "pending", "default status applies");
    assert_eq!(registrations[0]["event_date"], "2024-01-15");
}

#[tokio::test]
async fn status_filter_matches_exactly() {
    let (app, db) = test_app().await;

    send_json(&app, "POST", PATH, Some(post_body("Pending Trip"))).await;
    send_json(&app, "POST", PATH, Some(post_body("Approved Trip"))).await;

    // Status transitions happen outside this slice; emulate one directly.
    db.query("UPDATE registrations SET status = 'approved' WHERE event_title = $title")
        .bind(("title", "Approved Trip".to_owned()))
        .await
        .expect("update runs")
        .check()
        .expect("update succeeds");

    let (_, body) = send_json(&app, "GET", &format!("{PATH}?status=approved"), None).await;
    let approved = body["registrations"].as_array().expect("array");
    assert_eq!(approved.len(), 1);
    assert_eq!(approved[0]["event_title"], "Approved Trip");

    let (_, body) = send_json(&app, "GET", &format!("{PATH}?status=pending"), None).await;
    let pending = body["registrations"].as_array().expect("array");
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0]["event_title"], "Pending Trip");

    // Case-sensitive equality, no wildcards.
    let (_, body) = send_json(&app, "GET", &format!("{PATH}?status=APPROVED"), None).await;
    assert_eq!(body["registrations"].as_array().expect("array").len(), 0);
}

#[tokio::test]
async fn preflight_is_answered_without_store_access() {
    let (app, _db) = test_app().await;

    let response = app
        .clone()
        .oneshot(Request::builder().method("OPTIONS").uri(PATH).body(Body::empty()).unwrap())
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_METHODS).and_then(|v| v.to_str().ok()),
        Some("GET, POST, OPTIONS")
    );
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).and_then(|v| v.to_str().ok()),
        Some("*")
    );

    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body reads");
    assert!(bytes.is_empty(), "preflight body must be empty");
}

#[tokio::test]
async fn other_methods_get_json_405() {
    let (app, _db) = test_app().await;

    let (status, body) = send_json(&app, "DELETE", PATH, None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["error"], "Method not allowed");
}

#[tokio::test]
async fn ordering_is_chronological_across_fractional_seconds() {
    let (app, db) = test_app().await;

    // Serialized timestamps compare '.' before 'Z', so a lexicographic sort
    // would put the whole-second (earlier) row first in descending order.
    db.query(
        "CREATE registrations CONTENT { event_title: 'Earlier', event_date: '2024-01-15', \
         name: 'A. Ivanov', phone: '+79001234567', email: 'a@x.com', \
         created_at: d'2024-01-15T10:00:00Z' };
         CREATE registrations CONTENT { event_title: 'Later', event_date: '2024-01-15', \
         name: 'A. Ivanov', phone: '+79001234567', email: 'a@x.com', \
         created_at: d'2024-01-15T10:00:00.500Z' };",
    )
    .await
    .expect("seed runs")
    .check()
    .expect("seed succeeds");

    let (status, body) = send_json(&app, "GET", PATH, None).await;
    assert_eq!(status, StatusCode::OK);

    let registrations = body["registrations"].as_array().expect("array");
    assert_eq!(registrations.len(), 2);
    assert_eq!(registrations[0]["event_title"], "Later");
    assert_eq!(registrations[1]["event_title"], "Earlier");
}

#[tokio::test]
async fn transport_failure_never_fails_the_request() {
    // Fully configured transport pointing at a closed port: delivery fails
    // after the commit, and the client still gets its 201.
    let (app, _db) = test_app_with_mailer(MailerConfig {
        host: Some("127.0.0.1".to_owned()),
        port: Some(1),
        user: Some("robot@example.com".to_owned()),
        password: Some("secret".to_owned()),
        coordinator: Some("coordinator@example.com".to_owned()),
    })
    .await;

    let (status, body) = send_json(&app, "POST", PATH, Some(post_body("Doomed Mail Trip"))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body.get("id").is_some());

    let (_, body) = send_json(&app, "GET", PATH, None).await;
    assert_eq!(body["registrations"].as_array().expect("array").len(), 1, "row stays committed");
}

#[tokio::test]
async fn unconfigured_mailer_never_fails_the_request() {
    // The test mailer has no transport settings at all; the skip outcome
    // must not leak into the response.
    let (app, _db) = test_app().await;

    let (status, body) = send_json(&app, "POST", PATH, Some(post_body("Quiet Trip"))).await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(body.get("id").is_some());
}
