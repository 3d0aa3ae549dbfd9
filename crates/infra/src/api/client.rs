//! HTTP client for the duty-board backend
//!
//! Fetches the raw JSON payloads, normalizes their keys, and decodes them
//! into domain types. Retry policy is owned by the query cache, so this
//! client performs exactly one attempt per call.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client as ReqwestClient, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info};
use watchbill_core::ScheduleGateway;
use watchbill_domain::{
    FieldViolation, PersonDetail, Result, RosterSnapshot, Settings, WatchbillError,
};

use crate::wire::camelize_keys;

/// Configuration for the backend client.
#[derive(Debug, Clone)]
pub struct ScheduleClientConfig {
    /// Base URL of the backend (e.g. "http://localhost:8000").
    pub base_url: String,
    /// Timeout per request attempt.
    pub timeout: Duration,
}

impl Default for ScheduleClientConfig {
    fn default() -> Self {
        Self { base_url: "http://localhost:8000".to_string(), timeout: Duration::from_secs(30) }
    }
}

impl From<&Settings> for ScheduleClientConfig {
    fn from(settings: &Settings) -> Self {
        Self { base_url: settings.base_url.clone(), timeout: settings.request_timeout }
    }
}

/// HTTP implementation of [`ScheduleGateway`].
#[derive(Clone)]
pub struct ScheduleClient {
    client: ReqwestClient,
    config: ScheduleClientConfig,
}

impl ScheduleClient {
    /// Create a new backend client.
    ///
    /// # Errors
    ///
    /// Returns `WatchbillError::Config` if the underlying HTTP client
    /// cannot be constructed.
    pub fn new(config: ScheduleClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let client = ReqwestClient::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .no_proxy()
            .build()
            .map_err(|err| {
                WatchbillError::Config(format!("Failed to build HTTP client: {err}"))
            })?;
        Ok(Self { client, config })
    }

    /// Create a client from application settings.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(ScheduleClientConfig::from(settings))
    }

    /// Execute a GET request, normalize the payload keys, and decode it.
    async fn get_normalized<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = format!("{}{}", self.config.base_url, path);
        debug!(url = %url, "GET request");

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|err| WatchbillError::Transport(err.to_string()))?;

        let status = response.status();
        debug!(url = %url, %status, "received response");
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &body));
        }

        let raw: Value = response
            .json()
            .await
            .map_err(|err| WatchbillError::Decode(format!("{url}: {err}")))?;
        serde_json::from_value(camelize_keys(raw))
            .map_err(|err| WatchbillError::Decode(format!("{url}: {err}")))
    }
}

#[async_trait]
impl ScheduleGateway for ScheduleClient {
    async fn fetch_schedule(&self, timezone: &str) -> Result<RosterSnapshot> {
        let snapshot: RosterSnapshot = self
            .get_normalized("/schedule", &[("timezone", timezone.to_string())])
            .await?;
        info!(timezone, calendars = snapshot.calendars.len(), "fetched roster snapshot");
        Ok(snapshot)
    }

    async fn fetch_person(&self, person_uid: i64, timezone: &str) -> Result<PersonDetail> {
        let detail: PersonDetail = self
            .get_normalized(
                "/person",
                &[("person_uid", person_uid.to_string()), ("timezone", timezone.to_string())],
            )
            .await?;
        info!(person_uid, "fetched person detail");
        Ok(detail)
    }
}

/// Maps a non-success response to a domain error, mining FastAPI-style
/// `detail` bodies: a string becomes the status detail, a list becomes
/// field violations.
fn status_error(status: StatusCode, body: &str) -> WatchbillError {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        match value.get("detail") {
            Some(Value::String(detail)) => {
                return WatchbillError::Status { status: status.as_u16(), detail: detail.clone() };
            }
            Some(Value::Array(items)) => {
                if let Some(violations) = violations_from_detail(items) {
                    return WatchbillError::Validation(violations);
                }
            }
            _ => {}
        }
    }
    WatchbillError::Status { status: status.as_u16(), detail: body.trim().to_string() }
}

fn violations_from_detail(items: &[Value]) -> Option<Vec<FieldViolation>> {
    let mut violations = Vec::with_capacity(items.len());
    for item in items {
        let msg = item.get("msg")?.as_str()?.to_string();
        let kind = item.get("type").and_then(Value::as_str).unwrap_or("unknown").to_string();
        let loc = item
            .get("loc")
            .and_then(Value::as_array)
            .map(|parts| parts.iter().map(loc_segment).collect())
            .unwrap_or_default();
        violations.push(FieldViolation { loc, msg, kind });
    }
    Some(violations)
}

/// Location segments can be strings or indexes; both render as path
/// segments.
fn loc_segment(part: &Value) -> String {
    match part {
        Value::String(segment) => segment.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client_for(server: &MockServer) -> ScheduleClient {
        ScheduleClient::new(ScheduleClientConfig {
            base_url: server.uri(),
            timeout: Duration::from_secs(5),
        })
        .expect("schedule client")
    }

    fn schedule_body() -> Value {
        json!({
            "config": {
                "timezone": "Europe/Amsterdam",
                "text_color": "#000000",
                "background_color": "#ffffff",
                "categories": ["Infrastructure"],
                "git_repository_url": null,
                "enable_admin_button": false,
                "announcement_text_color": "#222222",
                "announcement_background_color": "#eeeeee",
                "announcements": [],
                "footer_html": null,
            },
            "calendars": [{
                "uid": "data-platform",
                "name": "Data Platform",
                "description": "Primary on-call",
                "category": "Infrastructure",
                "order": 1,
                "last_update": "2024-05-01 10:00:00 CEST",
                "error_msg": "",
                "sync": true,
                "events": [{
                    "start_event": "2024-05-01 08:00:00 CEST",
                    "end_event": "2024-05-02 08:00:00 CEST",
                    "person_uid": 42,
                }],
            }],
            "persons": {
                "42": {"uid": 42, "username": "al", "email": "al@example.com"},
            },
        })
    }

    #[tokio::test]
    async fn test_fetch_schedule_normalizes_snake_case_payload() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/schedule"))
            .and(query_param("timezone", "Europe/Amsterdam"))
            .and(header("accept", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(schedule_body()))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let snapshot = client.fetch_schedule("Europe/Amsterdam").await.unwrap();

        assert_eq!(snapshot.config.timezone, "Europe/Amsterdam");
        assert_eq!(snapshot.calendars[0].events[0].person_uid, 42);
        assert_eq!(snapshot.person(42).map(|p| p.display_name()), Some("al".to_string()));
    }

    #[tokio::test]
    async fn test_fetch_person_builds_query_parameters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/person"))
            .and(query_param("person_uid", "42"))
            .and(query_param("timezone", "UTC"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "uid": "42",
                "username": "al",
                "email": "al@example.com",
                "img_filename": null,
                "img_width": null,
                "img_height": null,
                "extra_attributes": [{
                    "information": "+31 6 1234 5678",
                    "icon": "FaPhone",
                    "icon_color": "black",
                    "url": null,
                }],
                "last_update": "2024-05-01 10:00:00 UTC",
                "error_msg": "",
                "sync": true,
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let detail = client.fetch_person(42, "UTC").await.unwrap();

        assert_eq!(detail.uid, "42");
        assert_eq!(detail.display_name(), "al");
        assert_eq!(detail.extra_attributes[0].icon, "FaPhone");
    }

    #[tokio::test]
    async fn test_detail_string_maps_to_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/person"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({"detail": "Person not found"})),
            )
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.fetch_person(999, "UTC").await.unwrap_err();

        match &err {
            WatchbillError::Status { status, detail } => {
                assert_eq!(*status, 404);
                assert_eq!(detail, "Person not found");
            }
            other => panic!("expected status error, got {other:?}"),
        }
        assert_eq!(err.description(), "Person not found");
    }

    #[tokio::test]
    async fn test_validation_detail_maps_to_violations() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/person"))
            .respond_with(ResponseTemplate::new(422).set_body_json(json!({
                "detail": [
                    {
                        "loc": ["query", "person_uid"],
                        "msg": "value is not a valid integer",
                        "type": "type_error.integer",
                    },
                    {"loc": ["body", 0], "msg": "field required", "type": "value_error.missing"},
                ]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.fetch_person(7, "UTC").await.unwrap_err();

        match &err {
            WatchbillError::Validation(violations) => {
                assert_eq!(violations.len(), 2);
                assert_eq!(violations[0].loc, vec!["query", "person_uid"]);
                assert_eq!(violations[1].loc, vec!["body", "0"]); // index stringified
            }
            other => panic!("expected validation error, got {other:?}"),
        }
        assert!(err.to_string().contains("query.person_uid: value is not a valid integer"));
    }

    #[tokio::test]
    async fn test_plain_status_error_keeps_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/schedule"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.fetch_schedule("UTC").await.unwrap_err();

        match err {
            WatchbillError::Status { status, detail } => {
                assert_eq!(status, 500);
                assert_eq!(detail, "upstream exploded");
            }
            other => panic!("expected status error, got {other:?}"),
        }
        // A failed attempt is not retried here; retries belong to the cache
        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_json_maps_to_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/schedule"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.fetch_schedule("UTC").await.unwrap_err();
        assert!(matches!(err, WatchbillError::Decode(_)));
    }

    #[tokio::test]
    async fn test_network_failure_maps_to_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener); // release the port so the request fails with ECONNREFUSED

        let client = ScheduleClient::new(ScheduleClientConfig {
            base_url: format!("http://{addr}"),
            timeout: Duration::from_secs(1),
        })
        .unwrap();

        let err = client.fetch_schedule("UTC").await.unwrap_err();
        assert!(matches!(err, WatchbillError::Transport(_)));
    }
}
