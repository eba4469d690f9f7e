//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::{json, Map, Value};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;
use wiremock::matchers::any;
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

/// Installs a test-friendly fmt subscriber. Safe to call from every test.
pub fn init_tracing(default_level: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_test_writer()
        .try_init();
}

/// In-memory stand-in for the music service, keyed by `music_id`.
#[derive(Default)]
pub struct FakeMusicService {
    records: Mutex<HashMap<String, Map<String, Value>>>,
}

impl FakeMusicService {
    /// Starts a mock server that routes every request to a fresh fake service.
    pub async fn start() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(any())
            .respond_with(FakeMusicService::default())
            .mount(&server)
            .await;
        server
    }

    fn create(&self, body: &[u8]) -> ResponseTemplate {
        let Some(mut item) = parse_record(body) else {
            return ResponseTemplate::new(400);
        };

        let id = Uuid::new_v4().to_string();
        item.insert("music_id".to_string(), Value::String(id.clone()));
        self.records.lock().unwrap().insert(id.clone(), item);

        ResponseTemplate::new(200).set_body_json(json!({ "music_id": id }))
    }

    fn read(&self, id: &str) -> ResponseTemplate {
        match self.records.lock().unwrap().get(id) {
            Some(item) => ResponseTemplate::new(200).set_body_json(json!({
                "Items": [item],
                "Count": 1,
                "ScannedCount": 1
            })),
            None => ResponseTemplate::new(404).set_body_json(json!({ "Count": 0, "Items": [] })),
        }
    }

    fn update(&self, id: &str, body: &[u8]) -> ResponseTemplate {
        let Some(mut item) = parse_record(body) else {
            return ResponseTemplate::new(400);
        };

        let mut records = self.records.lock().unwrap();
        if !records.contains_key(id) {
            return ResponseTemplate::new(404);
        }
        item.insert("music_id".to_string(), Value::String(id.to_string()));
        records.insert(id.to_string(), item);

        ResponseTemplate::new(200).set_body_json(json!({}))
    }

    fn delete(&self, id: &str) -> ResponseTemplate {
        self.records.lock().unwrap().remove(id);
        ResponseTemplate::new(200).set_body_json(json!({}))
    }
}

impl Respond for FakeMusicService {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        if !request.headers.contains_key("authorization") {
            return ResponseTemplate::new(401);
        }

        let id = request.url.path().trim_start_matches('/');
        match (request.method.as_str(), id.is_empty()) {
            ("POST", true) => self.create(&request.body),
            ("GET", false) => self.read(id),
            ("PUT", false) => self.update(id, &request.body),
            ("DELETE", false) => self.delete(id),
            _ => ResponseTemplate::new(405),
        }
    }
}

/// Accepts only objects carrying string `Artist` and `SongTitle` keys.
fn parse_record(body: &[u8]) -> Option<Map<String, Value>> {
    let Value::Object(map) = serde_json::from_slice(body).ok()? else {
        return None;
    };
    let has_required = ["Artist", "SongTitle"]
        .iter()
        .all(|key| map.get(*key).is_some_and(Value::is_string));
    has_required.then_some(map)
}
