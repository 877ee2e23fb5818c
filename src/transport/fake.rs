//! In-memory transport for tests.
//!
//! Scripted responses are served first. Any other `.json` URL is resolved
//! against a JSON tree the way the REST store does: PUT replaces the value
//! at the path, GET returns it or `null`.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::transport::{HttpResponse, Transport, TransportError};

static NULL: Value = Value::Null;

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: &'static str,
    pub url: String,
    pub accept: Option<String>,
}

#[derive(Default)]
pub struct FakeTransport {
    scripted: Mutex<HashMap<String, (u16, String, Duration)>>,
    unreachable: Mutex<Vec<String>>,
    tree: Mutex<Value>,
    requests: Mutex<Vec<Recorded>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, url: &str, status: u16, body: &str) {
        self.respond_after(url, status, body, Duration::ZERO);
    }

    pub fn respond_after(&self, url: &str, status: u16, body: &str, delay: Duration) {
        self.scripted
            .lock()
            .unwrap()
            .insert(url.to_string(), (status, body.to_string(), delay));
    }

    /// Requests to URLs starting with `prefix` fail without a response.
    pub fn unreachable(&self, prefix: &str) {
        self.unreachable.lock().unwrap().push(prefix.to_string());
    }

    pub fn tree(&self) -> Value {
        self.tree.lock().unwrap().clone()
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    fn record(&self, method: &'static str, url: &str, accept: Option<&str>) {
        self.requests.lock().unwrap().push(Recorded {
            method,
            url: url.to_string(),
            accept: accept.map(String::from),
        });
    }

    fn check_reachable(&self, url: &str) -> Result<(), TransportError> {
        let unreachable = self.unreachable.lock().unwrap();
        if unreachable.iter().any(|prefix| url.starts_with(prefix)) {
            return Err(TransportError(format!("error sending request for url ({url})")));
        }
        Ok(())
    }

    fn scripted(&self, url: &str) -> Option<(u16, String, Duration)> {
        self.scripted.lock().unwrap().get(url).cloned()
    }
}

fn tree_path(url: &str) -> Vec<String> {
    let parsed = url::Url::parse(url).expect("test URL");
    let path = parsed.path().trim_start_matches('/');
    let path = path.strip_suffix(".json").unwrap_or(path);
    path.split('/')
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[async_trait]
impl Transport for FakeTransport {
    async fn get(&self, url: &str, accept: &str) -> Result<HttpResponse, TransportError> {
        self.record("GET", url, Some(accept));
        self.check_reachable(url)?;

        if let Some((status, body, delay)) = self.scripted(url) {
            tokio::time::sleep(delay).await;
            return Ok(HttpResponse { status, body });
        }

        let tree = self.tree.lock().unwrap();
        let mut cursor = &*tree;
        for key in tree_path(url) {
            cursor = match cursor.get(&key) {
                Some(next) => next,
                None => &NULL,
            };
        }
        Ok(HttpResponse {
            status: 200,
            body: cursor.to_string(),
        })
    }

    async fn put_json(&self, url: &str, body: String) -> Result<HttpResponse, TransportError> {
        self.record("PUT", url, None);
        self.check_reachable(url)?;

        if let Some((status, body, delay)) = self.scripted(url) {
            tokio::time::sleep(delay).await;
            return Ok(HttpResponse { status, body });
        }

        let value: Value = serde_json::from_str(&body).expect("PUT body must be JSON");
        let mut tree = self.tree.lock().unwrap();
        let mut cursor = &mut *tree;
        for key in tree_path(url) {
            if !cursor.is_object() {
                *cursor = Value::Object(Map::new());
            }
            cursor = cursor
                .as_object_mut()
                .expect("object")
                .entry(key)
                .or_insert(Value::Null);
        }
        *cursor = value;

        Ok(HttpResponse { status: 200, body })
    }
}
