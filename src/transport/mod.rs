pub mod http;

#[cfg(test)]
pub(crate) mod fake;

use async_trait::async_trait;
use thiserror::Error;

pub use http::HttpTransport;

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The request never produced a response (DNS, connect, timeout, TLS).
#[derive(Error, Debug, Clone)]
#[error("{0}")]
pub struct TransportError(pub String);

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        TransportError(err.to_string())
    }
}

/// Minimal HTTP surface used by the feed fetcher and the snapshot store.
///
/// Any status code is a successful transport; callers decide what a
/// non-2xx status means.
#[async_trait]
pub trait Transport {
    async fn get(&self, url: &str, accept: &str) -> Result<HttpResponse, TransportError>;

    async fn put_json(&self, url: &str, body: String) -> Result<HttpResponse, TransportError>;
}
