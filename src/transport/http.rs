use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Client;

use crate::config::HttpConfig;
use crate::transport::{HttpResponse, Transport, TransportError};

pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(config: &HttpConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .gzip(true)
            .brotli(true)
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self { client })
    }
}

async fn into_response(response: reqwest::Response) -> Result<HttpResponse, TransportError> {
    let status = response.status().as_u16();
    with_status(status, response.text().await)
}

/// A body that fails to read is only fatal on success. Error responses keep
/// their status with an empty body.
fn with_status<E>(status: u16, body: Result<String, E>) -> Result<HttpResponse, TransportError>
where
    E: Into<TransportError>,
{
    let response = HttpResponse {
        status,
        body: String::new(),
    };
    match body {
        Ok(body) => Ok(HttpResponse { body, ..response }),
        Err(_) if !response.is_success() => Ok(response),
        Err(e) => Err(e.into()),
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str, accept: &str) -> Result<HttpResponse, TransportError> {
        tracing::debug!("GET {}", url);
        let response = self.client.get(url).header(ACCEPT, accept).send().await?;
        into_response(response).await
    }

    async fn put_json(&self, url: &str, body: String) -> Result<HttpResponse, TransportError> {
        tracing::debug!("PUT {} ({} bytes)", url, body.len());
        let response = self
            .client
            .put(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;
        into_response(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_failed() -> Result<String, TransportError> {
        Err(TransportError("error decoding response body".into()))
    }

    #[test]
    fn test_error_status_survives_unreadable_body() {
        let response = with_status(503, read_failed()).unwrap();
        assert_eq!(response.status, 503);
        assert!(response.body.is_empty());
        assert!(!response.is_success());
    }

    #[test]
    fn test_unreadable_success_body_is_transport_error() {
        let err = with_status(200, read_failed()).unwrap_err();
        assert!(err.to_string().contains("decoding"));
    }

    #[test]
    fn test_readable_body_is_kept() {
        let response = with_status(404, Ok::<_, TransportError>("not found".to_string())).unwrap();
        assert_eq!(response.status, 404);
        assert_eq!(response.body, "not found");
    }

    #[test]
    fn test_new_builds_client() {
        assert!(HttpTransport::new(&HttpConfig::default()).is_ok());
    }
}
