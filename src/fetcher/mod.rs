pub mod parallel;

use std::sync::Arc;

use tracing::instrument;

use crate::app::error::excerpt;
use crate::app::{DiarioError, Result};
use crate::config::FeedConfig;
use crate::domain::SectionResult;
use crate::normalizer::Normalizer;
use crate::transport::Transport;

pub use parallel::SnapshotComposer;

/// Fetches one section's feed and parses it into a document tree.
#[derive(Clone)]
pub struct FeedFetcher {
    transport: Arc<dyn Transport + Send + Sync>,
    config: FeedConfig,
    normalizer: Normalizer,
}

impl FeedFetcher {
    pub fn new(transport: Arc<dyn Transport + Send + Sync>, config: FeedConfig) -> Self {
        Self {
            transport,
            config,
            normalizer: Normalizer::new(),
        }
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    /// One GET per call. The returned document is not yet sanitized.
    #[instrument(level = "debug", skip(self))]
    pub async fn fetch(&self, section: &str) -> Result<SectionResult> {
        let url = self.config.url_for(section);

        let response = self
            .transport
            .get(&url, &self.config.accept)
            .await
            .map_err(|e| DiarioError::Fetch {
                section: section.to_string(),
                status: None,
                body_excerpt: excerpt(&e.to_string()),
            })?;

        if !response.is_success() {
            return Err(DiarioError::Fetch {
                section: section.to_string(),
                status: Some(response.status),
                body_excerpt: excerpt(&response.body),
            });
        }

        let document = self.normalizer.normalize(section, &response.body)?;
        tracing::debug!("Parsed section {} ({} bytes)", section, response.body.len());

        Ok(SectionResult {
            section: section.to_string(),
            url,
            document,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Node;
    use crate::transport::fake::FakeTransport;

    const FEED: &str = r#"<rss version="2.0"><channel><title>Ecuador</title><item><title>A</title></item><item><title>B</title></item></channel></rss>"#;

    fn config() -> FeedConfig {
        FeedConfig {
            url_template: "https://feeds.example.com/{section}/rss".into(),
            sections: vec!["noticias/ecuador".into()],
            accept: "application/xml".into(),
            source: "test".into(),
        }
    }

    fn fetcher(transport: Arc<FakeTransport>) -> FeedFetcher {
        FeedFetcher::new(transport, config())
    }

    #[tokio::test]
    async fn test_fetch_parses_document() {
        let transport = Arc::new(FakeTransport::new());
        transport.respond("https://feeds.example.com/noticias%2Fecuador/rss", 200, FEED);

        let result = fetcher(transport.clone()).fetch("noticias/ecuador").await.unwrap();

        assert_eq!(result.section, "noticias/ecuador");
        assert_eq!(result.url, "https://feeds.example.com/noticias%2Fecuador/rss");
        assert_eq!(
            result.document.path(["rss", "channel", "title"]).and_then(Node::as_str),
            Some("Ecuador")
        );
    }

    #[tokio::test]
    async fn test_fetch_sends_accept_header() {
        let transport = Arc::new(FakeTransport::new());
        transport.respond("https://feeds.example.com/noticias%2Fecuador/rss", 200, FEED);

        fetcher(transport.clone()).fetch("noticias/ecuador").await.unwrap();

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, "GET");
        assert_eq!(requests[0].accept.as_deref(), Some("application/xml"));
    }

    #[tokio::test]
    async fn test_http_error_carries_status_and_bounded_body() {
        let transport = Arc::new(FakeTransport::new());
        let body = "e".repeat(5000);
        transport.respond("https://feeds.example.com/noticias%2Fecuador/rss", 404, &body);

        let err = fetcher(transport).fetch("noticias/ecuador").await.unwrap_err();
        match &err {
            DiarioError::Fetch {
                section,
                status,
                body_excerpt,
            } => {
                assert_eq!(section, "noticias/ecuador");
                assert_eq!(*status, Some(404));
                assert_eq!(body_excerpt.len(), 200);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().contains("404"));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_fetch_error() {
        let transport = Arc::new(FakeTransport::new());
        transport.unreachable("https://feeds.example.com");

        let err = fetcher(transport).fetch("noticias/ecuador").await.unwrap_err();
        assert!(matches!(err, DiarioError::Fetch { status: None, .. }));
    }

    #[tokio::test]
    async fn test_unparseable_body_is_parse_error() {
        let transport = Arc::new(FakeTransport::new());
        transport.respond(
            "https://feeds.example.com/noticias%2Fecuador/rss",
            200,
            "<html><body>maintenance",
        );

        let err = fetcher(transport).fetch("noticias/ecuador").await.unwrap_err();
        assert!(matches!(err, DiarioError::Parse { ref section, .. } if section == "noticias/ecuador"));
    }
}
