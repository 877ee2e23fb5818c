use std::sync::Arc;

use crate::app::{DiarioError, Result};
use crate::config::{Config, ConfigError};
use crate::fetcher::{FeedFetcher, SnapshotComposer};
use crate::store::RestStore;
use crate::transport::{HttpTransport, Transport};

pub struct AppContext {
    pub config: Config,
    pub composer: SnapshotComposer,
    pub store: RestStore,
}

impl AppContext {
    pub fn from_config(config: Config) -> Result<Self> {
        config.validate()?;
        let transport = HttpTransport::new(&config.http).map_err(|e| {
            DiarioError::Config(ConfigError::Invalid(format!("HTTP client: {}", e)))
        })?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Wire everything on top of an existing transport.
    pub fn with_transport(config: Config, transport: Arc<dyn Transport + Send + Sync>) -> Self {
        let fetcher = FeedFetcher::new(transport.clone(), config.feed.clone());
        let composer = SnapshotComposer::with_workers(fetcher, config.http.workers);
        let store = RestStore::new(transport, config.store.clone());

        Self {
            config,
            composer,
            store,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FeedConfig, StoreConfig};
    use crate::store::Store;
    use crate::transport::fake::FakeTransport;

    #[tokio::test]
    async fn test_compose_then_write_then_drill_down() {
        let config = Config {
            feed: FeedConfig {
                url_template: "https://feeds.example.com/{section}.xml".into(),
                sections: vec!["a".into(), "b/c".into()],
                accept: "application/xml".into(),
                source: "test".into(),
            },
            store: StoreConfig {
                base_url: "https://db.example.com".into(),
                collection: "news".into(),
            },
            ..Config::default()
        };

        let transport = Arc::new(FakeTransport::new());
        transport.respond(
            &config.feed.url_for("a"),
            200,
            "<rss><channel><item><title>one</title></item></channel></rss>",
        );
        transport.respond(
            &config.feed.url_for("b/c"),
            200,
            "<rss><channel><item><title>two</title></item><item><title>three</title></item></channel></rss>",
        );

        let ctx = AppContext::with_transport(config, transport);
        let snapshot = ctx.composer.compose().await.unwrap();
        let ack = ctx.store.write(&snapshot).await.unwrap();

        let dates = ctx.store.list_dates().await.unwrap();
        assert_eq!(dates, vec![ack.date_key.clone()]);
        let sections = ctx.store.list_sections(&ack.date_key).await.unwrap();
        assert_eq!(sections, vec!["a", "b/c"]);
        assert_eq!(ctx.store.list_items(&ack.date_key, "a").await.unwrap().len(), 1);
        assert_eq!(ctx.store.list_items(&ack.date_key, "b/c").await.unwrap().len(), 2);
    }

    #[test]
    fn test_from_config_rejects_invalid() {
        let mut config = Config::default();
        config.http.workers = 0;
        assert!(matches!(
            AppContext::from_config(config),
            Err(DiarioError::Config(ConfigError::Invalid(_)))
        ));
    }
}
