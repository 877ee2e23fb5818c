use std::sync::Arc;

use futures::future::try_join_all;
use tokio::sync::Semaphore;

use crate::app::Result;
use crate::domain::{SectionResult, Snapshot};
use crate::fetcher::FeedFetcher;

pub const DEFAULT_WORKERS: usize = 10;

/// Fetches every configured section concurrently and assembles a snapshot.
pub struct SnapshotComposer {
    fetcher: FeedFetcher,
    semaphore: Arc<Semaphore>,
}

impl SnapshotComposer {
    pub fn new(fetcher: FeedFetcher) -> Self {
        Self::with_workers(fetcher, DEFAULT_WORKERS)
    }

    pub fn with_workers(fetcher: FeedFetcher, workers: usize) -> Self {
        Self {
            fetcher,
            semaphore: Arc::new(Semaphore::new(workers.max(1))),
        }
    }

    /// Compose a snapshot of the sections in the fetcher's config.
    pub async fn compose(&self) -> Result<Snapshot> {
        let sections = self.fetcher.config().sections.clone();
        self.compose_sections(&sections).await
    }

    /// Fetch all `sections` at once and stop at the first failure.
    ///
    /// On failure the remaining fetches are dropped, which cancels their
    /// in-flight requests. On success the sections keep the input order
    /// whatever order the responses arrived in.
    pub async fn compose_sections(&self, sections: &[String]) -> Result<Snapshot> {
        let fetches = sections
            .iter()
            .map(|section| self.fetch_sanitized(section));

        let results = try_join_all(fetches).await.inspect_err(|e| {
            tracing::warn!("Snapshot composition aborted: {}", e);
        })?;

        let snapshot = Snapshot::new(self.fetcher.config().source.clone(), results);
        tracing::info!("Composed {}", snapshot);
        Ok(snapshot)
    }

    async fn fetch_sanitized(&self, section: &str) -> Result<SectionResult> {
        // Closed only on drop, and we hold `self`.
        let _permit = self.semaphore.acquire().await.ok();

        let mut result = self.fetcher.fetch(section).await?;
        result.document = result.document.sanitized();
        Ok(result)
    }
}
