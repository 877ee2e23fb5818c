use std::sync::Arc;

use async_trait::async_trait;
use tracing::instrument;

use crate::app::error::excerpt;
use crate::app::{DiarioError, Result};
use crate::config::StoreConfig;
use crate::domain::{extract_items, Node, Snapshot};
use crate::store::{Store, StoreAck};
use crate::transport::Transport;

const JSON_ACCEPT: &str = "application/json";

/// Snapshot store backed by a JSON-over-REST database.
///
/// Layout: `<base>/<collection>/<YYYY-MM-DD>.json` holds one snapshot and
/// `<base>/<collection>.json` the whole collection. A missing path reads
/// back as `null`.
pub struct RestStore {
    transport: Arc<dyn Transport + Send + Sync>,
    config: StoreConfig,
}

impl RestStore {
    pub fn new(transport: Arc<dyn Transport + Send + Sync>, config: StoreConfig) -> Self {
        Self { transport, config }
    }

    /// GET a JSON value; `null` or an empty body means nothing is stored.
    async fn read(&self, url: &str) -> Result<Node> {
        let response = self
            .transport
            .get(url, JSON_ACCEPT)
            .await
            .map_err(|e| DiarioError::Store {
                status: None,
                body_excerpt: excerpt(&e.to_string()),
            })?;

        if !response.is_success() {
            return Err(DiarioError::Store {
                status: Some(response.status),
                body_excerpt: excerpt(&response.body),
            });
        }

        if response.body.trim().is_empty() {
            return Ok(Node::null());
        }

        serde_json::from_str(&response.body).map_err(|e| DiarioError::Store {
            status: Some(response.status),
            body_excerpt: excerpt(&format!("invalid JSON ({}): {}", e, response.body)),
        })
    }

    async fn read_snapshot(&self, date: &str) -> Result<Node> {
        self.read(&self.config.snapshot_url(date)).await
    }
}

/// Stored section entries of a snapshot, or none if `sections` is not a list.
fn section_entries(snapshot: &Node) -> &[Node] {
    snapshot
        .get("sections")
        .and_then(Node::as_sequence)
        .unwrap_or_default()
}

fn entry_document(entry: &Node) -> Option<&Node> {
    entry.get("document").or_else(|| entry.get("json"))
}

#[async_trait]
impl Store for RestStore {
    #[instrument(level = "info", skip_all)]
    async fn write(&self, snapshot: &Snapshot) -> Result<StoreAck> {
        let date_key = snapshot.date_key();
        let url = self.config.snapshot_url(&date_key);
        let body = serde_json::to_string(snapshot)?;

        let response = self
            .transport
            .put_json(&url, body)
            .await
            .map_err(|e| DiarioError::Store {
                status: None,
                body_excerpt: excerpt(&e.to_string()),
            })?;

        if !response.is_success() {
            return Err(DiarioError::Store {
                status: Some(response.status),
                body_excerpt: excerpt(&response.body),
            });
        }

        tracing::info!("Stored snapshot for {} at {}", date_key, url);
        Ok(StoreAck { date_key, url })
    }

    async fn list_dates(&self) -> Result<Vec<String>> {
        let collection = self.read(&self.config.collection_url()).await?;
        Ok(collection
            .as_mapping()
            .map(|map| map.keys().cloned().collect())
            .unwrap_or_default())
    }

    async fn list_sections(&self, date: &str) -> Result<Vec<String>> {
        let snapshot = self.read_snapshot(date).await?;

        let sections = section_entries(&snapshot)
            .iter()
            .filter_map(|entry| {
                let name = entry.get("section").and_then(Node::as_str);
                if name.is_none() {
                    tracing::warn!("Skipping section entry without a name on {}", date);
                }
                name.map(String::from)
            })
            .collect();

        Ok(sections)
    }

    async fn list_items(&self, date: &str, section: &str) -> Result<Vec<Node>> {
        let snapshot = self.read_snapshot(date).await?;

        let entry = section_entries(&snapshot)
            .iter()
            .find(|entry| entry.get("section").and_then(Node::as_str) == Some(section));

        Ok(entry
            .and_then(entry_document)
            .map(extract_items)
            .unwrap_or_default())
    }
}
