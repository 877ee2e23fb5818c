pub mod rest;

use async_trait::async_trait;

use crate::app::Result;
use crate::domain::{Node, Snapshot};

pub use rest::RestStore;

/// Confirmation of a snapshot write.
#[derive(Debug, Clone)]
pub struct StoreAck {
    pub date_key: String,
    pub url: String,
}

/// Date-keyed snapshot persistence.
///
/// Reads return empty lists when there is nothing stored; errors mean the
/// request itself failed.
#[async_trait]
pub trait Store {
    /// Replace whatever is stored for the snapshot's date.
    async fn write(&self, snapshot: &Snapshot) -> Result<StoreAck>;

    async fn list_dates(&self) -> Result<Vec<String>>;

    async fn list_sections(&self, date: &str) -> Result<Vec<String>>;

    async fn list_items(&self, date: &str, section: &str) -> Result<Vec<Node>>;
}
