pub mod date_key;
pub mod item;
pub mod node;
pub mod snapshot;

pub use date_key::{date_key, today_key};
pub use item::{extract_items, ItemView};
pub use node::{Node, Scalar};
pub use snapshot::{SectionResult, Snapshot};
