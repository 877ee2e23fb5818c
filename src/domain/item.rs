use html_escape::decode_html_entities;

use crate::domain::Node;

/// Location of the entry list inside an RSS document.
pub const ITEM_PATH: [&str; 3] = ["rss", "channel", "item"];

/// Pull the entries out of a stored feed document.
///
/// XML has no way to say "a list of one", so a feed with a single `<item>`
/// stores it as a lone object. That object is wrapped into a one-element
/// list; a list is returned as is; a missing path or a null yields no items.
pub fn extract_items(document: &Node) -> Vec<Node> {
    extract_items_at(document, ITEM_PATH)
}

pub fn extract_items_at<'a, I>(document: &Node, path: I) -> Vec<Node>
where
    I: IntoIterator<Item = &'a str>,
{
    match document.path(path) {
        None => Vec::new(),
        Some(node) if node.is_null() => Vec::new(),
        Some(Node::Sequence(items)) => items.clone(),
        Some(single) => vec![single.clone()],
    }
}

/// Display fields of one feed entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemView {
    pub title: Option<String>,
    pub link: Option<String>,
    pub pub_date: Option<String>,
    pub description: Option<String>,
}

impl ItemView {
    pub fn from_node(item: &Node) -> Self {
        Self {
            title: field_text(item, "title"),
            link: field_text(item, "link"),
            pub_date: field_text(item, "pubDate"),
            description: field_text(item, "description"),
        }
    }

    pub fn display_title(&self) -> String {
        match self.title.as_deref() {
            Some(title) => decode_html_entities(title).to_string(),
            None => "(Untitled)".to_string(),
        }
    }
}

/// Text of a child field, whether stored as a scalar or as `{"#text": ..}`
/// next to attributes. Empty strings count as absent.
fn field_text(item: &Node, key: &str) -> Option<String> {
    let node = item.get(key)?;
    let text = node
        .scalar_text()
        .or_else(|| node.get("#text").and_then(Node::scalar_text))
        .or_else(|| node.get("_text").and_then(Node::scalar_text))?;
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
