//! Key sanitization for the storage backend.
//!
//! The REST store treats `.`, `$`, `#`, `[`, `]` and `/` in object keys as
//! path syntax, so every mapping key is rewritten with those characters
//! replaced by `_`. Values are never touched.

use std::collections::BTreeMap;

use crate::domain::Node;

/// Characters the store rejects inside keys.
pub const FORBIDDEN_KEY_CHARS: [char; 6] = ['.', '$', '#', '[', ']', '/'];

pub fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| if FORBIDDEN_KEY_CHARS.contains(&c) { '_' } else { c })
        .collect()
}

/// Return a copy of `node` with every mapping key sanitized.
///
/// Sequences keep their order and length; scalars pass through unchanged.
/// If two keys of one mapping sanitize to the same string, the one that
/// sorts last wins.
pub fn sanitize(node: &Node) -> Node {
    match node {
        Node::Scalar(_) => node.clone(),
        Node::Sequence(items) => Node::Sequence(items.iter().map(sanitize).collect()),
        Node::Mapping(map) => {
            let mut clean = BTreeMap::new();
            for (key, value) in map {
                clean.insert(sanitize_key(key), sanitize(value));
            }
            Node::Mapping(clean)
        }
    }
}

impl Node {
    pub fn sanitized(&self) -> Node {
        sanitize(self)
    }
}
