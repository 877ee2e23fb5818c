pub mod sanitize;

use std::borrow::Cow;
use std::collections::BTreeMap;

use roxmltree::{Document, ParsingOptions};

use crate::app::{DiarioError, Result};
use crate::domain::{Node, Scalar};

pub use sanitize::{sanitize, sanitize_key};

/// Prefix for mapping keys that hold XML attributes.
pub const ATTRIBUTE_PREFIX: &str = "@_";
/// Key for the text content of an element that also has attributes or children.
pub const TEXT_KEY: &str = "#text";

/// Converts XML feed bodies into [`Node`] trees.
///
/// Attributes become `@_name` entries, repeated child elements collapse into
/// sequences, and a lone child stays a single value.
#[derive(Clone)]
pub struct Normalizer;

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizer {
    pub fn new() -> Self {
        Self
    }

    /// Feeds often carry HTML entities (`&nbsp;`, `&aacute;`) that XML does
    /// not define. If the first parse fails, unknown references are escaped
    /// and kept as literal text, and the body is parsed again.
    pub fn normalize(&self, section: &str, body: &str) -> Result<Node> {
        let doc = match parse_xml(body) {
            Ok(doc) => doc,
            Err(first) => {
                let escaped = escape_unknown_entities(body);
                let retried = match &escaped {
                    Cow::Owned(fixed) => parse_xml(fixed).ok().map(|doc| to_tree(&doc)),
                    Cow::Borrowed(_) => None,
                };
                return match retried {
                    Some(node) => {
                        tracing::debug!("Section {} needed entity escaping", section);
                        Ok(node)
                    }
                    None => Err(DiarioError::Parse {
                        section: section.to_string(),
                        cause: first.to_string(),
                    }),
                };
            }
        };

        Ok(to_tree(&doc))
    }
}

fn parse_xml(body: &str) -> std::result::Result<Document<'_>, roxmltree::Error> {
    let mut options = ParsingOptions::default();
    options.allow_dtd = true;
    Document::parse_with_options(body, options)
}

fn to_tree(doc: &Document<'_>) -> Node {
    let root = doc.root_element();
    let mut top = BTreeMap::new();
    top.insert(qualified_name(root), element_to_node(root));
    Node::Mapping(top)
}

const XML_ENTITIES: [&str; 5] = ["amp", "lt", "gt", "quot", "apos"];
const VERBATIM_SECTIONS: [(&str, &str); 2] = [("<![CDATA[", "]]>"), ("<!--", "-->")];

/// Rewrite `&` into `&amp;` unless it starts a predefined entity or a
/// character reference. CDATA sections and comments are copied untouched.
fn escape_unknown_entities(body: &str) -> Cow<'_, str> {
    let mut out = String::with_capacity(body.len() + 16);
    let mut rest = body;
    let mut changed = false;

    while let Some(pos) = rest.find(['&', '<']) {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];

        if rest.starts_with('<') {
            let skip = VERBATIM_SECTIONS
                .iter()
                .find(|&&(open, _)| rest.starts_with(open))
                .map(|&(open, close)| match rest[open.len()..].find(close) {
                    Some(end) => open.len() + end + close.len(),
                    None => rest.len(),
                })
                .unwrap_or(1);
            out.push_str(&rest[..skip]);
            rest = &rest[skip..];
            continue;
        }

        let reference = rest[1..].split(';').next().filter(|_| rest[1..].contains(';'));
        let known = match reference {
            Some(name) if name.starts_with('#') => {
                name.len() > 1 && name[1..].chars().all(|c| c.is_ascii_alphanumeric())
            }
            Some(name) => XML_ENTITIES.contains(&name),
            None => false,
        };
        if known {
            out.push('&');
        } else {
            out.push_str("&amp;");
            changed = true;
        }
        rest = &rest[1..];
    }
    out.push_str(rest);

    if changed {
        Cow::Owned(out)
    } else {
        Cow::Borrowed(body)
    }
}

fn element_to_node(element: roxmltree::Node<'_, '_>) -> Node {
    let mut map = BTreeMap::new();
    for (prefix, uri) in declared_namespaces(element) {
        let name = match prefix {
            Some(prefix) => format!("{}xmlns:{}", ATTRIBUTE_PREFIX, prefix),
            None => format!("{}xmlns", ATTRIBUTE_PREFIX),
        };
        map.insert(name, Node::string(uri));
    }
    for attr in element.attributes() {
        let name = match attr.namespace().and_then(|ns| element.lookup_prefix(ns)) {
            Some(prefix) => format!("{}{}:{}", ATTRIBUTE_PREFIX, prefix, attr.name()),
            None => format!("{}{}", ATTRIBUTE_PREFIX, attr.name()),
        };
        map.insert(name, Node::string(attr.value()));
    }

    let mut text = String::new();
    let mut children: BTreeMap<String, Vec<Node>> = BTreeMap::new();
    for child in element.children() {
        if child.is_element() {
            children
                .entry(qualified_name(child))
                .or_default()
                .push(element_to_node(child));
        } else if child.is_text() {
            text.push_str(child.text().unwrap_or_default());
        }
    }

    let text = text.trim();
    if map.is_empty() && children.is_empty() {
        return Node::Scalar(parse_text_value(text));
    }
    if !text.is_empty() {
        map.insert(TEXT_KEY.to_string(), Node::Scalar(parse_text_value(text)));
    }

    for (name, mut nodes) in children {
        let value = if nodes.len() == 1 {
            nodes.remove(0)
        } else {
            Node::Sequence(nodes)
        };
        map.insert(name, value);
    }

    Node::Mapping(map)
}

/// Namespaces declared on this element itself, as `(prefix, uri)`.
fn declared_namespaces<'a>(element: roxmltree::Node<'a, '_>) -> Vec<(Option<&'a str>, &'a str)> {
    let inherited: Vec<(Option<&str>, &str)> = element
        .parent()
        .map(|parent| parent.namespaces().map(|ns| (ns.name(), ns.uri())).collect())
        .unwrap_or_default();

    element
        .namespaces()
        .map(|ns| (ns.name(), ns.uri()))
        .filter(|(prefix, _)| *prefix != Some("xml"))
        .filter(|declared| !inherited.contains(declared))
        .collect()
}

/// Tag name with its namespace prefix, e.g. `dc:creator`.
fn qualified_name(element: roxmltree::Node<'_, '_>) -> String {
    let tag = element.tag_name();
    match tag.namespace().and_then(|ns| element.lookup_prefix(ns)) {
        Some(prefix) if !prefix.is_empty() => format!("{}:{}", prefix, tag.name()),
        _ => tag.name().to_string(),
    }
}

fn parse_text_value(text: &str) -> Scalar {
    match text {
        "true" => Scalar::Bool(true),
        "false" => Scalar::Bool(false),
        _ => parse_number(text)
            .map(Scalar::Number)
            .unwrap_or_else(|| Scalar::String(text.to_string())),
    }
}

/// Plain decimal numbers only. Leading zeros (ids, zip codes), exponents,
/// hex and anything that would lose precision stay strings.
fn parse_number(text: &str) -> Option<serde_json::Number> {
    let unsigned = text.strip_prefix('-').unwrap_or(text);
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (unsigned, None),
    };

    if int_part.is_empty() || !int_part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if int_part.len() > 1 && int_part.starts_with('0') {
        return None;
    }

    match frac_part {
        None => text.parse::<i64>().ok().map(serde_json::Number::from),
        Some(frac) => {
            if frac.is_empty() || !frac.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            text.parse::<f64>()
                .ok()
                .and_then(serde_json::Number::from_f64)
        }
    }
}
