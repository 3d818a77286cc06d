//! Generic XML-to-object translation
//!
//! Flattens an element subtree into nested maps keyed by canonical
//! `prefix$local` names. Text-only leaves collapse to scalars, repeated
//! siblings collapse to lists, and attributes live beside the text of the
//! node that carries them.

use std::collections::BTreeMap;

use super::namespace::canonical_prefix;
use super::tree::XmlElement;

/// A translated element
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct GenericNode {
    /// Attributes of the element
    pub attributes: BTreeMap<String, String>,
    /// Text content, when it coexists with attributes or child elements
    pub text: Option<String>,
    /// Child values keyed by qualified name, in first-seen order
    pub fields: Vec<(String, Value)>,
}

/// Value stored under a key of a [`GenericNode`]
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Value {
    /// Element with nothing but text
    Text(String),
    /// Element with attributes or children
    Node(GenericNode),
    /// Repeated sibling elements, in document order
    List(Vec<Value>),
}

impl GenericNode {
    /// Value under `key`
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value)
    }

    /// Attribute value
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    fn is_empty(&self) -> bool {
        self.attributes.is_empty() && self.text.is_none() && self.fields.is_empty()
    }
}

impl Value {
    /// Structured nodes under this value: one for a node, each node of a list
    pub fn nodes(&self) -> impl Iterator<Item = &GenericNode> {
        let items: Vec<&Value> = match self {
            Value::List(items) => items.iter().collect(),
            other => vec![other],
        };
        items.into_iter().filter_map(|value| match value {
            Value::Node(node) => Some(node),
            _ => None,
        })
    }

    /// Text of a scalar, or of a node that carries text next to attributes
    pub fn text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            Value::Node(node) => node.text.as_deref(),
            Value::List(_) => None,
        }
    }
}

/// Key for an element: `prefix$local` for registered namespaces, else `local`
pub(crate) fn qualified_key(element: &XmlElement) -> String {
    match element.namespace.as_deref().and_then(canonical_prefix) {
        Some(prefix) => format!("{}${}", prefix, element.local_name()),
        None => element.local_name().to_string(),
    }
}

/// Translate an element into a [`GenericNode`]
pub(crate) fn translate(element: &XmlElement) -> GenericNode {
    let mut node = GenericNode {
        attributes: element.attributes.iter().cloned().collect(),
        ..GenericNode::default()
    };

    let mut groups: Vec<(String, Vec<&XmlElement>)> = Vec::new();
    for child in element.elements() {
        let key = qualified_key(child);
        match groups.iter_mut().find(|(k, _)| *k == key) {
            Some((_, members)) => members.push(child),
            None => groups.push((key, vec![child])),
        }
    }

    let has_children = !groups.is_empty();
    for (key, members) in groups {
        let value = if let [single] = members.as_slice() {
            match translate_tag(single) {
                Some(value) => value,
                None => continue,
            }
        } else {
            Value::List(
                members
                    .into_iter()
                    .map(|m| translate_tag(m).unwrap_or_else(|| Value::Node(GenericNode::default())))
                    .collect(),
            )
        };
        node.fields.push((key, value));
    }

    if has_children {
        let text = element.own_text();
        let text = text.trim();
        if !text.is_empty() {
            node.text = Some(text.to_string());
        }
    }

    node
}

fn translate_tag(element: &XmlElement) -> Option<Value> {
    let leaf = element.elements().next().is_none();
    let text = element.own_text();
    let text = text.trim();

    if leaf && !text.is_empty() {
        if element.attributes.is_empty() {
            return Some(Value::Text(text.to_string()));
        }
        return Some(Value::Node(GenericNode {
            attributes: element.attributes.iter().cloned().collect(),
            text: Some(text.to_string()),
            fields: Vec::new(),
        }));
    }

    let node = translate(element);
    (!node.is_empty()).then_some(Value::Node(node))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::XmlDocument;
    use pretty_assertions::assert_eq;

    fn translate_str(xml: &str) -> GenericNode {
        translate(XmlDocument::parse(xml).unwrap().root())
    }

    #[test]
    fn test_text_leaf_collapses() {
        let node = translate_str(
            r#"<metadata xmlns:dc="http://purl.org/dc/elements/1.1/"><dc:title>Emma</dc:title></metadata>"#,
        );
        assert_eq!(node.get("dc$title"), Some(&Value::Text("Emma".into())));
    }

    #[test]
    fn test_text_with_attributes() {
        let node = translate_str(
            r#"<metadata xmlns:dc="http://purl.org/dc/elements/1.1/"><dc:identifier id="uid">urn:isbn:1</dc:identifier></metadata>"#,
        );
        let id = node.get("dc$identifier").unwrap();
        assert_eq!(id.text(), Some("urn:isbn:1"));
        let id = id.nodes().next().unwrap();
        assert_eq!(id.attr("id"), Some("uid"));
        // The prefixed xmlns declaration stays on the parent
        assert!(node.attr("xmlns:dc").is_some());
    }

    #[test]
    fn test_repeated_siblings_become_list() {
        let node = translate_str(
            r#"<container xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="a.opf" media-type="application/oebps-package+xml"/>
    <rootfile full-path="b.pdf" media-type="application/pdf"/>
  </rootfiles>
</container>"#,
        );
        let rootfiles = node.get("oasis$rootfiles").unwrap().nodes().next().unwrap();
        let paths: Vec<_> = rootfiles
            .get("oasis$rootfile")
            .unwrap()
            .nodes()
            .filter_map(|n| n.attr("full-path"))
            .collect();
        assert_eq!(paths, ["a.opf", "b.pdf"]);
    }

    #[test]
    fn test_unknown_namespace_has_no_prefix() {
        let node = translate_str(r#"<r xmlns:x="http://example.com/"><x:a>1</x:a><b>2</b><b>3</b></r>"#);
        assert_eq!(node.get("a"), Some(&Value::Text("1".into())));
        assert_eq!(
            node.get("b"),
            Some(&Value::List(vec![Value::Text("2".into()), Value::Text("3".into())]))
        );
    }

    #[test]
    fn test_empty_element_dropped() {
        let node = translate_str("<r><empty/><kept a=\"1\"/></r>");
        assert!(node.get("empty").is_none());
        assert!(node.get("kept").is_some());
    }
}
