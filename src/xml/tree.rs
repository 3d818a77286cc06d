//! Owned XML element tree with resolved namespaces

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use quick_xml::NsReader;
use std::io::BufRead;

use crate::error::{Error, Result};

/// XML node
#[derive(Clone, Debug)]
pub enum XmlNode {
    /// Element node
    Element(XmlElement),
    /// Text or CDATA, already unescaped
    Text(String),
}

/// XML element with attributes and children
#[derive(Clone, Debug)]
pub struct XmlElement {
    /// Qualified name as written in the document (e.g., "dc:title")
    pub name: String,
    /// Namespace URI the element's prefix resolves to
    pub namespace: Option<String>,
    /// Attributes as (name, value) pairs, values unescaped
    pub attributes: Vec<(String, String)>,
    /// Child nodes in document order
    pub children: Vec<XmlNode>,
}

/// A parsed XML document
#[derive(Clone, Debug)]
pub struct XmlDocument {
    root: XmlElement,
}

impl XmlDocument {
    /// Parse a document from a string
    pub fn parse(xml: &str) -> Result<Self> {
        let xml = xml.strip_prefix('\u{feff}').unwrap_or(xml);
        let mut reader = NsReader::from_str(xml);
        let mut buf = Vec::new();

        loop {
            let (resolved, event) = reader.read_resolved_event_into(&mut buf)?;
            let namespace = namespace_uri(resolved);
            match event {
                Event::Start(e) => {
                    let root = XmlElement::from_reader(&mut reader, &e, namespace)?;
                    return Ok(Self { root });
                }
                Event::Empty(e) => {
                    let root = XmlElement::from_empty(&e, namespace);
                    return Ok(Self { root });
                }
                Event::Eof => return Err(Error::InvalidDocument("no root element".into())),
                _ => {}
            }
            buf.clear();
        }
    }

    /// The document element
    pub fn root(&self) -> &XmlElement {
        &self.root
    }
}

impl XmlElement {
    /// Read a complete element from XML reader (starting after the start tag was read)
    fn from_reader<R: BufRead>(
        reader: &mut NsReader<R>,
        start: &BytesStart,
        namespace: Option<String>,
    ) -> Result<Self> {
        let mut element = Self::from_empty(start, namespace);
        let mut buf = Vec::new();

        loop {
            let (resolved, event) = reader.read_resolved_event_into(&mut buf)?;
            let namespace = namespace_uri(resolved);
            match event {
                Event::Start(e) => {
                    let child = Self::from_reader(reader, &e, namespace)?;
                    element.children.push(XmlNode::Element(child));
                }
                Event::Empty(e) => {
                    let child = Self::from_empty(&e, namespace);
                    element.children.push(XmlNode::Element(child));
                }
                Event::Text(t) => {
                    let text = unescape_lenient(&t);
                    if !text.is_empty() {
                        element.children.push(XmlNode::Text(text));
                    }
                }
                Event::CData(c) => {
                    let text = String::from_utf8_lossy(&c).to_string();
                    element.children.push(XmlNode::Text(text));
                }
                Event::End(_) => break,
                Event::Eof => return Err(Error::InvalidDocument("Unexpected EOF".into())),
                _ => {}
            }
            buf.clear();
        }

        Ok(element)
    }

    /// Create from a start or empty tag, without children
    fn from_empty(e: &BytesStart, namespace: Option<String>) -> Self {
        let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
        let attributes = e
            .attributes()
            .filter_map(|a| a.ok())
            .map(|a| {
                (
                    String::from_utf8_lossy(a.key.as_ref()).to_string(),
                    unescape_lenient(&a.value),
                )
            })
            .collect();

        Self {
            name,
            namespace,
            attributes,
            children: Vec::new(),
        }
    }

    /// Prefix portion of the qualified name
    pub fn prefix(&self) -> Option<&str> {
        self.name.split_once(':').map(|(prefix, _)| prefix)
    }

    /// Local portion of the qualified name
    pub fn local_name(&self) -> &str {
        self.name
            .split_once(':')
            .map(|(_, local)| local)
            .unwrap_or(&self.name)
    }

    /// Get an attribute value by its qualified name
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Child elements
    pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|child| match child {
            XmlNode::Element(e) => Some(e),
            XmlNode::Text(_) => None,
        })
    }

    /// Text of this element and all descendants, concatenated
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                XmlNode::Text(t) => out.push_str(t),
                XmlNode::Element(e) => e.collect_text(out),
            }
        }
    }

    /// Text nodes directly under this element, concatenated
    pub fn own_text(&self) -> String {
        self.children
            .iter()
            .filter_map(|child| match child {
                XmlNode::Text(t) => Some(t.as_str()),
                XmlNode::Element(_) => None,
            })
            .collect()
    }
}

/// Unescape text or attribute content.
///
/// XHTML navigation documents routinely use HTML named entities that plain
/// XML does not define. Every known entity is decoded; unknown ones stay as
/// written.
pub(crate) fn unescape_lenient(raw: &[u8]) -> String {
    let raw = String::from_utf8_lossy(raw);
    html_escape::decode_html_entities(&raw).into_owned()
}

fn namespace_uri(resolved: ResolveResult) -> Option<String> {
    match resolved {
        ResolveResult::Bound(ns) => Some(String::from_utf8_lossy(ns.into_inner()).into_owned()),
        ResolveResult::Unbound | ResolveResult::Unknown(_) => None,
    }
}
