//! Namespace-aware querying with per-document prefix remapping
//!
//! EPUB producers pick their own prefixes (`dc:`, `dcterms:`, `opf:`, or
//! anything declared in the package's `prefix` attribute). Code in this crate
//! always queries with canonical prefixes from [`namespace::REGISTRY`]; the
//! [`PrefixTable`] built for each document maps those to whatever aliases the
//! document actually uses.
//!
//! [`namespace::REGISTRY`]: super::namespace::REGISTRY

use std::collections::HashMap;

use super::namespace::canonical_prefix;
use super::selector::Selector;
use super::tree::{XmlDocument, XmlElement};
use crate::error::Result;

/// Per-document alias <-> canonical prefix mapping
#[derive(Clone, Debug, Default)]
pub struct PrefixTable {
    alias_to_canonical: HashMap<String, String>,
    /// Aliases in registration order
    canonical_to_aliases: HashMap<String, Vec<String>>,
}

impl PrefixTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `alias` in this document means the canonical prefix `canonical`.
    ///
    /// An alias maps to one canonical prefix; registering it again moves it.
    /// A canonical prefix can have any number of aliases.
    pub fn register(&mut self, alias: impl Into<String>, canonical: impl Into<String>) {
        let alias = alias.into();
        let canonical = canonical.into();

        if let Some(previous) = self
            .alias_to_canonical
            .insert(alias.clone(), canonical.clone())
        {
            if let Some(aliases) = self.canonical_to_aliases.get_mut(&previous) {
                aliases.retain(|a| *a != alias);
            }
        }

        let aliases = self.canonical_to_aliases.entry(canonical).or_default();
        if !aliases.contains(&alias) {
            aliases.push(alias);
        }
    }

    /// Register a document-declared prefix bound to a namespace URI.
    ///
    /// Known URIs map to their canonical prefix; unknown ones keep the alias.
    pub fn declare(&mut self, alias: &str, uri: &str) {
        let canonical = canonical_prefix(uri).unwrap_or(alias);
        self.register(alias, canonical);
    }

    /// Canonical prefix for a document alias, or the alias itself
    pub fn canonical<'a>(&'a self, alias: &'a str) -> &'a str {
        self.alias_to_canonical
            .get(alias)
            .map(String::as_str)
            .unwrap_or(alias)
    }

    /// Every document alias for a canonical prefix, or the prefix itself
    pub fn aliases<'a>(&'a self, canonical: &'a str) -> Vec<&'a str> {
        match self.canonical_to_aliases.get(canonical) {
            Some(aliases) if !aliases.is_empty() => aliases.iter().map(String::as_str).collect(),
            _ => vec![canonical],
        }
    }

    /// Turn a document-level `prefix:local` name into canonical `prefix$local`.
    ///
    /// Names without a prefix (or with an empty local part) come back as the
    /// bare prefix. Only the first colon separates prefix from local name, so
    /// `calibre:user_metadata:#words` becomes `calibre$user_metadata:#words`.
    pub fn qualify(&self, name: &str) -> Option<String> {
        if name.is_empty() {
            return None;
        }
        match name.split_once(':') {
            Some((prefix, local)) if !local.is_empty() => {
                Some(format!("{}${}", self.canonical(prefix), local))
            }
            Some((prefix, _)) => Some(prefix.to_string()),
            None => Some(name.to_string()),
        }
    }

    /// Rewrite every `ns$local` type selector into `alias\:local`.
    ///
    /// A canonical prefix with several aliases yields one selector per
    /// combination, joined into a selector list. `$` inside quoted values and
    /// the `$=` attribute operator are left alone.
    pub fn expand(&self, selector: &str) -> String {
        let mut expanded = Vec::new();
        let mut pending = vec![selector.to_string()];

        while let Some(variant) = pending.pop() {
            let Some((start, dollar)) = find_canonical_prefix(&variant) else {
                expanded.push(variant);
                continue;
            };
            // Reversed so the first alias is expanded first
            for alias in self.aliases(&variant[start..dollar]).into_iter().rev() {
                pending.push(format!(
                    "{}{}\\:{}",
                    &variant[..start],
                    escape_ident(alias),
                    &variant[dollar + 1..]
                ));
            }
        }

        expanded.join(", ")
    }
}

/// Byte range of the first `ns` in an `ns$local` outside quotes
fn find_canonical_prefix(selector: &str) -> Option<(usize, usize)> {
    let mut quote = None;

    for (i, c) in selector.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '"' || c == '\'' => quote = Some(c),
            None if c == '$' && !selector[i + 1..].starts_with('=') => {
                let start = selector[..i]
                    .char_indices()
                    .rev()
                    .take_while(|(_, c)| is_ident_char(*c))
                    .last()
                    .map_or(i, |(pos, _)| pos);
                if start < i {
                    return Some((start, i));
                }
            }
            None => {}
        }
    }

    None
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

fn escape_ident(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if !is_ident_char(c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// A parsed document plus the prefix table used to query it
#[derive(Clone, Debug)]
pub struct QueryContext {
    document: XmlDocument,
    prefixes: PrefixTable,
}

impl QueryContext {
    /// Parse `xml` eagerly with an empty prefix table
    pub fn parse(xml: &str) -> Result<Self> {
        Ok(Self {
            document: XmlDocument::parse(xml)?,
            prefixes: PrefixTable::new(),
        })
    }

    /// Register a document alias for a canonical prefix
    pub fn prefix(&mut self, alias: impl Into<String>, canonical: impl Into<String>) {
        self.prefixes.register(alias, canonical);
    }

    /// The document's prefix table
    pub fn prefixes(&self) -> &PrefixTable {
        &self.prefixes
    }

    /// Mutable access to the prefix table
    pub fn prefixes_mut(&mut self) -> &mut PrefixTable {
        &mut self.prefixes
    }

    /// The document element
    pub fn root(&self) -> &XmlElement {
        self.document.root()
    }

    /// Select elements in document order.
    ///
    /// `ns$name` type selectors match the name under every alias the document
    /// uses for the canonical prefix `ns`; `ns\:name` is matched as written.
    /// An unsupported selector matches nothing.
    pub fn select(&self, selector: &str) -> Vec<&XmlElement> {
        match self.compile(selector) {
            Some(sel) => sel.select(self.root(), true),
            None => Vec::new(),
        }
    }

    /// Select elements named `local` in the canonical namespace `ns`
    pub fn select_ns(&self, ns: &str, local: &str) -> Vec<&XmlElement> {
        self.select(&format!("{}${}", ns, local))
    }

    /// First element matching `selector`
    pub fn first(&self, selector: &str) -> Option<&XmlElement> {
        self.select(selector).into_iter().next()
    }

    /// Select among the descendants of `scope`
    pub fn find<'a>(&self, scope: &'a XmlElement, selector: &str) -> Vec<&'a XmlElement> {
        match self.compile(selector) {
            Some(sel) => sel.select(scope, false),
            None => Vec::new(),
        }
    }

    fn compile(&self, selector: &str) -> Option<Selector> {
        let expanded = self.prefixes.expand(selector);
        let compiled = Selector::parse(&expanded);
        match &compiled {
            Some(sel) => log::trace!("selector {selector:?} -> {:?}", sel.as_str()),
            None => log::debug!("unsupported selector: {selector}"),
        }
        compiled
    }
}
