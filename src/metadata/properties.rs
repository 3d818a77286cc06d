//! `<meta>` property dispatch
//!
//! Maps canonical property names (`prefix$local`, see
//! [`PrefixTable::qualify`](crate::xml::PrefixTable::qualify)) onto
//! [`Metadata`] fields. Calibre custom columns store their value as JSON in the
//! `content` attribute under the `#value#` key.

use serde_json::Value;

use super::dates::parse_date;
use super::Metadata;
use crate::xml::XmlElement;

/// Key holding the value inside a calibre custom-column JSON blob
const USER_VALUE_KEY: &str = "#value#";

/// Supported `<meta>` properties
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum MetaProperty {
    Modified,
    Updated,
    Words,
    AuthorUrl,
    Status,
    Fandom,
    Timestamp,
    TitleSort,
    Series,
    SeriesIndex,
}

const PROPERTIES: &[(&str, MetaProperty)] = &[
    ("dcterms$modified", MetaProperty::Modified),
    ("calibre$user_metadata:#updated", MetaProperty::Updated),
    ("calibre$user_metadata:#words", MetaProperty::Words),
    ("calibre$user_metadata:#authorurl", MetaProperty::AuthorUrl),
    ("calibre$user_metadata:#status", MetaProperty::Status),
    ("calibre$user_metadata:#fandom", MetaProperty::Fandom),
    ("calibre$timestamp", MetaProperty::Timestamp),
    ("calibre$title_sort", MetaProperty::TitleSort),
    ("calibre$series", MetaProperty::Series),
    ("calibre$series_index", MetaProperty::SeriesIndex),
];

impl MetaProperty {
    /// Look up a canonical property name
    pub fn lookup(name: &str) -> Option<Self> {
        PROPERTIES
            .iter()
            .find(|(known, _)| *known == name)
            .map(|(_, property)| *property)
    }

    /// Store the value carried by `element` into `meta`.
    ///
    /// Values that fail to parse leave the field untouched.
    pub fn apply(self, element: &XmlElement, meta: &mut Metadata) {
        match self {
            MetaProperty::Modified => {
                let text = element.text();
                let value = match text.trim() {
                    "" => element.attr("content").unwrap_or_default(),
                    text => text,
                };
                set(&mut meta.modified, parse_date(value));
            }
            MetaProperty::Updated => {
                let updated = user_value(element)
                    .as_ref()
                    .and_then(Value::as_str)
                    .and_then(parse_date);
                set(&mut meta.updated, updated);
            }
            MetaProperty::Words => {
                let words = user_value(element).and_then(|v| match v {
                    Value::Number(n) => n.as_u64(),
                    Value::String(s) => s.trim().parse().ok(),
                    _ => None,
                });
                set(&mut meta.words, words);
            }
            MetaProperty::AuthorUrl => set(&mut meta.authorurl, user_string(element)),
            MetaProperty::Status => set(&mut meta.status, user_string(element)),
            MetaProperty::Fandom => set(&mut meta.fandom, user_string(element)),
            MetaProperty::Timestamp => {
                set(&mut meta.timestamp, element.attr("content").and_then(parse_date));
            }
            MetaProperty::TitleSort => set(&mut meta.title_sort, content(element)),
            MetaProperty::Series => set(&mut meta.series, content(element)),
            MetaProperty::SeriesIndex => {
                let index = element
                    .attr("content")
                    .and_then(|c| c.trim().parse::<f64>().ok());
                set(&mut meta.series_index, index);
            }
        }
    }
}

fn set<T>(field: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *field = value;
    }
}

fn content(element: &XmlElement) -> Option<String> {
    element
        .attr("content")
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
}

/// The `#value#` entry of a JSON `content` attribute; `null` counts as absent
fn user_value(element: &XmlElement) -> Option<Value> {
    let content = element.attr("content")?;
    let mut blob: Value = match serde_json::from_str(content) {
        Ok(blob) => blob,
        Err(e) => {
            log::warn!("invalid JSON in <meta> content: {e}");
            return None;
        }
    };
    match blob.get_mut(USER_VALUE_KEY).map(Value::take) {
        Some(Value::Null) | None => None,
        Some(value) => Some(value),
    }
}

/// A `#value#` rendered as text. Multi-valued columns are joined with ", ".
fn user_string(element: &XmlElement) -> Option<String> {
    match user_value(element)? {
        Value::String(s) => Some(s),
        Value::Array(items) => {
            let items: Vec<String> = items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s),
                    Value::Null => None,
                    other => Some(other.to_string()),
                })
                .collect();
            (!items.is_empty()).then(|| items.join(", "))
        }
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
