//! XML parsing, namespace handling and querying

pub mod namespace;
mod query;
mod selector;
pub(crate) mod translate;
mod tree;

pub use query::{PrefixTable, QueryContext};
pub use selector::Selector;
pub use tree::{XmlDocument, XmlElement, XmlNode};

/// Decode `&#NNN;` and `&#xHH;` references left in already-unescaped text.
///
/// Navigation documents sometimes double-escape titles (`&amp;#233;`), which
/// leaves literal references behind after XML unescaping. Invalid references
/// are kept as written.
pub fn decode_numeric_refs(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find("&#") {
        out.push_str(&rest[..start]);
        let candidate = &rest[start + 2..];

        let decoded = candidate.find(';').and_then(|end| {
            let body = &candidate[..end];
            let code = match body.strip_prefix(['x', 'X']) {
                Some(hex) if !hex.is_empty() && hex.chars().all(|c| c.is_ascii_hexdigit()) => {
                    u32::from_str_radix(hex, 16).ok()
                }
                None if !body.is_empty() && body.chars().all(|c| c.is_ascii_digit()) => {
                    body.parse().ok()
                }
                _ => None,
            }?;
            char::from_u32(code).map(|c| (c, end))
        });

        match decoded {
            Some((c, end)) => {
                out.push(c);
                rest = &candidate[end + 1..];
            }
            None => {
                out.push_str("&#");
                rest = candidate;
            }
        }
    }

    out.push_str(rest);
    out
}
