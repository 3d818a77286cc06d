//! Archive-relative path handling

use percent_encoding::percent_decode_str;
use std::fmt;

/// A normalized path to an entry inside the archive.
///
/// Archive paths never start with '/', and contain no `.`/`..` segments.
/// Example: `OEBPS/text/ch1.xhtml`
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(transparent))]
pub struct ArchivePath {
    path: String,
}

impl ArchivePath {
    /// Create a normalized path (`.` dropped, `..` collapsed, no leading '/')
    pub fn new(path: &str) -> Self {
        Self::from_segments(Vec::new(), path)
    }

    fn from_segments<'a>(mut parts: Vec<&'a str>, relative: &'a str) -> Self {
        for segment in relative.split('/') {
            match segment {
                "" | "." => continue,
                ".." => {
                    parts.pop();
                }
                s => parts.push(s),
            }
        }
        Self {
            path: parts.join("/"),
        }
    }

    /// Get the path as a string slice
    pub fn as_str(&self) -> &str {
        &self.path
    }

    /// Get the file name portion
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    /// Directory containing this entry ("" at the archive root)
    pub fn parent(&self) -> &str {
        self.path.rfind('/').map(|pos| &self.path[..pos]).unwrap_or("")
    }

    /// Resolve an href found inside this entry.
    ///
    /// The fragment is dropped and percent-escapes are decoded before the
    /// href is joined onto this entry's directory. For `OEBPS/nav.xhtml` and
    /// `../text/ch1.xhtml#sec2`, returns `text/ch1.xhtml`.
    pub fn resolve(&self, href: &str) -> ArchivePath {
        let href = strip_fragment(href);
        let href = percent_decode_str(href).decode_utf8_lossy();

        if let Some(absolute) = href.strip_prefix('/') {
            return Self::new(absolute);
        }

        let base: Vec<&str> = self.parent().split('/').filter(|s| !s.is_empty()).collect();
        Self::from_segments(base, &href)
    }
}

/// Drop a `#fragment` suffix
pub fn strip_fragment(href: &str) -> &str {
    href.split_once('#').map(|(path, _)| path).unwrap_or(href)
}

impl fmt::Display for ArchivePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path)
    }
}

impl AsRef<str> for ArchivePath {
    fn as_ref(&self) -> &str {
        &self.path
    }
}

impl From<&str> for ArchivePath {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

/// Well-known archive paths
pub mod well_known {
    /// Format marker entry
    pub const MIMETYPE: &str = "mimetype";
    /// OCF container descriptor
    pub const CONTAINER: &str = "META-INF/container.xml";
}
