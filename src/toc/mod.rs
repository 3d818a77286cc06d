//! Table of contents extraction
//!
//! A package advertises its table of contents either as an EPUB 3 XHTML
//! navigation document or as a legacy NCX file. Both produce the same thing:
//! chapters in reading order.

mod ncx;
mod xhtml;

use std::io::{Read, Seek};

use crate::error::Result;
use crate::ocf::{Archive, ArchivePath};
use crate::options::ExtractOptions;

/// Where the table of contents lives
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(tag = "type", content = "path", rename_all = "lowercase")
)]
pub enum TocSource {
    /// EPUB 3 navigation document (`properties="nav"`)
    Xhtml(ArchivePath),
    /// Legacy NCX document
    Ncx(ArchivePath),
}

impl TocSource {
    /// Archive path of the navigation document
    pub fn path(&self) -> &ArchivePath {
        match self {
            TocSource::Xhtml(path) | TocSource::Ncx(path) => path,
        }
    }

    /// Parse an already-read navigation document
    pub fn parse(&self, xml: &str, options: &ExtractOptions) -> Result<Vec<Chapter>> {
        match self {
            TocSource::Xhtml(path) => xhtml::parse(xml, path, options),
            TocSource::Ncx(path) => ncx::parse(xml, path),
        }
    }

    /// Read and parse the navigation document from the archive
    pub fn read<R: Read + Seek>(
        &self,
        archive: &mut Archive<R>,
        options: &ExtractOptions,
    ) -> Result<Vec<Chapter>> {
        let xml = archive.read_path(self.path())?;
        self.parse(&xml, options)
    }
}

/// A table of contents entry.
///
/// Chapters only remember where their content lives; read it with
/// [`Chapter::content`] while the archive is open.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Chapter {
    /// Archive path of the chapter file (no fragment)
    pub path: ArchivePath,
    /// Display title
    pub title: String,
}

impl Chapter {
    /// Create a chapter
    pub fn new(path: ArchivePath, title: impl Into<String>) -> Self {
        Self {
            path,
            title: title.into(),
        }
    }

    /// Raw text of the chapter file
    pub fn content<R: Read + Seek>(&self, archive: &mut Archive<R>) -> Result<String> {
        archive.read_path(&self.path)
    }
}
