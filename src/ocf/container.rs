//! OCF container handling
//!
//! Reads `META-INF/container.xml` to locate the package document, and checks
//! the `mimetype` marker entry.

use std::io::{Read, Seek};

use crate::error::{Error, Result};
use crate::ocf::path::well_known;
use crate::ocf::{Archive, ArchivePath};
use crate::xml::translate::{translate, GenericNode};
use crate::xml::XmlDocument;

/// Media type of the package document rootfile
pub const PACKAGE_MEDIA_TYPE: &str = "application/oebps-package+xml";
/// Expected content of the `mimetype` entry
pub const EPUB_MIMETYPE: &str = "application/epub+zip";

/// Outcome of checking the `mimetype` entry
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MimetypeCheck {
    /// Entry present and correct
    Valid,
    /// Entry absent or unreadable
    Missing,
    /// Entry present with the wrong content
    Mismatch(String),
}

/// Check the `mimetype` entry. Never fails; problems are logged.
pub fn check_mimetype<R: Read + Seek>(archive: &mut Archive<R>) -> MimetypeCheck {
    match archive.read_to_string(well_known::MIMETYPE) {
        Ok(mime) if mime == EPUB_MIMETYPE => MimetypeCheck::Valid,
        Ok(mime) => {
            log::warn!("mimetype: expected {EPUB_MIMETYPE}, found {mime:?}");
            MimetypeCheck::Mismatch(mime)
        }
        Err(e) => {
            log::warn!("mimetype: {e}");
            MimetypeCheck::Missing
        }
    }
}

/// Find the package document path from the container descriptor
pub fn find_package_path<R: Read + Seek>(archive: &mut Archive<R>) -> Result<ArchivePath> {
    let xml = archive.read_to_string(well_known::CONTAINER)?;
    package_path_from_xml(&xml)
}

/// Parse a container descriptor and return the package document path
pub fn package_path_from_xml(xml: &str) -> Result<ArchivePath> {
    let doc = XmlDocument::parse(xml)?;
    let container = translate(doc.root());

    let path = rootfiles(&container)
        .find(|rootfile| rootfile.attr("media-type") == Some(PACKAGE_MEDIA_TYPE))
        .and_then(|rootfile| rootfile.attr("full-path"))
        .filter(|path| !path.is_empty())
        .map(ArchivePath::new)
        .ok_or(Error::MissingPackagePointer);
    path
}

/// `rootfile` nodes, tolerating containers that omit the OCF namespace
fn rootfiles(container: &GenericNode) -> impl Iterator<Item = &GenericNode> {
    ["oasis$rootfiles", "rootfiles"]
        .into_iter()
        .filter_map(move |key| container.get(key))
        .flat_map(|value| value.nodes())
        .flat_map(|rootfiles| {
            ["oasis$rootfile", "rootfile"]
                .into_iter()
                .filter_map(move |key| rootfiles.get(key))
                .flat_map(|value| value.nodes())
        })
}
