//! Error types for epub-meta

use thiserror::Error;

/// Main error type
///
/// Only structural problems surface here. Field-level problems (bad dates,
/// unknown metadata properties, a missing table of contents) are logged and
/// the affected field is left empty.
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("Entry not found in archive: {0}")]
    EntryNotFound(String),

    #[error("Could not find package document pointer in META-INF/container.xml")]
    MissingPackagePointer,

    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error("Not an EPUB archive: {0}")]
    NotEpub(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
