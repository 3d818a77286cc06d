//! High-level API: open an EPUB and extract its metadata

use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;

use crate::error::{Error, Result};
use crate::metadata::Metadata;
use crate::ocf::{self, Archive, ArchivePath, MimetypeCheck};
use crate::options::ExtractOptions;
use crate::toc::Chapter;

/// An opened EPUB with its extracted metadata.
///
/// The archive stays open so chapter content can be read on demand.
#[derive(Debug)]
pub struct Epub<R = BufReader<File>> {
    archive: Archive<R>,
    package_path: ArchivePath,
    metadata: Metadata,
}

impl Epub<BufReader<File>> {
    /// Open an EPUB file with default options
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with(path, ExtractOptions::default())
    }

    /// Open an EPUB file
    pub fn open_with<P: AsRef<Path>>(path: P, options: ExtractOptions) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("opening {}", path.display());
        Self::from_archive(Archive::open(path)?, options)
    }
}

impl Epub<Cursor<Vec<u8>>> {
    /// Open an EPUB held in memory with default options
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        Self::from_bytes_with(bytes, ExtractOptions::default())
    }

    /// Open an EPUB held in memory
    pub fn from_bytes_with(bytes: Vec<u8>, options: ExtractOptions) -> Result<Self> {
        Self::from_archive(Archive::from_bytes(bytes)?, options)
    }
}

impl<R: Read + Seek> Epub<R> {
    /// Extract metadata and the table of contents from an open archive
    pub fn from_archive(mut archive: Archive<R>, options: ExtractOptions) -> Result<Self> {
        if let MimetypeCheck::Mismatch(found) = ocf::check_mimetype(&mut archive) {
            if options.strict_mimetype {
                return Err(Error::NotEpub(format!("unexpected mimetype {found:?}")));
            }
        }

        let package_path = ocf::find_package_path(&mut archive)?;
        log::debug!("package document at {package_path}");
        let opf = archive.read_path(&package_path)?;
        let mut metadata = Metadata::from_opf(&opf, &package_path)?;

        metadata.toc = match &metadata.toc_source {
            Some(source) => {
                log::debug!("table of contents from {source:?}");
                source.read(&mut archive, &options)?
            }
            None => {
                log::warn!("no navigation document in manifest, table of contents is empty");
                Vec::new()
            }
        };
        log::debug!("{} chapters", metadata.toc.len());

        Ok(Self {
            archive,
            package_path,
            metadata,
        })
    }

    /// Extracted metadata
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Consume the EPUB, keeping only its metadata
    pub fn into_metadata(self) -> Metadata {
        self.metadata
    }

    /// Table of contents in reading order
    pub fn chapters(&self) -> &[Chapter] {
        &self.metadata.toc
    }

    /// Archive path of the package document
    pub fn package_path(&self) -> &ArchivePath {
        &self.package_path
    }

    /// Underlying archive
    pub fn archive_mut(&mut self) -> &mut Archive<R> {
        &mut self.archive
    }

    /// Raw text of a chapter's file
    pub fn chapter_content(&mut self, chapter: &Chapter) -> Result<String> {
        chapter.content(&mut self.archive)
    }
}

/// Read the metadata of an EPUB file with default options
pub fn read_metadata<P: AsRef<Path>>(path: P) -> Result<Metadata> {
    Epub::open(path).map(Epub::into_metadata)
}
