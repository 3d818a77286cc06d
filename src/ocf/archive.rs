//! Read-only access to the EPUB zip container
//!
//! Entries are read on demand; nothing is cached.

use crate::error::{Error, Result};
use crate::ocf::ArchivePath;
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;
use zip::read::ZipArchive;
use zip::result::ZipError;

/// An open EPUB archive
#[derive(Debug)]
pub struct Archive<R = BufReader<File>> {
    zip: ZipArchive<R>,
}

impl Archive<BufReader<File>> {
    /// Open an archive from a file path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }
}

impl Archive<Cursor<Vec<u8>>> {
    /// Open an archive held in memory
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        Self::from_reader(Cursor::new(bytes))
    }
}

impl<R: Read + Seek> Archive<R> {
    /// Open an archive from a reader
    pub fn from_reader(reader: R) -> Result<Self> {
        Ok(Self {
            zip: ZipArchive::new(reader)?,
        })
    }

    /// Check whether an entry exists
    pub fn contains(&self, path: &str) -> bool {
        self.zip.index_for_name(path).is_some()
    }

    /// Names of all entries, in archive order
    pub fn entry_names(&self) -> impl Iterator<Item = &str> {
        self.zip.file_names()
    }

    /// Read an entry's raw bytes
    pub fn read(&mut self, path: &str) -> Result<Vec<u8>> {
        let mut file = match self.zip.by_name(path) {
            Ok(file) => file,
            Err(ZipError::FileNotFound) => return Err(Error::EntryNotFound(path.to_string())),
            Err(e) => return Err(e.into()),
        };

        let mut data = Vec::new();
        file.read_to_end(&mut data)?;
        Ok(data)
    }

    /// Read an entry as UTF-8 text (a leading BOM is dropped)
    pub fn read_to_string(&mut self, path: &str) -> Result<String> {
        let data = self.read(path)?;
        let text = std::str::from_utf8(&data)?;
        Ok(text.strip_prefix('\u{feff}').unwrap_or(text).to_string())
    }

    /// Read an entry addressed by an [`ArchivePath`]
    pub fn read_path(&mut self, path: &ArchivePath) -> Result<String> {
        self.read_to_string(path.as_str())
    }
}
