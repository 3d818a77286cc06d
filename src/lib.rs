//! # epub-meta
//!
//! Extract bibliographic metadata and the table of contents from EPUB files.
//!
//! ## Features
//!
//! - Dublin Core, DCTERMS and calibre metadata, whatever prefixes the package declares
//! - Table of contents from EPUB 3 navigation documents or legacy NCX files
//! - Chapter content read lazily from the open archive
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use epub_meta::Epub;
//!
//! let mut epub = Epub::open("book.epub")?;
//! println!("{:?}", epub.metadata().title);
//!
//! let chapters = epub.chapters().to_vec();
//! for chapter in &chapters {
//!     println!("{} ({})", chapter.title, chapter.path);
//! }
//! let first = epub.chapter_content(&chapters[0])?;
//! ```

pub mod epub;
pub mod error;
pub mod metadata;
pub mod ocf;
pub mod options;
pub mod toc;
pub mod xml;

pub use epub::{read_metadata, Epub};
pub use error::{Error, Result};
pub use metadata::Metadata;
pub use ocf::{Archive, ArchivePath};
pub use options::ExtractOptions;
pub use toc::{Chapter, TocSource};
