//! Open Container Format (OCF) handling
//!
//! This module handles the zip container an EPUB ships in: on-demand entry
//! reads, archive-relative paths, and the container descriptor.

mod archive;
mod container;
mod path;

pub use archive::Archive;
pub use container::{
    check_mimetype, find_package_path, package_path_from_xml, MimetypeCheck, EPUB_MIMETYPE,
    PACKAGE_MEDIA_TYPE,
};
pub use path::{strip_fragment, well_known, ArchivePath};
