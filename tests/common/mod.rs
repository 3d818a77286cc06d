//! In-memory EPUB fixtures shared by the integration tests

#![allow(dead_code)]

use std::io::{Cursor, Write};
use zip::write::{SimpleFileOptions, ZipWriter};
use zip::CompressionMethod;

pub const CONTAINER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>"#;

pub const EPUB3_OPF: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<package xmlns="http://www.idpf.org/2007/opf" version="3.0" unique-identifier="bookid">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/">
    <dc:identifier id="bookid">urn:uuid:0b7a7c1e-3f6d-4c2e-9a55-000000000001</dc:identifier>
    <dc:title>The Test Book</dc:title>
    <dc:language>en</dc:language>
    <dc:creator>Jane Doe</dc:creator>
    <dc:publisher>Fixture Press</dc:publisher>
    <dc:date>2016-08-01</dc:date>
    <dc:subject>Fiction, Adventure</dc:subject>
    <meta property="dcterms:modified">2016-08-02T10:00:00Z</meta>
  </metadata>
  <manifest>
    <item id="nav" href="nav.xhtml" media-type="application/xhtml+xml" properties="nav"/>
    <item id="ncx" href="toc.ncx" media-type="application/x-dtbncx+xml"/>
    <item id="ch1" href="Text/ch1.xhtml" media-type="application/xhtml+xml"/>
    <item id="ch2" href="Text/ch2.xhtml" media-type="application/xhtml+xml"/>
  </manifest>
  <spine toc="ncx">
    <itemref idref="ch1"/>
    <itemref idref="ch2"/>
  </spine>
</package>"#;

pub const NAV: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<html xmlns="http://www.w3.org/1999/xhtml" xmlns:epub="http://www.idpf.org/2007/ops">
<body>
  <nav epub:type="toc">
    <ol>
      <li><a href="Text/ch1.xhtml">1. The Beginning</a></li>
      <li><a href="Text/ch2.xhtml#middle">2. The End</a></li>
    </ol>
  </nav>
</body>
</html>"#;

pub const NCX: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ncx xmlns="http://www.daisy.org/z3986/2005/ncx/" version="2005-1">
  <navMap>
    <navPoint id="p1" playOrder="1">
      <navLabel><text>NCX One</text></navLabel>
      <content src="Text/ch1.xhtml"/>
    </navPoint>
    <navPoint id="p2" playOrder="2">
      <navLabel><text>NCX Two</text></navLabel>
      <content src="Text/ch2.xhtml"/>
    </navPoint>
  </navMap>
</ncx>"#;

pub const CH1: &str = "<html><body><p>It begins.</p></body></html>";
pub const CH2: &str = "<html><body><p id=\"middle\">It ends.</p></body></html>";

/// Builds a zipped EPUB in memory
pub struct EpubBuilder {
    entries: Vec<(String, Vec<u8>)>,
}

impl EpubBuilder {
    /// Archive with only the `mimetype` entry
    pub fn new() -> Self {
        Self {
            entries: vec![("mimetype".into(), b"application/epub+zip".to_vec())],
        }
    }

    /// Complete EPUB 3 book advertising both a nav document and an NCX
    pub fn epub3() -> Self {
        Self::new()
            .entry("META-INF/container.xml", CONTAINER)
            .entry("OEBPS/content.opf", EPUB3_OPF)
            .entry("OEBPS/nav.xhtml", NAV)
            .entry("OEBPS/toc.ncx", NCX)
            .entry("OEBPS/Text/ch1.xhtml", CH1)
            .entry("OEBPS/Text/ch2.xhtml", CH2)
    }

    /// Add or replace an entry
    pub fn entry(mut self, name: &str, data: impl AsRef<[u8]>) -> Self {
        self.entries.retain(|(n, _)| n != name);
        self.entries.push((name.to_string(), data.as_ref().to_vec()));
        self
    }

    /// Drop an entry
    pub fn without(mut self, name: &str) -> Self {
        self.entries.retain(|(n, _)| n != name);
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, data) in &self.entries {
            let options = if name == "mimetype" {
                SimpleFileOptions::default().compression_method(CompressionMethod::Stored)
            } else {
                SimpleFileOptions::default()
            };
            zip.start_file(name.as_str(), options).unwrap();
            zip.write_all(data).unwrap();
        }
        zip.finish().unwrap().into_inner()
    }
}

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
