//! Legacy NCX navigation document

use super::Chapter;
use crate::error::Result;
use crate::ocf::ArchivePath;
use crate::xml::{decode_numeric_refs, QueryContext, XmlElement};

/// Chapters for every `navPoint` of an NCX document at `ncx_path`, nested
/// points included, in document order
pub(super) fn parse(xml: &str, ncx_path: &ArchivePath) -> Result<Vec<Chapter>> {
    let ctx = QueryContext::parse(xml)?;
    let mut chapters = Vec::new();

    let points = ctx
        .select("*")
        .into_iter()
        .filter(|e| e.local_name() == "navPoint");

    for point in points {
        let id = point.attr("id").unwrap_or_default();
        let Some(src) = child(point, "content").and_then(|c| c.attr("src")) else {
            log::debug!("navPoint {id:?} has no content src, skipping");
            continue;
        };
        let title = child(point, "navLabel")
            .and_then(|label| child(label, "text"))
            .map(|text| decode_numeric_refs(text.text().trim()))
            .unwrap_or_default();

        let path = ncx_path.resolve(src);
        log::trace!("chapter {title:?} -> {path}");
        chapters.push(Chapter::new(path, title));
    }

    Ok(chapters)
}

fn child<'a>(element: &'a XmlElement, local: &str) -> Option<&'a XmlElement> {
    element.elements().find(|e| e.local_name() == local)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const NCX: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE ncx PUBLIC "-//NISO//DTD ncx 2005-1//EN" "http://www.daisy.org/z3986/2005/ncx-2005-1.dtd">
<ncx xmlns="http://www.daisy.org/z3986/2005/ncx/" version="2005-1">
  <head><meta name="dtb:uid" content="urn:uuid:1234"/></head>
  <docTitle><text>Sample</text></docTitle>
  <navMap>
    <navPoint id="np1" playOrder="1">
      <navLabel><text>Chapter &amp;#49;</text></navLabel>
      <content src="Text/chapter%201.xhtml#top"/>
      <navPoint id="np1-1" playOrder="2">
        <navLabel><text> Section 1.1 </text></navLabel>
        <content src="Text/chapter%201.xhtml#s1"/>
      </navPoint>
    </navPoint>
    <navPoint id="np2" playOrder="3">
      <navLabel><text>i. Not front matter here</text></navLabel>
      <content src="../Misc/notes.xhtml"/>
    </navPoint>
    <navPoint id="np3" playOrder="4">
      <navLabel><text>Dangling</text></navLabel>
    </navPoint>
  </navMap>
</ncx>"#;

    #[test]
    fn test_parse_ncx() {
        let chapters = parse(NCX, &ArchivePath::new("OEBPS/toc.ncx")).unwrap();

        assert_eq!(
            chapters,
            vec![
                Chapter::new(ArchivePath::new("OEBPS/Text/chapter 1.xhtml"), "Chapter 1"),
                Chapter::new(ArchivePath::new("OEBPS/Text/chapter 1.xhtml"), "Section 1.1"),
                Chapter::new(ArchivePath::new("Misc/notes.xhtml"), "i. Not front matter here"),
            ]
        );
    }

    #[test]
    fn test_prefixed_ncx() {
        let xml = r#"<ncx:ncx xmlns:ncx="http://www.daisy.org/z3986/2005/ncx/"><ncx:navMap>
            <ncx:navPoint><ncx:navLabel><ncx:text>One</ncx:text></ncx:navLabel><ncx:content src="one.html"/></ncx:navPoint>
        </ncx:navMap></ncx:ncx>"#;
        let chapters = parse(xml, &ArchivePath::new("toc.ncx")).unwrap();

        assert_eq!(chapters, vec![Chapter::new(ArchivePath::new("one.html"), "One")]);
    }

    #[test]
    fn test_empty_nav_map() {
        let xml = r#"<ncx xmlns="http://www.daisy.org/z3986/2005/ncx/"><navMap/></ncx>"#;
        assert!(parse(xml, &ArchivePath::new("toc.ncx")).unwrap().is_empty());
    }
}
