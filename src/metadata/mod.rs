//! Package document metadata extraction

mod dates;
mod properties;

pub use dates::parse_date;

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::ocf::ArchivePath;
use crate::toc::{Chapter, TocSource};
use crate::xml::{namespace, QueryContext, XmlElement};
use properties::MetaProperty;

/// Media type advertising a legacy NCX navigation document
pub const NCX_MEDIA_TYPE: &str = "application/x-dtbncx+xml";

/// Bibliographic metadata and table of contents of an EPUB
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Metadata {
    /// Every `dc:identifier`, in document order
    pub identifiers: Vec<String>,
    /// The `dc:identifier` named by the package's `unique-identifier`
    pub primary_identifier: Option<String>,
    pub language: Option<String>,
    pub title: Option<String>,
    pub source: Option<String>,
    pub publisher: Option<String>,
    /// Every `dc:creator`, in document order
    pub creators: Vec<String>,
    pub description: Option<String>,
    /// `dc:date`; absent when unparseable
    pub date: Option<DateTime<Utc>>,
    /// Comma-separated `dc:subject` values, deduplicated in order
    pub tags: Vec<String>,
    /// `dcterms:modified`
    pub modified: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
    pub words: Option<u64>,
    pub authorurl: Option<String>,
    pub status: Option<String>,
    pub fandom: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
    pub title_sort: Option<String>,
    pub series: Option<String>,
    pub series_index: Option<f64>,
    /// Archive path of the cover image
    pub cover: Option<ArchivePath>,
    /// Navigation document the table of contents is read from
    pub toc_source: Option<TocSource>,
    /// Table of contents in reading order
    pub toc: Vec<Chapter>,
}

impl Metadata {
    /// Extract metadata from a package document located at `package_path`.
    ///
    /// The table of contents is not read here; only [`Metadata::toc_source`]
    /// is set.
    pub fn from_opf(xml: &str, package_path: &ArchivePath) -> Result<Self> {
        let mut ctx = QueryContext::parse(xml)?;
        register_prefixes(&mut ctx);

        let mut meta = Metadata::default();
        let package = ctx.root();

        let identifiers = ctx.select_ns("dc", "identifier");
        meta.identifiers = identifiers.iter().map(|e| e.text().trim().to_string()).collect();
        meta.primary_identifier = package.attr("unique-identifier").and_then(|uid| {
            identifiers
                .iter()
                .find(|e| e.attr("id") == Some(uid))
                .map(|e| e.text().trim().to_string())
        });

        meta.language = first_text(&ctx, "language");
        meta.title = first_text(&ctx, "title");
        meta.source = first_text(&ctx, "source");
        meta.publisher = first_text(&ctx, "publisher");
        meta.description = first_text(&ctx, "description");
        meta.creators = ctx
            .select_ns("dc", "creator")
            .into_iter()
            .map(|e| e.text().trim().to_string())
            .collect();
        meta.date = first_text(&ctx, "date").and_then(|d| parse_date(&d));

        for subject in ctx.select_ns("dc", "subject") {
            for tag in split_tags(&subject.text()) {
                if !meta.tags.contains(&tag) {
                    meta.tags.push(tag);
                }
            }
        }

        let scope = metadata_element(package).unwrap_or(package);
        for element in ctx.find(scope, "*").into_iter().filter(|e| e.local_name() == "meta") {
            let prefixes = ctx.prefixes();
            let property = element
                .attr("property")
                .and_then(|p| prefixes.qualify(p))
                .or_else(|| element.attr("name").and_then(|n| prefixes.qualify(n)));
            let Some(property) = property else {
                continue;
            };

            match MetaProperty::lookup(&property) {
                Some(handler) => handler.apply(element, &mut meta),
                None => log::debug!("unhandled metadata property: {property}"),
            }
        }

        meta.cover = find_cover(&ctx).map(|href| package_path.resolve(href));
        meta.toc_source = find_toc_source(&ctx, package_path);

        Ok(meta)
    }

    /// Chapters of the table of contents
    pub fn chapters(&self) -> &[Chapter] {
        &self.toc
    }
}

/// The `<metadata>` child of the package root, whatever its prefix
fn metadata_element(package: &XmlElement) -> Option<&XmlElement> {
    package.elements().find(|e| e.local_name() == "metadata")
}

/// Build the document's prefix table.
///
/// Canonical prefixes are registered as their own aliases first. Document
/// declarations add further aliases; an alias declared twice keeps the binding
/// seen last, so declarations on `<metadata>` win over the package root.
fn register_prefixes(ctx: &mut QueryContext) {
    for prefix in namespace::canonical_prefixes() {
        ctx.prefix(prefix, prefix);
    }

    let package = ctx.root();
    let mut declared = xmlns_declarations(package);
    if let Some(prefix_attr) = package.attr("prefix") {
        declared.extend(parse_prefix_attr(prefix_attr));
    }
    if let Some(metadata) = metadata_element(package) {
        declared.extend(xmlns_declarations(metadata));
    }

    let prefixes = ctx.prefixes_mut();
    for (alias, uri) in declared {
        prefixes.declare(&alias, &uri);
    }
}

/// `xmlns:alias="uri"` attributes of an element
fn xmlns_declarations(element: &XmlElement) -> Vec<(String, String)> {
    element
        .attributes
        .iter()
        .filter_map(|(key, uri)| {
            let alias = key.strip_prefix("xmlns:")?;
            Some((alias.to_string(), uri.clone()))
        })
        .collect()
}

/// Parse an EPUB 3 `prefix` attribute: whitespace-separated `name: URI` pairs
fn parse_prefix_attr(value: &str) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    let mut tokens = value.split_whitespace();

    while let Some(token) = tokens.next() {
        let Some(name) = token.strip_suffix(':') else {
            continue;
        };
        if name.is_empty() || name.contains(':') {
            continue;
        }
        if let Some(uri) = tokens.next() {
            pairs.push((name.to_string(), uri.to_string()));
        }
    }

    pairs
}

/// Text of the first `dc:<local>` element; empty text counts as absent
fn first_text(ctx: &QueryContext, local: &str) -> Option<String> {
    let text = ctx.select_ns("dc", local).first()?.text();
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Split a `dc:subject` value on commas
fn split_tags(subject: &str) -> Vec<String> {
    subject
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Manifest href of the cover image
fn find_cover(ctx: &QueryContext) -> Option<&str> {
    if let Some(item) = ctx.first(r#"item[properties~="cover-image"]"#) {
        return item.attr("href");
    }

    let cover_id = ctx.first(r#"meta[name="cover"]"#)?.attr("content")?;
    ctx.select("item")
        .into_iter()
        .find(|item| item.attr("id") == Some(cover_id))?
        .attr("href")
}

/// Navigation document advertised by the manifest, preferring XHTML over NCX
fn find_toc_source(ctx: &QueryContext, package_path: &ArchivePath) -> Option<TocSource> {
    let nav = ctx
        .first(r#"item[properties~="nav"]"#)
        .and_then(|item| item.attr("href"));
    if let Some(href) = nav {
        return Some(TocSource::Xhtml(package_path.resolve(href)));
    }

    let ncx = ctx
        .first(&format!(r#"item[media-type="{NCX_MEDIA_TYPE}"]"#))
        .and_then(|item| item.attr("href"));
    if let Some(href) = ncx {
        return Some(TocSource::Ncx(package_path.resolve(href)));
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn opf(metadata: &str, manifest: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<package xmlns="http://www.idpf.org/2007/opf" version="3.0" unique-identifier="uid">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/">
{metadata}
  </metadata>
  <manifest>
{manifest}
  </manifest>
  <spine/>
</package>"#
        )
    }

    fn extract(metadata: &str, manifest: &str) -> Metadata {
        let path = ArchivePath::new("OEBPS/content.opf");
        Metadata::from_opf(&opf(metadata, manifest), &path).unwrap()
    }

    #[test]
    fn test_core_fields() {
        let meta = extract(
            r#"<dc:identifier id="isbn">urn:isbn:9780000000001</dc:identifier>
<dc:identifier id="uid">urn:uuid:1234</dc:identifier>
<dc:title>First Title</dc:title>
<dc:title>Second Title</dc:title>
<dc:language>en</dc:language>
<dc:creator>Ann Author</dc:creator>
<dc:creator>Bob Writer</dc:creator>
<dc:publisher>Pub House</dc:publisher>
<dc:source>Somewhere</dc:source>
<dc:description>A &lt;b&gt;book&lt;/b&gt;</dc:description>
<dc:date>2015-09-20</dc:date>"#,
            "",
        );

        assert_eq!(meta.identifiers, ["urn:isbn:9780000000001", "urn:uuid:1234"]);
        assert_eq!(meta.primary_identifier.as_deref(), Some("urn:uuid:1234"));
        assert_eq!(meta.title.as_deref(), Some("First Title"));
        assert_eq!(meta.language.as_deref(), Some("en"));
        assert_eq!(meta.creators, ["Ann Author", "Bob Writer"]);
        assert_eq!(meta.publisher.as_deref(), Some("Pub House"));
        assert_eq!(meta.source.as_deref(), Some("Somewhere"));
        assert_eq!(meta.description.as_deref(), Some("A <b>book</b>"));
        assert_eq!(
            meta.date.map(|d| d.to_rfc3339()).as_deref(),
            Some("2015-09-20T00:00:00+00:00")
        );
        assert_eq!(meta.toc_source, None);
    }

    #[test]
    fn test_absent_fields() {
        let meta = extract("<dc:title></dc:title>", "");
        assert_eq!(meta.title, None);
        assert!(meta.identifiers.is_empty());
        assert_eq!(meta.primary_identifier, None);
        assert!(meta.tags.is_empty());
    }

    #[test]
    fn test_unparseable_date_is_absent() {
        let meta = extract("<dc:date>not-a-date</dc:date>", "");
        assert_eq!(meta.date, None);
    }

    #[test]
    fn test_tags() {
        assert!(extract("<dc:subject></dc:subject>", "").tags.is_empty());
        assert_eq!(extract("<dc:subject>a, b</dc:subject>", "").tags, ["a", "b"]);
        assert_eq!(
            extract("<dc:subject>x,y</dc:subject><dc:subject>y, z</dc:subject>", "").tags,
            ["x", "y", "z"]
        );
    }

    #[test]
    fn test_empty_entries_keep_their_place() {
        let meta = extract(
            r#"<dc:identifier>urn:a</dc:identifier>
<dc:identifier> </dc:identifier>
<dc:creator></dc:creator>
<dc:creator>Bob Writer</dc:creator>"#,
            "",
        );
        assert_eq!(meta.identifiers, ["urn:a", ""]);
        assert_eq!(meta.creators, ["", "Bob Writer"]);
    }

    #[test]
    fn test_two_aliases_for_dublin_core() {
        let xml = r#"<package xmlns="http://www.idpf.org/2007/opf" version="3.0">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcx="http://purl.org/dc/elements/1.1/">
    <dcx:title>Only Title</dcx:title>
    <dc:subject>one</dc:subject>
    <dcx:subject>two, one</dcx:subject>
    <dc:description>Caf&eacute; &amp; bar</dc:description>
  </metadata>
  <manifest/>
</package>"#;
        let meta = Metadata::from_opf(xml, &ArchivePath::new("content.opf")).unwrap();

        assert_eq!(meta.title.as_deref(), Some("Only Title"));
        assert_eq!(meta.tags, ["one", "two"]);
        assert_eq!(meta.description.as_deref(), Some("Café & bar"));
    }

    #[test]
    fn test_custom_prefix_declarations() {
        let xml = r#"<package xmlns="http://www.idpf.org/2007/opf" version="3.0"
    prefix="cal: https://calibre-ebook.com  terms: http://purl.org/dc/terms/">
  <metadata xmlns:purl="http://purl.org/dc/elements/1.1/">
    <purl:title>Aliased Title</purl:title>
    <meta property="terms:modified">2021-02-03T04:05:06Z</meta>
    <meta property="cal:title_sort" content="Title, Aliased"/>
    <meta property="cal:unknown_thing" content="ignored"/>
  </metadata>
  <manifest/>
</package>"#;
        let meta = Metadata::from_opf(xml, &ArchivePath::new("content.opf")).unwrap();

        assert_eq!(meta.title.as_deref(), Some("Aliased Title"));
        assert_eq!(
            meta.modified.map(|d| d.to_rfc3339()).as_deref(),
            Some("2021-02-03T04:05:06+00:00")
        );
        assert_eq!(meta.title_sort.as_deref(), Some("Title, Aliased"));
    }

    #[test]
    fn test_calibre_opf2_metadata() {
        let meta = extract(
            r#"<meta name="calibre:timestamp" content="2019-01-02T03:04:05+00:00"/>
<meta name="calibre:series" content="Saga"/>
<meta name="calibre:series_index" content="3"/>
<meta name="calibre:user_metadata:#words" content="{&quot;#value#&quot;: 4200}"/>
<meta name="calibre:user_metadata:#status" content="{&quot;#value#&quot;: &quot;Complete&quot;}"/>
<meta name="calibre:user_metadata:#authorurl" content="{&quot;#value#&quot;: &quot;https://example.com/a&quot;}"/>
<meta name="calibre:user_metadata:#fandom" content="{&quot;#value#&quot;: &quot;Original Work&quot;}"/>
<meta name="calibre:user_metadata:#updated" content="{&quot;#value#&quot;: &quot;2019-05-06T00:00:00+00:00&quot;}"/>"#,
            "",
        );

        assert!(meta.timestamp.is_some());
        assert_eq!(meta.series.as_deref(), Some("Saga"));
        assert_eq!(meta.series_index, Some(3.0));
        assert_eq!(meta.words, Some(4200));
        assert_eq!(meta.status.as_deref(), Some("Complete"));
        assert_eq!(meta.authorurl.as_deref(), Some("https://example.com/a"));
        assert_eq!(meta.fandom.as_deref(), Some("Original Work"));
        assert_eq!(
            meta.updated.map(|d| d.to_rfc3339()).as_deref(),
            Some("2019-05-06T00:00:00+00:00")
        );
    }

    #[test]
    fn test_prefers_xhtml_nav() {
        let meta = extract(
            "",
            r#"<item id="ncx" href="toc.ncx" media-type="application/x-dtbncx+xml"/>
<item id="nav" href="Text/nav.xhtml" media-type="application/xhtml+xml" properties="nav"/>"#,
        );
        assert_eq!(
            meta.toc_source,
            Some(TocSource::Xhtml(ArchivePath::new("OEBPS/Text/nav.xhtml")))
        );
    }

    #[test]
    fn test_falls_back_to_ncx() {
        let meta = extract(
            "",
            r#"<item id="ncx" href="toc.ncx" media-type="application/x-dtbncx+xml"/>"#,
        );
        assert_eq!(
            meta.toc_source,
            Some(TocSource::Ncx(ArchivePath::new("OEBPS/toc.ncx")))
        );
    }

    #[test]
    fn test_cover() {
        let epub3 = extract(
            "",
            r#"<item id="c" href="images/cover.jpg" media-type="image/jpeg" properties="cover-image"/>"#,
        );
        assert_eq!(epub3.cover, Some(ArchivePath::new("OEBPS/images/cover.jpg")));

        let epub2 = extract(
            r#"<meta name="cover" content="cover-img"/>"#,
            r#"<item id="cover-img" href="cover.png" media-type="image/png"/>"#,
        );
        assert_eq!(epub2.cover, Some(ArchivePath::new("OEBPS/cover.png")));
    }

    #[test]
    fn test_parse_prefix_attr() {
        assert_eq!(
            parse_prefix_attr("foaf: http://xmlns.com/foaf/spec/\n  dbp: http://dbpedia.org/ontology/"),
            [
                ("foaf".to_string(), "http://xmlns.com/foaf/spec/".to_string()),
                ("dbp".to_string(), "http://dbpedia.org/ontology/".to_string()),
            ]
        );
        assert!(parse_prefix_attr("garbage").is_empty());
        assert!(parse_prefix_attr("dangling:").is_empty());
    }
}
