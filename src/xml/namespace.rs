//! XML namespaces used in EPUB packages

/// OPF package namespace
pub const OPF: &str = "http://www.idpf.org/2007/opf";
/// Dublin Core elements namespace
pub const DC: &str = "http://purl.org/dc/elements/1.1/";
/// Dublin Core Terms namespace
pub const DCTERMS: &str = "http://purl.org/dc/terms/";
/// Calibre metadata extension namespace
pub const CALIBRE: &str = "https://calibre-ebook.com";
/// OCF container namespace
pub const CONTAINER: &str = "urn:oasis:names:tc:opendocument:xmlns:container";
/// Friend-of-a-friend namespace
pub const FOAF: &str = "http://xmlns.com/foaf/spec/";
/// MARC relator codes
pub const MARC: &str = "https://www.loc.gov/marc/relators/relacode.html";
/// Namespace-declaration namespace
pub const XMLNS: &str = "http://www.w3.org/2000/xmlns/";

/// Well-known namespace URIs and the canonical prefix assigned to each.
pub const REGISTRY: &[(&str, &str)] = &[
    (OPF, "opf"),
    (DC, "dc"),
    (DCTERMS, "dcterms"),
    (CALIBRE, "calibre"),
    (CONTAINER, "oasis"),
    (FOAF, "foaf"),
    (XMLNS, "xmlns"),
    (MARC, "marc"),
];

/// Canonical prefix for a namespace URI, if the URI is a known one.
pub fn canonical_prefix(uri: &str) -> Option<&'static str> {
    REGISTRY
        .iter()
        .find(|(known, _)| *known == uri)
        .map(|(_, prefix)| *prefix)
}

/// All canonical prefixes, in registry order.
pub fn canonical_prefixes() -> impl Iterator<Item = &'static str> {
    REGISTRY.iter().map(|(_, prefix)| *prefix)
}
