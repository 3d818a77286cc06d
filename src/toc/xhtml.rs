//! EPUB 3 XHTML navigation document

use super::Chapter;
use crate::error::Result;
use crate::ocf::ArchivePath;
use crate::options::ExtractOptions;
use crate::xml::{decode_numeric_refs, QueryContext};

const TOC_ANCHORS: &str = r#"nav[epub\:type~="toc"] li a"#;

/// Chapters listed in the `toc` nav of a navigation document at `nav_path`
pub(super) fn parse(
    xml: &str,
    nav_path: &ArchivePath,
    options: &ExtractOptions,
) -> Result<Vec<Chapter>> {
    let ctx = QueryContext::parse(xml)?;
    let mut chapters = Vec::new();

    for anchor in ctx.select(TOC_ANCHORS) {
        let Some(href) = anchor.attr("href") else {
            continue;
        };
        let title = decode_numeric_refs(&anchor.text());
        let title = title.trim();

        if options.skip_front_matter && is_front_matter(title) {
            log::trace!("skipping front matter entry {title:?}");
            continue;
        }
        let title = if options.strip_chapter_numbers {
            strip_chapter_number(title)
        } else {
            title
        };

        let path = nav_path.resolve(href);
        log::trace!("chapter {title:?} -> {path}");
        chapters.push(Chapter::new(path, title));
    }

    Ok(chapters)
}

/// `"i. Preface"`, `"ⅱ. Foreword"`: a roman-numeral token, a period and a space
fn is_front_matter(title: &str) -> bool {
    let Some((token, rest)) = title.split_once('.') else {
        return false;
    };
    rest.starts_with(' ') && token.chars().all(is_roman_numeral)
}

fn is_roman_numeral(c: char) -> bool {
    matches!(c, 'i' | 'v' | 'x' | '\u{2170}'..='\u{217f}')
}

/// `"3. Chapter Three"` -> `"Chapter Three"`
fn strip_chapter_number(title: &str) -> &str {
    let digits = title.len() - title.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return title;
    }
    title[digits..].strip_prefix(". ").unwrap_or(title)
}
