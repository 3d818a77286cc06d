//! Extraction options

/// Options controlling how an EPUB is read
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Fail with [`Error::NotEpub`](crate::Error::NotEpub) when the
    /// `mimetype` entry is present but wrong, instead of only logging it
    pub strict_mimetype: bool,
    /// Drop navigation entries labelled like front matter (`"i. Preface"`)
    pub skip_front_matter: bool,
    /// Strip a leading `"<number>. "` from navigation entry titles
    pub strip_chapter_numbers: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            strict_mimetype: false,
            skip_front_matter: true,
            strip_chapter_numbers: true,
        }
    }
}

impl ExtractOptions {
    /// Default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Set strict mimetype checking
    pub fn strict_mimetype(mut self, strict: bool) -> Self {
        self.strict_mimetype = strict;
        self
    }

    /// Set front-matter filtering
    pub fn skip_front_matter(mut self, skip: bool) -> Self {
        self.skip_front_matter = skip;
        self
    }

    /// Set chapter-number stripping
    pub fn strip_chapter_numbers(mut self, strip: bool) -> Self {
        self.strip_chapter_numbers = strip;
        self
    }
}
