//! Parsed document records and title extraction.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// Title used when a document has no level-one heading.
pub const UNTITLED: &str = "Untitled";

/// First line starting with a single `#` followed by whitespace.
static TITLE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^#\s+(.+)").unwrap());

/// A single post loaded from the content directory.
///
/// Documents are immutable once loaded. A reload replaces the whole set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Document {
    /// File name without the `.md` extension. Unique within a directory.
    pub slug: String,
    /// Text of the first level-one heading, or [`UNTITLED`].
    pub title: String,
    /// Rendered HTML body. Trusted, not sanitized.
    pub html: String,
}

impl Document {
    /// Build a document from its slug, raw markdown and rendered HTML.
    #[must_use]
    pub fn new(slug: impl Into<String>, raw: &str, html: String) -> Self {
        Self {
            slug: slug.into(),
            title: extract_title(raw).unwrap_or(UNTITLED).to_owned(),
            html,
        }
    }
}

/// Extract the text after the first `# ` heading marker in `raw`.
///
/// Only the first match counts. `##` and deeper headings are ignored.
#[must_use]
pub fn extract_title(raw: &str) -> Option<&str> {
    TITLE_RE
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim_end_matches('\r'))
}
