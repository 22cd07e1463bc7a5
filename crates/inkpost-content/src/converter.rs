//! Markdown to HTML conversion.

use pulldown_cmark::{Options, Parser, html};

/// Converts raw markdown into an HTML fragment.
///
/// Implementations must be pure: the same input always yields the same output.
pub trait MarkupConverter: Send + Sync {
    /// Convert `markdown` to HTML.
    fn convert(&self, markdown: &str) -> String;
}

/// [`MarkupConverter`] backed by `pulldown-cmark` with GFM extensions.
#[derive(Clone, Debug)]
pub struct PulldownConverter {
    options: Options,
}

impl PulldownConverter {
    /// Create a converter with tables, strikethrough, task lists and footnotes.
    #[must_use]
    pub fn new() -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        options.insert(Options::ENABLE_FOOTNOTES);
        Self { options }
    }
}

impl Default for PulldownConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkupConverter for PulldownConverter {
    fn convert(&self, markdown: &str) -> String {
        let parser = Parser::new_ext(markdown, self.options);
        let mut output = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut output, parser);
        output
    }
}
