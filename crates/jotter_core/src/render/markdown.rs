//! CommonMark renderer backed by `pulldown-cmark`.

use super::MarkupRenderer;
use pulldown_cmark::{html, Options, Parser};

/// Markdown → HTML with the commonly used extensions switched on
/// (tables, strikethrough, footnotes, task lists, smart punctuation).
///
/// Raw HTML inside notes is passed through untouched; the single operator
/// is trusted.
#[derive(Debug, Clone, Copy)]
pub struct MarkdownRenderer {
    options: Options,
}

impl MarkdownRenderer {
    pub fn new() -> Self {
        Self::with_options(
            Options::ENABLE_TABLES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_FOOTNOTES
                | Options::ENABLE_TASKLISTS
                | Options::ENABLE_SMART_PUNCTUATION,
        )
    }

    /// Plain CommonMark is `Options::empty()`.
    pub fn with_options(options: Options) -> Self {
        Self { options }
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkupRenderer for MarkdownRenderer {
    fn render(&self, source: &str) -> String {
        let parser = Parser::new_ext(source, self.options);
        let mut output = String::with_capacity(source.len() * 3 / 2);
        html::push_html(&mut output, parser);
        output
    }
}
