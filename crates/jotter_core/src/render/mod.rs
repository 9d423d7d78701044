//! Markup rendering seam.
//!
//! # Responsibility
//! - Define the contract the note pipeline consumes to turn note source
//!   text into display markup.
//!
//! # Invariants
//! - Rendering is pure and total: no I/O, no error case, same input gives
//!   same output.
//! - Rendered output is never persisted or cached by core.

pub mod markdown;

pub use markdown::MarkdownRenderer;

/// Converts note source text into display markup.
pub trait MarkupRenderer {
    fn render(&self, source: &str) -> String;
}

impl<T: MarkupRenderer + ?Sized> MarkupRenderer for &T {
    fn render(&self, source: &str) -> String {
        (**self).render(source)
    }
}
