//! Markdown document rendering.
//!
//! This module handles:
//! - Parsing markdown with comrak
//! - Rendering to styled, wrapped lines for the preview pane
//! - The [`Renderer`] seam the editor session renders through

mod parser;
mod types;

pub use parser::{DEFAULT_WRAP_WIDTH, parse, parse_with_layout};
pub use types::{Document, HeadingRef, InlineSpan, InlineStyle, LineType, RenderedLine};

/// Turns markdown source into a rendered [`Document`].
///
/// Rendering is total and synchronous; there is no failure path.
pub trait Renderer {
    fn render(&self, source: &str) -> Document;
}

/// Comrak-backed renderer that wraps paragraphs to the preview pane width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkdownRenderer {
    wrap_width: u16,
}

impl MarkdownRenderer {
    pub const fn new(wrap_width: u16) -> Self {
        Self {
            wrap_width: if wrap_width == 0 { 1 } else { wrap_width },
        }
    }

    pub const fn wrap_width(&self) -> u16 {
        self.wrap_width
    }

    /// Change the wrap width. Returns `true` when the width actually changed
    /// and the preview needs a re-render.
    pub const fn set_wrap_width(&mut self, width: u16) -> bool {
        let width = if width == 0 { 1 } else { width };
        if width == self.wrap_width {
            return false;
        }
        self.wrap_width = width;
        true
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_WRAP_WIDTH)
    }
}

impl Renderer for MarkdownRenderer {
    fn render(&self, source: &str) -> Document {
        let started = std::time::Instant::now();
        let doc = parse_with_layout(source, self.wrap_width);
        tracing::trace!(
            bytes = source.len(),
            lines = doc.line_count(),
            elapsed_us = started.elapsed().as_micros(),
            "rendered preview"
        );
        doc
    }
}

/// Returns true if `name` has a markdown extension (`.md`, any case).
///
/// Used to filter picker listings; save-as enforcement lives in
/// [`crate::session::has_markdown_extension`], which applies the same
/// rule to the full location string.
pub fn is_markdown_file_name(name: &str) -> bool {
    crate::session::has_markdown_extension(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renderer_matches_parse_with_layout() {
        let renderer = MarkdownRenderer::new(40);
        let source = "# Notes\n\nSome text that is long enough to wrap at forty columns.";
        assert_eq!(renderer.render(source), parse_with_layout(source, 40));
    }

    #[test]
    fn test_zero_width_is_clamped() {
        let renderer = MarkdownRenderer::new(0);
        assert_eq!(renderer.wrap_width(), 1);
        let _ = renderer.render("still renders");
    }

    #[test]
    fn test_set_wrap_width_reports_change() {
        let mut renderer = MarkdownRenderer::new(40);
        assert!(!renderer.set_wrap_width(40));
        assert!(renderer.set_wrap_width(60));
        assert_eq!(renderer.wrap_width(), 60);
    }

    #[test]
    fn test_markdown_file_name_filter() {
        assert!(is_markdown_file_name("README.md"));
        assert!(is_markdown_file_name("NOTES.MD"));
        assert!(!is_markdown_file_name("main.rs"));
        assert!(!is_markdown_file_name("md"));
    }
}
