//! Core document types.

/// A rendered markdown document, ready to be drawn in the preview pane.
///
/// Produced by a [`Renderer`](super::Renderer) from markdown source. Two
/// documents compare equal when they render the same lines, so the preview
/// can be checked against a fresh render of the buffer text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    /// Rendered lines for display
    lines: Vec<RenderedLine>,
    /// Heading references, in document order
    headings: Vec<HeadingRef>,
}

impl Document {
    /// Create an empty document.
    pub const fn empty() -> Self {
        Self {
            lines: Vec::new(),
            headings: Vec::new(),
        }
    }

    pub(crate) const fn from_parts(lines: Vec<RenderedLine>, headings: Vec<HeadingRef>) -> Self {
        Self { lines, headings }
    }

    /// Get the total number of rendered lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Get all headings.
    pub fn headings(&self) -> &[HeadingRef] {
        &self.headings
    }

    /// Get a window of lines starting at `offset`.
    pub fn visible_lines(&self, offset: usize, count: usize) -> &[RenderedLine] {
        let start = offset.min(self.lines.len());
        let end = start.saturating_add(count).min(self.lines.len());
        &self.lines[start..end]
    }

    /// Get a single line by index.
    pub fn line_at(&self, index: usize) -> Option<&RenderedLine> {
        self.lines.get(index)
    }

    /// The unstyled text of the document, one rendered line per text line.
    ///
    /// Trailing blank lines are dropped, so a lone paragraph `Hello`
    /// yields exactly `"Hello"`.
    pub fn plain_text(&self) -> String {
        let joined = self
            .lines
            .iter()
            .map(RenderedLine::content)
            .collect::<Vec<_>>()
            .join("\n");
        joined.trim_end().to_string()
    }
}

/// A single rendered line with styling information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLine {
    /// The text content of the line
    content: String,
    /// The type of line (for styling)
    line_type: LineType,
    /// Optional inline-styled spans for rendering
    spans: Vec<InlineSpan>,
}

impl RenderedLine {
    /// Create a new rendered line.
    pub const fn new(content: String, line_type: LineType) -> Self {
        Self {
            content,
            line_type,
            spans: Vec::new(),
        }
    }

    /// Create a new rendered line with inline spans.
    pub const fn with_spans(content: String, line_type: LineType, spans: Vec<InlineSpan>) -> Self {
        Self {
            content,
            line_type,
            spans,
        }
    }

    /// Get the text content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Get the line type.
    pub const fn line_type(&self) -> &LineType {
        &self.line_type
    }

    /// Get inline spans, if present.
    pub fn spans(&self) -> Option<&[InlineSpan]> {
        if self.spans.is_empty() {
            None
        } else {
            Some(&self.spans)
        }
    }
}

/// Inline style flags for a text span.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InlineStyle {
    pub emphasis: bool,
    pub strong: bool,
    pub code: bool,
    pub strikethrough: bool,
    pub link: bool,
}

/// A styled inline span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineSpan {
    text: String,
    style: InlineStyle,
}

impl InlineSpan {
    pub const fn new(text: String, style: InlineStyle) -> Self {
        Self { text, style }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub const fn style(&self) -> InlineStyle {
        self.style
    }
}

/// Type of a rendered line, used for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineType {
    /// Normal paragraph text
    Paragraph,
    /// Heading with level (1-6)
    Heading(u8),
    /// Code block line
    CodeBlock,
    /// Block quote line
    BlockQuote,
    /// List item with nesting level
    ListItem(usize),
    /// Table row
    Table,
    /// Horizontal rule
    HorizontalRule,
    /// Raw HTML passed through verbatim
    Html,
    /// Empty line
    Empty,
}

/// Reference to a heading in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingRef {
    /// Heading level (1-6)
    pub level: u8,
    /// Heading text (plain, no formatting)
    pub text: String,
    /// Line number in rendered document
    pub line: usize,
}
