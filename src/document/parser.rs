//! Markdown rendering with comrak.

use comrak::nodes::{AstNode, ListDelimType, ListType, NodeValue, TableAlignment};
use comrak::{Arena, Options, parse_document};
use unicode_width::UnicodeWidthStr;

use super::types::{Document, HeadingRef, InlineSpan, InlineStyle, LineType, RenderedLine};

/// Width used when no layout width is known yet.
pub const DEFAULT_WRAP_WIDTH: u16 = 80;

impl Document {
    /// Render markdown source with the default wrap width.
    ///
    /// # Example
    ///
    /// ```
    /// use markpad::document::Document;
    ///
    /// let doc = Document::parse("# Hello\n\nWorld");
    /// assert_eq!(doc.headings().len(), 1);
    /// ```
    pub fn parse(source: &str) -> Self {
        parse_with_layout(source, DEFAULT_WRAP_WIDTH)
    }

    /// Render markdown source, wrapping paragraphs to `width` columns.
    pub fn parse_with_layout(source: &str, width: u16) -> Self {
        parse_with_layout(source, width)
    }
}

/// Render markdown source into a Document.
pub fn parse(source: &str) -> Document {
    parse_with_layout(source, DEFAULT_WRAP_WIDTH)
}

/// Render markdown source into a Document with layout and wrapping.
///
/// Rendering is total: any input, including malformed markdown, produces
/// a document.
pub fn parse_with_layout(source: &str, width: u16) -> Document {
    let arena = Arena::new();
    let options = create_options();
    let root = parse_document(&arena, source, &options);

    let mut sink = LineSink::new(usize::from(width.max(1)));
    process_node(root, &mut sink, 0);
    trim_trailing_empty_lines(&mut sink.lines);

    Document::from_parts(sink.lines, sink.headings)
}

fn create_options() -> Options {
    let mut options = Options::default();

    // Enable GFM extensions
    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;
    options.extension.footnotes = true;

    options
}

/// Accumulates rendered lines for one block container.
struct LineSink {
    lines: Vec<RenderedLine>,
    headings: Vec<HeadingRef>,
    wrap_width: usize,
}

impl LineSink {
    const fn new(wrap_width: usize) -> Self {
        Self {
            lines: Vec::new(),
            headings: Vec::new(),
            wrap_width,
        }
    }

    fn push(&mut self, content: String, line_type: LineType) {
        self.lines.push(RenderedLine::new(content, line_type));
    }

    fn push_empty(&mut self) {
        self.push(String::new(), LineType::Empty);
    }

    fn push_wrapped(
        &mut self,
        spans: &[InlineSpan],
        line_type: LineType,
        prefix_first: &str,
        prefix_next: &str,
    ) {
        for line_spans in wrap_spans(spans, self.wrap_width, prefix_first, prefix_next) {
            let content = spans_to_string(&line_spans);
            self.lines
                .push(RenderedLine::with_spans(content, line_type, line_spans));
        }
    }

    /// Render `node` into a nested sink narrowed by `prefix`, then copy its
    /// lines back with the prefix applied.
    fn push_nested<'a>(
        &mut self,
        node: &'a AstNode<'a>,
        depth: usize,
        prefix: &str,
        line_type: Option<LineType>,
    ) {
        let prefix_width = prefix.width();
        let mut nested = Self::new(self.wrap_width.saturating_sub(prefix_width).max(1));
        process_node(node, &mut nested, depth);
        trim_trailing_empty_lines(&mut nested.lines);

        let offset = self.lines.len();
        for heading in nested.headings {
            self.headings.push(HeadingRef {
                line: heading.line + offset,
                ..heading
            });
        }
        for line in nested.lines {
            let line_type = line_type.unwrap_or(*line.line_type());
            let mut spans = vec![InlineSpan::new(prefix.to_string(), InlineStyle::default())];
            match line.spans() {
                Some(inner) => spans.extend_from_slice(inner),
                None => spans.push(InlineSpan::new(
                    line.content().to_string(),
                    InlineStyle::default(),
                )),
            }
            let content = format!("{prefix}{}", line.content());
            self.lines
                .push(RenderedLine::with_spans(content, line_type, spans));
        }
    }
}

fn process_node<'a>(node: &'a AstNode<'a>, sink: &mut LineSink, depth: usize) {
    match &node.data.borrow().value {
        NodeValue::Heading(heading) => {
            if !sink.lines.is_empty() {
                ensure_trailing_empty_lines(&mut sink.lines, 1);
            }
            let line_type = LineType::Heading(heading.level);
            sink.headings.push(HeadingRef {
                level: heading.level,
                text: extract_text(node),
                line: sink.lines.len(),
            });
            let spans = collect_inline_spans(node);
            sink.push_wrapped(&spans, line_type, "", "");
            sink.push_empty();
        }

        NodeValue::Paragraph => {
            let spans = collect_inline_spans(node);
            sink.push_wrapped(&spans, LineType::Paragraph, "", "");
            sink.push_empty();
        }

        NodeValue::CodeBlock(code_block) => {
            let language = code_block
                .info
                .split_whitespace()
                .next()
                .filter(|s| !s.is_empty());
            render_code_block(&code_block.literal, language, sink);
            sink.push_empty();
        }

        NodeValue::HtmlBlock(html) => {
            for line in html.literal.lines() {
                sink.push(line.to_string(), LineType::Html);
            }
            sink.push_empty();
        }

        NodeValue::List(list) => {
            let start = list.start;
            let delimiter = match list.delimiter {
                ListDelimType::Paren => ')',
                ListDelimType::Period => '.',
            };
            let count = node.children().count();
            let number_width = (start + count.saturating_sub(1)).to_string().len();

            for (index, child) in node.children().enumerate() {
                let marker = match list.list_type {
                    ListType::Bullet => "• ".to_string(),
                    ListType::Ordered => {
                        format!("{:>number_width$}{delimiter} ", start + index)
                    }
                };
                render_item(child, sink, depth + 1, &marker);
            }
            if depth == 0 {
                sink.push_empty();
            }
        }

        NodeValue::Item(_) | NodeValue::TaskItem(_) => {
            render_item(node, sink, depth.max(1), "• ");
        }

        NodeValue::BlockQuote => {
            for (idx, child) in node.children().enumerate() {
                if idx > 0 {
                    sink.push("│".to_string(), LineType::BlockQuote);
                }
                sink.push_nested(child, depth, "│ ", Some(LineType::BlockQuote));
            }
            sink.push_empty();
        }

        NodeValue::ThematicBreak => {
            sink.push("─".repeat(sink.wrap_width), LineType::HorizontalRule);
            sink.push_empty();
        }

        NodeValue::Table(_) => {
            for row in render_table(node, sink.wrap_width) {
                sink.push(row, LineType::Table);
            }
            sink.push_empty();
        }

        NodeValue::FootnoteDefinition(def) => {
            sink.push(format!("[^{}]:", def.name), LineType::Paragraph);
            for child in node.children() {
                sink.push_nested(child, depth, "  ", None);
            }
            sink.push_empty();
        }

        _ => {
            for child in node.children() {
                process_node(child, sink, depth);
            }
        }
    }
}

fn render_item<'a>(node: &'a AstNode<'a>, sink: &mut LineSink, depth: usize, marker: &str) {
    let marker = match &node.data.borrow().value {
        NodeValue::TaskItem(Some(_)) => "[x] ".to_string(),
        NodeValue::TaskItem(None) => "[ ] ".to_string(),
        _ => marker.to_string(),
    };
    let indent = "  ".repeat(depth.saturating_sub(1));
    let prefix_first = format!("{indent}{marker}");
    let prefix_next = format!("{indent}{}", " ".repeat(marker.width()));
    let line_type = LineType::ListItem(depth);
    let mut rendered_any = false;

    for child in node.children() {
        let is_paragraph = matches!(child.data.borrow().value, NodeValue::Paragraph);
        let is_list = matches!(child.data.borrow().value, NodeValue::List(_));
        if is_paragraph {
            let spans = collect_inline_spans(child);
            let prefix = if rendered_any {
                &prefix_next
            } else {
                &prefix_first
            };
            sink.push_wrapped(&spans, line_type, prefix, &prefix_next);
        } else if is_list {
            process_node(child, sink, depth);
        } else {
            let prefix = if rendered_any {
                &prefix_next
            } else {
                &prefix_first
            };
            sink.push_nested(child, depth, prefix, Some(line_type));
        }
        rendered_any = true;
    }

    if !rendered_any {
        sink.push(prefix_first.trim_end().to_string(), line_type);
    }
}

fn render_code_block(literal: &str, language: Option<&str>, sink: &mut LineSink) {
    let max_inner = sink.wrap_width.saturating_sub(4).max(1);
    let content_width = literal
        .lines()
        .map(UnicodeWidthStr::width)
        .max()
        .unwrap_or(0)
        .min(max_inner);
    let label = format!(" {} ", language.unwrap_or("code"));
    let frame_inner = (content_width + 2).max(label.width());
    sink.push(
        format!("┌{label}{}┐", "─".repeat(frame_inner - label.width())),
        LineType::CodeBlock,
    );

    let code_style = InlineStyle {
        code: true,
        ..InlineStyle::default()
    };
    for raw_line in literal.lines() {
        let text = truncate_text(raw_line, content_width);
        let padding = " ".repeat(frame_inner.saturating_sub(text.width() + 1));
        let spans = vec![
            InlineSpan::new("│ ".to_string(), InlineStyle::default()),
            InlineSpan::new(text, code_style),
            InlineSpan::new(format!("{padding}│"), InlineStyle::default()),
        ];
        let content = spans_to_string(&spans);
        sink.lines
            .push(RenderedLine::with_spans(content, LineType::CodeBlock, spans));
    }

    sink.push(format!("└{}┘", "─".repeat(frame_inner)), LineType::CodeBlock);
}

fn render_table<'a>(table_node: &'a AstNode<'a>, wrap_width: usize) -> Vec<String> {
    let (alignments, rows, has_header) = collect_table_rows(table_node);
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    if columns == 0 {
        return Vec::new();
    }

    let mut widths = vec![1usize; columns];
    for row in &rows {
        for (idx, cell) in row.iter().enumerate() {
            widths[idx] = widths[idx].max(cell.width());
        }
    }
    // Shrink the widest column until the table fits.
    let chrome = columns * 3 + 1;
    while widths.iter().sum::<usize>() + chrome > wrap_width {
        let Some((idx, widest)) = widths.iter().copied().enumerate().max_by_key(|(_, w)| *w)
        else {
            break;
        };
        if widest <= 1 {
            break;
        }
        widths[idx] -= 1;
    }

    let mut out = vec![render_table_border(&widths, '┌', '┬', '┐')];
    for (row_idx, row) in rows.iter().enumerate() {
        out.push(render_table_row(row, &widths, &alignments));
        if row_idx == 0 && has_header && rows.len() > 1 {
            out.push(render_table_border(&widths, '├', '┼', '┤'));
        }
    }
    out.push(render_table_border(&widths, '└', '┴', '┘'));
    out
}

fn collect_table_rows<'a>(
    table_node: &'a AstNode<'a>,
) -> (Vec<TableAlignment>, Vec<Vec<String>>, bool) {
    let alignments = match &table_node.data.borrow().value {
        NodeValue::Table(table) => table.alignments.clone(),
        _ => Vec::new(),
    };
    let mut rows = Vec::new();
    let mut has_header = false;
    for row_node in table_node.children() {
        let is_header = matches!(row_node.data.borrow().value, NodeValue::TableRow(true));
        if !matches!(row_node.data.borrow().value, NodeValue::TableRow(_)) {
            continue;
        }
        has_header |= is_header;
        let cells = row_node
            .children()
            .filter(|cell| matches!(cell.data.borrow().value, NodeValue::TableCell))
            .map(|cell| extract_text(cell).trim().to_string())
            .collect();
        rows.push(cells);
    }
    (alignments, rows, has_header)
}

fn render_table_border(widths: &[usize], left: char, middle: char, right: char) -> String {
    let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
    format!("{left}{}{right}", segments.join(&middle.to_string()))
}

fn render_table_row(cells: &[String], widths: &[usize], alignments: &[TableAlignment]) -> String {
    let mut row = String::from("│");
    for (idx, width) in widths.iter().enumerate() {
        let cell = truncate_text(cells.get(idx).map_or("", String::as_str), *width);
        let gap = width.saturating_sub(cell.width());
        let (left, right) = match alignments.get(idx) {
            Some(TableAlignment::Right) => (gap, 0),
            Some(TableAlignment::Center) => (gap / 2, gap - gap / 2),
            _ => (0, gap),
        };
        row.push(' ');
        row.push_str(&" ".repeat(left));
        row.push_str(&cell);
        row.push_str(&" ".repeat(right));
        row.push_str(" │");
    }
    row
}

fn truncate_text(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    let mut out = String::new();
    for ch in text.chars() {
        let next = format!("{out}{ch}");
        if next.width() + 1 > max_width {
            break;
        }
        out = next;
    }
    if max_width > 0 {
        out.push('…');
    }
    out
}

fn ensure_trailing_empty_lines(lines: &mut Vec<RenderedLine>, count: usize) {
    let existing = lines
        .iter()
        .rev()
        .take_while(|line| *line.line_type() == LineType::Empty)
        .count();
    for _ in existing..count {
        lines.push(RenderedLine::new(String::new(), LineType::Empty));
    }
}

fn trim_trailing_empty_lines(lines: &mut Vec<RenderedLine>) {
    while lines
        .last()
        .is_some_and(|line| *line.line_type() == LineType::Empty)
    {
        lines.pop();
    }
}

fn extract_text<'a>(node: &'a AstNode<'a>) -> String {
    collect_inline_spans(node)
        .iter()
        .map(InlineSpan::text)
        .collect()
}

fn collect_inline_spans<'a>(node: &'a AstNode<'a>) -> Vec<InlineSpan> {
    let mut spans = Vec::new();
    for child in node.children() {
        collect_inline_spans_recursive(child, InlineStyle::default(), &mut spans);
    }
    spans
}

fn collect_inline_spans_recursive<'a>(
    node: &'a AstNode<'a>,
    style: InlineStyle,
    spans: &mut Vec<InlineSpan>,
) {
    let value = &node.data.borrow().value;
    let mut next = style;
    match value {
        NodeValue::List(_) | NodeValue::Item(_) | NodeValue::TaskItem(_) => return,
        NodeValue::Text(t) => {
            spans.push(InlineSpan::new(t.clone(), style));
            return;
        }
        NodeValue::Code(code) => {
            let code_style = InlineStyle {
                code: true,
                ..InlineStyle::default()
            };
            spans.push(InlineSpan::new(code.literal.clone(), code_style));
            return;
        }
        NodeValue::HtmlInline(html) => {
            spans.push(InlineSpan::new(html.clone(), style));
            return;
        }
        NodeValue::FootnoteReference(reference) => {
            spans.push(InlineSpan::new(format!("[^{}]", reference.name), style));
            return;
        }
        NodeValue::SoftBreak | NodeValue::LineBreak => {
            spans.push(InlineSpan::new(" ".to_string(), style));
            return;
        }
        NodeValue::Image(image) => {
            let alt = extract_text(node);
            let label = if alt.is_empty() { &image.url } else { &alt };
            spans.push(InlineSpan::new(format!("[image: {label}]"), style));
            return;
        }
        NodeValue::Emph => next.emphasis = true,
        NodeValue::Strong => next.strong = true,
        NodeValue::Strikethrough => next.strikethrough = true,
        NodeValue::Link(_) => next.link = true,
        _ => {}
    }
    for child in node.children() {
        collect_inline_spans_recursive(child, next, spans);
    }
}

fn wrap_spans(
    spans: &[InlineSpan],
    width: usize,
    prefix_first: &str,
    prefix_next: &str,
) -> Vec<Vec<InlineSpan>> {
    let mut tokens: Vec<InlineSpan> = Vec::new();
    for span in spans {
        tokens.extend(split_inline_tokens(span));
    }

    let mut lines: Vec<Vec<InlineSpan>> = Vec::new();
    let mut current: Vec<InlineSpan> = Vec::new();
    let mut current_len = 0usize;
    let mut has_word = false;

    let start_new_line = |prefix: &str,
                          current: &mut Vec<InlineSpan>,
                          current_len: &mut usize,
                          has_word: &mut bool| {
        current.clear();
        if prefix.is_empty() {
            *current_len = 0;
        } else {
            current.push(InlineSpan::new(prefix.to_string(), InlineStyle::default()));
            *current_len = prefix.width();
        }
        *has_word = false;
    };

    start_new_line(prefix_first, &mut current, &mut current_len, &mut has_word);
    let mut kept = usize::from(!prefix_first.is_empty());

    for token in tokens {
        let token_len = token.text().width();
        let token_is_ws = token.text().chars().all(char::is_whitespace);

        if current_len + token_len > width && has_word {
            trim_trailing_whitespace(&mut current, kept);
            lines.push(std::mem::take(&mut current));
            start_new_line(prefix_next, &mut current, &mut current_len, &mut has_word);
            kept = usize::from(!prefix_next.is_empty());
        }

        if token_is_ws && !has_word {
            // Drop leading whitespace at wrapped line starts.
            continue;
        }

        current_len += token_len;
        current.push(token);
        has_word = true;
    }

    trim_trailing_whitespace(&mut current, kept);
    lines.push(current);
    lines
}

/// Pop whitespace-only spans, never removing the first `kept` (prefix) spans.
fn trim_trailing_whitespace(line: &mut Vec<InlineSpan>, kept: usize) {
    while line.len() > kept
        && line
            .last()
            .is_some_and(|span| span.text().chars().all(char::is_whitespace))
    {
        line.pop();
    }
}

fn split_inline_tokens(span: &InlineSpan) -> Vec<InlineSpan> {
    let mut out = Vec::new();
    let mut buf = String::new();
    let mut ws_state: Option<bool> = None;

    for ch in span.text().chars() {
        let is_ws = ch.is_whitespace();
        match ws_state {
            Some(state) if state == is_ws => buf.push(ch),
            Some(_) => {
                out.push(InlineSpan::new(std::mem::take(&mut buf), span.style()));
                buf.push(ch);
                ws_state = Some(is_ws);
            }
            None => {
                buf.push(ch);
                ws_state = Some(is_ws);
            }
        }
    }

    if !buf.is_empty() {
        out.push(InlineSpan::new(buf, span.style()));
    }

    out
}

fn spans_to_string(spans: &[InlineSpan]) -> String {
    spans.iter().map(InlineSpan::text).collect()
}
