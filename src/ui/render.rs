use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Padding, Paragraph};
use unicode_width::UnicodeWidthChar;

use crate::app::{Focus, Model};

use super::{overlays, status, style};

/// Screen regions, top to bottom: title bar, the two panes, status bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenLayout {
    pub title: Rect,
    pub editor: Rect,
    pub preview: Rect,
    pub status: Rect,
}

pub fn screen_layout(area: Rect, split_percent: u16) -> ScreenLayout {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);
    let split = split_percent.min(100);
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(split),
            Constraint::Percentage(100 - split),
        ])
        .split(rows[1]);
    ScreenLayout {
        title: rows[0],
        editor: columns[0],
        preview: columns[1],
        status: rows[2],
    }
}

fn editor_block(focused: bool) -> Block<'static> {
    pane_block(" Editor ", focused)
}

fn preview_block(focused: bool) -> Block<'static> {
    pane_block(" Preview ", focused).padding(Padding::left(1))
}

fn pane_block(title: &'static str, focused: bool) -> Block<'static> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        })
}

/// Area inside the editor pane border (gutter included).
pub fn editor_text_area(pane: Rect) -> Rect {
    editor_block(false).inner(pane)
}

/// Area the preview is rendered and wrapped into.
pub fn preview_text_area(pane: Rect) -> Rect {
    preview_block(false).inner(pane)
}

/// Calculate the width needed for line numbers.
pub const fn line_number_width(total_lines: usize) -> u16 {
    if total_lines < 10 {
        1
    } else if total_lines < 100 {
        2
    } else if total_lines < 1_000 {
        3
    } else if total_lines < 10_000 {
        4
    } else if total_lines < 100_000 {
        5
    } else {
        6
    }
}

/// Line numbers plus one separating space.
pub const fn gutter_width(total_lines: usize) -> u16 {
    line_number_width(total_lines) + 1
}

/// Render the complete UI.
pub fn render(model: &Model, frame: &mut Frame) {
    let area = frame.area();
    let layout = screen_layout(area, model.split_percent);

    render_title_bar(model, frame, layout.title);
    render_editor(model, frame, layout.editor);
    render_preview(model, frame, layout.preview);

    if model.active_toast().is_some() {
        status::render_toast_bar(model, frame, layout.status);
    } else {
        status::render_status_bar(model, frame, layout.status);
    }

    if model.menu_open() {
        overlays::render_menu_overlay(model, frame, area);
    }
    if model.picker.is_some() {
        overlays::render_picker_overlay(model, frame, area);
    }
    if model.error_dialog.is_some() {
        overlays::render_error_overlay(model, frame, area);
    }
}

fn render_title_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let title = Paragraph::new(model.session.title().as_str())
        .alignment(Alignment::Center)
        .style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(title, area);
}

fn render_editor(model: &Model, frame: &mut Frame, pane: Rect) {
    let focused = model.focus == Focus::Editor;
    let block = editor_block(focused);
    let inner = block.inner(pane);
    frame.render_widget(block, pane);

    let buf = model.session.buffer();
    let gutter = gutter_width(buf.line_count());
    let text_width = inner.width.saturating_sub(gutter) as usize;
    let cursor = buf.cursor();
    let show_cursor = focused && !model.overlay_active();

    let content: Vec<Line> = model
        .editor_viewport
        .visible_range()
        .map(|line_idx| {
            let text = buf.line_at(line_idx).unwrap_or_default();
            let number = format!(
                "{:>width$} ",
                line_idx + 1,
                width = (gutter - 1) as usize
            );
            let mut spans = vec![Span::styled(number, Style::default().fg(Color::DarkGray))];
            let cursor_col = (show_cursor && line_idx == cursor.line)
                .then(|| cursor.col.saturating_sub(model.editor_hscroll));
            spans.extend(editor_line_spans(
                text.chars().skip(model.editor_hscroll),
                cursor_col,
                text_width,
            ));
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(content), inner);
}

/// Clip a line to `width` display columns, drawing the cursor cell at
/// `cursor_col` (a char offset) when given.
fn editor_line_spans(
    chars: impl Iterator<Item = char>,
    cursor_col: Option<usize>,
    width: usize,
) -> Vec<Span<'static>> {
    let cursor_style = Style::default().bg(Color::White).fg(Color::Black);
    let mut spans = Vec::new();
    let mut run = String::new();
    let mut used = 0;
    let mut drew_cursor = false;

    for (idx, ch) in chars.enumerate() {
        let shown = if ch.is_control() { ' ' } else { ch };
        let w = shown.width().unwrap_or(1);
        if used + w > width {
            break;
        }
        used += w;
        if cursor_col == Some(idx) {
            if !run.is_empty() {
                spans.push(Span::raw(std::mem::take(&mut run)));
            }
            spans.push(Span::styled(shown.to_string(), cursor_style));
            drew_cursor = true;
        } else {
            run.push(shown);
        }
    }
    if !run.is_empty() {
        spans.push(Span::raw(run));
    }
    if cursor_col.is_some() && !drew_cursor && used < width {
        spans.push(Span::styled(" ", cursor_style));
    }
    spans
}

fn render_preview(model: &Model, frame: &mut Frame, pane: Rect) {
    let block = preview_block(model.focus == Focus::Preview);
    let preview = model.session.preview();
    let visible = preview.visible_lines(
        model.preview_viewport.offset(),
        model.preview_viewport.height() as usize,
    );

    let content: Vec<Line> = visible
        .iter()
        .map(|line| {
            let line_style = style::style_for_line_type(line.line_type());
            line.spans().map_or_else(
                || Line::styled(line.content().to_string(), line_style),
                |spans| {
                    Line::from(
                        spans
                            .iter()
                            .map(|span| {
                                Span::styled(
                                    span.text().to_string(),
                                    style::style_for_inline(line_style, span.style()),
                                )
                            })
                            .collect::<Vec<_>>(),
                    )
                },
            )
        })
        .collect();

    frame.render_widget(Paragraph::new(content).block(block), pane);
}
