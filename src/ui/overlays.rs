use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph, Wrap};

use crate::app::Model;

const MENU_WIDTH: u16 = 26;

/// Where the File menu drops down: under the title bar, at the left edge.
pub fn menu_rect(area: Rect, items_len: usize) -> Rect {
    // The menu has a handful of items
    #[allow(clippy::cast_possible_truncation)]
    let height = items_len as u16 + 2;
    Rect::new(
        area.x,
        area.y.saturating_add(1),
        MENU_WIDTH.min(area.width),
        height.min(area.height.saturating_sub(1)),
    )
}

pub fn render_menu_overlay(model: &Model, frame: &mut Frame, area: Rect) {
    let items = model.menu_items();
    let popup = menu_rect(area, items.len());
    let inner_width = popup.width.saturating_sub(2) as usize;

    let lines: Vec<Line> = items
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            let pad = inner_width.saturating_sub(item.label.len() + item.shortcut.len() + 2);
            let text = format!(" {}{}{} ", item.label, " ".repeat(pad), item.shortcut);
            let mut style = if item.enabled {
                Style::default()
            } else {
                Style::default().fg(Color::DarkGray)
            };
            if model.menu_selected == Some(idx) {
                style = style.add_modifier(Modifier::REVERSED);
            }
            Line::styled(text, style)
        })
        .collect();

    let block = Block::default()
        .title("File")
        .borders(Borders::ALL)
        .style(Style::default().bg(Color::Black).fg(Color::White));
    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

pub fn picker_rect(area: Rect) -> Rect {
    let width = area.width.saturating_sub(8).clamp(40, 90);
    let height = area.height.saturating_sub(4).clamp(8, 24);
    centered_popup_rect(width, height, area)
}

pub fn render_picker_overlay(model: &Model, frame: &mut Frame, area: Rect) {
    let Some(picker) = &model.picker else {
        return;
    };
    let popup = picker_rect(area);

    let block = Block::default()
        .title(picker.purpose.title())
        .borders(Borders::ALL)
        .padding(Padding::horizontal(1))
        .style(Style::default().bg(Color::Black).fg(Color::White));
    let inner = block.inner(popup);
    frame.render_widget(Clear, popup);
    frame.render_widget(block, popup);

    let dim_style = Style::default().fg(Color::Indexed(245));

    // Input line, then the listing, then a hint at the bottom
    let input_area = Rect::new(inner.x, inner.y, inner.width, inner.height.min(1));
    let input = Line::from(vec![
        Span::styled("> ", Style::default().fg(Color::Yellow)),
        Span::raw(tail_to_width(&picker.input, inner.width.saturating_sub(3) as usize)),
        Span::styled(" ", Style::default().bg(Color::White)),
    ]);
    frame.render_widget(Paragraph::new(input), input_area);

    let list_height = inner.height.saturating_sub(3);
    let list_area = Rect::new(inner.x, inner.y + 2, inner.width, list_height);
    let entries = picker.visible_entries();
    let rows = list_height as usize;
    let start = picker
        .selected()
        .map_or(0, |idx| (idx + 1).saturating_sub(rows));

    let lines: Vec<Line> = if entries.is_empty() {
        vec![Line::styled("(no markdown files here)", dim_style)]
    } else {
        entries
            .iter()
            .enumerate()
            .skip(start)
            .take(rows)
            .map(|(idx, entry)| {
                let marker = if picker.selected() == Some(idx) {
                    ">"
                } else {
                    " "
                };
                let name = if entry.is_dir && entry.name != ".." {
                    format!("{}/", entry.name)
                } else {
                    entry.name.clone()
                };
                let style = if entry.is_dir {
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                let style = if picker.selected() == Some(idx) {
                    style.reversed()
                } else {
                    style
                };
                Line::styled(format!("{marker} {name}"), style)
            })
            .collect()
    };
    frame.render_widget(Paragraph::new(lines), list_area);

    let footer_area = Rect::new(
        inner.x,
        inner.y + inner.height.saturating_sub(1),
        inner.width,
        inner.height.min(1),
    );
    let footer = Line::styled(
        "Enter choose \u{2502} Tab complete \u{2502} Esc cancel",
        dim_style,
    );
    frame.render_widget(Paragraph::new(footer), footer_area);
}

pub fn render_error_overlay(model: &Model, frame: &mut Frame, area: Rect) {
    let Some(dialog) = &model.error_dialog else {
        return;
    };
    let width = area.width.saturating_sub(16).clamp(30, 70);
    let text_width = width.saturating_sub(4).max(1) as usize;
    let wrapped_rows = dialog.message.chars().count().div_ceil(text_width);
    // Messages are a sentence or two
    #[allow(clippy::cast_possible_truncation)]
    let height = (wrapped_rows as u16).saturating_add(6);
    let popup = centered_popup_rect(width, height, area);

    let lines = vec![
        Line::raw(dialog.message.clone()),
        Line::raw(""),
        Line::styled(
            "[ OK ]  Enter or Esc",
            Style::default().add_modifier(Modifier::BOLD),
        ),
    ];
    let block = Block::default()
        .title(dialog.title.clone())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .padding(Padding::uniform(1))
        .style(Style::default().bg(Color::Black).fg(Color::White));
    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false }),
        popup,
    );
}

/// Keep the end of `text` visible in `width` columns; the cursor sits there.
fn tail_to_width(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count <= width {
        return text.to_string();
    }
    let mut tail: String = text.chars().skip(count - width.saturating_sub(1)).collect();
    tail.insert(0, '\u{2026}');
    tail
}

fn centered_popup_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w) / 2);
    let y = area.y + (area.height.saturating_sub(h) / 2);
    Rect::new(x, y, w, h)
}
