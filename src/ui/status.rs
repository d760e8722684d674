use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::{Focus, Model, ToastLevel};

pub fn render_status_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let modified = if model.session.is_modified() {
        " [+]"
    } else {
        ""
    };
    let position = match model.focus {
        Focus::Editor => {
            let cursor = model.session.buffer().cursor();
            format!("Ln {}, Col {}", cursor.line + 1, cursor.col + 1)
        }
        Focus::Preview => format!("Preview {}%", model.preview_viewport.scroll_percent()),
    };
    let save_hint = if model.session.can_direct_save() {
        "^S:save"
    } else {
        "Alt+S:save as"
    };

    let status = format!(
        " {}{}  {}  F10:menu  Tab:focus  {}  ^Q:quit",
        model.document_name(),
        modified,
        position,
        save_hint
    );

    let status_bar =
        Paragraph::new(status).style(Style::default().bg(Color::DarkGray).fg(Color::White));

    frame.render_widget(status_bar, area);
}

pub fn render_toast_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let Some((message, level)) = model.active_toast() else {
        return;
    };
    let (prefix, style) = match level {
        ToastLevel::Info => (
            "[info]",
            Style::default().bg(Color::DarkGray).fg(Color::White),
        ),
        ToastLevel::Warning => (
            "[warn]",
            Style::default().bg(Color::Yellow).fg(Color::Black),
        ),
        ToastLevel::Error => ("[error]", Style::default().bg(Color::Red).fg(Color::White)),
    };
    let toast = Paragraph::new(format!("{prefix} {message}")).style(style);
    frame.render_widget(toast, area);
}
