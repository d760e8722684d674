use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::{Position, Rect};
use unicode_width::UnicodeWidthChar;

use crate::app::{App, Message, Model};
use crate::editor::Direction;

use super::event_loop::ResizeDebouncer;
use super::model::{Focus, MenuAction};

const WHEEL_LINES: usize = 3;

impl App {
    pub(super) fn handle_event(
        &self,
        event: Event,
        model: &Model,
        now_ms: u64,
        resize_debouncer: &mut ResizeDebouncer,
    ) -> Option<Message> {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => handle_key(key, model),
            Event::Mouse(mouse) => handle_mouse(mouse, model),
            Event::Paste(text) => handle_paste(text, model),
            Event::Resize(w, h) => {
                tracing::trace!(width = w, height = h, "resize queued");
                resize_debouncer.queue(w, h, now_ms);
                None
            }
            _ => None,
        }
    }
}

/// Map a key press to a message. Overlays take the keyboard in priority
/// order: error dialog, picker, menu; then global shortcuts, then the
/// focused pane.
pub(super) fn handle_key(key: KeyEvent, model: &Model) -> Option<Message> {
    if model.error_dialog.is_some() {
        return match key.code {
            KeyCode::Enter | KeyCode::Esc => Some(Message::DismissError),
            _ => None,
        };
    }
    if model.picker.is_some() {
        return handle_picker_key(key);
    }
    if model.menu_open() {
        return handle_menu_key(key);
    }
    if let Some(msg) = handle_global_key(key) {
        return Some(msg);
    }
    match model.focus {
        Focus::Editor => handle_editor_key(key),
        Focus::Preview => handle_preview_key(key),
    }
}

fn handle_global_key(key: KeyEvent) -> Option<Message> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);
    match key.code {
        KeyCode::Char('q' | 'Q') if ctrl => Some(Message::Quit),
        KeyCode::Char('o' | 'O') if ctrl => Some(Message::Activate(MenuAction::Open)),
        KeyCode::Char('s' | 'S') if ctrl => Some(Message::Activate(MenuAction::Save)),
        KeyCode::Char('s' | 'S') if alt => Some(Message::Activate(MenuAction::SaveAs)),
        KeyCode::Char('f' | 'F') if alt => Some(Message::ToggleMenu),
        KeyCode::F(10) => Some(Message::ToggleMenu),
        KeyCode::Tab | KeyCode::BackTab => Some(Message::SwitchFocus),
        _ => None,
    }
}

fn handle_editor_key(key: KeyEvent) -> Option<Message> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);
    match key.code {
        KeyCode::Char(ch) if !ctrl && !alt => Some(Message::InsertChar(ch)),
        KeyCode::Enter => Some(Message::InsertNewline),
        KeyCode::Backspace => Some(Message::DeleteBack),
        KeyCode::Delete => Some(Message::DeleteForward),
        KeyCode::Left if ctrl => Some(Message::MoveWordLeft),
        KeyCode::Right if ctrl => Some(Message::MoveWordRight),
        KeyCode::Left => Some(Message::MoveCursor(Direction::Left)),
        KeyCode::Right => Some(Message::MoveCursor(Direction::Right)),
        KeyCode::Up => Some(Message::MoveCursor(Direction::Up)),
        KeyCode::Down => Some(Message::MoveCursor(Direction::Down)),
        KeyCode::Home if ctrl => Some(Message::MoveToStart),
        KeyCode::End if ctrl => Some(Message::MoveToEnd),
        KeyCode::Home => Some(Message::MoveHome),
        KeyCode::End => Some(Message::MoveEnd),
        KeyCode::PageUp => Some(Message::EditorPageUp),
        KeyCode::PageDown => Some(Message::EditorPageDown),
        _ => None,
    }
}

fn handle_preview_key(key: KeyEvent) -> Option<Message> {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => Some(Message::PreviewScrollUp(1)),
        KeyCode::Down | KeyCode::Char('j') => Some(Message::PreviewScrollDown(1)),
        KeyCode::PageUp | KeyCode::Char('b') => Some(Message::PreviewPageUp),
        KeyCode::PageDown | KeyCode::Char(' ') => Some(Message::PreviewPageDown),
        KeyCode::Home | KeyCode::Char('g') => Some(Message::PreviewTop),
        KeyCode::End | KeyCode::Char('G') => Some(Message::PreviewBottom),
        KeyCode::Esc => Some(Message::SetFocus(Focus::Editor)),
        _ => None,
    }
}

fn handle_menu_key(key: KeyEvent) -> Option<Message> {
    match key.code {
        KeyCode::Esc | KeyCode::F(10) => Some(Message::CloseMenu),
        KeyCode::Char('f' | 'F') if key.modifiers.contains(KeyModifiers::ALT) => {
            Some(Message::CloseMenu)
        }
        KeyCode::Up => Some(Message::MenuUp),
        KeyCode::Down | KeyCode::Tab => Some(Message::MenuDown),
        KeyCode::Enter => Some(Message::MenuSelect),
        KeyCode::Char('o' | 'O') => Some(Message::Activate(MenuAction::Open)),
        KeyCode::Char('s' | 'S') => Some(Message::Activate(MenuAction::Save)),
        KeyCode::Char('a' | 'A') => Some(Message::Activate(MenuAction::SaveAs)),
        KeyCode::Char('q' | 'Q') => Some(Message::Activate(MenuAction::Quit)),
        _ => None,
    }
}

fn handle_picker_key(key: KeyEvent) -> Option<Message> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc => Some(Message::PickerCancel),
        KeyCode::Enter => Some(Message::PickerAccept),
        KeyCode::Up => Some(Message::PickerUp),
        KeyCode::Down => Some(Message::PickerDown),
        KeyCode::Tab => Some(Message::PickerComplete),
        KeyCode::Backspace => Some(Message::PickerBackspace),
        KeyCode::Char('c') if ctrl => Some(Message::PickerCancel),
        KeyCode::Char(ch) if !ctrl => Some(Message::PickerInput(ch.to_string())),
        _ => None,
    }
}

fn handle_paste(text: String, model: &Model) -> Option<Message> {
    if model.error_dialog.is_some() || model.menu_open() {
        return None;
    }
    if model.picker.is_some() {
        return Some(Message::PickerInput(text));
    }
    (model.focus == Focus::Editor).then_some(Message::Paste(text))
}

pub(super) fn handle_mouse(mouse: MouseEvent, model: &Model) -> Option<Message> {
    if model.overlay_active() {
        return None;
    }
    let pos = Position::new(mouse.column, mouse.row);
    let editor = model.editor_area();
    let preview = model.preview_area();
    let in_preview = preview.contains(pos);

    match mouse.kind {
        MouseEventKind::ScrollUp if in_preview => Some(Message::PreviewScrollUp(WHEEL_LINES)),
        MouseEventKind::ScrollDown if in_preview => Some(Message::PreviewScrollDown(WHEEL_LINES)),
        MouseEventKind::ScrollUp if editor.contains(pos) => {
            Some(Message::EditorScrollUp(WHEEL_LINES))
        }
        MouseEventKind::ScrollDown if editor.contains(pos) => {
            Some(Message::EditorScrollDown(WHEEL_LINES))
        }
        MouseEventKind::Down(MouseButton::Left) if in_preview => {
            Some(Message::SetFocus(Focus::Preview))
        }
        MouseEventKind::Down(MouseButton::Left) if editor.contains(pos) => {
            Some(editor_click(model, editor, pos))
        }
        _ => None,
    }
}

/// Translate a click inside the editor text area into a buffer position.
fn editor_click(model: &Model, editor: Rect, pos: Position) -> Message {
    let line = model.editor_viewport.offset() + usize::from(pos.y - editor.y);
    let gutter = crate::ui::gutter_width(model.session.buffer().line_count());
    let target_x = usize::from(pos.x.saturating_sub(editor.x + gutter));
    let text = model.session.buffer().line_at(line).unwrap_or_default();

    let mut col = model.editor_hscroll;
    let mut x = 0;
    for ch in text.chars().skip(model.editor_hscroll) {
        let w = ch.width().unwrap_or(0);
        if x + w > target_x {
            break;
        }
        x += w;
        col += 1;
    }
    Message::EditorClick { line, col }
}
