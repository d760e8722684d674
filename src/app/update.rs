use crate::app::Model;
use crate::editor::{Direction, EditorBuffer};
use crate::session::Location;

use super::model::{FileRequest, Focus, MenuAction, ToastLevel};
use super::picker::{PickerChoice, PickerPurpose};

/// All possible events and actions in the application.
///
/// These represent user input, system events, and internal actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // Editing
    InsertChar(char),
    InsertNewline,
    /// Insert pasted text at the cursor
    Paste(String),
    DeleteBack,
    DeleteForward,
    MoveCursor(Direction),
    MoveHome,
    MoveEnd,
    MoveWordLeft,
    MoveWordRight,
    MoveToStart,
    MoveToEnd,
    /// Move the cursor up one editor page
    EditorPageUp,
    /// Move the cursor down one editor page
    EditorPageDown,
    /// Scroll the editor without moving the cursor
    EditorScrollUp(usize),
    EditorScrollDown(usize),
    /// Place the cursor at a buffer position (mouse click)
    EditorClick { line: usize, col: usize },

    // Preview
    PreviewScrollUp(usize),
    PreviewScrollDown(usize),
    PreviewPageUp,
    PreviewPageDown,
    PreviewTop,
    PreviewBottom,

    // Focus
    /// Switch focus between editor and preview
    SwitchFocus,
    SetFocus(Focus),

    // File menu
    ToggleMenu,
    CloseMenu,
    MenuUp,
    MenuDown,
    /// Activate the highlighted menu item
    MenuSelect,
    /// Run a File menu action directly (shortcut or menu)
    Activate(MenuAction),

    // Picker
    PickerInput(String),
    PickerBackspace,
    PickerUp,
    PickerDown,
    PickerComplete,
    PickerAccept,
    PickerCancel,

    // Dialogs
    DismissError,

    // System
    Resize(u16, u16),
    Quit,
}

/// Pure function that computes the next state from the current state and
/// a message. File operations are only queued here; the side-effect layer
/// runs them against storage.
pub fn update(mut model: Model, msg: Message) -> Model {
    if !matches!(msg, Message::Quit | Message::Activate(MenuAction::Quit)) {
        model.quit_confirmed = false;
    }

    match msg {
        Message::InsertChar(ch) => edit(&mut model, |b| b.insert_char(ch)),
        Message::InsertNewline => edit(&mut model, EditorBuffer::split_line),
        Message::Paste(text) => edit(&mut model, |b| b.insert_str(&text)),
        Message::DeleteBack => edit(&mut model, |b| {
            b.delete_back();
        }),
        Message::DeleteForward => edit(&mut model, |b| {
            b.delete_forward();
        }),
        Message::MoveCursor(direction) => navigate(&mut model, |b| b.move_cursor(direction)),
        Message::MoveHome => navigate(&mut model, EditorBuffer::move_home),
        Message::MoveEnd => navigate(&mut model, EditorBuffer::move_end),
        Message::MoveWordLeft => navigate(&mut model, EditorBuffer::move_word_left),
        Message::MoveWordRight => navigate(&mut model, EditorBuffer::move_word_right),
        Message::MoveToStart => navigate(&mut model, EditorBuffer::move_to_start),
        Message::MoveToEnd => navigate(&mut model, EditorBuffer::move_to_end),
        Message::EditorPageUp => {
            let page = model.editor_viewport.page_len();
            navigate(&mut model, |b| {
                for _ in 0..page {
                    b.move_cursor(Direction::Up);
                }
            });
        }
        Message::EditorPageDown => {
            let page = model.editor_viewport.page_len();
            navigate(&mut model, |b| {
                for _ in 0..page {
                    b.move_cursor(Direction::Down);
                }
            });
        }
        Message::EditorScrollUp(n) => model.editor_viewport.scroll_up(n),
        Message::EditorScrollDown(n) => model.editor_viewport.scroll_down(n),
        Message::EditorClick { line, col } => {
            model.focus = Focus::Editor;
            navigate(&mut model, |b| b.move_to(line, col));
        }

        Message::PreviewScrollUp(n) => model.preview_viewport.scroll_up(n),
        Message::PreviewScrollDown(n) => model.preview_viewport.scroll_down(n),
        Message::PreviewPageUp => model.preview_viewport.page_up(),
        Message::PreviewPageDown => model.preview_viewport.page_down(),
        Message::PreviewTop => model.preview_viewport.go_to_top(),
        Message::PreviewBottom => model.preview_viewport.go_to_bottom(),

        Message::SwitchFocus => {
            model.focus = match model.focus {
                Focus::Editor => Focus::Preview,
                Focus::Preview => Focus::Editor,
            };
        }
        Message::SetFocus(focus) => model.focus = focus,

        Message::ToggleMenu => {
            model.menu_selected = if model.menu_open() { None } else { Some(0) };
        }
        Message::CloseMenu => model.menu_selected = None,
        Message::MenuUp => {
            let count = model.menu_items().len();
            model.menu_selected = model
                .menu_selected
                .map(|idx| (idx + count - 1) % count);
        }
        Message::MenuDown => {
            let count = model.menu_items().len();
            model.menu_selected = model.menu_selected.map(|idx| (idx + 1) % count);
        }
        Message::MenuSelect => {
            if let Some(item) = model
                .menu_selected
                .and_then(|idx| model.menu_items().get(idx).copied())
                .filter(|item| item.enabled)
            {
                model = update(model, Message::Activate(item.action));
            }
        }
        Message::Activate(action) => {
            model.menu_selected = None;
            activate(&mut model, action);
        }

        Message::PickerInput(text) => {
            if let Some(picker) = model.picker.as_mut() {
                picker.push_str(&text);
            }
        }
        Message::PickerBackspace => {
            if let Some(picker) = model.picker.as_mut() {
                picker.backspace();
            }
        }
        Message::PickerUp => {
            if let Some(picker) = model.picker.as_mut() {
                picker.select_prev();
            }
        }
        Message::PickerDown => {
            if let Some(picker) = model.picker.as_mut() {
                picker.select_next();
            }
        }
        Message::PickerComplete => {
            if let Some(picker) = model.picker.as_mut() {
                picker.complete();
            }
        }
        Message::PickerAccept => accept_picker(&mut model),
        Message::PickerCancel => {
            if model.picker.take().is_some() {
                tracing::debug!("picker cancelled");
            }
        }

        Message::DismissError => model.error_dialog = None,

        Message::Resize(width, height) => model.resize(width, height),

        Message::Quit => request_quit(&mut model),
    }

    model
}

fn edit(model: &mut Model, apply: impl FnOnce(&mut EditorBuffer)) {
    model.session.edit(&model.renderer, apply);
    model.sync_viewports();
    model.reveal_cursor();
}

fn navigate(model: &mut Model, apply: impl FnOnce(&mut EditorBuffer)) {
    model.session.navigate(apply);
    model.reveal_cursor();
}

fn activate(model: &mut Model, action: MenuAction) {
    match action {
        MenuAction::Open => model.open_picker(PickerPurpose::Open),
        MenuAction::SaveAs => model.open_picker(PickerPurpose::SaveAs),
        MenuAction::Save => {
            if model.session.can_direct_save() {
                model.pending_request = Some(FileRequest::Save);
            } else {
                model.show_toast(
                    ToastLevel::Info,
                    "No file yet. Use Save as (Alt+S) to choose one.",
                );
            }
        }
        MenuAction::Quit => request_quit(model),
    }
}

fn accept_picker(model: &mut Model) {
    let Some(picker) = model.picker.as_mut() else {
        return;
    };
    let purpose = picker.purpose;
    match picker.accept() {
        PickerChoice::Descended | PickerChoice::Nothing => {}
        PickerChoice::Location(target) => {
            model.picker = None;
            let location = Location::new(target);
            model.pending_request = Some(match purpose {
                PickerPurpose::Open => FileRequest::Load(location),
                PickerPurpose::SaveAs => FileRequest::SaveAs(location),
            });
        }
    }
}

fn request_quit(model: &mut Model) {
    if model.session.is_modified() && !model.quit_confirmed {
        model.quit_confirmed = true;
        model.show_toast(
            ToastLevel::Warning,
            "Unsaved changes. Press Ctrl+Q again to quit.",
        );
        return;
    }
    model.should_quit = true;
}
