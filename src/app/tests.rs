use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use tempfile::tempdir;

use crate::session::{
    EditorSession, Fault, Location, MemoryStorage, SessionState, TitlePolicy, WindowTitle,
};

use super::effects::{open_initial, run_file_request, sync_picker_listing};
use super::event_loop::ResizeDebouncer;
use super::input::{handle_key, handle_mouse};
use super::model::{FileRequest, Focus, MenuAction};
use super::{Message, Model, PickerPurpose, ToastLevel, update};

fn create_test_model() -> Model {
    Model::new(EditorSession::default(), (80, 24), 50).with_working_dir(PathBuf::from("docs"))
}

fn type_text(mut model: Model, text: &str) -> Model {
    for ch in text.chars() {
        model = if ch == '\n' {
            update(model, Message::InsertNewline)
        } else {
            update(model, Message::InsertChar(ch))
        };
    }
    model
}

/// Open the Save as picker, type `name` after the prefilled directory and
/// accept it.
fn save_as_via_picker(model: Model, name: &str) -> Model {
    let model = update(model, Message::Activate(MenuAction::SaveAs));
    let model = update(model, Message::PickerInput(name.to_string()));
    update(model, Message::PickerAccept)
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn ctrl(ch: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL)
}

#[test]
fn test_new_model_is_untitled_with_empty_preview() {
    let model = create_test_model();
    assert_eq!(model.session.state(), SessionState::Untitled);
    assert_eq!(model.session.text(), "");
    assert!(model.session.preview().is_empty());
    assert_eq!(model.session.title().as_str(), "Markdown");
    assert_eq!(model.focus, Focus::Editor);
}

#[test]
fn test_enter_after_pasted_carriage_return_keeps_cursor_in_text() {
    let model = update(create_test_model(), Message::Paste("\r".to_string()));
    let model = update(model, Message::InsertNewline);
    let model = update(model, Message::InsertChar('x'));
    let buffer = model.session.buffer();
    assert_eq!(model.session.text(), "\r\nx");
    assert_eq!(buffer.cursor().line, 1);
    assert_eq!(buffer.cursor().col, 1);
    assert!(buffer.cursor().line < buffer.line_count());
}

#[test]
fn test_typing_updates_preview_immediately() {
    let model = type_text(create_test_model(), "# Title\n\nHello *world*");
    assert_eq!(model.session.text(), "# Title\n\nHello *world*");
    assert_eq!(model.session.preview().plain_text(), "Title\n\nHello world");
    assert!(model.session.is_modified());
}

#[test]
fn test_delete_back_rerenders_preview() {
    let model = type_text(create_test_model(), "Hi!");
    let model = update(model, Message::DeleteBack);
    assert_eq!(model.session.text(), "Hi");
    assert_eq!(model.session.preview().plain_text(), "Hi");
}

#[test]
fn test_paste_inserts_text_verbatim() {
    let model = update(create_test_model(), Message::Paste("a\r\nb".to_string()));
    assert_eq!(model.session.text(), "a\r\nb");
    assert_eq!(model.session.buffer().cursor().line, 1);
}

#[test]
fn test_cursor_movement_keeps_preview() {
    let model = type_text(create_test_model(), "abc");
    let before = model.session.preview().clone();
    let model = update(model, Message::MoveHome);
    assert_eq!(model.session.buffer().cursor().col, 0);
    assert_eq!(model.session.preview(), &before);
}

#[test]
fn test_editor_scrolls_to_follow_cursor() {
    let mut model = create_test_model();
    let height = model.editor_viewport.height() as usize;
    model = type_text(model, &"line\n".repeat(height + 5));
    let cursor_line = model.session.buffer().cursor().line;
    assert!(model.editor_viewport.visible_range().contains(&cursor_line));
    assert!(model.editor_viewport.offset() > 0);

    let model = update(model, Message::MoveToStart);
    assert_eq!(model.editor_viewport.offset(), 0);
}

#[test]
fn test_editor_scrolls_horizontally_for_long_lines() {
    let model = type_text(create_test_model(), &"x".repeat(120));
    let columns = model.editor_text_columns();
    assert!(model.editor_hscroll > 0);
    assert!(model.session.buffer().cursor().col < model.editor_hscroll + columns);

    let model = update(model, Message::MoveHome);
    assert_eq!(model.editor_hscroll, 0);
}

#[test]
fn test_editor_page_down_moves_cursor() {
    let model = type_text(create_test_model(), &"l\n".repeat(60));
    let model = update(model, Message::MoveToStart);
    let page = model.editor_viewport.page_len();
    let model = update(model, Message::EditorPageDown);
    assert_eq!(model.session.buffer().cursor().line, page);
}

#[test]
fn test_switch_focus_toggles() {
    let model = update(create_test_model(), Message::SwitchFocus);
    assert_eq!(model.focus, Focus::Preview);
    let model = update(model, Message::SwitchFocus);
    assert_eq!(model.focus, Focus::Editor);
}

#[test]
fn test_preview_scrolls_and_clamps() {
    let mut text = String::new();
    for i in 1..=60 {
        text.push_str(&format!("Paragraph {i}\n\n"));
    }
    let model = update(create_test_model(), Message::Paste(text));
    let model = update(model, Message::PreviewScrollDown(5));
    assert_eq!(model.preview_viewport.offset(), 5);
    let model = update(model, Message::PreviewBottom);
    let total = model.session.preview().line_count();
    assert_eq!(
        model.preview_viewport.visible_range().end,
        total,
        "bottom shows the last line"
    );
    let model = update(model, Message::PreviewTop);
    assert_eq!(model.preview_viewport.offset(), 0);
}

#[test]
fn test_resize_rewraps_preview_to_pane_width() {
    let long = "word ".repeat(40);
    let model = update(create_test_model(), Message::Paste(long));
    let wide_lines = model.session.preview().line_count();

    let model = update(model, Message::Resize(50, 24));
    assert_eq!(model.renderer.wrap_width(), model.preview_area().width);
    assert!(model.session.preview().line_count() > wide_lines);
    assert!(
        model
            .session
            .preview()
            .visible_lines(0, 100)
            .iter()
            .all(|line| line.content().chars().count() <= model.preview_area().width as usize)
    );
}

#[test]
fn test_menu_save_disabled_while_untitled() {
    let model = create_test_model();
    let save = model.menu_items()[1];
    assert_eq!(save.action, MenuAction::Save);
    assert!(!save.enabled);
}

#[test]
fn test_menu_navigation_wraps() {
    let model = update(create_test_model(), Message::ToggleMenu);
    assert_eq!(model.menu_selected, Some(0));
    let model = update(model, Message::MenuUp);
    assert_eq!(model.menu_selected, Some(3));
    let model = update(model, Message::MenuDown);
    assert_eq!(model.menu_selected, Some(0));
    let model = update(model, Message::CloseMenu);
    assert!(!model.menu_open());
}

#[test]
fn test_menu_select_open_shows_picker() {
    let model = update(create_test_model(), Message::ToggleMenu);
    let model = update(model, Message::MenuSelect);
    assert!(!model.menu_open());
    let picker = model.picker.as_ref().unwrap();
    assert_eq!(picker.purpose, PickerPurpose::Open);
    assert!(picker.input.starts_with("docs"));
}

#[test]
fn test_menu_select_ignores_disabled_item() {
    let model = update(create_test_model(), Message::ToggleMenu);
    let model = update(model, Message::MenuDown);
    assert_eq!(model.menu_selected, Some(1));
    let model = update(model, Message::MenuSelect);
    assert!(model.menu_open());
    assert!(model.active_toast().is_none());
    assert!(model.pending_request.is_none());
}

#[test]
fn test_save_while_untitled_only_informs() {
    let model = type_text(create_test_model(), "draft");
    let model = update(model, Message::Activate(MenuAction::Save));
    assert!(model.pending_request.is_none());
    assert!(model.picker.is_none());
    let (_, level) = model.active_toast().unwrap();
    assert_eq!(level, ToastLevel::Info);
    assert_eq!(model.session.state(), SessionState::Untitled);
}

#[test]
fn test_save_as_associates_and_enables_save() {
    let mut storage = MemoryStorage::new();
    let model = type_text(create_test_model(), "# Notes");
    let mut model = save_as_via_picker(model, "notes.md");
    assert!(model.picker.is_none());
    let Some(FileRequest::SaveAs(location)) = model.pending_request.clone() else {
        panic!("expected a save-as request");
    };
    assert_eq!(location.name(), "notes.md");

    run_file_request(&mut model, &mut storage);
    assert_eq!(storage.file(location.as_str()), Some(&b"# Notes"[..]));
    assert_eq!(model.session.location(), Some(&location));
    assert_eq!(model.session.title().as_str(), "Markdown - notes.md");
    assert!(!model.session.is_modified());
    assert!(model.menu_items()[1].enabled);
    assert!(model.error_dialog.is_none());
}

#[test]
fn test_save_as_rejects_non_markdown_without_writing() {
    let mut storage = MemoryStorage::new();
    let model = type_text(create_test_model(), "text");
    let mut model = save_as_via_picker(model, "notes.txt");
    run_file_request(&mut model, &mut storage);

    assert_eq!(storage.write_count(), 0);
    assert_eq!(model.session.state(), SessionState::Untitled);
    assert_eq!(model.session.title().as_str(), "Markdown");
    let dialog = model.error_dialog.as_ref().unwrap();
    assert_eq!(dialog.title, "Save as failed");
    assert!(dialog.message.contains(".md"));
}

#[test]
fn test_direct_save_writes_to_associated_location() {
    let mut storage = MemoryStorage::new().with_file("docs/a.md", "old");
    let mut model = create_test_model();
    open_initial(&mut model, Location::new("docs/a.md"), &mut storage);
    let mut model = type_text(model, "new ");

    model = update(model, Message::Activate(MenuAction::Save));
    assert_eq!(model.pending_request, Some(FileRequest::Save));
    run_file_request(&mut model, &mut storage);

    assert_eq!(storage.file("docs/a.md"), Some(&b"new old"[..]));
    assert!(!model.session.is_modified());
    assert_eq!(model.session.title().as_str(), "Markdown - a.md");
}

#[test]
fn test_failed_save_keeps_association_and_reports() {
    let mut storage = MemoryStorage::new().with_file("docs/a.md", "old");
    let mut model = create_test_model();
    open_initial(&mut model, Location::new("docs/a.md"), &mut storage);
    let mut model = type_text(model, "x");

    storage.fail_writes("docs/a.md", Fault::Break);
    model = update(model, Message::Activate(MenuAction::Save));
    run_file_request(&mut model, &mut storage);

    assert_eq!(model.session.location(), Some(&Location::new("docs/a.md")));
    assert!(model.session.is_modified());
    assert_eq!(model.error_dialog.as_ref().unwrap().title, "Save failed");
}

#[test]
fn test_open_replaces_buffer_and_resets_scroll() {
    let mut storage = MemoryStorage::new().with_file("docs/readme.md", "# Readme\n\nBody");
    let mut model = type_text(create_test_model(), &"scratch\n".repeat(40));
    model = update(model, Message::PreviewScrollDown(3));

    model = update(model, Message::Activate(MenuAction::Open));
    model = update(model, Message::PickerInput("readme.md".to_string()));
    model = update(model, Message::PickerAccept);
    run_file_request(&mut model, &mut storage);

    assert_eq!(model.session.text(), "# Readme\n\nBody");
    assert_eq!(model.session.preview().plain_text(), "Readme\n\nBody");
    assert!(!model.session.is_modified());
    assert_eq!(model.editor_viewport.offset(), 0);
    assert_eq!(model.preview_viewport.offset(), 0);
    assert_eq!(model.session.buffer().cursor().line, 0);
    let (message, level) = model.active_toast().unwrap();
    assert_eq!(level, ToastLevel::Info);
    assert!(message.contains("readme.md"));
}

#[test]
fn test_failed_open_leaves_session_untouched() {
    let mut storage = MemoryStorage::new();
    let mut model = type_text(create_test_model(), "keep me");
    open_initial(&mut model, Location::new("docs/missing.md"), &mut storage);

    assert_eq!(model.session.text(), "keep me");
    assert_eq!(model.session.state(), SessionState::Untitled);
    assert_eq!(model.error_dialog.as_ref().unwrap().title, "Open failed");
}

#[test]
fn test_open_rejects_invalid_utf8() {
    let mut storage = MemoryStorage::new().with_file("docs/bin.md", vec![0xff, 0xfe, 0x00]);
    let mut model = create_test_model();
    open_initial(&mut model, Location::new("docs/bin.md"), &mut storage);
    assert_eq!(model.session.state(), SessionState::Untitled);
    assert!(
        model
            .error_dialog
            .as_ref()
            .unwrap()
            .message
            .contains("UTF-8")
    );
}

#[test]
fn test_picker_cancel_is_a_no_op() {
    let model = type_text(create_test_model(), "text");
    let before_text = model.session.text();
    let model = update(model, Message::Activate(MenuAction::SaveAs));
    let model = update(model, Message::PickerInput("x.md".to_string()));
    let model = update(model, Message::PickerCancel);

    assert!(model.picker.is_none());
    assert!(model.pending_request.is_none());
    assert!(model.error_dialog.is_none());
    assert_eq!(model.session.text(), before_text);
    assert_eq!(model.session.state(), SessionState::Untitled);
}

#[test]
fn test_picker_accept_with_directory_only_stays_open() {
    let model = update(create_test_model(), Message::Activate(MenuAction::Open));
    let model = update(model, Message::PickerAccept);
    assert!(model.picker.is_some());
    assert!(model.pending_request.is_none());
}

#[test]
fn test_picker_listing_syncs_with_input_directory() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("one.md"), "1").unwrap();
    std::fs::write(dir.path().join("skip.txt"), "x").unwrap();

    let mut model = create_test_model().with_working_dir(dir.path().to_path_buf());
    model = update(model, Message::Activate(MenuAction::Open));
    sync_picker_listing(&mut model);
    let names: Vec<String> = model
        .picker
        .as_ref()
        .unwrap()
        .visible_entries()
        .iter()
        .map(|e| e.name.clone())
        .collect();
    assert!(names.contains(&"one.md".to_string()));
    assert!(!names.contains(&"skip.txt".to_string()));
}

#[test]
fn test_picker_starts_in_associated_directory() {
    let mut storage = MemoryStorage::new().with_file("notes/a.md", "a");
    let mut model = create_test_model();
    open_initial(&mut model, Location::new("notes/a.md"), &mut storage);
    model = update(model, Message::Activate(MenuAction::SaveAs));
    assert!(model.picker.as_ref().unwrap().input.starts_with("notes"));
}

#[test]
fn test_dismiss_error_dialog() {
    let mut model = create_test_model();
    model.show_error("Open failed", "boom");
    let model = update(model, Message::DismissError);
    assert!(model.error_dialog.is_none());
}

#[test]
fn test_quit_with_unsaved_changes_needs_confirmation() {
    let model = type_text(create_test_model(), "dirty");
    let model = update(model, Message::Quit);
    assert!(!model.should_quit);
    assert!(model.quit_confirmed);
    let (_, level) = model.active_toast().unwrap();
    assert_eq!(level, ToastLevel::Warning);

    let model = update(model, Message::Quit);
    assert!(model.should_quit);
}

#[test]
fn test_quit_confirmation_resets_on_other_input() {
    let model = type_text(create_test_model(), "dirty");
    let model = update(model, Message::Quit);
    let model = update(model, Message::MoveHome);
    assert!(!model.quit_confirmed);
    let model = update(model, Message::Quit);
    assert!(!model.should_quit);
}

#[test]
fn test_quit_clean_session_is_immediate() {
    let model = update(create_test_model(), Message::Quit);
    assert!(model.should_quit);
}

#[test]
fn test_replace_title_policy() {
    let session = EditorSession::new(WindowTitle::new("Markdown", TitlePolicy::Replace));
    let mut model = Model::new(session, (80, 24), 50);
    let mut storage = MemoryStorage::new()
        .with_file("a.md", "a")
        .with_file("b.md", "b");
    open_initial(&mut model, Location::new("a.md"), &mut storage);
    open_initial(&mut model, Location::new("b.md"), &mut storage);
    assert_eq!(model.session.title().as_str(), "Markdown - b.md");
}

#[test]
fn test_key_mapping_global_shortcuts() {
    let model = create_test_model();
    assert_eq!(handle_key(ctrl('q'), &model), Some(Message::Quit));
    assert_eq!(
        handle_key(ctrl('s'), &model),
        Some(Message::Activate(MenuAction::Save))
    );
    assert_eq!(
        handle_key(ctrl('o'), &model),
        Some(Message::Activate(MenuAction::Open))
    );
    assert_eq!(
        handle_key(
            KeyEvent::new(KeyCode::Char('s'), KeyModifiers::ALT),
            &model
        ),
        Some(Message::Activate(MenuAction::SaveAs))
    );
    assert_eq!(
        handle_key(key(KeyCode::F(10)), &model),
        Some(Message::ToggleMenu)
    );
}

#[test]
fn test_key_mapping_depends_on_focus() {
    let model = create_test_model();
    assert_eq!(
        handle_key(key(KeyCode::Char('j')), &model),
        Some(Message::InsertChar('j'))
    );
    let model = update(model, Message::SwitchFocus);
    assert_eq!(
        handle_key(key(KeyCode::Char('j')), &model),
        Some(Message::PreviewScrollDown(1))
    );
    assert_eq!(
        handle_key(key(KeyCode::PageDown), &model),
        Some(Message::PreviewPageDown)
    );
}

#[test]
fn test_error_dialog_blocks_other_keys() {
    let mut model = create_test_model();
    model.show_error("Save failed", "disk full");
    assert_eq!(handle_key(ctrl('q'), &model), None);
    assert_eq!(handle_key(key(KeyCode::Char('a')), &model), None);
    assert_eq!(
        handle_key(key(KeyCode::Esc), &model),
        Some(Message::DismissError)
    );
}

#[test]
fn test_picker_captures_typing() {
    let model = update(create_test_model(), Message::Activate(MenuAction::Open));
    assert_eq!(
        handle_key(key(KeyCode::Char('q')), &model),
        Some(Message::PickerInput("q".to_string()))
    );
    assert_eq!(
        handle_key(key(KeyCode::Esc), &model),
        Some(Message::PickerCancel)
    );
}

#[test]
fn test_mouse_wheel_over_preview_scrolls_preview() {
    let model = create_test_model();
    let preview = model.preview_area();
    let mouse = MouseEvent {
        kind: MouseEventKind::ScrollDown,
        column: preview.x + 1,
        row: preview.y + 1,
        modifiers: KeyModifiers::NONE,
    };
    assert_eq!(
        handle_mouse(mouse, &model),
        Some(Message::PreviewScrollDown(3))
    );
}

#[test]
fn test_mouse_click_in_editor_places_cursor() {
    let model = type_text(create_test_model(), "hello\nworld");
    let editor = model.editor_area();
    let gutter = crate::ui::gutter_width(2);
    let mouse = MouseEvent {
        kind: MouseEventKind::Down(crossterm::event::MouseButton::Left),
        column: editor.x + gutter + 3,
        row: editor.y,
        modifiers: KeyModifiers::NONE,
    };
    let msg = handle_mouse(mouse, &model).unwrap();
    assert_eq!(msg, Message::EditorClick { line: 0, col: 3 });
    let model = update(model, msg);
    assert_eq!(model.session.buffer().cursor().line, 0);
    assert_eq!(model.session.buffer().cursor().col, 3);
}

#[test]
fn test_resize_debouncer_waits_for_delay() {
    let mut debouncer = ResizeDebouncer::new(100);
    debouncer.queue(100, 40, 1_000);
    assert!(debouncer.is_pending());
    assert_eq!(debouncer.take_ready(1_050), None);
    assert_eq!(debouncer.take_ready(1_100), Some((100, 40)));
    assert!(!debouncer.is_pending());
}

#[test]
fn test_resize_debouncer_keeps_latest_size() {
    let mut debouncer = ResizeDebouncer::new(100);
    debouncer.queue(100, 40, 1_000);
    debouncer.queue(120, 50, 1_050);
    assert_eq!(debouncer.take_ready(1_120), None);
    assert_eq!(debouncer.take_ready(1_150), Some((120, 50)));
}
