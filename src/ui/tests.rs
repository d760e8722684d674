use super::*;
use crate::app::{MenuAction, Message, Model, update};
use crate::session::EditorSession;
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;
use ratatui::style::{Color, Modifier};

const WIDTH: u16 = 80;
const HEIGHT: u16 = 24;

fn create_test_terminal() -> Terminal<TestBackend> {
    let backend = TestBackend::new(WIDTH, HEIGHT);
    Terminal::new(backend).unwrap()
}

fn create_test_model() -> Model {
    Model::new(EditorSession::default(), (WIDTH, HEIGHT), 50)
}

fn model_with_text(text: &str) -> Model {
    update(create_test_model(), Message::Paste(text.to_string()))
}

fn draw(model: &Model) -> Terminal<TestBackend> {
    let mut terminal = create_test_terminal();
    terminal.draw(|frame| render(model, frame)).unwrap();
    terminal
}

fn row_text(buffer: &Buffer, y: u16) -> String {
    (0..buffer.area.width)
        .map(|x| buffer[(x, y)].symbol())
        .collect()
}

fn screen_text(terminal: &Terminal<TestBackend>) -> String {
    let buffer = terminal.backend().buffer();
    (0..buffer.area.height)
        .map(|y| row_text(buffer, y))
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn test_title_bar_shows_window_title() {
    let terminal = draw(&create_test_model());
    let buffer = terminal.backend().buffer();
    assert!(row_text(buffer, 0).contains("Markdown"));
    assert_eq!(buffer[(0, 0)].bg, Color::Blue);
}

#[test]
fn test_both_panes_are_drawn() {
    let terminal = draw(&create_test_model());
    let screen = screen_text(&terminal);
    assert!(screen.contains("Editor"));
    assert!(screen.contains("Preview"));
}

#[test]
fn test_editor_shows_source_and_preview_shows_rendering() {
    let model = model_with_text("# Heading\n\nSome **bold** text");
    let terminal = draw(&model);
    let buffer = terminal.backend().buffer();
    let layout = screen_layout(buffer.area, model.split_percent);

    let editor = editor_text_area(layout.editor);
    let first_editor_row = row_text(buffer, editor.y);
    assert!(first_editor_row.contains("# Heading"), "{first_editor_row}");

    let preview = preview_text_area(layout.preview);
    let first_preview_row: String = (preview.x..preview.x + preview.width)
        .map(|x| buffer[(x, preview.y)].symbol())
        .collect();
    assert!(first_preview_row.starts_with("Heading"), "{first_preview_row}");
    assert!(!first_preview_row.contains('#'));
    assert!(
        buffer[(preview.x, preview.y)]
            .modifier
            .contains(Modifier::BOLD)
    );
}

#[test]
fn test_editor_has_line_numbers() {
    let model = model_with_text("a\nb\nc");
    let terminal = draw(&model);
    let buffer = terminal.backend().buffer();
    let editor = model.editor_area();
    assert!(row_text(buffer, editor.y + 2).contains("3 c"));
}

#[test]
fn test_status_bar_shows_name_and_modified_marker() {
    let model = model_with_text("x");
    let terminal = draw(&model);
    let status = row_text(terminal.backend().buffer(), HEIGHT - 1);
    assert!(status.contains("untitled [+]"), "{status}");
    assert!(status.contains("Ln 1, Col 2"), "{status}");
}

#[test]
fn test_toast_replaces_status_bar() {
    let model = update(create_test_model(), Message::Activate(MenuAction::Save));
    let terminal = draw(&model);
    let status = row_text(terminal.backend().buffer(), HEIGHT - 1);
    assert!(status.starts_with("[info]"), "{status}");
}

#[test]
fn test_menu_overlay_lists_items_with_save_disabled() {
    let model = update(create_test_model(), Message::ToggleMenu);
    let terminal = draw(&model);
    let buffer = terminal.backend().buffer();
    let screen = screen_text(&terminal);
    for label in ["Open...", "Save as...", "Quit", "Ctrl+S"] {
        assert!(screen.contains(label), "missing {label}");
    }

    let popup = menu_rect(buffer.area, 4);
    // Row order: Open, Save, Save as, Quit
    let save_row = popup.y + 2;
    let save_text = row_text(buffer, save_row);
    assert!(save_text.contains("Save"));
    assert_eq!(buffer[(popup.x + 2, save_row)].fg, Color::DarkGray);
}

#[test]
fn test_picker_overlay_shows_purpose_and_input() {
    let model = update(create_test_model(), Message::Activate(MenuAction::SaveAs));
    let model = update(model, Message::PickerInput("out.md".to_string()));
    let terminal = draw(&model);
    let screen = screen_text(&terminal);
    assert!(screen.contains("Save as"));
    assert!(screen.contains("out.md"));
    assert!(screen.contains("Esc cancel"));
}

#[test]
fn test_error_overlay_shows_message() {
    let mut model = create_test_model();
    model.show_error("Save failed", "cannot write notes.md: disk full");
    let terminal = draw(&model);
    let screen = screen_text(&terminal);
    assert!(screen.contains("Save failed"));
    assert!(screen.contains("disk full"));
    assert!(screen.contains("[ OK ]"));
}

#[test]
fn test_preview_lines_fit_pane_after_resize() {
    let model = model_with_text(&"lorem ipsum ".repeat(30));
    let model = update(model, Message::Resize(60, HEIGHT));
    let mut terminal = Terminal::new(TestBackend::new(60, HEIGHT)).unwrap();
    terminal.draw(|frame| render(&model, frame)).unwrap();

    let buffer = terminal.backend().buffer();
    let preview = model.preview_area();
    assert!(row_text(buffer, preview.y).contains("lorem"));
    // The right border sits directly after the wrap width
    for y in preview.y..preview.y + 3 {
        assert_eq!(buffer[(preview.x + preview.width, y)].symbol(), "│");
    }
    assert!(
        model
            .session
            .preview()
            .visible_lines(0, usize::MAX)
            .iter()
            .all(|line| line.content().chars().count() <= preview.width as usize)
    );
    assert_eq!(model.renderer.wrap_width(), preview.width);
}
