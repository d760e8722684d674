use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use ratatui::layout::Rect;

use crate::config::DEFAULT_SPLIT;
use crate::document::MarkdownRenderer;
use crate::session::{EditorSession, Location};
use crate::ui::viewport::Viewport;

use super::picker::{FilePicker, PickerPurpose};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
struct Toast {
    level: ToastLevel,
    message: String,
    expires_at: Instant,
}

/// Which pane receives keyboard input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Focus {
    #[default]
    Editor,
    Preview,
}

/// Entries of the File menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Open,
    Save,
    SaveAs,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuItem {
    pub label: &'static str,
    pub shortcut: &'static str,
    pub action: MenuAction,
    pub enabled: bool,
}

/// A file operation requested by the user, executed against storage by
/// the side-effect layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileRequest {
    Load(Location),
    Save,
    SaveAs(Location),
}

/// A modal error message; input is blocked until it is dismissed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDialog {
    pub title: String,
    pub message: String,
}

/// The complete application state.
///
/// All state lives here - no global or scattered state.
#[derive(Debug)]
pub struct Model {
    /// Buffer, association, preview and window title
    pub session: EditorSession,
    /// Renders the preview at the preview pane's width
    pub renderer: MarkdownRenderer,
    pub focus: Focus,
    /// Editor pane share of the width, in percent
    pub split_percent: u16,
    pub terminal_size: (u16, u16),
    pub editor_viewport: Viewport,
    /// First visible char column of the editor
    pub editor_hscroll: usize,
    pub preview_viewport: Viewport,
    /// Index of the highlighted File menu item while the menu is open
    pub menu_selected: Option<usize>,
    pub picker: Option<FilePicker>,
    pub error_dialog: Option<ErrorDialog>,
    /// File operation waiting for the side-effect layer
    pub pending_request: Option<FileRequest>,
    /// Directory pickers start in while untitled
    pub working_dir: PathBuf,
    /// Set after a first quit request with unsaved changes
    pub quit_confirmed: bool,
    pub should_quit: bool,
    toast: Option<Toast>,
}

impl Model {
    /// Create a model for `session`, laid out for a terminal of `terminal_size`.
    pub fn new(session: EditorSession, terminal_size: (u16, u16), split_percent: u16) -> Self {
        let mut model = Self {
            session,
            renderer: MarkdownRenderer::default(),
            focus: Focus::Editor,
            split_percent,
            terminal_size,
            editor_viewport: Viewport::default(),
            editor_hscroll: 0,
            preview_viewport: Viewport::default(),
            menu_selected: None,
            picker: None,
            error_dialog: None,
            pending_request: None,
            working_dir: PathBuf::from("."),
            quit_confirmed: false,
            should_quit: false,
            toast: None,
        };
        model.apply_layout();
        model.session.refresh_preview(&model.renderer);
        model.sync_viewports();
        model
    }

    #[must_use]
    pub fn with_working_dir(mut self, dir: PathBuf) -> Self {
        self.working_dir = dir;
        self
    }

    fn screen_area(&self) -> Rect {
        Rect::new(0, 0, self.terminal_size.0, self.terminal_size.1)
    }

    /// Text area of the editor pane in screen coordinates.
    pub fn editor_area(&self) -> Rect {
        let layout = crate::ui::screen_layout(self.screen_area(), self.split_percent);
        crate::ui::editor_text_area(layout.editor)
    }

    /// Columns available for buffer text, after the line-number gutter.
    pub fn editor_text_columns(&self) -> usize {
        let gutter = crate::ui::gutter_width(self.session.buffer().line_count());
        self.editor_area().width.saturating_sub(gutter) as usize
    }

    /// Text area of the preview pane in screen coordinates.
    pub fn preview_area(&self) -> Rect {
        let layout = crate::ui::screen_layout(self.screen_area(), self.split_percent);
        crate::ui::preview_text_area(layout.preview)
    }

    /// Recompute pane sizes. Returns true when the preview wrap width changed.
    fn apply_layout(&mut self) -> bool {
        let editor = self.editor_area();
        let preview = self.preview_area();
        self.editor_viewport.resize(editor.height);
        self.preview_viewport.resize(preview.height);
        self.renderer.set_wrap_width(preview.width)
    }

    /// React to a terminal resize: re-layout, and re-render the preview if
    /// its width changed.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.terminal_size = (width, height);
        if self.apply_layout() {
            tracing::debug!(
                wrap_width = self.renderer.wrap_width(),
                "preview width changed"
            );
            self.session.refresh_preview(&self.renderer);
        }
        self.sync_viewports();
        self.reveal_cursor();
    }

    /// Bring viewport lengths in line with the buffer and the preview.
    pub fn sync_viewports(&mut self) {
        self.editor_viewport
            .set_total_lines(self.session.buffer().line_count());
        self.preview_viewport
            .set_total_lines(self.session.preview().line_count());
    }

    /// Scroll the editor so the cursor is on screen.
    pub fn reveal_cursor(&mut self) {
        let cursor = self.session.buffer().cursor();
        self.editor_viewport.reveal(cursor.line);
        let width = self.editor_text_columns().max(1);
        if cursor.col < self.editor_hscroll {
            self.editor_hscroll = cursor.col;
        } else if cursor.col >= self.editor_hscroll + width {
            self.editor_hscroll = cursor.col + 1 - width;
        }
    }

    /// Reset scroll positions after the buffer was replaced.
    pub fn reset_scroll(&mut self) {
        self.sync_viewports();
        self.editor_viewport.go_to_top();
        self.preview_viewport.go_to_top();
        self.editor_hscroll = 0;
    }

    /// The File menu, with Save enabled only while a location is associated.
    pub fn menu_items(&self) -> [MenuItem; 4] {
        [
            MenuItem {
                label: "Open...",
                shortcut: "Ctrl+O",
                action: MenuAction::Open,
                enabled: true,
            },
            MenuItem {
                label: "Save",
                shortcut: "Ctrl+S",
                action: MenuAction::Save,
                enabled: self.session.can_direct_save(),
            },
            MenuItem {
                label: "Save as...",
                shortcut: "Alt+S",
                action: MenuAction::SaveAs,
                enabled: true,
            },
            MenuItem {
                label: "Quit",
                shortcut: "Ctrl+Q",
                action: MenuAction::Quit,
                enabled: true,
            },
        ]
    }

    pub const fn menu_open(&self) -> bool {
        self.menu_selected.is_some()
    }

    /// Whether a modal overlay currently owns the keyboard.
    pub const fn overlay_active(&self) -> bool {
        self.menu_open() || self.picker.is_some() || self.error_dialog.is_some()
    }

    /// Directory pickers start in: the associated file's directory, if any.
    pub fn picker_start_dir(&self) -> PathBuf {
        self.session
            .location()
            .and_then(|loc| loc.to_path().parent().map(Path::to_path_buf))
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or_else(|| self.working_dir.clone())
    }

    pub fn open_picker(&mut self, purpose: PickerPurpose) {
        self.picker = Some(FilePicker::new(purpose, &self.picker_start_dir()));
    }

    pub fn show_error(&mut self, title: impl Into<String>, message: impl Into<String>) {
        self.error_dialog = Some(ErrorDialog {
            title: title.into(),
            message: message.into(),
        });
    }

    /// Display name of the document: the associated file name or "untitled".
    pub fn document_name(&self) -> &str {
        self.session
            .location()
            .map_or("untitled", |loc| loc.name())
    }

    pub(super) fn show_toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(Toast {
            level,
            message: message.into(),
            expires_at: Instant::now() + Duration::from_secs(4),
        });
    }

    pub(super) fn expire_toast(&mut self, now: Instant) -> bool {
        if self
            .toast
            .as_ref()
            .is_some_and(|toast| toast.expires_at <= now)
        {
            self.toast = None;
            return true;
        }
        false
    }

    pub fn active_toast(&self) -> Option<(&str, ToastLevel)> {
        self.toast
            .as_ref()
            .map(|toast| (toast.message.as_str(), toast.level))
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::new(EditorSession::default(), (80, 24), DEFAULT_SPLIT)
    }
}
