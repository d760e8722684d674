//! The editor session: the document buffer, its file association and the
//! live preview.
//!
//! A session is either [`SessionState::Untitled`] or
//! [`SessionState::Associated`]. Successful `load` and `save_as` associate a
//! location; nothing ever dissociates it. Direct `save` is only available
//! while associated.
//!
//! Collaborators are passed in per call: a [`Renderer`] for every text
//! mutation and a [`Storage`] for file operations. The session never reaches
//! for globals, so the event loop and tests drive it the same way.

mod error;
mod location;
mod storage;
mod title;

pub use error::{SessionError, SessionResult, StorageError, ValidationError};
pub use location::{Location, has_markdown_extension, validate_save_target};
pub use storage::{FsStorage, Fault, MemoryStorage, Storage, read_all, write_all};
pub use title::{DEFAULT_TITLE, TitlePolicy, WindowTitle};

use crate::document::{Document, Renderer};
use crate::editor::EditorBuffer;

/// Whether a location is bound to the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Untitled,
    Associated,
}

#[derive(Debug, Clone)]
pub struct EditorSession {
    buffer: EditorBuffer,
    location: Option<Location>,
    preview: Document,
    title: WindowTitle,
}

impl EditorSession {
    /// Create an empty, untitled session.
    pub fn new(title: WindowTitle) -> Self {
        Self {
            buffer: EditorBuffer::empty(),
            location: None,
            preview: Document::empty(),
            title,
        }
    }

    pub const fn buffer(&self) -> &EditorBuffer {
        &self.buffer
    }

    pub fn text(&self) -> String {
        self.buffer.text()
    }

    pub const fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    /// True iff a location is associated.
    pub const fn can_direct_save(&self) -> bool {
        self.location.is_some()
    }

    pub const fn state(&self) -> SessionState {
        if self.can_direct_save() {
            SessionState::Associated
        } else {
            SessionState::Untitled
        }
    }

    /// The rendered preview; always equal to rendering the current text.
    pub const fn preview(&self) -> &Document {
        &self.preview
    }

    pub const fn title(&self) -> &WindowTitle {
        &self.title
    }

    /// Whether the text changed since the last successful load or save.
    pub const fn is_modified(&self) -> bool {
        self.buffer.is_modified()
    }

    /// Replace the whole text and re-render the preview.
    pub fn on_text_changed(&mut self, new_text: &str, renderer: &impl Renderer) {
        self.buffer.set_text(new_text);
        self.refresh_preview(renderer);
    }

    /// Apply a mutating edit to the buffer, then re-render the preview.
    pub fn edit<T>(
        &mut self,
        renderer: &impl Renderer,
        apply: impl FnOnce(&mut EditorBuffer) -> T,
    ) -> T {
        let result = apply(&mut self.buffer);
        self.refresh_preview(renderer);
        result
    }

    /// Move the cursor. Text is unchanged, so the preview is not re-rendered.
    pub fn navigate(&mut self, apply: impl FnOnce(&mut EditorBuffer)) {
        apply(&mut self.buffer);
    }

    /// Re-render the preview from the current text, e.g. after the
    /// renderer's wrap width changed.
    pub fn refresh_preview(&mut self, renderer: &impl Renderer) {
        self.preview = renderer.render(&self.buffer.text());
    }

    /// Replace the buffer with the content stored at `location`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Storage`] if the location cannot be read or is
    /// not UTF-8. The buffer and association are unchanged on failure.
    pub fn load(
        &mut self,
        location: Location,
        storage: &mut dyn Storage,
        renderer: &impl Renderer,
    ) -> SessionResult<()> {
        let bytes = read_all(storage, &location).inspect_err(|err| {
            tracing::warn!(location = %location, error = %err, "load failed");
        })?;
        let text = String::from_utf8(bytes).map_err(|_| {
            tracing::warn!(location = %location, "load rejected non-UTF-8 content");
            StorageError::InvalidUtf8 {
                location: location.to_string(),
            }
        })?;

        tracing::info!(location = %location, bytes = text.len(), "loaded document");
        self.buffer = EditorBuffer::from_text(&text);
        self.refresh_preview(renderer);
        self.associate(location);
        Ok(())
    }

    /// Write the buffer back to the associated location.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotAssociated`] without touching storage when
    /// the session is untitled, or [`SessionError::Storage`] if the write
    /// fails. The association is never changed.
    pub fn save(&mut self, storage: &mut dyn Storage) -> SessionResult<()> {
        let Some(location) = &self.location else {
            tracing::debug!("save requested while untitled");
            return Err(SessionError::NotAssociated);
        };
        let text = self.buffer.text();
        write_all(storage, location, text.as_bytes()).inspect_err(|err| {
            tracing::warn!(location = %location, error = %err, "save failed");
        })?;

        tracing::info!(location = %location, bytes = text.len(), "saved document");
        self.buffer.mark_saved();
        Ok(())
    }

    /// Write the buffer to a new location and associate it.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Validation`] (and writes nothing) when the
    /// location does not end in `.md`, or [`SessionError::Storage`] if the
    /// write fails. The association only changes after a successful write.
    pub fn save_as(&mut self, location: Location, storage: &mut dyn Storage) -> SessionResult<()> {
        validate_save_target(&location).inspect_err(|err| {
            tracing::info!(error = %err, "save-as target rejected");
        })?;
        let text = self.buffer.text();
        write_all(storage, &location, text.as_bytes()).inspect_err(|err| {
            tracing::warn!(location = %location, error = %err, "save-as failed");
        })?;

        tracing::info!(location = %location, bytes = text.len(), "saved document as");
        self.buffer.mark_saved();
        self.associate(location);
        Ok(())
    }

    fn associate(&mut self, location: Location) {
        self.title.on_associated(&location);
        self.location = Some(location);
    }
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(WindowTitle::default())
    }
}
