// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. session::SessionError)
    clippy::module_name_repetitions
)]

//! # Markpad
//!
//! A two-pane terminal markdown editor with live preview.
//!
//! Markpad shows markdown source on the left and its rendering on the right:
//! - Every edit re-renders the preview
//! - Open, Save and Save as from a File menu or shortcuts
//! - Saving is restricted to `.md` files
//! - The window title names the associated file
//!
//! ## Architecture
//!
//! Markpad uses The Elm Architecture (TEA) pattern:
//! - **Model**: Application state
//! - **Message**: Events and actions
//! - **Update**: Pure state transitions
//! - **View**: Render to terminal
//!
//! ## Modules
//!
//! - [`app`]: Main application loop and state
//! - [`document`]: Markdown parsing and rendering
//! - [`editor`]: The editable text buffer
//! - [`session`]: File association, storage and the window title
//! - [`ui`]: Terminal UI components
//! - [`config`]: Saved defaults

pub mod app;
pub mod config;
pub mod document;
pub mod editor;
pub mod session;
pub mod ui;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Message, Model};
    pub use crate::document::{Document, MarkdownRenderer, Renderer};
    pub use crate::editor::EditorBuffer;
    pub use crate::session::{EditorSession, FsStorage, Location, Storage};
    pub use crate::ui::viewport::Viewport;
}
