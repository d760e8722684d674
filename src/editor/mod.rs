//! Text buffer for the editor pane.
//!
//! Provides a rope-backed text buffer with cursor management; the
//! [`EditorSession`](crate::session::EditorSession) owns one and re-renders
//! the preview after every mutation.

mod buffer;

pub use buffer::{Cursor, Direction, EditorBuffer};
