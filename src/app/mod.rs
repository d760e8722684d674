//! Application state and main event loop.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete application state
//! - [`Message`]: All possible events and actions
//! - [`update`]: Pure function for state transitions
//! - [`App::run`]: Main event loop with rendering
//!
//! File operations never run inside [`update`]. It queues a request on the
//! model, and the side-effect layer executes it against the injected
//! [`crate::session::Storage`].

mod effects;
mod event_loop;
mod input;
mod model;
mod picker;
mod update;

pub use model::{ErrorDialog, FileRequest, Focus, MenuAction, MenuItem, Model, ToastLevel};
pub use picker::{FilePicker, PickerChoice, PickerEntry, PickerPurpose, list_directory};
pub use update::{Message, update};

use std::path::PathBuf;

use crate::config::DEFAULT_SPLIT;
use crate::session::TitlePolicy;

/// Main application struct that owns the terminal and runs the event loop.
pub struct App {
    initial_file: Option<PathBuf>,
    split_percent: u16,
    title_policy: TitlePolicy,
}

impl App {
    /// Create an application that starts with an untitled document.
    pub const fn new() -> Self {
        Self {
            initial_file: None,
            split_percent: DEFAULT_SPLIT,
            title_policy: TitlePolicy::Append,
        }
    }

    /// Open `path` at startup. A failed load leaves the session untitled
    /// and shows the error.
    #[must_use]
    pub fn with_initial_file(mut self, path: Option<PathBuf>) -> Self {
        self.initial_file = path;
        self
    }

    /// Editor pane share of the width, in percent.
    #[must_use]
    pub const fn with_split_percent(mut self, percent: u16) -> Self {
        self.split_percent = percent;
        self
    }

    #[must_use]
    pub const fn with_title_policy(mut self, policy: TitlePolicy) -> Self {
        self.title_policy = policy;
        self
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;
