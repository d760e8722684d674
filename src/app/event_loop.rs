use std::io::stdout;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{
    self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;
use crossterm::terminal::SetTitle;
use ratatui::DefaultTerminal;

use crate::app::{App, Message, Model, update};
use crate::session::{DEFAULT_TITLE, EditorSession, FsStorage, Location, Storage, WindowTitle};

use super::effects;

pub(super) struct ResizeDebouncer {
    delay_ms: u64,
    pending: Option<(u16, u16, u64)>,
}

impl ResizeDebouncer {
    pub(super) const fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            pending: None,
        }
    }

    pub(super) const fn queue(&mut self, width: u16, height: u16, now_ms: u64) {
        self.pending = Some((width, height, now_ms));
    }

    pub(super) fn take_ready(&mut self, now_ms: u64) -> Option<(u16, u16)> {
        let (width, height, queued_at) = self.pending?;
        if now_ms.saturating_sub(queued_at) >= self.delay_ms {
            self.pending = None;
            Some((width, height))
        } else {
            None
        }
    }

    pub(super) const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl App {
    /// Run the main event loop.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be initialized or drawn to.
    /// File operation failures are shown in the UI, never returned.
    pub fn run(&mut self) -> Result<()> {
        let mut terminal = ratatui::try_init()
            .context("Failed to initialize terminal; markpad requires an interactive terminal")?;
        let size = terminal.size()?;

        let session = EditorSession::new(WindowTitle::new(DEFAULT_TITLE, self.title_policy));
        let working_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let mut model = Model::new(session, (size.width, size.height), self.split_percent)
            .with_working_dir(working_dir);
        let mut storage = FsStorage::new();

        if let Some(path) = &self.initial_file {
            effects::open_initial(&mut model, Location::from_path(path), &mut storage);
        }

        let result = execute!(stdout(), EnableMouseCapture, EnableBracketedPaste)
            .context("Failed to enable mouse capture")
            .and_then(|()| self.event_loop(&mut terminal, &mut model, &mut storage));

        // Restore terminal
        let _ = execute!(stdout(), DisableBracketedPaste, DisableMouseCapture);
        ratatui::restore();

        result
    }

    fn event_loop(
        &self,
        terminal: &mut DefaultTerminal,
        model: &mut Model,
        storage: &mut dyn Storage,
    ) -> Result<()> {
        let start = Instant::now();
        let mut resize_debouncer = ResizeDebouncer::new(100);
        let mut shown_title = String::new();
        let mut needs_render = true;

        loop {
            if model.expire_toast(Instant::now()) {
                needs_render = true;
            }

            let now_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

            if let Some((width, height)) = resize_debouncer.take_ready(now_ms) {
                tracing::debug!(width, height, "resize applied");
                *model = update(std::mem::take(model), Message::Resize(width, height));
                needs_render = true;
            }

            // Handle events
            let poll_ms = if needs_render {
                0
            } else if resize_debouncer.is_pending() {
                10
            } else {
                250
            };
            if event::poll(Duration::from_millis(poll_ms))? {
                let event_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
                if let Some(msg) =
                    self.handle_event(event::read()?, model, event_ms, &mut resize_debouncer)
                {
                    self.dispatch(model, storage, msg);
                    needs_render = true;
                }

                // Coalesce key repeat and paste bursts into a single render.
                while !model.should_quit && event::poll(Duration::from_millis(0))? {
                    let drain_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
                    if let Some(msg) =
                        self.handle_event(event::read()?, model, drain_ms, &mut resize_debouncer)
                    {
                        self.dispatch(model, storage, msg);
                        needs_render = true;
                    }
                }
            }

            if model.should_quit {
                break;
            }

            if needs_render {
                let title = model.session.title().as_str();
                if title != shown_title {
                    execute!(stdout(), SetTitle(title))?;
                    shown_title = title.to_string();
                }
                terminal.draw(|frame| crate::ui::render(model, frame))?;
                needs_render = false;
            }
        }
        Ok(())
    }

    fn dispatch(&self, model: &mut Model, storage: &mut dyn Storage, msg: Message) {
        tracing::trace!(?msg, "message");
        *model = update(std::mem::take(model), msg);
        self.handle_message_side_effects(model, storage);
    }
}
