use super::location::Location;

/// Title shown before any file is associated.
pub const DEFAULT_TITLE: &str = "Markdown";

/// How the window title reacts when a new location is associated.
#[derive(clap::ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TitlePolicy {
    /// Append ` - <name>` to the current title on every association.
    #[default]
    Append,
    /// Show only the base title and the current location name.
    Replace,
}

/// The window title, derived from association events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowTitle {
    base: String,
    current: String,
    policy: TitlePolicy,
}

impl WindowTitle {
    pub fn new(base: impl Into<String>, policy: TitlePolicy) -> Self {
        let base = base.into();
        Self {
            current: base.clone(),
            base,
            policy,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.current
    }

    pub const fn policy(&self) -> TitlePolicy {
        self.policy
    }

    /// Update the title after a successful load or save-as.
    pub fn on_associated(&mut self, location: &Location) {
        let head = match self.policy {
            TitlePolicy::Append => &self.current,
            TitlePolicy::Replace => &self.base,
        };
        self.current = format!("{head} - {}", location.name());
    }
}

impl Default for WindowTitle {
    fn default() -> Self {
        Self::new(DEFAULT_TITLE, TitlePolicy::default())
    }
}
