use std::fmt;
use std::path::{Path, PathBuf};

use super::error::ValidationError;

/// Opaque identifier of a storage endpoint, as chosen in a picker.
///
/// A location has two views: its full string form ([`Location::as_str`]),
/// which storage backends resolve, and a display name ([`Location::name`]),
/// the final path component shown in the window title.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location {
    uri: String,
    name: String,
}

impl Location {
    pub fn new(uri: impl Into<String>) -> Self {
        let uri = uri.into();
        let name = uri
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or_default()
            .to_string();
        Self { uri, name }
    }

    pub fn from_path(path: &Path) -> Self {
        Self::new(path.to_string_lossy().into_owned())
    }

    /// Full string form of the location.
    pub fn as_str(&self) -> &str {
        &self.uri
    }

    /// Display name (final component).
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn to_path(&self) -> PathBuf {
        PathBuf::from(&self.uri)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uri)
    }
}

impl From<&Path> for Location {
    fn from(path: &Path) -> Self {
        Self::from_path(path)
    }
}

impl From<PathBuf> for Location {
    fn from(path: PathBuf) -> Self {
        Self::from_path(&path)
    }
}

/// Case-insensitive `.md` suffix match on a raw string.
///
/// Deliberately a plain suffix test: applied to a full location string it
/// ignores path structure, so `notes/.md` passes and `notes.md/file` fails.
pub fn has_markdown_extension(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() >= 3 && bytes[bytes.len() - 3..].eq_ignore_ascii_case(b".md")
}

/// Check that `location` may be used as a save-as target.
///
/// # Errors
///
/// Returns [`ValidationError::NotMarkdown`] when the full location string
/// does not end in `.md` (any case).
pub fn validate_save_target(location: &Location) -> Result<(), ValidationError> {
    if has_markdown_extension(location.as_str()) {
        Ok(())
    } else {
        Err(ValidationError::NotMarkdown {
            location: location.as_str().to_string(),
        })
    }
}
