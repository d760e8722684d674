//! The file picker shown for Open and Save as.
//!
//! The picker is a text input plus a listing of the directory the input
//! points into. Listings only show directories and markdown files; the
//! typed file-name fragment narrows them further.

use std::path::{MAIN_SEPARATOR, Path, PathBuf};

use crate::document::is_markdown_file_name;

/// What an accepted picker choice is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerPurpose {
    Open,
    SaveAs,
}

impl PickerPurpose {
    pub const fn title(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::SaveAs => "Save as",
        }
    }
}

/// A row in the picker listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerEntry {
    /// Display name (file name, or ".." for the parent)
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
}

/// Result of pressing Enter in the picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerChoice {
    /// A directory was chosen; the picker moved into it and stays open.
    Descended,
    /// A location was chosen.
    Location(String),
    /// Nothing usable is selected or typed.
    Nothing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePicker {
    pub purpose: PickerPurpose,
    pub input: String,
    entries: Vec<PickerEntry>,
    listed_dir: Option<PathBuf>,
    selected: Option<usize>,
}

impl FilePicker {
    /// Create a picker whose input starts in `dir`.
    pub fn new(purpose: PickerPurpose, dir: &Path) -> Self {
        Self {
            purpose,
            input: dir_input(dir),
            entries: Vec::new(),
            listed_dir: None,
            selected: None,
        }
    }

    /// Directory part of the input, including the trailing separator.
    pub fn input_dir(&self) -> PathBuf {
        match self.input.rfind(['/', '\\']) {
            Some(idx) => PathBuf::from(&self.input[..=idx]),
            None => PathBuf::from("."),
        }
    }

    /// File-name part of the input, after the last separator.
    pub fn fragment(&self) -> &str {
        self.input
            .rfind(['/', '\\'])
            .map_or(self.input.as_str(), |idx| &self.input[idx + 1..])
    }

    /// True when the listing does not reflect the current input directory.
    pub fn needs_listing(&self) -> bool {
        self.listed_dir.as_deref() != Some(self.input_dir().as_path())
    }

    pub fn set_listing(&mut self, dir: PathBuf, entries: Vec<PickerEntry>) {
        self.listed_dir = Some(dir);
        self.entries = entries;
        self.selected = None;
    }

    /// Entries matching the typed fragment (prefix, case-insensitive).
    pub fn visible_entries(&self) -> Vec<&PickerEntry> {
        let fragment = self.fragment().to_lowercase();
        self.entries
            .iter()
            .filter(|entry| entry.name.to_lowercase().starts_with(&fragment))
            .collect()
    }

    pub const fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_entry(&self) -> Option<&PickerEntry> {
        self.selected
            .and_then(|idx| self.visible_entries().get(idx).copied())
    }

    pub fn select_next(&mut self) {
        let count = self.visible_entries().len();
        if count == 0 {
            self.selected = None;
            return;
        }
        self.selected = Some(match self.selected {
            Some(idx) if idx + 1 < count => idx + 1,
            Some(idx) => idx,
            None => 0,
        });
    }

    pub fn select_prev(&mut self) {
        self.selected = match self.selected {
            Some(0) | None => None,
            Some(idx) => Some(idx - 1),
        };
    }

    pub fn push_str(&mut self, s: &str) {
        self.input.extend(s.chars().filter(|c| !c.is_control()));
        self.selected = None;
    }

    pub fn backspace(&mut self) {
        self.input.pop();
        self.selected = None;
    }

    /// Replace the input with the selected (or first visible) entry.
    pub fn complete(&mut self) {
        let entry = self
            .selected_entry()
            .or_else(|| self.visible_entries().first().copied())
            .cloned();
        if let Some(entry) = entry {
            self.input = if entry.is_dir {
                dir_input(&entry.path)
            } else {
                entry.path.display().to_string()
            };
            self.selected = None;
        }
    }

    /// Resolve Enter: descend into a selected directory, or produce the
    /// selected file / typed text as the chosen location.
    pub fn accept(&mut self) -> PickerChoice {
        if let Some(entry) = self.selected_entry().cloned() {
            if entry.is_dir {
                self.input = dir_input(&entry.path);
                self.selected = None;
                return PickerChoice::Descended;
            }
            return PickerChoice::Location(entry.path.display().to_string());
        }
        let typed = self.input.trim();
        if typed.is_empty() || self.fragment().trim().is_empty() {
            return PickerChoice::Nothing;
        }
        PickerChoice::Location(typed.to_string())
    }
}

fn dir_input(dir: &Path) -> String {
    let mut input = dir.display().to_string();
    if !input.ends_with(['/', '\\']) {
        input.push(MAIN_SEPARATOR);
    }
    input
}

/// List `dir` for the picker: a parent entry, then directories, then
/// markdown files, each group sorted case-insensitively. Hidden entries
/// are skipped.
///
/// # Errors
///
/// Returns an error if the directory cannot be read.
pub fn list_directory(dir: &Path) -> std::io::Result<Vec<PickerEntry>> {
    let dir = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
    let mut dirs = Vec::new();
    let mut files = Vec::new();

    for entry in std::fs::read_dir(&dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().to_string();
        if name.starts_with('.') {
            continue;
        }
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            dirs.push(PickerEntry {
                name,
                path,
                is_dir: true,
            });
        } else if is_markdown_file_name(&name) {
            files.push(PickerEntry {
                name,
                path,
                is_dir: false,
            });
        }
    }

    dirs.sort_by_key(|e| e.name.to_lowercase());
    files.sort_by_key(|e| e.name.to_lowercase());

    let mut entries = Vec::with_capacity(dirs.len() + files.len() + 1);
    if let Some(parent) = dir.parent() {
        entries.push(PickerEntry {
            name: "..".to_string(),
            path: parent.to_path_buf(),
            is_dir: true,
        });
    }
    entries.extend(dirs);
    entries.extend(files);
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn populated_dir() -> tempfile::TempDir {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("b.md"), "b").unwrap();
        std::fs::write(dir.path().join("A.MD"), "a").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "t").unwrap();
        std::fs::write(dir.path().join(".hidden.md"), "h").unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        dir
    }

    fn listed_picker(dir: &Path) -> FilePicker {
        let mut picker = FilePicker::new(PickerPurpose::Open, dir);
        let entries = list_directory(&picker.input_dir()).unwrap();
        picker.set_listing(picker.input_dir(), entries);
        picker
    }

    #[test]
    fn test_listing_shows_only_dirs_and_markdown() {
        let dir = populated_dir();
        let names: Vec<String> = list_directory(dir.path())
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["..", "sub", "A.MD", "b.md"]);
    }

    #[test]
    fn test_input_starts_in_directory() {
        let dir = tempdir().unwrap();
        let picker = FilePicker::new(PickerPurpose::SaveAs, dir.path());
        assert!(picker.input.ends_with(MAIN_SEPARATOR));
        assert_eq!(picker.fragment(), "");
        assert!(picker.needs_listing());
    }

    #[test]
    fn test_fragment_filters_entries() {
        let dir = populated_dir();
        let mut picker = listed_picker(dir.path());
        picker.push_str("a");
        let names: Vec<&str> = picker
            .visible_entries()
            .iter()
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(names, vec!["A.MD"]);
        assert!(!picker.needs_listing());
    }

    #[test]
    fn test_accept_selected_file() {
        let dir = populated_dir();
        let mut picker = listed_picker(dir.path());
        picker.push_str("b");
        picker.select_next();
        let PickerChoice::Location(location) = picker.accept() else {
            panic!("expected a location");
        };
        assert!(location.ends_with("b.md"));
    }

    #[test]
    fn test_accept_directory_descends() {
        let dir = populated_dir();
        let mut picker = listed_picker(dir.path());
        picker.push_str("s");
        picker.select_next();
        assert_eq!(picker.accept(), PickerChoice::Descended);
        assert!(picker.input.trim_end_matches(['/', '\\']).ends_with("sub"));
        assert!(picker.needs_listing());
    }

    #[test]
    fn test_accept_typed_text() {
        let dir = tempdir().unwrap();
        let mut picker = FilePicker::new(PickerPurpose::SaveAs, dir.path());
        picker.push_str("new.md");
        let PickerChoice::Location(location) = picker.accept() else {
            panic!("expected a location");
        };
        assert!(location.ends_with("new.md"));
    }

    #[test]
    fn test_accept_with_only_directory_is_nothing() {
        let dir = tempdir().unwrap();
        let mut picker = FilePicker::new(PickerPurpose::Open, dir.path());
        assert_eq!(picker.accept(), PickerChoice::Nothing);
    }

    #[test]
    fn test_selection_clamps() {
        let dir = populated_dir();
        let mut picker = listed_picker(dir.path());
        picker.select_prev();
        assert_eq!(picker.selected(), None);
        for _ in 0..10 {
            picker.select_next();
        }
        assert_eq!(picker.selected(), Some(3));
        picker.push_str("x");
        assert_eq!(picker.selected(), None);
    }

    #[test]
    fn test_complete_uses_first_match() {
        let dir = populated_dir();
        let mut picker = listed_picker(dir.path());
        picker.push_str("su");
        picker.complete();
        assert!(picker.input.trim_end_matches(['/', '\\']).ends_with("sub"));
    }
}
