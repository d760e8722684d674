use ropey::{Rope, RopeSlice};

/// Cursor position in the editor buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    /// Zero-based line index.
    pub line: usize,
    /// Zero-based column, counted in chars within the line.
    pub col: usize,
    /// Remembered column for vertical movement (sticky column).
    col_memory: usize,
}

impl Cursor {
    /// Create a cursor at line 0, column 0.
    pub const fn new() -> Self {
        Self {
            line: 0,
            col: 0,
            col_memory: 0,
        }
    }

    /// Create a cursor at a specific position.
    pub const fn at(line: usize, col: usize) -> Self {
        Self {
            line,
            col,
            col_memory: col,
        }
    }

    const fn set_col(&mut self, col: usize) {
        self.col = col;
        self.col_memory = col;
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::new()
    }
}

/// Direction for cursor movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// A rope-backed text buffer with a single cursor.
///
/// `text()` always returns exactly what was loaded or typed; line endings
/// are never normalized.
#[derive(Clone)]
pub struct EditorBuffer {
    rope: Rope,
    cursor: Cursor,
    modified: bool,
}

impl EditorBuffer {
    /// Create a new buffer from a string.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            cursor: Cursor::new(),
            modified: false,
        }
    }

    /// Create an empty buffer.
    pub fn empty() -> Self {
        Self::from_text("")
    }

    /// The current cursor position.
    pub const fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Whether the buffer changed since it was created, loaded or saved.
    pub const fn is_modified(&self) -> bool {
        self.modified
    }

    /// Mark the buffer as matching its stored copy.
    pub const fn mark_saved(&mut self) {
        self.modified = false;
    }

    /// Total number of lines in the buffer.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Get the content of a line (without its line break).
    pub fn line_at(&self, line_idx: usize) -> Option<String> {
        if line_idx >= self.rope.len_lines() {
            return None;
        }
        let line = self.rope.line(line_idx);
        let break_len = line_break_len(line);
        Some(line.slice(..line.len_chars() - break_len).to_string())
    }

    /// Length of a line in chars (without its line break).
    pub fn line_len(&self, line_idx: usize) -> usize {
        if line_idx >= self.rope.len_lines() {
            return 0;
        }
        let line = self.rope.line(line_idx);
        line.len_chars() - line_break_len(line)
    }

    /// The full text content of the buffer.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    pub fn len_bytes(&self) -> usize {
        self.rope.len_bytes()
    }

    /// Replace the whole content, keeping the cursor as close as possible
    /// to where it was.
    pub fn set_text(&mut self, text: &str) {
        self.rope = Rope::from_str(text);
        self.clamp_cursor();
        self.modified = true;
    }

    /// Insert a character at the cursor position.
    pub fn insert_char(&mut self, ch: char) {
        if is_line_break(ch) {
            self.insert_str(ch.encode_utf8(&mut [0; 4]));
            return;
        }
        let char_idx = self.cursor_char_idx();
        self.rope.insert_char(char_idx, ch);
        self.cursor.set_col(self.cursor.col + 1);
        self.modified = true;
    }

    /// Insert a string at the cursor position.
    pub fn insert_str(&mut self, s: &str) {
        if s.is_empty() {
            return;
        }
        let char_idx = self.cursor_char_idx();
        self.rope.insert(char_idx, s);
        self.place_cursor_at_char(char_idx + s.chars().count());
        self.modified = true;
    }

    /// Split the current line at the cursor (Enter key).
    ///
    /// A `\n` typed after a lone `\r` joins it into one CRLF break, so the
    /// cursor is placed from the rope rather than by counting lines.
    pub fn split_line(&mut self) {
        self.insert_str("\n");
    }

    /// Delete the character before the cursor (Backspace).
    ///
    /// Returns `true` if anything was deleted.
    pub fn delete_back(&mut self) -> bool {
        if self.cursor.col == 0 && self.cursor.line == 0 {
            return false;
        }

        let char_idx = self.cursor_char_idx();
        if self.cursor.col == 0 {
            // Join with previous line, removing its whole line break.
            let prev = self.cursor.line - 1;
            let prev_len = self.line_len(prev);
            let break_len = line_break_len(self.rope.line(prev));
            self.rope.remove(char_idx - break_len..char_idx);
            self.cursor.line = prev;
            self.cursor.set_col(prev_len);
        } else {
            self.rope.remove(char_idx - 1..char_idx);
            self.cursor.set_col(self.cursor.col - 1);
        }
        self.modified = true;
        true
    }

    /// Delete the character at the cursor (Delete key).
    ///
    /// Returns `true` if anything was deleted.
    pub fn delete_forward(&mut self) -> bool {
        let line_len = self.line_len(self.cursor.line);
        let char_idx = self.cursor_char_idx();

        if self.cursor.col < line_len {
            self.rope.remove(char_idx..=char_idx);
        } else {
            let break_len = line_break_len(self.rope.line(self.cursor.line));
            if break_len == 0 {
                return false;
            }
            self.rope.remove(char_idx..char_idx + break_len);
        }
        self.modified = true;
        true
    }

    /// Move the cursor in the given direction.
    pub fn move_cursor(&mut self, direction: Direction) {
        match direction {
            Direction::Left => self.move_left(),
            Direction::Right => self.move_right(),
            Direction::Up => self.move_vertical(-1),
            Direction::Down => self.move_vertical(1),
        }
    }

    /// Move cursor to the beginning of the line (Home).
    pub const fn move_home(&mut self) {
        self.cursor.set_col(0);
    }

    /// Move cursor to the end of the line (End).
    pub fn move_end(&mut self) {
        self.cursor.set_col(self.line_len(self.cursor.line));
    }

    /// Move cursor to the start of the previous word (Ctrl+Left).
    pub fn move_word_left(&mut self) {
        if self.cursor.col == 0 {
            if self.cursor.line > 0 {
                self.cursor.line -= 1;
                self.cursor.set_col(self.line_len(self.cursor.line));
            }
            return;
        }

        let line: Vec<char> = self.line_chars(self.cursor.line);
        let mut col = self.cursor.col.min(line.len());
        while col > 0 && !is_word_char(line[col - 1]) {
            col -= 1;
        }
        while col > 0 && is_word_char(line[col - 1]) {
            col -= 1;
        }
        self.cursor.set_col(col);
    }

    /// Move cursor past the next word (Ctrl+Right).
    pub fn move_word_right(&mut self) {
        let line: Vec<char> = self.line_chars(self.cursor.line);
        if self.cursor.col >= line.len() {
            if self.cursor.line + 1 < self.line_count() {
                self.cursor.line += 1;
                self.cursor.set_col(0);
            }
            return;
        }

        let mut col = self.cursor.col;
        while col < line.len() && is_word_char(line[col]) {
            col += 1;
        }
        while col < line.len() && !is_word_char(line[col]) {
            col += 1;
        }
        self.cursor.set_col(col);
    }

    /// Move cursor to a specific line and column, clamped to the buffer.
    pub fn move_to(&mut self, line: usize, col: usize) {
        self.cursor.line = line.min(self.line_count().saturating_sub(1));
        self.cursor.set_col(col.min(self.line_len(self.cursor.line)));
    }

    /// Move cursor to the start of the buffer (Ctrl+Home).
    pub const fn move_to_start(&mut self) {
        self.cursor.line = 0;
        self.cursor.set_col(0);
    }

    /// Move cursor to the end of the buffer (Ctrl+End).
    pub fn move_to_end(&mut self) {
        let last_line = self.line_count().saturating_sub(1);
        self.cursor.line = last_line;
        self.cursor.set_col(self.line_len(last_line));
    }

    // --- Private helpers ---

    fn cursor_char_idx(&self) -> usize {
        let col = self.cursor.col.min(self.line_len(self.cursor.line));
        self.rope.line_to_char(self.cursor.line) + col
    }

    fn line_chars(&self, line_idx: usize) -> Vec<char> {
        self.line_at(line_idx)
            .map(|line| line.chars().collect())
            .unwrap_or_default()
    }

    /// Put the cursor at a char index. An index inside a CRLF pair lands at
    /// the start of the following line.
    fn place_cursor_at_char(&mut self, char_idx: usize) {
        let mut line = self.rope.char_to_line(char_idx);
        let mut col = char_idx - self.rope.line_to_char(line);
        if col > self.line_len(line) && line + 1 < self.line_count() {
            line += 1;
            col = 0;
        }
        self.cursor.line = line;
        self.cursor.set_col(col.min(self.line_len(line)));
    }

    fn clamp_cursor(&mut self) {
        let line = self.cursor.line.min(self.line_count().saturating_sub(1));
        let col = self.cursor.col.min(self.line_len(line));
        self.cursor = Cursor::at(line, col);
    }

    fn move_left(&mut self) {
        if self.cursor.col > 0 {
            self.cursor.set_col(self.cursor.col - 1);
        } else if self.cursor.line > 0 {
            self.cursor.line -= 1;
            self.cursor.set_col(self.line_len(self.cursor.line));
        }
    }

    fn move_right(&mut self) {
        if self.cursor.col < self.line_len(self.cursor.line) {
            self.cursor.set_col(self.cursor.col + 1);
        } else if self.cursor.line + 1 < self.line_count() {
            self.cursor.line += 1;
            self.cursor.set_col(0);
        }
    }

    fn move_vertical(&mut self, delta: isize) {
        let Some(target) = self.cursor.line.checked_add_signed(delta) else {
            return;
        };
        if target >= self.line_count() {
            return;
        }
        self.cursor.line = target;
        self.cursor.col = self.cursor.col_memory.min(self.line_len(target));
    }
}

impl std::fmt::Debug for EditorBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorBuffer")
            .field(
                "rope",
                &format_args!("Rope({} lines)", self.rope.len_lines()),
            )
            .field("cursor", &self.cursor)
            .field("modified", &self.modified)
            .finish()
    }
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

const fn is_line_break(ch: char) -> bool {
    matches!(
        ch,
        '\n' | '\r' | '\u{0B}' | '\u{0C}' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Number of chars making up the line break at the end of `line`.
fn line_break_len(line: RopeSlice<'_>) -> usize {
    let len = line.len_chars();
    if len == 0 {
        return 0;
    }
    match line.char(len - 1) {
        '\n' if len >= 2 && line.char(len - 2) == '\r' => 2,
        '\n' | '\r' | '\u{0B}' | '\u{0C}' | '\u{85}' | '\u{2028}' | '\u{2029}' => 1,
        _ => 0,
    }
}
