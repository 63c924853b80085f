//! Editable session text.

/// Glyph drawn at the cursor position.
pub const CURSOR_GLYPH: char = '\u{2588}';

/// Committed output plus the line being edited.
///
/// The cursor is a character offset into `working`, always within
/// `0..=working.chars().count()`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionBuffer {
    finalized: String,
    working: String,
    cursor: usize,
    clears: u64,
}

/// Saved working text and cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingSnapshot {
    text: String,
    cursor: usize,
}

impl SessionBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finalized(&self) -> &str {
        &self.finalized
    }

    pub fn working(&self) -> &str {
        &self.working
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of times the buffer has been cleared.
    pub fn clears(&self) -> u64 {
        self.clears
    }

    /// Length of the working text in characters.
    pub fn working_len(&self) -> usize {
        self.working.chars().count()
    }

    fn byte_offset(&self, chars: usize) -> usize {
        self.working
            .char_indices()
            .nth(chars)
            .map(|(i, _)| i)
            .unwrap_or(self.working.len())
    }

    /// Insert text at the cursor and move the cursor past it.
    pub fn insert(&mut self, text: &str) {
        let at = self.byte_offset(self.cursor);
        self.working.insert_str(at, text);
        self.cursor += text.chars().count();
    }

    /// Remove the character before the cursor.
    pub fn delete_before(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let at = self.byte_offset(self.cursor - 1);
        self.working.remove(at);
        self.cursor -= 1;
    }

    /// Remove the character under the cursor.
    pub fn delete_after(&mut self) {
        if self.cursor >= self.working_len() {
            return;
        }
        let at = self.byte_offset(self.cursor);
        self.working.remove(at);
    }

    /// Move the cursor by a signed offset, clamped to the working text.
    pub fn move_cursor(&mut self, offset: isize) {
        let target = self.cursor as isize + offset;
        self.cursor = target.clamp(0, self.working_len() as isize) as usize;
    }

    pub fn cursor_to_start(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_to_end(&mut self) {
        self.cursor = self.working_len();
    }

    /// Replace the working text, cursor at end.
    pub fn set_working(&mut self, text: impl Into<String>) {
        self.working = text.into();
        self.cursor_to_end();
    }

    /// Move the working text into the finalized text.
    pub fn commit(&mut self) {
        self.finalized.push_str(&self.working);
        self.working.clear();
        self.cursor = 0;
    }

    /// Append text after the working text and commit both.
    pub fn emit(&mut self, text: &str) {
        self.working.push_str(text);
        self.commit();
    }

    /// Wipe the finalized and working text.
    pub fn clear(&mut self) {
        self.finalized.clear();
        self.working.clear();
        self.cursor = 0;
        self.clears += 1;
    }

    /// Terminate the finalized text with a newline unless it already is.
    pub fn ensure_trailing_newline(&mut self) {
        if !self.finalized.is_empty() && !self.finalized.ends_with('\n') {
            self.finalized.push('\n');
        }
    }

    /// Replace the last whitespace-delimited token of the working text.
    pub fn replace_last_token(&mut self, replacement: &str) {
        let keep = self
            .working
            .char_indices()
            .rev()
            .find(|(_, c)| c.is_whitespace())
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);
        self.working.truncate(keep);
        self.working.push_str(replacement);
        self.cursor_to_end();
    }

    pub fn snapshot(&self) -> WorkingSnapshot {
        WorkingSnapshot {
            text: self.working.clone(),
            cursor: self.cursor,
        }
    }

    pub fn restore(&mut self, snapshot: WorkingSnapshot) {
        self.working = snapshot.text;
        self.cursor = snapshot.cursor.min(self.working_len());
    }

    /// Text as shown on the display surface, cursor glyph included.
    pub fn render(&self) -> String {
        let at = self.byte_offset(self.cursor);
        let mut out = String::with_capacity(self.finalized.len() + self.working.len() + 4);
        out.push_str(&self.finalized);
        out.push_str(&self.working[..at]);
        out.push(CURSOR_GLYPH);
        out.push_str(&self.working[at..]);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer_with(text: &str) -> SessionBuffer {
        let mut buffer = SessionBuffer::new();
        buffer.insert(text);
        buffer
    }

    #[test]
    fn test_insert_at_cursor() {
        let mut buffer = buffer_with("ac");
        buffer.move_cursor(-1);
        buffer.insert("b");
        assert_eq!(buffer.working(), "abc");
        assert_eq!(buffer.cursor(), 2);
    }

    #[test]
    fn test_delete_before_and_after() {
        let mut buffer = buffer_with("abcd");
        buffer.move_cursor(-2);
        buffer.delete_before();
        assert_eq!(buffer.working(), "acd");
        assert_eq!(buffer.cursor(), 1);

        buffer.delete_after();
        assert_eq!(buffer.working(), "ad");
        assert_eq!(buffer.cursor(), 1);
    }

    #[test]
    fn test_deletes_at_edges_are_noops() {
        let mut buffer = buffer_with("x");
        buffer.delete_after();
        assert_eq!(buffer.working(), "x");

        buffer.cursor_to_start();
        buffer.delete_before();
        assert_eq!(buffer.working(), "x");
        assert_eq!(buffer.cursor(), 0);
    }

    #[test]
    fn test_move_cursor_clamps() {
        let mut buffer = buffer_with("abc");
        buffer.move_cursor(-10);
        assert_eq!(buffer.cursor(), 0);
        buffer.move_cursor(10);
        assert_eq!(buffer.cursor(), 3);
    }

    #[test]
    fn test_multibyte_editing() {
        let mut buffer = buffer_with("h\u{e9}\u{1f980}");
        assert_eq!(buffer.working_len(), 3);
        buffer.move_cursor(-1);
        buffer.delete_before();
        assert_eq!(buffer.working(), "h\u{1f980}");
        assert_eq!(buffer.render(), "h\u{2588}\u{1f980}");
    }

    #[test]
    fn test_cursor_invariant_under_random_edits() {
        let mut buffer = SessionBuffer::new();
        let mut seed: u64 = 0x9e37_79b9_7f4a_7c15;
        for _ in 0..2_000 {
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            match seed % 6 {
                0 => buffer.insert("\u{e9}x"),
                1 => buffer.delete_before(),
                2 => buffer.delete_after(),
                3 => buffer.move_cursor((seed % 7) as isize - 3),
                4 => buffer.replace_last_token("tok"),
                _ => buffer.set_working("a b"),
            }
            assert!(buffer.cursor() <= buffer.working_len());
        }
    }

    #[test]
    fn test_commit_and_emit() {
        let mut buffer = buffer_with("ls");
        buffer.commit();
        assert_eq!(buffer.finalized(), "ls");
        assert_eq!(buffer.working(), "");
        assert_eq!(buffer.cursor(), 0);

        buffer.emit("\nout\n");
        assert_eq!(buffer.finalized(), "ls\nout\n");
    }

    #[test]
    fn test_clear() {
        let mut buffer = buffer_with("abc");
        buffer.commit();
        buffer.insert("def");
        buffer.clear();
        assert_eq!(buffer.finalized(), "");
        assert_eq!(buffer.working(), "");
        assert_eq!(buffer.cursor(), 0);
        assert_eq!(buffer.clears(), 1);
    }

    #[test]
    fn test_ensure_trailing_newline() {
        let mut buffer = SessionBuffer::new();
        buffer.ensure_trailing_newline();
        assert_eq!(buffer.finalized(), "");

        buffer.emit("done");
        buffer.ensure_trailing_newline();
        buffer.ensure_trailing_newline();
        assert_eq!(buffer.finalized(), "done\n");
    }

    #[test]
    fn test_replace_last_token() {
        let mut buffer = buffer_with("cat /us");
        buffer.move_cursor(-3);
        buffer.replace_last_token("/usr/");
        assert_eq!(buffer.working(), "cat /usr/");
        assert_eq!(buffer.cursor(), 9);

        let mut single = buffer_with("ech");
        single.replace_last_token("echo");
        assert_eq!(single.working(), "echo");

        let mut trailing = buffer_with("ls ");
        trailing.replace_last_token("src");
        assert_eq!(trailing.working(), "ls src");
    }

    #[test]
    fn test_snapshot_restore() {
        let mut buffer = buffer_with("git st");
        buffer.move_cursor(-2);
        let saved = buffer.snapshot();

        buffer.commit();
        buffer.emit("noise\n");
        buffer.restore(saved);

        assert_eq!(buffer.working(), "git st");
        assert_eq!(buffer.cursor(), 4);
    }

    #[test]
    fn test_render() {
        let mut buffer = SessionBuffer::new();
        buffer.emit("$ ");
        buffer.insert("lss");
        buffer.move_cursor(-1);
        assert_eq!(buffer.render(), "$ ls\u{2588}s");
    }
}
