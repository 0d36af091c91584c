//! Editable text buffers used by the task and filter forms.

use crate::input_key::InputKey;

// ─────────────────────────────────────────────────────────────────────────────
// TextInput (single line)
// ─────────────────────────────────────────────────────────────────────────────

/// Single-line text field. The cursor counts chars, not bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    value: String,
    cursor: usize,
}

impl TextInput {
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        let cursor = value.chars().count();
        Self { value, cursor }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }

    /// Trimmed value, `None` when blank.
    pub fn non_empty(&self) -> Option<String> {
        let trimmed = self.value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }

    pub fn set(&mut self, value: impl Into<String>) {
        *self = Self::new(value);
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    pub fn insert(&mut self, c: char) {
        let at = self.byte_index(self.cursor);
        self.value.insert(at, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let at = self.byte_index(self.cursor);
        self.value.remove(at);
    }

    pub fn delete(&mut self) {
        if self.cursor < self.value.chars().count() {
            let at = self.byte_index(self.cursor);
            self.value.remove(at);
        }
    }

    /// Apply an editing key. Returns false for keys the field doesn't use.
    pub fn handle_key(&mut self, key: &InputKey) -> bool {
        match key {
            InputKey::Char(c) => self.insert(*c),
            InputKey::Backspace => self.backspace(),
            InputKey::Delete => self.delete(),
            InputKey::Left => self.cursor = self.cursor.saturating_sub(1),
            InputKey::Right => self.cursor = (self.cursor + 1).min(self.value.chars().count()),
            InputKey::Home => self.cursor = 0,
            InputKey::End => self.cursor = self.value.chars().count(),
            InputKey::CharCtrl('u') => self.clear(),
            _ => return false,
        }
        true
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// TextArea (multi line)
// ─────────────────────────────────────────────────────────────────────────────

/// Multi-line editor for task configuration text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextArea {
    lines: Vec<TextInput>,
    row: usize,
}

impl Default for TextArea {
    fn default() -> Self {
        Self {
            lines: vec![TextInput::default()],
            row: 0,
        }
    }
}

impl TextArea {
    pub fn new(text: &str) -> Self {
        let lines: Vec<TextInput> = text.lines().map(TextInput::new).collect();
        if lines.is_empty() {
            return Self::default();
        }
        Self { lines, row: 0 }
    }

    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(TextInput::value)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(TextInput::value)
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// (row, column) of the cursor
    pub fn cursor(&self) -> (usize, usize) {
        (self.row, self.current().cursor())
    }

    pub fn is_blank(&self) -> bool {
        self.lines.iter().all(TextInput::is_blank)
    }

    fn current(&self) -> &TextInput {
        &self.lines[self.row]
    }

    fn current_mut(&mut self) -> &mut TextInput {
        &mut self.lines[self.row]
    }

    fn move_to_row(&mut self, row: usize) {
        let column = self.current().cursor();
        self.row = row;
        let line = self.current_mut();
        line.cursor = column.min(line.value().chars().count());
    }

    fn split_line(&mut self) {
        let line = self.current();
        let at = line.byte_index(line.cursor());
        let (head, tail) = line.value().split_at(at);
        let (head, tail) = (head.to_string(), tail.to_string());
        self.lines[self.row] = TextInput::new(head);
        self.row += 1;
        let mut next = TextInput::new(tail);
        next.cursor = 0;
        self.lines.insert(self.row, next);
    }

    fn join_with_previous(&mut self) {
        let removed = self.lines.remove(self.row);
        self.row -= 1;
        let prev = self.current_mut();
        let join_at = prev.value().chars().count();
        let mut joined = TextInput::new(format!("{}{}", prev.value(), removed.value()));
        joined.cursor = join_at;
        *prev = joined;
    }

    pub fn handle_key(&mut self, key: &InputKey) -> bool {
        match key {
            InputKey::Enter => self.split_line(),
            InputKey::Backspace if self.current().cursor() == 0 && self.row > 0 => {
                self.join_with_previous()
            }
            InputKey::Up if self.row > 0 => self.move_to_row(self.row - 1),
            InputKey::Down if self.row + 1 < self.lines.len() => self.move_to_row(self.row + 1),
            InputKey::Up | InputKey::Down => {}
            InputKey::CharCtrl('u') => return false,
            other => return self.current_mut().handle_key(other),
        }
        true
    }
}
