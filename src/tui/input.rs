//! Single-line text input with a cursor.

/// A text input field. `cursor` counts characters, not bytes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InputField {
    pub value: String,
    pub cursor: usize,
}

impl InputField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an input field holding `value`, cursor at the end.
    pub fn with_value(value: &str) -> Self {
        Self {
            value: value.to_string(),
            cursor: value.chars().count(),
        }
    }

    fn byte_offset(&self, cursor: usize) -> usize {
        self.value
            .char_indices()
            .nth(cursor)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    fn len(&self) -> usize {
        self.value.chars().count()
    }

    /// Insert a character at the cursor.
    pub fn handle_char(&mut self, c: char) {
        let at = self.byte_offset(self.cursor);
        self.value.insert(at, c);
        self.cursor += 1;
    }

    /// Delete the character before the cursor.
    pub fn handle_backspace(&mut self) {
        if self.cursor > 0 {
            let at = self.byte_offset(self.cursor - 1);
            self.value.remove(at);
            self.cursor -= 1;
        }
    }

    /// Delete the character under the cursor.
    pub fn handle_delete(&mut self) {
        if self.cursor < self.len() {
            let at = self.byte_offset(self.cursor);
            self.value.remove(at);
        }
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor < self.len() {
            self.cursor += 1;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.len();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_delete_multibyte() {
        let mut input = InputField::with_value("café");
        input.move_cursor_left();
        input.handle_char('f');
        assert_eq!(input.value, "caffé");
        input.move_end();
        input.handle_backspace();
        assert_eq!(input.value, "caff");
        input.move_home();
        input.handle_delete();
        assert_eq!(input.value, "aff");
        assert_eq!(input.cursor, 0);
    }

    #[test]
    fn test_cursor_stays_in_bounds() {
        let mut input = InputField::new();
        input.move_cursor_left();
        input.handle_backspace();
        input.move_cursor_right();
        input.handle_delete();
        assert_eq!(input, InputField::new());
    }
}
