use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::trace;

/// What a key press did to the filter box. `Edited` means the text changed
/// and the table should narrow immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    Edited,
    Submitted,
    Cancelled,
    Ignored,
}

/// Line editor for the filter box. The filter applies live, so every
/// text-changing edit is reported to the caller.
#[derive(Debug, Default)]
pub struct FilterInput {
    text: String,
    cursor: usize,
    active: bool,
}

impl FilterInput {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Open the box for editing, keeping whatever filter is already set.
    pub fn open(&mut self) {
        self.active = true;
        self.cursor = self.text.chars().count();
    }

    pub fn close(&mut self) {
        self.active = false;
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    pub fn read(&mut self, key: KeyEvent) -> InputOutcome {
        let outcome = match (key.code, key.modifiers) {
            (KeyCode::Enter, KeyModifiers::NONE) => InputOutcome::Submitted,
            (KeyCode::Esc, KeyModifiers::NONE) => {
                self.clear();
                InputOutcome::Cancelled
            }
            (KeyCode::Backspace, KeyModifiers::NONE) => self.backspace(),
            (KeyCode::Left, KeyModifiers::NONE) => {
                self.cursor = self.cursor.saturating_sub(1);
                InputOutcome::Ignored
            }
            (KeyCode::Right, KeyModifiers::NONE) => {
                if self.cursor < self.text.chars().count() {
                    self.cursor += 1;
                }
                InputOutcome::Ignored
            }
            (code, _) => self.insert(code),
        };
        trace!("Filter input: {key:?} => {outcome:?} (\"{}\")", self.text);
        outcome
    }

    fn backspace(&mut self) -> InputOutcome {
        if self.cursor == 0 {
            return InputOutcome::Ignored;
        }
        if let Some((byte, _)) = self.text.char_indices().nth(self.cursor - 1) {
            self.text.remove(byte);
            self.cursor -= 1;
            return InputOutcome::Edited;
        }
        InputOutcome::Ignored
    }

    fn insert(&mut self, code: KeyCode) -> InputOutcome {
        if let Some(chr) = code.as_char() {
            self.text.insert(self.byte_pos(), chr);
            self.cursor += 1;
            return InputOutcome::Edited;
        }
        InputOutcome::Ignored
    }

    fn byte_pos(&self) -> usize {
        self.text
            .char_indices()
            .nth(self.cursor)
            .map(|(byte, _)| byte)
            .unwrap_or(self.text.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn typing_edits_the_text() {
        let mut input = FilterInput::default();
        input.open();
        assert_eq!(input.read(key(KeyCode::Char('a'))), InputOutcome::Edited);
        assert_eq!(input.read(key(KeyCode::Char('b'))), InputOutcome::Edited);
        assert_eq!(input.text(), "ab");
    }

    #[test]
    fn backspace_removes_before_the_cursor() {
        let mut input = FilterInput::default();
        input.open();
        for c in ['a', 'b', 'c'] {
            input.read(key(KeyCode::Char(c)));
        }
        input.read(key(KeyCode::Left));
        assert_eq!(input.read(key(KeyCode::Backspace)), InputOutcome::Edited);
        assert_eq!(input.text(), "ac");
        // At the left edge there is nothing to delete.
        input.read(key(KeyCode::Left));
        input.read(key(KeyCode::Left));
        assert_eq!(input.read(key(KeyCode::Backspace)), InputOutcome::Ignored);
    }

    #[test]
    fn escape_cancels_and_clears() {
        let mut input = FilterInput::default();
        input.open();
        input.read(key(KeyCode::Char('x')));
        assert_eq!(input.read(key(KeyCode::Esc)), InputOutcome::Cancelled);
        assert_eq!(input.text(), "");
    }

    #[test]
    fn enter_submits_without_touching_the_text() {
        let mut input = FilterInput::default();
        input.open();
        input.read(key(KeyCode::Char('x')));
        assert_eq!(input.read(key(KeyCode::Enter)), InputOutcome::Submitted);
        assert_eq!(input.text(), "x");
    }

    #[test]
    fn reopening_keeps_the_previous_filter() {
        let mut input = FilterInput::default();
        input.open();
        input.read(key(KeyCode::Char('h')));
        input.read(key(KeyCode::Char('i')));
        input.close();
        input.open();
        assert_eq!(input.text(), "hi");
        assert_eq!(input.cursor(), 2);
    }
}
