// Text input for prompts
//
// A small line editor: character insert/delete, cursor movement and, for
// message templates, embedded line breaks. The cursor is a char index so
// multi-byte input edits cleanly.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Result of feeding a key to a TextInput
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    /// Enter: the caller should take the text
    Submit,
    /// Esc: the caller should drop the prompt
    Cancel,
    /// Text or cursor changed
    Edited,
    /// Key means nothing to the editor
    Ignored,
}

#[derive(Debug, Clone, Default)]
pub struct TextInput {
    text: String,
    /// Cursor position in chars
    cursor: usize,
    multiline: bool,
}

impl TextInput {
    /// Single-line input pre-filled with `initial`, cursor at the end
    pub fn new(initial: &str) -> Self {
        Self {
            text: initial.to_string(),
            cursor: initial.chars().count(),
            multiline: false,
        }
    }

    /// Input that accepts line breaks (Alt+Enter or Ctrl+J)
    pub fn multiline(initial: &str) -> Self {
        Self {
            multiline: true,
            ..Self::new(initial)
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_multiline(&self) -> bool {
        self.multiline
    }

    fn byte_at(&self, char_idx: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_idx)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }

    fn len(&self) -> usize {
        self.text.chars().count()
    }

    /// Text before and after the cursor
    pub fn split_at_cursor(&self) -> (&str, &str) {
        self.text.split_at(self.byte_at(self.cursor))
    }

    pub fn insert(&mut self, c: char) {
        let at = self.byte_at(self.cursor);
        self.text.insert(at, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        let at = self.byte_at(self.cursor);
        self.text.remove(at);
        true
    }

    pub fn delete(&mut self) -> bool {
        if self.cursor >= self.len() {
            return false;
        }
        let at = self.byte_at(self.cursor);
        self.text.remove(at);
        true
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> InputOutcome {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);

        match key.code {
            KeyCode::Enter if alt && self.multiline => {
                self.insert('\n');
                InputOutcome::Edited
            }
            KeyCode::Char('j') if ctrl && self.multiline => {
                self.insert('\n');
                InputOutcome::Edited
            }
            KeyCode::Enter => InputOutcome::Submit,
            KeyCode::Esc => InputOutcome::Cancel,
            KeyCode::Char('u') if ctrl => {
                self.clear();
                InputOutcome::Edited
            }
            KeyCode::Char(c) if !ctrl => {
                self.insert(c);
                InputOutcome::Edited
            }
            KeyCode::Backspace => edited(self.backspace()),
            KeyCode::Delete => edited(self.delete()),
            KeyCode::Left if self.cursor > 0 => {
                self.cursor -= 1;
                InputOutcome::Edited
            }
            KeyCode::Right if self.cursor < self.len() => {
                self.cursor += 1;
                InputOutcome::Edited
            }
            KeyCode::Home => {
                self.cursor = 0;
                InputOutcome::Edited
            }
            KeyCode::End => {
                self.cursor = self.len();
                InputOutcome::Edited
            }
            _ => InputOutcome::Ignored,
        }
    }
}

fn edited(changed: bool) -> InputOutcome {
    if changed {
        InputOutcome::Edited
    } else {
        InputOutcome::Ignored
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(input: &mut TextInput, s: &str) {
        for c in s.chars() {
            input.handle_key(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn edits_in_the_middle_of_multibyte_text() {
        let mut input = TextInput::new("héllo");
        input.handle_key(key(KeyCode::Home));
        input.handle_key(key(KeyCode::Right));
        input.handle_key(key(KeyCode::Right));
        type_str(&mut input, "ø");
        assert_eq!(input.text(), "héøllo");
        assert_eq!(input.split_at_cursor(), ("héø", "llo"));

        input.handle_key(key(KeyCode::Backspace));
        input.handle_key(key(KeyCode::Delete));
        assert_eq!(input.text(), "hélo");
    }

    #[test]
    fn enter_submits_unless_alt_in_multiline() {
        let mut single = TextInput::new("");
        let alt_enter = KeyEvent::new(KeyCode::Enter, KeyModifiers::ALT);
        assert_eq!(single.handle_key(alt_enter), InputOutcome::Submit);

        let mut multi = TextInput::multiline("line one");
        assert_eq!(multi.handle_key(alt_enter), InputOutcome::Edited);
        type_str(&mut multi, "two");
        assert_eq!(multi.text(), "line one\ntwo");
        assert_eq!(multi.handle_key(key(KeyCode::Enter)), InputOutcome::Submit);
    }

    #[test]
    fn boundaries_are_ignored() {
        let mut input = TextInput::new("");
        assert_eq!(input.handle_key(key(KeyCode::Backspace)), InputOutcome::Ignored);
        assert_eq!(input.handle_key(key(KeyCode::Left)), InputOutcome::Ignored);
        assert_eq!(input.handle_key(key(KeyCode::Esc)), InputOutcome::Cancel);

        let ctrl_u = KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL);
        let mut input = TextInput::new("09:3");
        input.handle_key(ctrl_u);
        assert_eq!(input.text(), "");
    }
}
