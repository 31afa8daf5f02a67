use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Longest word the input line will hold
pub const MAX_INPUT_LEN: usize = 16;

/// What a key press asks the app to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputAction {
    Edited,
    Submit(String),
    ToggleStats,
    ScrollUp,
    ScrollDown,
    Quit,
    Ignored,
}

/// The word being typed. Holds lowercase ASCII letters only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordInput {
    buffer: String,
}

impl WordInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Appends a letter; anything else, or a full line, is refused.
    pub fn push(&mut self, c: char) -> bool {
        if !c.is_ascii_alphabetic() || self.buffer.len() >= MAX_INPUT_LEN {
            return false;
        }
        self.buffer.push(c.to_ascii_lowercase());
        true
    }

    pub fn backspace(&mut self) -> bool {
        self.buffer.pop().is_some()
    }

    pub fn take(&mut self) -> String {
        std::mem::take(&mut self.buffer)
    }

    /// Maps a key press onto the input line. An empty line never submits.
    pub fn handle_key(&mut self, key: KeyEvent) -> InputAction {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('c') => InputAction::Quit,
                _ => InputAction::Ignored,
            };
        }
        match key.code {
            KeyCode::Esc => InputAction::Quit,
            KeyCode::Tab => InputAction::ToggleStats,
            KeyCode::Up => InputAction::ScrollUp,
            KeyCode::Down => InputAction::ScrollDown,
            KeyCode::Enter if self.is_empty() => InputAction::Ignored,
            KeyCode::Enter => InputAction::Submit(self.take()),
            KeyCode::Backspace if self.backspace() => InputAction::Edited,
            KeyCode::Char(c) if self.push(c) => InputAction::Edited,
            _ => InputAction::Ignored,
        }
    }
}
