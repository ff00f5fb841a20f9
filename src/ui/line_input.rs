use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

const NAME_MAX_CHARS: usize = 40;
const NUMBER_MAX_CHARS: usize = 10;

/// Which characters a field will take.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Charset {
    Any,
    /// Optional leading '-', digits, at most one '.'.
    Decimal,
}

/// Single-line editable form value with a char-indexed cursor.
#[derive(Clone, Debug)]
pub struct LineInput {
    text: String,
    cursor: usize,
    charset: Charset,
    max_chars: usize,
}

impl LineInput {
    pub fn new(text: &str) -> Self {
        Self::with_charset(text, Charset::Any, NAME_MAX_CHARS)
    }

    pub fn numeric(text: &str) -> Self {
        Self::with_charset(text, Charset::Decimal, NUMBER_MAX_CHARS)
    }

    fn with_charset(text: &str, charset: Charset, max_chars: usize) -> Self {
        let mut input = Self {
            text: String::new(),
            cursor: 0,
            charset,
            max_chars,
        };
        input.set_value(text);
        input
    }

    pub fn value(&self) -> &str {
        &self.text
    }

    pub fn charset(&self) -> Charset {
        self.charset
    }

    /// Replace the text and move the cursor to the end. Programmatic values
    /// skip the charset filter.
    pub fn set_value(&mut self, text: &str) {
        self.text = text.to_string();
        self.cursor = self.len();
    }

    /// (before cursor, char under cursor, after cursor); `None` at end of text.
    pub fn render_parts(&self) -> (&str, Option<char>, &str) {
        let at = self.byte_at(self.cursor);
        match self.text[at..].chars().next() {
            Some(ch) => (&self.text[..at], Some(ch), &self.text[at + ch.len_utf8()..]),
            None => (&self.text, None, ""),
        }
    }

    /// Apply an editing key. Returns true when the text changed.
    pub fn handle(&mut self, key: KeyEvent) -> bool {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let before = self.text.len();
        match key.code {
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => self.cursor = (self.cursor + 1).min(self.len()),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.len(),
            KeyCode::Backspace if self.cursor > 0 => {
                self.cursor -= 1;
                self.remove_range(self.cursor, self.cursor + 1);
            }
            KeyCode::Delete if self.cursor < self.len() => {
                self.remove_range(self.cursor, self.cursor + 1);
            }
            KeyCode::Char('a') if ctrl => self.cursor = 0,
            KeyCode::Char('e') if ctrl => self.cursor = self.len(),
            KeyCode::Char('u') if ctrl => {
                self.remove_range(0, self.cursor);
                self.cursor = 0;
            }
            KeyCode::Char('w') if ctrl => self.delete_word_back(),
            KeyCode::Char(ch) if !ctrl && self.accepts(ch) => {
                let at = self.byte_at(self.cursor);
                self.text.insert(at, ch);
                self.cursor += 1;
            }
            _ => {}
        }
        self.text.len() != before
    }

    fn len(&self) -> usize {
        self.text.chars().count()
    }

    fn accepts(&self, ch: char) -> bool {
        if self.len() >= self.max_chars || ch.is_control() {
            return false;
        }
        match self.charset {
            Charset::Any => true,
            Charset::Decimal => match ch {
                '0'..='9' => !(self.cursor == 0 && self.text.starts_with('-')),
                '.' => !self.text.contains('.'),
                '-' => self.cursor == 0 && !self.text.starts_with('-'),
                _ => false,
            },
        }
    }

    fn byte_at(&self, char_idx: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_idx)
            .map_or(self.text.len(), |(b, _)| b)
    }

    fn remove_range(&mut self, from: usize, to: usize) {
        let (start, end) = (self.byte_at(from), self.byte_at(to));
        self.text.replace_range(start..end, "");
    }

    // unix-word-rubout: trailing spaces, then the word before them
    fn delete_word_back(&mut self) {
        let head: Vec<char> = self.text.chars().take(self.cursor).collect();
        let mut start = head.len();
        while start > 0 && head[start - 1].is_whitespace() {
            start -= 1;
        }
        while start > 0 && !head[start - 1].is_whitespace() {
            start -= 1;
        }
        self.remove_range(start, self.cursor);
        self.cursor = start;
    }
}
