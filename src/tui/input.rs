use std::collections::VecDeque;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Single-line editor with in-session history.
///
/// The cursor counts characters, not bytes.
#[derive(Debug, Clone)]
pub struct InputBuffer {
    content: String,
    cursor_position: usize,
    history: VecDeque<String>,
    history_limit: usize,
    browsing: Option<usize>,
    draft: String,
}

impl InputBuffer {
    pub fn new(history_limit: usize) -> Self {
        Self {
            content: String::new(),
            cursor_position: 0,
            history: VecDeque::new(),
            history_limit,
            browsing: None,
            draft: String::new(),
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char(c) if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
                self.insert_char(c);
                true
            }
            KeyCode::Backspace => {
                self.delete_char();
                true
            }
            KeyCode::Delete => {
                self.delete_char_forward();
                true
            }
            KeyCode::Left => {
                self.move_cursor_left();
                true
            }
            KeyCode::Right => {
                self.move_cursor_right();
                true
            }
            KeyCode::Home => {
                self.move_to_start();
                true
            }
            KeyCode::End => {
                self.move_to_end();
                true
            }
            KeyCode::Up => {
                self.history_previous();
                true
            }
            KeyCode::Down => {
                self.history_next();
                true
            }
            _ => false,
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn cursor_position(&self) -> usize {
        self.cursor_position
    }

    /// Clear the line after it has been handled, remembering it for recall.
    pub fn commit(&mut self) {
        let line = std::mem::take(&mut self.content);
        self.cursor_position = 0;
        self.browsing = None;
        self.draft.clear();

        let line = line.trim();
        if line.is_empty() || self.history_limit == 0 || self.history.back().is_some_and(|last| last == line) {
            return;
        }
        self.history.push_back(line.to_string());
        while self.history.len() > self.history_limit {
            self.history.pop_front();
        }
    }

    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor_position = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn len(&self) -> usize {
        self.content.chars().count()
    }

    fn byte_index(&self, position: usize) -> usize {
        self.content
            .char_indices()
            .nth(position)
            .map_or(self.content.len(), |(index, _)| index)
    }

    fn insert_char(&mut self, c: char) {
        let index = self.byte_index(self.cursor_position);
        self.content.insert(index, c);
        self.cursor_position += 1;
    }

    fn delete_char(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
            let index = self.byte_index(self.cursor_position);
            self.content.remove(index);
        }
    }

    fn delete_char_forward(&mut self) {
        if self.cursor_position < self.len() {
            let index = self.byte_index(self.cursor_position);
            self.content.remove(index);
        }
    }

    fn move_cursor_left(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
        }
    }

    fn move_cursor_right(&mut self) {
        if self.cursor_position < self.len() {
            self.cursor_position += 1;
        }
    }

    fn move_to_start(&mut self) {
        self.cursor_position = 0;
    }

    fn move_to_end(&mut self) {
        self.cursor_position = self.len();
    }

    fn history_previous(&mut self) {
        let index = match self.browsing {
            None if self.history.is_empty() => return,
            None => {
                self.draft = self.content.clone();
                self.history.len() - 1
            }
            Some(0) => 0,
            Some(index) => index - 1,
        };
        self.browsing = Some(index);
        self.replace_content(self.history[index].clone());
    }

    fn history_next(&mut self) {
        let Some(index) = self.browsing else {
            return;
        };
        if index + 1 < self.history.len() {
            self.browsing = Some(index + 1);
            self.replace_content(self.history[index + 1].clone());
        } else {
            self.browsing = None;
            let draft = std::mem::take(&mut self.draft);
            self.replace_content(draft);
        }
    }

    fn replace_content(&mut self, content: String) {
        self.content = content;
        self.move_to_end();
    }
}

impl Default for InputBuffer {
    fn default() -> Self {
        Self::new(100)
    }
}

impl std::fmt::Display for InputBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.content)
    }
}
