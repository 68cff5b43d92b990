use chrono::NaiveDateTime;

use crate::clock::display_date;
use crate::error::Rejected;
use crate::letter::{Letter, Visibility};

/// Line buffer for the letter being written tonight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    buffer: Vec<Vec<char>>,
    cursor_x: usize,
    cursor_y: usize,
}

impl Default for Draft {
    fn default() -> Self {
        Draft {
            buffer: vec![Vec::new()],
            cursor_x: 0,
            cursor_y: 0,
        }
    }
}

impl Draft {
    pub fn text(&self) -> String {
        self.buffer
            .iter()
            .map(|line| line.iter().collect::<String>())
            .collect::<Vec<String>>()
            .join("\n")
    }

    pub fn is_blank(&self) -> bool {
        self.buffer.iter().flatten().all(|c| c.is_whitespace())
    }

    pub fn clear(&mut self) {
        *self = Draft::default();
    }

    pub fn lines(&self) -> &[Vec<char>] {
        &self.buffer
    }

    /// (column, line)
    pub fn cursor(&self) -> (usize, usize) {
        (self.cursor_x, self.cursor_y)
    }

    pub fn word_count(&self) -> usize {
        let mut word_count = 0;
        let mut in_word = false;

        for line in &self.buffer {
            for ch in line {
                if ch.is_alphanumeric() {
                    if !in_word {
                        word_count += 1;
                        in_word = true;
                    }
                } else {
                    in_word = false;
                }
            }
            in_word = false;
        }

        word_count
    }

    fn current_line(&self) -> &Vec<char> {
        &self.buffer[self.cursor_y]
    }

    pub fn insert_char(&mut self, c: char) {
        self.buffer[self.cursor_y].insert(self.cursor_x, c);
        self.cursor_x += 1;
    }

    pub fn insert_str(&mut self, text: &str) {
        for c in text.chars() {
            if c == '\n' {
                self.insert_newline();
            } else {
                self.insert_char(c);
            }
        }
    }

    pub fn insert_tab(&mut self, tab_size: usize) {
        for _ in 0..tab_size {
            self.insert_char(' ');
        }
    }

    pub fn insert_newline(&mut self) {
        let current_line = &mut self.buffer[self.cursor_y];
        let new_line: Vec<char> = current_line.drain(self.cursor_x..).collect();
        self.buffer.insert(self.cursor_y + 1, new_line);
        self.cursor_y += 1;
        self.cursor_x = 0;
    }

    pub fn backspace(&mut self) {
        if self.cursor_x > 0 {
            self.buffer[self.cursor_y].remove(self.cursor_x - 1);
            self.cursor_x -= 1;
        } else if self.cursor_y > 0 {
            let current_line = self.buffer.remove(self.cursor_y);
            self.cursor_y -= 1;
            self.cursor_x = self.buffer[self.cursor_y].len();
            self.buffer[self.cursor_y].extend(current_line);
        }
    }

    pub fn delete(&mut self) {
        if self.cursor_x < self.current_line().len() {
            self.buffer[self.cursor_y].remove(self.cursor_x);
        } else if self.cursor_y < self.buffer.len() - 1 {
            let next_line = self.buffer.remove(self.cursor_y + 1);
            self.buffer[self.cursor_y].extend(next_line);
        }
    }

    pub fn move_left(&mut self) {
        if self.cursor_x > 0 {
            self.cursor_x -= 1;
        } else if self.cursor_y > 0 {
            self.cursor_y -= 1;
            self.cursor_x = self.current_line().len();
        }
    }

    pub fn move_right(&mut self) {
        if self.cursor_x < self.current_line().len() {
            self.cursor_x += 1;
        } else if self.cursor_y < self.buffer.len() - 1 {
            self.cursor_y += 1;
            self.cursor_x = 0;
        }
    }

    pub fn move_up(&mut self) {
        if self.cursor_y > 0 {
            self.cursor_y -= 1;
            self.clamp_x();
        }
    }

    pub fn move_down(&mut self) {
        if self.cursor_y < self.buffer.len() - 1 {
            self.cursor_y += 1;
            self.clamp_x();
        }
    }

    pub fn move_home(&mut self) {
        self.cursor_x = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor_x = self.current_line().len();
    }

    fn clamp_x(&mut self) {
        self.cursor_x = self.cursor_x.min(self.current_line().len());
    }
}

/// Builds tonight's letter from the draft text.
///
/// Only the emptiness check trims; the stored content is the draft verbatim. `now` dates the
/// letter and `now_millis` (epoch milliseconds) becomes its id, bumped past `newest_id` so ids
/// keep increasing even if the clock steps backwards.
pub fn compose(
    draft: &str,
    visibility: Visibility,
    author: &str,
    location: &str,
    now: NaiveDateTime,
    now_millis: i64,
    newest_id: Option<&str>,
) -> Result<Letter, Rejected> {
    if draft.trim().is_empty() {
        return Err(Rejected::EmptyDraft);
    }

    let mut id = now_millis;
    if let Some(newest) = newest_id.and_then(|s| s.parse::<i64>().ok()) {
        if id <= newest {
            id = newest.saturating_add(1);
        }
    }

    Ok(Letter {
        id: id.to_string(),
        content: draft.to_string(),
        author: author.to_string(),
        location: location.to_string(),
        date: display_date(now.date()),
        is_public: visibility.is_public(),
    })
}
