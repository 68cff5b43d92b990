//! Terminal front end: raw-mode event loop and one renderer per screen.

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{
        self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyCode, KeyEvent, KeyModifiers,
    },
    execute,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal::{
        self, Clear, ClearType, DisableLineWrap, EnableLineWrap, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use std::io::{self, Stdout, Write};
use std::time::Duration;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::clock::{display_date, ordinal, Clock};
use crate::config::Config;
use crate::controller::{Controller, Screen};
use crate::error::{Rejected, Result};
use crate::letter::Visibility;
use crate::store::SessionStore;

const MARGIN: u16 = 2;
// First row of scrollable content on the write and read screens.
const BODY_TOP: u16 = 5;

pub struct App<S, C> {
    controller: Controller<S, C>,
    config: Config,

    terminal_height: u16,
    terminal_width: u16,
    dirty: bool,

    // Write screen viewport
    offset_y: usize,
    offset_x: usize,

    // Read screen scroll, in wrapped rows
    scroll: usize,

    browse_cursor: usize,
    status: Option<String>,
}

impl<S: SessionStore, C: Clock> App<S, C> {
    pub fn new(controller: Controller<S, C>, config: Config) -> io::Result<Self> {
        let (width, height) = terminal::size()?;

        Ok(App {
            controller,
            config,
            terminal_height: height,
            terminal_width: width,
            dirty: true,
            offset_y: 0,
            offset_x: 0,
            scroll: 0,
            browse_cursor: 0,
            status: None,
        })
    }

    pub fn run(&mut self) -> Result<()> {
        self.enter_raw_mode()?;
        let result = self.event_loop();
        self.leave_raw_mode()?;
        result
    }

    fn event_loop(&mut self) -> Result<()> {
        let mut shown_day = self.controller.clock().today();
        loop {
            self.render()?;

            // Wake up now and then so the date header and write gate follow midnight.
            if event::poll(Duration::from_millis(500))? {
                match event::read()? {
                    Event::Key(key_event) => {
                        if self.handle_key_event(key_event) {
                            break;
                        }
                        self.dirty = true;
                    }
                    Event::Paste(text) if self.controller.screen() == Screen::Write => {
                        self.controller.draft_mut().insert_str(&text);
                        self.dirty = true;
                    }
                    Event::Resize(width, height) => {
                        self.terminal_width = width;
                        self.terminal_height = height;
                        self.dirty = true;
                    }
                    _ => {}
                }
            } else if self.controller.clock().today() != shown_day {
                shown_day = self.controller.clock().today();
                self.dirty = true;
            }
        }
        Ok(())
    }

    fn enter_raw_mode(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            io::stdout(),
            EnterAlternateScreen,
            EnableBracketedPaste,
            DisableLineWrap,
            Hide,
            Clear(ClearType::All)
        )?;
        self.dirty = true;
        Ok(())
    }

    fn leave_raw_mode(&mut self) -> io::Result<()> {
        execute!(
            io::stdout(),
            Show,
            EnableLineWrap,
            DisableBracketedPaste,
            LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Returns true when the user asked to quit.
    fn handle_key_event(&mut self, key_event: KeyEvent) -> bool {
        if key_event.code == KeyCode::Char('q') && key_event.modifiers.contains(KeyModifiers::CONTROL)
        {
            return true;
        }

        self.status = None;
        let result = match self.controller.screen() {
            Screen::Setup => self.handle_setup(key_event),
            Screen::Home => match key_event.code {
                KeyCode::Char('q') | KeyCode::Esc => return true,
                KeyCode::Char('w') => self.controller.start_write(),
                KeyCode::Char('r') => {
                    self.scroll = 0;
                    self.controller.start_read()
                }
                _ => Ok(()),
            },
            Screen::Write => self.handle_write(key_event),
            Screen::Read => self.handle_read(key_event),
            Screen::Browse => self.handle_browse(key_event),
        };

        if let Err(rejected) = result {
            self.status = Some(rejected.to_string());
        }
        false
    }

    fn handle_setup(&mut self, key_event: KeyEvent) -> std::result::Result<(), Rejected> {
        match key_event.code {
            KeyCode::Enter => return self.controller.submit_name(),
            KeyCode::Backspace => {
                self.controller.name_input_mut().pop();
            }
            KeyCode::Char(c) if !has_command_modifier(&key_event) => {
                self.controller.name_input_mut().push(c);
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_write(&mut self, key_event: KeyEvent) -> std::result::Result<(), Rejected> {
        let control = key_event.modifiers.contains(KeyModifiers::CONTROL);
        match key_event.code {
            KeyCode::Esc => return self.leave_write(),
            KeyCode::Char('s') if control => return self.submit(Visibility::Private),
            KeyCode::Char('p') if control => return self.submit(Visibility::Public),
            _ => {}
        }

        let tab_size = self.config.tab_size;
        let draft = self.controller.draft_mut();
        match key_event.code {
            KeyCode::Left => draft.move_left(),
            KeyCode::Right => draft.move_right(),
            KeyCode::Up => draft.move_up(),
            KeyCode::Down => draft.move_down(),
            KeyCode::Home => draft.move_home(),
            KeyCode::End => draft.move_end(),
            KeyCode::Backspace => draft.backspace(),
            KeyCode::Delete => draft.delete(),
            KeyCode::Enter => draft.insert_newline(),
            KeyCode::Tab => draft.insert_tab(tab_size),
            KeyCode::Char(c) if !has_command_modifier(&key_event) => draft.insert_char(c),
            _ => {}
        }
        Ok(())
    }

    fn leave_write(&mut self) -> std::result::Result<(), Rejected> {
        self.controller.back()?;
        self.reset_write_viewport();
        Ok(())
    }

    fn submit(&mut self, visibility: Visibility) -> std::result::Result<(), Rejected> {
        self.controller.submit(visibility)?;
        self.reset_write_viewport();
        Ok(())
    }

    fn reset_write_viewport(&mut self) {
        self.offset_x = 0;
        self.offset_y = 0;
    }

    fn handle_read(&mut self, key_event: KeyEvent) -> std::result::Result<(), Rejected> {
        match key_event.code {
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('q') => self.controller.back(),
            KeyCode::Char('b') | KeyCode::Tab => {
                self.controller.open_browse()?;
                self.browse_cursor = self.controller.read_index();
                Ok(())
            }
            KeyCode::Left | KeyCode::Char('h') => {
                self.controller.prev()?;
                self.scroll = 0;
                Ok(())
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.controller.next()?;
                self.scroll = 0;
                Ok(())
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.scroll = self.scroll.saturating_sub(1);
                Ok(())
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.scroll += 1;
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn handle_browse(&mut self, key_event: KeyEvent) -> std::result::Result<(), Rejected> {
        let count = self.controller.visible_letters().len();
        match key_event.code {
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('q') => self.controller.back(),
            KeyCode::Enter => {
                self.controller.select(self.browse_cursor)?;
                self.scroll = 0;
                Ok(())
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.browse_cursor = self.browse_cursor.saturating_sub(1);
                Ok(())
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.browse_cursor + 1 < count {
                    self.browse_cursor += 1;
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn render(&mut self) -> io::Result<()> {
        if !self.dirty {
            return Ok(());
        }

        let mut stdout = io::stdout();
        execute!(stdout, Hide, Clear(ClearType::All))?;

        let cursor = match self.controller.screen() {
            Screen::Setup => self.render_setup(&mut stdout)?,
            Screen::Home => self.render_home(&mut stdout)?,
            Screen::Write => self.render_write(&mut stdout)?,
            Screen::Read => self.render_read(&mut stdout)?,
            Screen::Browse => self.render_browse(&mut stdout)?,
        };

        self.render_status_bar(&mut stdout)?;

        if let Some((x, y)) = cursor {
            execute!(stdout, MoveTo(x, y), Show)?;
        }

        stdout.flush()?;
        self.dirty = false;
        Ok(())
    }

    fn text_width(&self) -> usize {
        (self.terminal_width.saturating_sub(MARGIN * 2) as usize).max(10)
    }

    fn render_setup(&self, stdout: &mut Stdout) -> io::Result<Option<(u16, u16)>> {
        draw(stdout, 2, "Nightly Letters", Some(Color::Cyan))?;
        draw(stdout, 3, "One letter each night. A world of stories.", Some(Color::DarkGrey))?;
        draw(stdout, 5, "What should we call you?", None)?;

        let name = self.controller.name_input();
        draw(stdout, 6, &format!("> {}", name), None)?;

        let hint_color = if name.trim().is_empty() {
            Color::DarkGrey
        } else {
            Color::Green
        };
        draw(stdout, 8, "Enter  Begin Your Journey", Some(hint_color))?;

        let x = MARGIN + 2 + UnicodeWidthStr::width(name) as u16;
        Ok(Some((x, 6)))
    }

    fn render_home(&self, stdout: &mut Stdout) -> io::Result<Option<(u16, u16)>> {
        let Some(profile) = self.controller.profile() else {
            return Ok(None);
        };
        let today = self.controller.clock().today();

        draw(stdout, 1, &format!("Hey {}", profile.user_name), None)?;
        draw(
            stdout,
            2,
            &format!("It's your {} day", ordinal(profile.day_count)),
            Some(Color::DarkGrey),
        )?;
        draw(stdout, 4, &display_date(today), Some(Color::DarkGrey))?;
        draw(stdout, 5, "How was your day today?", Some(Color::Cyan))?;

        let written = self.controller.is_written_today();
        draw(stdout, 7, "[r] Read Letters", None)?;
        if written {
            draw(stdout, 8, "    Written Today", Some(Color::DarkGrey))?;
            draw(
                stdout,
                10,
                "You've already shared your letter tonight. Come back tomorrow.",
                Some(Color::DarkGrey),
            )?;
        } else {
            draw(stdout, 8, "[w] Write Tonight", Some(Color::Green))?;
        }
        Ok(None)
    }

    /// Keeps the draft cursor inside the viewport. `offset_x` is in display columns.
    fn update_offset(&mut self) {
        let draft = self.controller.draft();
        let (cursor_x, cursor_y) = draft.cursor();
        let cursor_column = columns(&draft.lines()[cursor_y][..cursor_x]);
        let visible_height = self.body_height();

        if cursor_y < self.offset_y {
            self.offset_y = cursor_y;
        } else if cursor_y >= self.offset_y + visible_height {
            self.offset_y = cursor_y - visible_height + 1;
        }

        // Leave room for a double-width character under the cursor.
        let visible_width = self.text_width().saturating_sub(1);
        if cursor_column < self.offset_x {
            self.offset_x = cursor_column;
        } else if cursor_column > self.offset_x + visible_width {
            self.offset_x = cursor_column - visible_width;
        }
    }

    /// Rows between the body top and the two footer rows.
    fn body_height(&self) -> usize {
        (self.terminal_height.saturating_sub(BODY_TOP + 4) as usize).max(1)
    }

    fn render_write(&mut self, stdout: &mut Stdout) -> io::Result<Option<(u16, u16)>> {
        self.update_offset();
        let today = self.controller.clock().today();

        draw(stdout, 1, &display_date(today), Some(Color::DarkGrey))?;
        draw(stdout, 3, "Dear Me,", Some(Color::Cyan))?;

        let draft = self.controller.draft();
        let width = self.text_width();
        for (row, line) in draft
            .lines()
            .iter()
            .skip(self.offset_y)
            .take(self.body_height())
            .enumerate()
        {
            let visible = column_slice(line, self.offset_x, width);
            draw(stdout, BODY_TOP + row as u16, &visible, None)?;
        }

        let footer = self.terminal_height.saturating_sub(3);
        let color = if draft.is_blank() {
            Color::DarkGrey
        } else {
            Color::Green
        };
        draw(
            stdout,
            footer,
            &format!(
                "{:>4} words   Ctrl+S Private · Ctrl+P Public · Esc Back",
                draft.word_count()
            ),
            Some(color),
        )?;

        let (cursor_x, cursor_y) = draft.cursor();
        let cursor_column = columns(&draft.lines()[cursor_y][..cursor_x]);
        let screen_x = MARGIN + (cursor_column - self.offset_x) as u16;
        let screen_y = BODY_TOP + (cursor_y - self.offset_y) as u16;
        Ok(Some((screen_x, screen_y)))
    }

    fn render_read(&mut self, stdout: &mut Stdout) -> io::Result<Option<(u16, u16)>> {
        let total = self.controller.visible_letters().len();
        let index = self.controller.read_index();
        let Some(letter) = self.controller.current_letter() else {
            draw(stdout, 1, "No letters yet.", Some(Color::DarkGrey))?;
            return Ok(None);
        };

        draw(stdout, 1, "Today's letters", Some(Color::DarkGrey))?;
        draw(stdout, 2, &letter.date.to_uppercase(), Some(Color::DarkGrey))?;
        draw(stdout, 3, "Dear Me,", Some(Color::Cyan))?;

        let rows = wrap_text(&letter.content, self.text_width());
        let height = self.body_height();
        let max_scroll = rows.len().saturating_sub(height);
        let scroll = self.scroll.min(max_scroll);
        for (row, line) in rows.iter().skip(scroll).take(height).enumerate() {
            draw(stdout, BODY_TOP + row as u16, line, None)?;
        }

        let footer = self.terminal_height.saturating_sub(4);
        draw(stdout, footer, &letter.author, None)?;
        draw(
            stdout,
            footer + 1,
            &format!(
                "{}   {}/{}   ←/→ letters · ↑/↓ scroll · b browse · Esc home",
                letter.location,
                index + 1,
                total
            ),
            Some(Color::DarkGrey),
        )?;

        self.scroll = scroll;
        Ok(None)
    }

    fn render_browse(&self, stdout: &mut Stdout) -> io::Result<Option<(u16, u16)>> {
        let letters = self.controller.visible_letters();
        draw(stdout, 1, "All Letters", Some(Color::DarkGrey))?;

        // Each entry takes three rows: heading, preview, spacer.
        let per_page = (self.terminal_height.saturating_sub(6) as usize / 3).max(1);
        let first = self.browse_cursor.saturating_sub(per_page - 1);
        let width = self.text_width();

        for (slot, (i, letter)) in letters.iter().enumerate().skip(first).take(per_page).enumerate() {
            let y = 3 + (slot * 3) as u16;
            let selected = i == self.browse_cursor;
            let marker = if selected { "▸ " } else { "  " };
            let heading = format!("{}{}  ·  {}", marker, letter.author, letter.day_label());

            if selected {
                execute!(stdout, SetAttribute(Attribute::Bold))?;
            }
            draw(stdout, y, &heading, None)?;
            execute!(stdout, SetAttribute(Attribute::Reset))?;

            let preview = letter.preview(self.config.preview_chars).replace('\n', " ");
            let preview = fit_width(&preview, width.saturating_sub(2));
            draw(stdout, y + 1, &format!("  {}", preview), Some(Color::DarkGrey))?;
        }
        Ok(None)
    }

    fn render_status_bar(&self, stdout: &mut Stdout) -> io::Result<()> {
        let y = self.terminal_height.saturating_sub(1);
        let (message, color) = match (&self.status, self.controller.save_error()) {
            (Some(status), _) => (status.clone(), Color::Yellow),
            (None, Some(error)) => (format!("Not saved: {}", error), Color::Red),
            (None, None) => ("Ctrl+Q quit".to_string(), Color::DarkGrey),
        };
        draw(stdout, y, &message, Some(color))
    }
}

fn has_command_modifier(key_event: &KeyEvent) -> bool {
    key_event
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
}

fn draw(stdout: &mut Stdout, y: u16, text: &str, color: Option<Color>) -> io::Result<()> {
    execute!(stdout, MoveTo(MARGIN, y), Clear(ClearType::CurrentLine))?;
    if let Some(color) = color {
        execute!(stdout, SetForegroundColor(color), Print(text), ResetColor)
    } else {
        execute!(stdout, Print(text))
    }
}

/// Word wrap by display columns that keeps the text's own line breaks (and blank lines).
/// Words wider than `width` are split.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let options = textwrap::Options::new(width.max(1))
        .wrap_algorithm(textwrap::WrapAlgorithm::FirstFit)
        .break_words(true);

    text.split('\n')
        .flat_map(|paragraph| {
            textwrap::wrap(paragraph, &options)
                .into_iter()
                .map(|row| row.into_owned())
                .collect::<Vec<String>>()
        })
        .collect()
}

fn char_width(c: char) -> usize {
    UnicodeWidthChar::width(c).unwrap_or(0)
}

/// Display columns taken by `chars`.
fn columns(chars: &[char]) -> usize {
    chars.iter().map(|&c| char_width(c)).sum()
}

/// The characters of `line` that lie wholly inside columns `from..from + width`.
fn column_slice(line: &[char], from: usize, width: usize) -> String {
    let mut column = 0;
    let mut visible = String::new();
    for &c in line {
        let w = char_width(c);
        if column >= from && column + w <= from + width {
            visible.push(c);
        }
        column += w;
        if column >= from + width {
            break;
        }
    }
    visible
}

/// Cuts `text` down to at most `width` display columns.
fn fit_width(text: &str, width: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    column_slice(&chars, 0, width)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_on_word_boundaries() {
        assert_eq!(
            wrap_text("the quick brown fox jumps", 10),
            ["the quick", "brown fox", "jumps"]
        );
    }

    #[test]
    fn keeps_paragraph_breaks() {
        assert_eq!(
            wrap_text("Dear Me,\n\nIt was a day.", 40),
            ["Dear Me,", "", "It was a day."]
        );
    }

    #[test]
    fn splits_words_longer_than_the_width() {
        assert_eq!(wrap_text("ab abcdefgh", 4), ["ab", "abcd", "efgh"]);
    }

    #[test]
    fn exact_fit_stays_on_one_row() {
        assert_eq!(wrap_text("abc def", 7), ["abc def"]);
    }

    #[test]
    fn wide_characters_wrap_by_columns() {
        let text = "今日はとても長い一日でした 今日はとても長い一日でした";
        let rows = wrap_text(text, 20);

        assert!(rows.len() > 2);
        for row in &rows {
            assert!(UnicodeWidthStr::width(row.as_str()) <= 20, "{:?} is too wide", row);
        }
        let joined: String = rows.concat();
        assert_eq!(joined.replace(' ', ""), text.replace(' ', ""));
    }

    #[test]
    fn column_slice_counts_double_width_characters() {
        let line: Vec<char> = "ab日本語cd".chars().collect();
        assert_eq!(columns(&line), 10);
        assert_eq!(column_slice(&line, 0, 5), "ab日");
        assert_eq!(column_slice(&line, 2, 6), "日本語");
        // A wide character straddling the left edge is dropped rather than half drawn.
        assert_eq!(column_slice(&line, 3, 4), "本");
        assert_eq!(fit_width("日本語", 5), "日本");
    }
}
