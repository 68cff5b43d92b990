use chrono::NaiveDate;
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event, execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::io::{self, Write};

use crate::clock::ordinal;
use crate::letter::sample_letters;
use crate::session::Session;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub user_name: String,
    pub day_count: u32,
    pub written: usize,
    pub public: usize,
    pub private: usize,
    pub written_today: bool,
    pub samples: usize,
}

impl Summary {
    pub fn from_session(session: &Session, today: NaiveDate) -> Option<Self> {
        let profile = session.profile()?;
        let public = profile.public_count();
        Some(Summary {
            user_name: profile.user_name.clone(),
            day_count: profile.day_count,
            written: profile.letters.len(),
            public,
            private: profile.letters.len() - public,
            written_today: profile.is_written_today(today),
            samples: sample_letters().len(),
        })
    }

    fn rows(&self) -> Vec<(&'static str, String, Color)> {
        vec![
            ("Journal of:", self.user_name.clone(), Color::White),
            ("Today is your:", format!("{} day", ordinal(self.day_count)), Color::Yellow),
            ("Letters written:", self.written.to_string(), Color::Green),
            ("Shared publicly:", self.public.to_string(), Color::Blue),
            ("Kept private:", self.private.to_string(), Color::Magenta),
            (
                "Tonight:",
                if self.written_today {
                    "written".to_string()
                } else {
                    "not yet written".to_string()
                },
                if self.written_today {
                    Color::Green
                } else {
                    Color::DarkGrey
                },
            ),
            ("Sample letters:", self.samples.to_string(), Color::DarkGrey),
        ]
    }
}

pub fn show_stats(summary: Option<&Summary>) -> io::Result<()> {
    terminal::enable_raw_mode()?;
    let shown = present(&mut io::stdout(), summary, || event::read().map(|_| ()));
    let restored = terminal::disable_raw_mode();
    shown.and(restored)
}

/// Shows the summary on the alternate screen until `wait` returns. The screen is left again
/// whether or not drawing or waiting failed, and the first error is returned.
fn present<W: Write>(
    out: &mut W,
    summary: Option<&Summary>,
    wait: impl FnOnce() -> io::Result<()>,
) -> io::Result<()> {
    execute!(out, EnterAlternateScreen)?;
    let shown = draw_summary(out, summary).and_then(|()| wait());
    let left = execute!(out, Show, LeaveAlternateScreen);
    shown.and(left)
}

fn draw_summary<W: Write>(stdout: &mut W, summary: Option<&Summary>) -> io::Result<()> {
    execute!(stdout, Clear(ClearType::All), Hide)?;

    execute!(
        stdout,
        MoveTo(2, 1),
        SetForegroundColor(Color::Cyan),
        Print("Nightly Letters"),
        ResetColor
    )?;

    let mut y = 3;
    match summary {
        Some(summary) => {
            for (label, value, color) in summary.rows() {
                execute!(
                    stdout,
                    MoveTo(2, y),
                    Print(label),
                    MoveTo(22, y),
                    SetForegroundColor(color),
                    Print(value),
                    ResetColor
                )?;
                y += 1;
            }
        }
        None => {
            execute!(
                stdout,
                MoveTo(2, y),
                SetForegroundColor(Color::DarkGrey),
                Print("No journal yet. Run `nightly` to begin."),
                ResetColor
            )?;
            y += 1;
        }
    }

    execute!(
        stdout,
        MoveTo(2, y + 1),
        SetForegroundColor(Color::DarkGrey),
        Print("Press any key to exit"),
        ResetColor
    )?;
    stdout.flush()
}
