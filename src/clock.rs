//! Wall-clock access and the date formats the journal stores and shows.

use chrono::{Local, NaiveDate, NaiveDateTime};

/// Supplies the current local wall-clock time.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;

    /// Milliseconds since the Unix epoch, independent of the local offset.
    fn timestamp_millis(&self) -> i64;

    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }

    fn timestamp_millis(&self) -> i64 {
        Local::now().timestamp_millis()
    }
}

/// Calendar-day key used for the written-today gate, e.g. `Sun Oct 18 2026`.
pub fn calendar_day(date: NaiveDate) -> String {
    date.format("%a %b %d %Y").to_string()
}

/// Date stamped on letters, e.g. `Sunday, 18 October, 2026`.
pub fn display_date(date: NaiveDate) -> String {
    date.format("%A, %-d %B, %Y").to_string()
}

/// `1st`, `2nd`, `3rd`, `4th`, ..., `11th`, `21st`.
pub fn ordinal(n: u32) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", n, suffix)
}
