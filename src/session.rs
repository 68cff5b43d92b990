use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::clock::calendar_day;
use crate::letter::Letter;

/// The persisted profile of the single local user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default)]
    pub user_name: String,

    #[serde(default = "default_day_count")]
    pub day_count: u32,

    /// Newest first.
    #[serde(default)]
    pub letters: Vec<Letter>,

    #[serde(default)]
    pub last_write_date: Option<String>,
}

fn default_day_count() -> u32 {
    1
}

impl Profile {
    pub fn new(user_name: impl Into<String>) -> Self {
        Profile {
            user_name: user_name.into(),
            day_count: default_day_count(),
            letters: Vec::new(),
            last_write_date: None,
        }
    }

    pub fn is_written_today(&self, today: NaiveDate) -> bool {
        self.last_write_date.as_deref() == Some(calendar_day(today).as_str())
    }

    /// Commits a composed letter: prepends it, marks today as written and bumps the day counter.
    pub fn record(&mut self, letter: Letter, today: NaiveDate) {
        self.letters.insert(0, letter);
        self.last_write_date = Some(calendar_day(today));
        self.day_count = self.day_count.saturating_add(1);
    }

    pub fn public_count(&self) -> usize {
        self.letters.iter().filter(|l| l.is_public).count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Session {
    Uninitialized,
    Active(Profile),
}

impl Session {
    /// Interprets a decoded blob. A blank name means setup never finished.
    pub fn from_profile(mut profile: Profile) -> Self {
        if profile.user_name.trim().is_empty() {
            return Session::Uninitialized;
        }
        if profile.day_count == 0 {
            profile.day_count = default_day_count();
        }
        Session::Active(profile)
    }

    pub fn profile(&self) -> Option<&Profile> {
        match self {
            Session::Active(profile) => Some(profile),
            Session::Uninitialized => None,
        }
    }

    pub fn is_setup(&self) -> bool {
        matches!(self, Session::Active(_))
    }
}
