//! Screen state machine for the journal.
//!
//! The controller owns the session and the transient view state (screen, read index,
//! draft, setup name). Every user action is a method that either performs an allowed
//! transition or returns [`Rejected`] and leaves everything untouched. The profile is
//! written back to the injected [`SessionStore`] after every committed change.

use std::fmt;
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::composer::{compose, Draft};
use crate::error::Rejected;
use crate::letter::{Letter, Visibility};
use crate::repository::visible_letters;
use crate::session::{Profile, Session};
use crate::store::SessionStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Setup,
    Home,
    Write,
    Read,
    Browse,
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Screen::Setup => "setup",
            Screen::Home => "home",
            Screen::Write => "write",
            Screen::Read => "read",
            Screen::Browse => "browse",
        };
        f.write_str(name)
    }
}

pub struct Controller<S, C> {
    store: S,
    clock: C,
    session: Session,
    screen: Screen,
    read_index: usize,
    draft: Draft,
    name_input: String,
    location: String,
    save_error: Option<String>,
}

impl<S: SessionStore, C: Clock> Controller<S, C> {
    pub fn new(store: S, clock: C, location: impl Into<String>) -> Self {
        let session = store.load();
        let screen = if session.is_setup() {
            Screen::Home
        } else {
            Screen::Setup
        };
        debug!(%screen, "journal opened");

        Controller {
            store,
            clock,
            session,
            screen,
            read_index: 0,
            draft: Draft::default(),
            name_input: String::new(),
            location: location.into(),
            save_error: None,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.session.profile()
    }

    pub fn visible_letters(&self) -> Vec<&Letter> {
        self.profile().map(visible_letters).unwrap_or_default()
    }

    pub fn read_index(&self) -> usize {
        self.read_index
    }

    pub fn current_letter(&self) -> Option<&Letter> {
        self.visible_letters().get(self.read_index).copied()
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut Draft {
        &mut self.draft
    }

    pub fn name_input(&self) -> &str {
        &self.name_input
    }

    pub fn name_input_mut(&mut self) -> &mut String {
        &mut self.name_input
    }

    /// Last failed save, cleared by the next successful one.
    pub fn save_error(&self) -> Option<&str> {
        self.save_error.as_deref()
    }

    pub fn is_written_today(&self) -> bool {
        let today = self.clock.today();
        self.profile().is_some_and(|p| p.is_written_today(today))
    }

    fn require(&self, screen: Screen) -> Result<(), Rejected> {
        if self.screen == screen {
            Ok(())
        } else {
            Err(Rejected::NotAvailable(self.screen))
        }
    }

    fn go(&mut self, screen: Screen) {
        debug!(from = %self.screen, to = %screen, "screen change");
        self.screen = screen;
    }

    /// setup -> home. One-way: the setup screen is never shown again for this session.
    pub fn submit_name(&mut self) -> Result<(), Rejected> {
        self.require(Screen::Setup)?;
        let name = self.name_input.trim();
        if name.is_empty() {
            return Err(Rejected::EmptyName);
        }

        info!(user = name, "journal set up");
        self.session = Session::Active(Profile::new(name));
        self.name_input.clear();
        self.persist();
        self.go(Screen::Home);
        Ok(())
    }

    pub fn start_write(&mut self) -> Result<(), Rejected> {
        self.require(Screen::Home)?;
        if self.is_written_today() {
            return Err(Rejected::AlreadyWrittenToday);
        }
        self.draft.clear();
        self.go(Screen::Write);
        Ok(())
    }

    pub fn start_read(&mut self) -> Result<(), Rejected> {
        self.require(Screen::Home)?;
        self.read_index = 0;
        self.go(Screen::Read);
        Ok(())
    }

    pub fn open_browse(&mut self) -> Result<(), Rejected> {
        self.require(Screen::Read)?;
        self.go(Screen::Browse);
        Ok(())
    }

    /// write -> home (draft discarded), read -> home, browse -> read.
    pub fn back(&mut self) -> Result<(), Rejected> {
        match self.screen {
            Screen::Write => {
                self.draft.clear();
                self.go(Screen::Home);
            }
            Screen::Read => self.go(Screen::Home),
            Screen::Browse => self.go(Screen::Read),
            Screen::Setup | Screen::Home => return Err(Rejected::NotAvailable(self.screen)),
        }
        Ok(())
    }

    /// No-op at the first letter.
    pub fn prev(&mut self) -> Result<(), Rejected> {
        self.require(Screen::Read)?;
        self.read_index = self.read_index.saturating_sub(1);
        Ok(())
    }

    /// No-op at the last letter.
    pub fn next(&mut self) -> Result<(), Rejected> {
        self.require(Screen::Read)?;
        let last = self.visible_letters().len().saturating_sub(1);
        self.read_index = (self.read_index + 1).min(last);
        Ok(())
    }

    pub fn select(&mut self, index: usize) -> Result<(), Rejected> {
        self.require(Screen::Browse)?;
        if index >= self.visible_letters().len() {
            return Err(Rejected::NoSuchLetter(index));
        }
        self.read_index = index;
        self.go(Screen::Read);
        Ok(())
    }

    /// write -> home, committing the draft as tonight's letter.
    pub fn submit(&mut self, visibility: Visibility) -> Result<(), Rejected> {
        self.require(Screen::Write)?;
        let now = self.clock.now();
        let now_millis = self.clock.timestamp_millis();
        let Session::Active(profile) = &mut self.session else {
            return Err(Rejected::NotAvailable(self.screen));
        };

        let newest_id = profile.letters.first().map(|l| l.id.as_str());
        let letter = compose(
            &self.draft.text(),
            visibility,
            &profile.user_name,
            &self.location,
            now,
            now_millis,
            newest_id,
        )?;

        info!(id = %letter.id, public = letter.is_public, "letter written");
        profile.record(letter, now.date());
        self.draft.clear();
        self.persist();
        self.go(Screen::Home);
        Ok(())
    }

    fn persist(&mut self) {
        let Some(profile) = self.session.profile() else {
            return;
        };
        match self.store.save(profile) {
            Ok(()) => self.save_error = None,
            Err(e) => {
                warn!(error = %e, "could not save journal");
                self.save_error = Some(e.to_string());
            }
        }
    }

    #[cfg(test)]
    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::testing::FixedClock;
    use crate::letter::sample_letters;
    use crate::store::testing::MemoryStore;
    use chrono::Duration;

    type TestController = Controller<MemoryStore, FixedClock>;

    fn evening() -> FixedClock {
        FixedClock::at(2026, 10, 18, 21, 15)
    }

    fn fresh() -> TestController {
        Controller::new(MemoryStore::default(), evening(), "Your Location")
    }

    fn set_up(name: &str) -> TestController {
        let mut c = fresh();
        c.name_input_mut().push_str(name);
        c.submit_name().unwrap();
        c
    }

    fn write(c: &mut TestController, text: &str, visibility: Visibility) {
        c.start_write().unwrap();
        c.draft_mut().insert_str(text);
        c.submit(visibility).unwrap();
    }

    #[test]
    fn first_night_scenario() {
        let mut c = fresh();
        assert_eq!(c.screen(), Screen::Setup);
        assert_eq!(c.store().saves, 0);

        c.name_input_mut().push_str("Ava");
        c.submit_name().unwrap();
        assert_eq!(c.screen(), Screen::Home);
        assert_eq!(c.profile().unwrap().day_count, 1);
        assert!(!c.is_written_today());
        assert_eq!(c.store().saves, 1);

        write(&mut c, "Hello", Visibility::Public);
        assert_eq!(c.screen(), Screen::Home);
        assert_eq!(c.profile().unwrap().day_count, 2);
        assert!(c.is_written_today());

        let visible = c.visible_letters();
        assert_eq!(visible.len(), 1 + sample_letters().len());
        assert_eq!(visible[0].author, "Ava");
        assert_eq!(visible[0].content, "Hello");

        assert_eq!(c.start_write(), Err(Rejected::AlreadyWrittenToday));
        assert_eq!(c.screen(), Screen::Home);
    }

    #[test]
    fn whitespace_draft_is_rejected_and_stays_in_write() {
        let mut c = set_up("Ava");
        c.start_write().unwrap();
        c.draft_mut().insert_str("   \n  ");

        assert_eq!(c.submit(Visibility::Private), Err(Rejected::EmptyDraft));
        assert_eq!(c.screen(), Screen::Write);
        assert_eq!(c.profile().unwrap().day_count, 1);
        assert!(c.profile().unwrap().letters.is_empty());
        assert!(!c.is_written_today());
    }

    #[test]
    fn blank_name_keeps_setup() {
        let mut c = fresh();
        c.name_input_mut().push_str("   ");
        assert_eq!(c.submit_name(), Err(Rejected::EmptyName));
        assert_eq!(c.screen(), Screen::Setup);
        assert!(c.profile().is_none());
        assert_eq!(c.store().saves, 0);
    }

    #[test]
    fn name_is_trimmed() {
        let c = set_up("  Ava \n");
        assert_eq!(c.profile().unwrap().user_name, "Ava");
        assert_eq!(c.name_input(), "");
    }

    #[test]
    fn private_letters_count_but_stay_hidden() {
        let mut c = set_up("Ava");
        write(&mut c, "secret", Visibility::Private);
        assert_eq!(c.profile().unwrap().day_count, 2);
        assert_eq!(c.profile().unwrap().letters.len(), 1);
        assert_eq!(c.visible_letters().len(), sample_letters().len());
    }

    #[test]
    fn writing_opens_again_the_next_day() {
        let mut c = set_up("Ava");
        write(&mut c, "one", Visibility::Public);
        assert!(c.is_written_today());

        c.clock().advance(Duration::hours(2)); // 23:15 same day
        assert!(c.is_written_today());

        c.clock().advance(Duration::hours(1)); // 00:15 next day
        assert!(!c.is_written_today());
        write(&mut c, "two", Visibility::Private);
        assert_eq!(c.profile().unwrap().day_count, 3);

        let ids: Vec<i64> = c
            .profile()
            .unwrap()
            .letters
            .iter()
            .map(|l| l.id.parse().unwrap())
            .collect();
        assert!(ids[0] > ids[1]);
    }

    #[test]
    fn reload_restores_session_and_gate() {
        let mut c = set_up("Ava");
        write(&mut c, "kept", Visibility::Public);
        let blob = c.store().blob.clone();

        let store = MemoryStore {
            blob,
            ..Default::default()
        };
        let reopened = Controller::new(store, evening(), "Your Location");
        assert_eq!(reopened.screen(), Screen::Home);
        assert!(reopened.is_written_today());
        assert_eq!(reopened.profile(), c.profile());
    }

    #[test]
    fn existing_profile_starts_at_home() {
        let store = MemoryStore::with_profile(&Profile::new("Bo"));
        let c = Controller::new(store, evening(), "Your Location");
        assert_eq!(c.screen(), Screen::Home);
        assert_eq!(c.profile().unwrap().user_name, "Bo");
    }

    #[test]
    fn back_from_write_discards_draft() {
        let mut c = set_up("Ava");
        c.start_write().unwrap();
        c.draft_mut().insert_str("half a thought");
        c.back().unwrap();
        assert_eq!(c.screen(), Screen::Home);
        assert!(c.draft().is_blank());
        assert_eq!(c.profile().unwrap().day_count, 1);
    }

    #[test]
    fn read_navigation_is_clamped() {
        let mut c = set_up("Ava");
        c.start_read().unwrap();
        let len = c.visible_letters().len();
        assert_eq!(c.read_index(), 0);

        c.prev().unwrap();
        assert_eq!(c.read_index(), 0);

        for _ in 0..len + 3 {
            c.next().unwrap();
        }
        assert_eq!(c.read_index(), len - 1);
        c.next().unwrap();
        assert_eq!(c.read_index(), len - 1);

        c.prev().unwrap();
        assert_eq!(c.read_index(), len - 2);
        assert_eq!(c.current_letter(), Some(c.visible_letters()[len - 2]));
    }

    #[test]
    fn browse_round_trip() {
        let mut c = set_up("Ava");
        c.start_read().unwrap();
        c.next().unwrap();
        c.open_browse().unwrap();
        assert_eq!(c.screen(), Screen::Browse);

        c.back().unwrap();
        assert_eq!(c.screen(), Screen::Read);
        assert_eq!(c.read_index(), 1);

        c.open_browse().unwrap();
        assert_eq!(c.select(99), Err(Rejected::NoSuchLetter(99)));
        assert_eq!(c.screen(), Screen::Browse);

        c.select(3).unwrap();
        assert_eq!(c.screen(), Screen::Read);
        assert_eq!(c.read_index(), 3);

        c.back().unwrap();
        assert_eq!(c.screen(), Screen::Home);
        c.start_read().unwrap();
        assert_eq!(c.read_index(), 0);
    }

    #[test]
    fn disallowed_transitions_change_nothing() {
        let mut c = fresh();
        assert_eq!(c.start_read(), Err(Rejected::NotAvailable(Screen::Setup)));
        assert_eq!(c.back(), Err(Rejected::NotAvailable(Screen::Setup)));

        let mut c = set_up("Ava");
        assert_eq!(c.back(), Err(Rejected::NotAvailable(Screen::Home)));
        assert_eq!(c.next(), Err(Rejected::NotAvailable(Screen::Home)));
        assert_eq!(c.open_browse(), Err(Rejected::NotAvailable(Screen::Home)));
        assert_eq!(c.select(0), Err(Rejected::NotAvailable(Screen::Home)));
        assert_eq!(c.submit(Visibility::Public), Err(Rejected::NotAvailable(Screen::Home)));
        assert_eq!(c.submit_name(), Err(Rejected::NotAvailable(Screen::Home)));

        c.start_write().unwrap();
        assert_eq!(c.start_read(), Err(Rejected::NotAvailable(Screen::Write)));
        assert_eq!(c.screen(), Screen::Write);
    }

    #[test]
    fn failed_save_keeps_state_and_reports() {
        let mut c = set_up("Ava");
        let saved_blob = c.store().blob.clone();
        c.store.fail = true;

        write(&mut c, "still here", Visibility::Public);

        assert_eq!(c.profile().unwrap().day_count, 2);
        assert!(c.save_error().is_some());
        assert_eq!(c.store().blob, saved_blob);

        c.store.fail = false;
        c.clock().advance(Duration::days(1));
        write(&mut c, "and again", Visibility::Public);
        assert!(c.save_error().is_none());
        let reloaded = c.store().load();
        assert_eq!(reloaded.profile().map(|p| p.letters.len()), Some(2));
    }

    #[test]
    fn day_count_after_many_nights() {
        let mut c = set_up("Ava");
        let start = c.profile().unwrap().day_count;
        for night in 0..7 {
            let visibility = if night % 3 == 0 {
                Visibility::Public
            } else {
                Visibility::Private
            };
            write(&mut c, &format!("night {}", night), visibility);
            c.clock().advance(Duration::days(1));
        }
        let profile = c.profile().unwrap();
        assert_eq!(profile.day_count, start + 7);
        assert_eq!(c.visible_letters().len(), profile.public_count() + sample_letters().len());
        assert_eq!(profile.public_count(), 3);
    }
}
