//! The daily game as one owned object.
//!
//! A [`GameSession`] is built from an injected store, word lookup and clock
//! and holds everything for the current day: the letter pool, the running
//! [`SessionState`] and a stats cache. Each counted submission is written to
//! the store before `submit` returns.

use crate::date_key::{Clock, DateKey};
use crate::dictionary::WordLookup;
use crate::error::GameError;
use crate::letters::{self, LetterDraw, LetterPool};
use crate::persistence::Persistence;
use crate::session::{Phase, SessionState, SubmitOutcome};
use crate::stats::{StatsAggregate, StatsAggregator};
use crate::store::KeyValueStore;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Today's shared pool, progress persisted under the date
    Daily,
    /// Random pool, nothing persisted
    Practice,
}

pub struct GameSession<S, D, C> {
    persistence: Persistence<S>,
    dictionary: D,
    clock: C,
    draw: LetterDraw,
    mode: Mode,
    pool: LetterPool,
    state: SessionState,
    unsaved: bool,
    last_outcome: Option<SubmitOutcome>,
    stats: StatsAggregator,
}

impl<S: KeyValueStore, D: WordLookup, C: Clock> GameSession<S, D, C> {
    /// Resumes today's stored session, or starts an empty one.
    #[instrument(skip_all, fields(draw = ?draw))]
    pub fn open(store: S, dictionary: D, clock: C, draw: LetterDraw) -> Result<Self, GameError> {
        let persistence = Persistence::new(store);
        let date = clock.today();
        let state = persistence
            .load_session(&date)?
            .unwrap_or_else(|| SessionState::new(date));
        let pool = letters::generate(&date, draw);
        info!(%date, %pool, attempts = state.attempts(), "daily game opened");

        Ok(Self {
            persistence,
            dictionary,
            clock,
            draw,
            mode: Mode::Daily,
            pool,
            state,
            unsaved: false,
            last_outcome: None,
            stats: StatsAggregator::new(),
        })
    }

    /// A practice round on a random pool. Stats can still be read from the store.
    pub fn practice(store: S, dictionary: D, clock: C, draw: LetterDraw) -> Self {
        let date = clock.today();
        let pool = letters::practice_pool(draw);
        info!(%pool, "practice game opened");

        Self {
            persistence: Persistence::new(store),
            dictionary,
            clock,
            draw,
            mode: Mode::Practice,
            pool,
            state: SessionState::new(date),
            unsaved: false,
            last_outcome: None,
            stats: StatsAggregator::new(),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn date(&self) -> DateKey {
        self.state.date()
    }

    pub fn pool(&self) -> &LetterPool {
        &self.pool
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn last_outcome(&self) -> Option<&SubmitOutcome> {
        self.last_outcome.as_ref()
    }

    /// True while a counted submission has not reached the store.
    pub fn is_unsaved(&self) -> bool {
        self.unsaved
    }

    pub fn persistence(&self) -> &Persistence<S> {
        &self.persistence
    }

    /// Plays one word. Rejections come back as `Ok`; `Err` means the result
    /// is held in memory but could not be saved.
    #[instrument(skip(self))]
    pub fn submit(&mut self, word: &str) -> Result<SubmitOutcome, GameError> {
        let outcome = self.state.submit(word, &self.pool, &self.dictionary);
        debug!(
            date = %self.state.date(),
            %outcome,
            attempts = self.state.attempts(),
            total = self.state.total_points(),
            "submission"
        );
        self.last_outcome = Some(outcome.clone());
        if outcome.counted() {
            self.unsaved = true;
            self.stats.invalidate();
        }
        if self.unsaved {
            self.persist()?;
        }
        Ok(outcome)
    }

    /// Writes the current state if a previous save failed.
    pub fn retry_save(&mut self) -> Result<(), GameError> {
        if self.unsaved {
            self.persist()?;
        }
        Ok(())
    }

    fn persist(&mut self) -> Result<(), GameError> {
        if self.mode == Mode::Practice {
            self.unsaved = false;
            return Ok(());
        }
        match self.persistence.save_session(&self.state) {
            Ok(()) => {
                self.unsaved = false;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "progress not saved");
                Err(e)
            }
        }
    }

    /// Moves to the clock's current day if it has changed. The finished day
    /// stays in the store. Returns whether a rollover happened.
    #[instrument(skip(self))]
    pub fn rollover(&mut self) -> Result<bool, GameError> {
        let today = self.clock.today();
        if today == self.state.date() {
            return Ok(false);
        }
        // never abandon a day that has not been written yet
        self.retry_save()?;

        let previous = self.state.date();
        match self.mode {
            Mode::Daily => {
                self.state = self
                    .persistence
                    .load_session(&today)?
                    .unwrap_or_else(|| SessionState::new(today));
                self.pool = letters::generate(&today, self.draw);
            }
            Mode::Practice => {
                self.state = SessionState::new(today);
                self.pool = letters::practice_pool(self.draw);
            }
        }
        self.last_outcome = None;
        self.stats.invalidate();
        info!(%previous, %today, pool = %self.pool, "day rolled over");
        Ok(true)
    }

    /// Rebuilds lifetime stats from every stored day and, in daily mode,
    /// refreshes the advisory cache record.
    #[instrument(skip(self))]
    pub fn stats(&mut self) -> Result<StatsAggregate, GameError> {
        let mut sessions = self.persistence.all_sessions()?;
        if self.mode == Mode::Daily && self.unsaved {
            // a failed save must not make today's points disappear
            sessions.insert(self.state.date(), self.state.clone());
        }
        let stats = self.stats.recompute(&sessions).clone();
        if self.mode == Mode::Daily {
            if let Err(e) = self.persistence.save_stats_cache(&stats) {
                warn!(error = %e, "stats cache not written");
            }
        }
        Ok(stats)
    }

    /// The aggregate from the last `stats` call, cleared by any change.
    pub fn last_stats(&self) -> Option<&StatsAggregate> {
        self.stats.cached()
    }

    /// The last aggregate written to the store, without recomputing.
    pub fn cached_stats(&self) -> Result<Option<StatsAggregate>, GameError> {
        self.persistence.load_stats_cache()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date_key::FixedClock;
    use crate::dictionary::Dictionary;
    use crate::error::StoreError;
    use crate::session::{Rejection, MAX_ATTEMPTS};
    use crate::store::MemoryStore;
    use assert_matches::assert_matches;
    use std::cell::Cell;
    use std::rc::Rc;

    // 2025-09-15 draws G I N R T
    const DAY: &str = "2025-09-15";

    fn clock() -> FixedClock {
        FixedClock(DAY.parse().unwrap())
    }

    fn dict() -> Dictionary {
        Dictionary::from_words(["ring", "grit", "trig", "tint", "grin", "string", "tiring"])
    }

    /// Store whose writes can be switched off.
    #[derive(Default)]
    struct FlakyStore {
        inner: MemoryStore,
        failing: Rc<Cell<bool>>,
    }

    impl KeyValueStore for FlakyStore {
        fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
            self.inner.get(key)
        }

        fn set(&mut self, key: &str, value: &[u8]) -> Result<(), StoreError> {
            if self.failing.get() {
                return Err(StoreError::Io(std::io::Error::other("read-only")));
            }
            self.inner.set(key, value)
        }

        fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
            self.inner.keys_with_prefix(prefix)
        }
    }

    #[test]
    fn opens_with_daily_pool() {
        let game = GameSession::open(MemoryStore::new(), dict(), clock(), LetterDraw::Weighted)
            .unwrap();
        assert_eq!(game.pool().letters(), &['g', 'i', 'n', 'r', 't']);
        assert_eq!(game.phase(), Phase::Fresh);
        assert_eq!(game.mode(), Mode::Daily);
    }

    #[test]
    fn submissions_persist_immediately() {
        let mut game =
            GameSession::open(MemoryStore::new(), dict(), clock(), LetterDraw::Weighted).unwrap();
        // tint: t,i,n,t -> one repeat
        assert_matches!(game.submit("tint").unwrap(), SubmitOutcome::Accepted(w) if w.score == 10);
        let stored = game
            .persistence()
            .load_session(&DAY.parse().unwrap())
            .unwrap()
            .unwrap();
        assert_eq!(&stored, game.state());
        assert!(!game.is_unsaved());
    }

    #[test]
    fn failed_save_keeps_score_and_retries() {
        let failing = Rc::new(Cell::new(false));
        let store = FlakyStore {
            inner: MemoryStore::new(),
            failing: Rc::clone(&failing),
        };
        let mut game = GameSession::open(store, dict(), clock(), LetterDraw::Weighted).unwrap();

        failing.set(true);
        let err = game.submit("tiring").unwrap_err();
        assert_matches!(err, GameError::PersistenceFailure { .. });
        assert!(game.is_unsaved());
        assert_eq!(game.state().total_points(), 10);
        assert_matches!(game.last_outcome(), Some(SubmitOutcome::Accepted(_)));

        // stats still include the unsaved points
        assert_eq!(game.stats().unwrap().lifetime_points, 10);

        failing.set(false);
        game.retry_save().unwrap();
        assert!(!game.is_unsaved());
        let stored = game
            .persistence()
            .load_session(&DAY.parse().unwrap())
            .unwrap()
            .unwrap();
        assert_eq!(stored.total_points(), 10);
    }

    #[test]
    fn exhausted_day_does_not_write() {
        let mut game =
            GameSession::open(MemoryStore::new(), dict(), clock(), LetterDraw::Weighted).unwrap();
        for _ in 0..MAX_ATTEMPTS {
            game.submit("zzz").unwrap();
        }
        assert_eq!(game.phase(), Phase::Exhausted);
        assert_eq!(
            game.submit("ring").unwrap(),
            SubmitOutcome::Rejected(Rejection::AttemptsExhausted)
        );
        assert_eq!(game.state().attempts(), MAX_ATTEMPTS);
    }

    #[test]
    fn practice_never_persists() {
        let mut game =
            GameSession::practice(MemoryStore::new(), dict(), clock(), LetterDraw::Weighted);
        game.submit("anything").unwrap();
        assert_eq!(game.state().attempts(), 1);
        assert!(game.persistence().all_sessions().unwrap().is_empty());
        assert!(!game.is_unsaved());
    }

    #[test]
    fn stats_refresh_cache_record() {
        let mut game =
            GameSession::open(MemoryStore::new(), dict(), clock(), LetterDraw::Weighted).unwrap();
        assert_eq!(game.stats().unwrap().games_played, 0);
        assert!(game.last_stats().is_some());
        game.submit("tint").unwrap();
        assert!(game.last_stats().is_none());
        let stats = game.stats().unwrap();
        assert_eq!(stats.games_played, 1);
        assert_eq!(stats.lifetime_points, 10);
        assert_eq!(game.cached_stats().unwrap(), Some(stats));
    }
}
