use std::cell::Cell;
use std::rc::Rc;

use assert_matches::assert_matches;
use wordo::persistence::{session_key, Persistence};
use wordo::session::Phase;
use wordo::validator::InvalidReason;
use wordo::{
    Clock, DateKey, Dictionary, FixedClock, GameSession, KeyValueStore, LetterDraw, MemoryStore,
    Rejection, SubmitOutcome, MAX_ATTEMPTS,
};

/// A clock the test can move forward.
#[derive(Clone)]
struct ManualClock(Rc<Cell<DateKey>>);

impl Clock for ManualClock {
    fn today(&self) -> DateKey {
        self.0.get()
    }
}

fn day(s: &str) -> DateKey {
    s.parse().unwrap()
}

fn dict() -> Dictionary {
    // words for G I N R T (2025-09-15) and D E L M O (2025-09-16)
    Dictionary::from_words([
        "ring", "grin", "grit", "trig", "tint", "tiring", "model", "demo", "mole", "doll",
    ])
}

#[test]
fn progress_survives_reopening() {
    let clock = FixedClock(day("2025-09-15"));
    let mut game = GameSession::open(MemoryStore::new(), dict(), clock, LetterDraw::Weighted).unwrap();
    assert_eq!(game.pool().to_string(), "G I N R T");
    assert_eq!(game.phase(), Phase::Fresh);

    game.submit("tiring").unwrap();
    game.submit("grin").unwrap();
    game.submit("grin").unwrap();
    let store = game.persistence().store().clone();

    let reopened = GameSession::open(store, dict(), clock, LetterDraw::Weighted).unwrap();
    let state = reopened.state();
    assert_eq!(state.attempts(), 3);
    assert_eq!(state.words().len(), 2);
    assert_eq!(state.total_points(), 10);
    assert_eq!(state.best_word().unwrap().word, "tiring");
    assert_eq!(reopened.phase(), Phase::Active);
}

#[test]
fn day_is_exhausted_after_ten_attempts() {
    let clock = FixedClock(day("2025-09-15"));
    let mut game = GameSession::open(MemoryStore::new(), dict(), clock, LetterDraw::Weighted).unwrap();

    assert_matches!(
        game.submit("model").unwrap(),
        SubmitOutcome::Rejected(Rejection::InvalidWord(InvalidReason::LetterNotInPool('m')))
    );
    assert_matches!(
        game.submit("rt").unwrap(),
        SubmitOutcome::Rejected(Rejection::InvalidWord(InvalidReason::TooShort))
    );
    for word in ["ring", "grin", "grit", "trig", "tint", "tiring", "ring", "girt"] {
        game.submit(word).unwrap();
    }
    assert_eq!(game.state().attempts(), MAX_ATTEMPTS);
    assert_eq!(game.phase(), Phase::Exhausted);

    assert_matches!(
        game.submit("ring").unwrap(),
        SubmitOutcome::Rejected(Rejection::AttemptsExhausted)
    );
    assert_eq!(game.state().attempts(), MAX_ATTEMPTS);
    assert_eq!(game.state().words().len(), 6);
    assert_eq!(game.state().total_points(), 20);
}

#[test]
fn rollover_starts_the_next_day() {
    let clock = ManualClock(Rc::new(Cell::new(day("2025-09-15"))));
    let mut game = GameSession::open(
        MemoryStore::new(),
        dict(),
        clock.clone(),
        LetterDraw::Weighted,
    )
    .unwrap();
    game.submit("tint").unwrap();
    assert!(!game.rollover().unwrap());

    clock.0.set(day("2025-09-16"));
    assert!(game.rollover().unwrap());
    assert_eq!(game.date(), day("2025-09-16"));
    assert_eq!(game.pool().to_string(), "D E L M O");
    assert_eq!(game.phase(), Phase::Fresh);

    game.submit("doll").unwrap();
    let stats = game.stats().unwrap();
    assert_eq!(stats.games_played, 2);
    assert_eq!(stats.current_streak, 2);
    assert_eq!(stats.lifetime_points, 20);
    assert_eq!(stats.total_attempts, 2);
    assert_eq!(stats.last_played, Some(day("2025-09-16")));

    let store = game.persistence().store();
    assert!(store.get(&session_key(&day("2025-09-15"))).unwrap().is_some());
    assert!(store.get(&session_key(&day("2025-09-16"))).unwrap().is_some());
}

#[test]
fn stats_cache_written_on_read() {
    let clock = FixedClock(day("2025-09-15"));
    let mut game = GameSession::open(MemoryStore::new(), dict(), clock, LetterDraw::Weighted).unwrap();
    assert!(game.cached_stats().unwrap().is_none());

    game.submit("tint").unwrap();
    let stats = game.stats().unwrap();
    assert_eq!(game.cached_stats().unwrap(), Some(stats.clone()));
    assert_eq!(game.last_stats(), Some(&stats));

    game.submit("grin").unwrap();
    assert!(game.last_stats().is_none());
}

#[test]
fn corrupt_day_is_skipped_by_stats() {
    let mut store = MemoryStore::new();
    store
        .set(&session_key(&day("2025-09-14")), b"{not json")
        .unwrap();
    let clock = FixedClock(day("2025-09-15"));
    let mut game = GameSession::open(store, dict(), clock, LetterDraw::Weighted).unwrap();
    game.submit("tint").unwrap();

    let sessions = Persistence::new(game.persistence().store().clone())
        .all_sessions()
        .unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(game.stats().unwrap().games_played, 1);
}

#[test]
fn practice_never_writes() {
    let clock = FixedClock(day("2025-09-15"));
    let mut game = GameSession::practice(MemoryStore::new(), dict(), clock, LetterDraw::Uniform);
    game.submit("ring").unwrap();
    game.submit("zzz").unwrap();
    assert_eq!(game.state().attempts(), 2);
    assert!(game
        .persistence()
        .store()
        .keys_with_prefix("wordo.")
        .unwrap()
        .is_empty());
    assert_eq!(game.stats().unwrap().games_played, 0);
    assert!(game.cached_stats().unwrap().is_none());
}
