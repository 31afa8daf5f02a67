use tempfile::tempdir;
use wordo::persistence::Persistence;
use wordo::stats;
use wordo::{
    Dictionary, FixedClock, GameSession, KeyValueStore, LetterDraw, SqliteStore, SubmitOutcome,
};

fn dict() -> Dictionary {
    Dictionary::from_words(["ring", "grin", "tint", "tiring", "doll", "model"])
}

#[test]
fn sessions_persist_across_reopen() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("state").join("wordo.db");
    let clock = FixedClock("2025-09-15".parse().unwrap());

    {
        let store = SqliteStore::open(&db).unwrap();
        let mut game = GameSession::open(store, dict(), clock, LetterDraw::Weighted).unwrap();
        assert!(matches!(game.submit("tint").unwrap(), SubmitOutcome::Accepted(_)));
        assert!(matches!(game.submit("tint").unwrap(), SubmitOutcome::Rejected(_)));
        assert!(!game.is_unsaved());
    }

    let store = SqliteStore::open(&db).unwrap();
    assert_eq!(store.path(), Some(db.as_path()));
    let game = GameSession::open(store, dict(), clock, LetterDraw::Weighted).unwrap();
    assert_eq!(game.state().attempts(), 2);
    assert_eq!(game.state().total_points(), 10);
}

#[test]
fn stats_span_days_in_one_database() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("wordo.db");

    for (date, word) in [("2025-09-15", "tiring"), ("2025-09-16", "doll")] {
        let store = SqliteStore::open(&db).unwrap();
        let clock = FixedClock(date.parse().unwrap());
        let mut game = GameSession::open(store, dict(), clock, LetterDraw::Weighted).unwrap();
        game.submit(word).unwrap();
    }

    let sessions = Persistence::new(SqliteStore::open(&db).unwrap())
        .all_sessions()
        .unwrap();
    let stats = stats::aggregate(&sessions);
    assert_eq!(stats.games_played, 2);
    assert_eq!(stats.current_streak, 2);
    assert_eq!(stats.lifetime_points, 20);
    assert_eq!(stats.top_words.len(), 2);
    assert_eq!(stats.top_words[0].word, "tiring");
}

#[test]
fn clear_removes_everything() {
    let dir = tempdir().unwrap();
    let mut store = SqliteStore::open(dir.path().join("wordo.db")).unwrap();
    store.set("wordo.stats", b"{}").unwrap();
    store.clear().unwrap();
    assert!(store.keys_with_prefix("wordo.").unwrap().is_empty());
}
