use crate::date_key::DateKey;
use crate::session::SessionState;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How many entries the high score table keeps
pub const TOP_WORDS_LIMIT: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopWord {
    pub word: String,
    pub score: u32,
    pub date: DateKey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayTotal {
    pub date: DateKey,
    pub points: u32,
}

/// Lifetime statistics, always derived from the stored sessions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsAggregate {
    /// Days with at least one accepted word
    pub games_played: u32,
    pub lifetime_points: u64,
    /// Longest run of consecutive played days
    pub current_streak: u32,
    pub total_attempts: u64,
    pub best_day: Option<DayTotal>,
    pub last_played: Option<DateKey>,
    pub top_words: Vec<TopWord>,
}

/// Length of the longest run of consecutive days in an ascending list.
pub fn longest_run(days: &[DateKey]) -> u32 {
    if days.is_empty() {
        return 0;
    }
    let (best, _) = days
        .iter()
        .tuple_windows()
        .fold((1u32, 1u32), |(best, run), (a, b)| {
            let run = if b.days_since(a) == 1 { run + 1 } else { 1 };
            (best.max(run), run)
        });
    best
}

/// Folds the whole session history into a fresh aggregate.
pub fn aggregate(sessions: &BTreeMap<DateKey, SessionState>) -> StatsAggregate {
    let played: Vec<(&DateKey, &SessionState)> =
        sessions.iter().filter(|(_, s)| s.has_played()).collect();
    let played_days: Vec<DateKey> = played.iter().map(|(d, _)| **d).collect();

    let best_day = played.iter().fold(None::<DayTotal>, |best, (date, s)| match best {
        Some(b) if b.points >= s.total_points() => Some(b),
        _ => Some(DayTotal {
            date: **date,
            points: s.total_points(),
        }),
    });

    // sessions iterate oldest first and words in submission order,
    // so the stable sort leaves earlier words ahead on equal scores
    let top_words = played
        .iter()
        .flat_map(|(date, s)| {
            s.words().iter().map(move |w| TopWord {
                word: w.word.clone(),
                score: w.score,
                date: **date,
            })
        })
        .sorted_by(|a, b| b.score.cmp(&a.score))
        .take(TOP_WORDS_LIMIT)
        .collect();

    StatsAggregate {
        games_played: played.len() as u32,
        lifetime_points: sessions.values().map(|s| s.total_points() as u64).sum(),
        current_streak: longest_run(&played_days),
        total_attempts: sessions.values().map(|s| s.attempts() as u64).sum(),
        best_day,
        last_played: played_days.last().copied(),
        top_words,
    }
}

/// Holds the most recent aggregate. The cache is only ever replaced by a
/// full recompute.
#[derive(Debug, Default)]
pub struct StatsAggregator {
    cached: Option<StatsAggregate>,
}

impl StatsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recompute(&mut self, sessions: &BTreeMap<DateKey, SessionState>) -> &StatsAggregate {
        self.cached.insert(aggregate(sessions))
    }

    pub fn cached(&self) -> Option<&StatsAggregate> {
        self.cached.as_ref()
    }

    pub fn invalidate(&mut self) {
        self.cached = None;
    }
}
