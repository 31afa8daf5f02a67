use crate::date_key::DateKey;
use crate::dictionary::WordLookup;
use crate::letters::LetterPool;
use crate::scoring::score;
use crate::validator::{check, InvalidReason};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MAX_ATTEMPTS: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScoredWord {
    pub word: String,
    pub score: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Fresh,
    Active,
    Exhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    InvalidWord(InvalidReason),
    DuplicateWord,
    AttemptsExhausted,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::InvalidWord(reason) => write!(f, "Not valid: {reason}"),
            Rejection::DuplicateWord => write!(f, "Already submitted"),
            Rejection::AttemptsExhausted => write!(f, "No attempts left today"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Accepted(ScoredWord),
    Rejected(Rejection),
}

impl SubmitOutcome {
    /// Whether the submission spent an attempt (and so changed the session).
    pub fn counted(&self) -> bool {
        !matches!(self, SubmitOutcome::Rejected(Rejection::AttemptsExhausted))
    }
}

impl fmt::Display for SubmitOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitOutcome::Accepted(w) => {
                write!(f, "{} +{} pts", w.word.to_uppercase(), w.score)
            }
            SubmitOutcome::Rejected(r) => write!(f, "{r}"),
        }
    }
}

/// One day's play.
///
/// Every submission before the cap spends an attempt, including duplicates
/// and invalid words. Once `MAX_ATTEMPTS` are spent the day is over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    date: DateKey,
    words: Vec<ScoredWord>,
    attempts: u32,
    total_points: u32,
    best_word: Option<ScoredWord>,
}

impl SessionState {
    pub fn new(date: DateKey) -> Self {
        Self {
            date,
            words: Vec::new(),
            attempts: 0,
            total_points: 0,
            best_word: None,
        }
    }

    pub fn date(&self) -> DateKey {
        self.date
    }

    /// Accepted words in submission order.
    pub fn words(&self) -> &[ScoredWord] {
        &self.words
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn attempts_left(&self) -> u32 {
        MAX_ATTEMPTS.saturating_sub(self.attempts)
    }

    pub fn total_points(&self) -> u32 {
        self.total_points
    }

    pub fn best_word(&self) -> Option<&ScoredWord> {
        self.best_word.as_ref()
    }

    pub fn has_played(&self) -> bool {
        !self.words.is_empty()
    }

    pub fn phase(&self) -> Phase {
        match self.attempts {
            0 => Phase::Fresh,
            n if n >= MAX_ATTEMPTS => Phase::Exhausted,
            _ => Phase::Active,
        }
    }

    pub fn contains(&self, word: &str) -> bool {
        let word = word.trim().to_lowercase();
        self.words.iter().any(|w| w.word == word)
    }

    /// Totals and best word agree with the accepted list.
    pub fn is_consistent(&self) -> bool {
        let sum: u32 = self.words.iter().map(|w| w.score).sum();
        let best = self
            .words
            .iter()
            .fold(None::<&ScoredWord>, |best, w| match best {
                Some(b) if b.score >= w.score => Some(b),
                _ => Some(w),
            });
        sum == self.total_points
            && best == self.best_word.as_ref()
            && self.attempts <= MAX_ATTEMPTS
            && self.words.len() as u32 <= self.attempts
    }

    pub fn submit<D: WordLookup + ?Sized>(
        &mut self,
        raw: &str,
        pool: &LetterPool,
        dictionary: &D,
    ) -> SubmitOutcome {
        if self.phase() == Phase::Exhausted {
            return SubmitOutcome::Rejected(Rejection::AttemptsExhausted);
        }
        self.attempts += 1;

        let word = raw.trim().to_lowercase();
        if self.contains(&word) {
            return SubmitOutcome::Rejected(Rejection::DuplicateWord);
        }
        if let Err(reason) = check(&word, pool, dictionary) {
            return SubmitOutcome::Rejected(Rejection::InvalidWord(reason));
        }

        let scored = ScoredWord {
            score: score(&word),
            word,
        };
        self.total_points += scored.score;
        let is_best = self
            .best_word
            .as_ref()
            .map_or(true, |best| scored.score > best.score);
        if is_best {
            self.best_word = Some(scored.clone());
        }
        self.words.push(scored.clone());
        SubmitOutcome::Accepted(scored)
    }
}
