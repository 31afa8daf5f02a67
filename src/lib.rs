//! Core of the daily word puzzle: letter generation, validation, scoring,
//! per-day sessions, stats and storage. The terminal front end lives in the
//! binary; everything here runs headless.
pub mod app_dirs;
pub mod config;
pub mod date_key;
pub mod dictionary;
pub mod error;
pub mod game;
pub mod input;
pub mod letters;
pub mod persistence;
pub mod runtime;
pub mod scoring;
pub mod session;
pub mod stats;
pub mod store;
pub mod validator;

pub use date_key::{Clock, DateKey, FixedClock, LocalClock};
pub use dictionary::{Dictionary, DictionarySource, WordLookup};
pub use error::{GameError, StoreError};
pub use game::{GameSession, Mode};
pub use letters::{LetterDraw, LetterPool};
pub use session::{Rejection, SessionState, SubmitOutcome, MAX_ATTEMPTS};
pub use stats::StatsAggregate;
pub use store::{KeyValueStore, MemoryStore, SqliteStore};
