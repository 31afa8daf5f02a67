use crate::date_key::DateKey;
use crate::error::GameError;
use crate::session::SessionState;
use crate::stats::StatsAggregate;
use crate::store::KeyValueStore;
use std::collections::BTreeMap;
use tracing::{debug, instrument, warn};

pub const SESSION_PREFIX: &str = "wordo.played.";
pub const STATS_KEY: &str = "wordo.stats";

pub fn session_key(date: &DateKey) -> String {
    format!("{SESSION_PREFIX}{date}")
}

/// Reads and writes game records as JSON through a [`KeyValueStore`].
#[derive(Debug)]
pub struct Persistence<S> {
    store: S,
}

impl<S: KeyValueStore> Persistence<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn read<T: serde::de::DeserializeOwned>(&self, key: &str) -> Result<Option<T>, GameError> {
        let Some(bytes) = self
            .store
            .get(key)
            .map_err(|e| GameError::persistence(key, e))?
        else {
            return Ok(None);
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|source| GameError::CorruptRecord {
                key: key.to_string(),
                source,
            })
    }

    fn write<T: serde::Serialize>(&mut self, key: &str, value: &T) -> Result<(), GameError> {
        let bytes = serde_json::to_vec(value).map_err(|source| GameError::CorruptRecord {
            key: key.to_string(),
            source,
        })?;
        self.store
            .set(key, &bytes)
            .map_err(|e| GameError::persistence(key, e))
    }

    #[instrument(skip(self))]
    pub fn load_session(&self, date: &DateKey) -> Result<Option<SessionState>, GameError> {
        let key = session_key(date);
        let session: Option<SessionState> = self.read(&key)?;
        if let Some(ref s) = session {
            if !s.is_consistent() {
                warn!(%key, "stored session totals disagree with its words");
            }
        }
        Ok(session)
    }

    #[instrument(skip(self, session), fields(date = %session.date()))]
    pub fn save_session(&mut self, session: &SessionState) -> Result<(), GameError> {
        let key = session_key(&session.date());
        self.write(&key, session)?;
        debug!(attempts = session.attempts(), points = session.total_points(), "session saved");
        Ok(())
    }

    /// Every stored day. Records that fail to decode are skipped with a
    /// warning so one bad entry does not hide the rest of the history.
    #[instrument(skip(self))]
    pub fn all_sessions(&self) -> Result<BTreeMap<DateKey, SessionState>, GameError> {
        let keys = self
            .store
            .keys_with_prefix(SESSION_PREFIX)
            .map_err(|e| GameError::persistence(SESSION_PREFIX, e))?;

        let mut sessions = BTreeMap::new();
        for key in keys {
            let Ok(date) = key[SESSION_PREFIX.len()..].parse::<DateKey>() else {
                warn!(%key, "skipping session with malformed date");
                continue;
            };
            match self.read::<SessionState>(&key) {
                Ok(Some(session)) => {
                    sessions.insert(date, session);
                }
                Ok(None) => {}
                Err(e @ GameError::CorruptRecord { .. }) => {
                    warn!(error = %e, "skipping unreadable session");
                }
                Err(e) => return Err(e),
            }
        }
        debug!(days = sessions.len(), "history loaded");
        Ok(sessions)
    }

    pub fn load_stats_cache(&self) -> Result<Option<StatsAggregate>, GameError> {
        self.read(STATS_KEY)
    }

    pub fn save_stats_cache(&mut self, stats: &StatsAggregate) -> Result<(), GameError> {
        self.write(STATS_KEY, stats)
    }
}
