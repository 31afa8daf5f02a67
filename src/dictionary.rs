use crate::error::GameError;
use include_dir::{include_dir, Dir};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

static DICT_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/dict");
const BUNDLED_FILE: &str = "english.json";
const MIN_WORD_LEN: usize = 3;
const CANCEL_CHECK_EVERY: usize = 4096;

/// Membership test over lowercase words.
pub trait WordLookup {
    fn contains(&self, word: &str) -> bool;
}

impl<T: WordLookup + ?Sized> WordLookup for &T {
    fn contains(&self, word: &str) -> bool {
        (**self).contains(word)
    }
}

impl WordLookup for HashSet<String> {
    fn contains(&self, word: &str) -> bool {
        HashSet::contains(self, word)
    }
}

#[derive(Deserialize, Clone, Debug)]
struct WordList {
    #[allow(dead_code)]
    name: String,
    words: Vec<String>,
}

/// Where the word list comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DictionarySource {
    /// The list compiled into the binary
    Bundled,
    /// A newline separated word file
    File(PathBuf),
}

/// A loaded word list. An empty dictionary accepts nothing.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    words: HashSet<String>,
}

/// Trims and lowercases; `None` for anything that can never be a playable word.
fn normalize(raw: &str) -> Option<String> {
    let word = raw.trim().to_lowercase();
    if word.len() >= MIN_WORD_LEN && word.chars().all(|c| c.is_ascii_lowercase()) {
        Some(word)
    } else {
        None
    }
}

impl Dictionary {
    pub fn from_words<I, W>(words: I) -> Self
    where
        I: IntoIterator<Item = W>,
        W: AsRef<str>,
    {
        Self {
            words: words.into_iter().filter_map(|w| normalize(w.as_ref())).collect(),
        }
    }

    #[instrument]
    pub fn bundled() -> Result<Self, GameError> {
        let file = DICT_DIR
            .get_file(BUNDLED_FILE)
            .ok_or_else(|| GameError::dictionary("bundled word list missing"))?;
        let text = file
            .contents_utf8()
            .ok_or_else(|| GameError::dictionary("bundled word list is not utf-8"))?;
        let list: WordList = serde_json::from_str(text)
            .map_err(|e| GameError::dictionary(format!("bundled word list: {e}")))?;
        let dict = Self::from_words(list.words);
        debug!(words = dict.len(), "bundled dictionary loaded");
        Ok(dict)
    }

    /// Reads one word per line, giving up early once `cancelled` is set.
    fn read_file(path: &Path, cancelled: &AtomicBool) -> Result<Self, GameError> {
        let file = File::open(path)
            .map_err(|e| GameError::dictionary(format!("{}: {e}", path.display())))?;
        let mut words = HashSet::new();
        for (n, line) in BufReader::new(file).lines().enumerate() {
            if n % CANCEL_CHECK_EVERY == 0 && cancelled.load(Ordering::Relaxed) {
                return Err(GameError::dictionary("load cancelled"));
            }
            let line =
                line.map_err(|e| GameError::dictionary(format!("{}: {e}", path.display())))?;
            if let Some(word) = normalize(&line) {
                words.insert(word);
            }
        }
        Ok(Self { words })
    }

    /// Loads `source` on the calling thread.
    #[instrument]
    pub fn load(source: &DictionarySource) -> Result<Self, GameError> {
        match source {
            DictionarySource::Bundled => Self::bundled(),
            DictionarySource::File(path) => Self::read_file(path, &AtomicBool::new(false)),
        }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl WordLookup for Dictionary {
    fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }
}

/// A dictionary load running on a background thread.
pub struct DictionaryLoader {
    rx: Receiver<Result<Dictionary, GameError>>,
    cancelled: Arc<AtomicBool>,
}

impl DictionaryLoader {
    pub fn spawn(source: DictionarySource) -> Self {
        let (tx, rx) = mpsc::channel();
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancelled);

        std::thread::spawn(move || {
            let result = match &source {
                DictionarySource::Bundled => Dictionary::bundled(),
                DictionarySource::File(path) => Dictionary::read_file(path, &flag),
            };
            // receiver gone means the caller stopped waiting
            let _ = tx.send(result);
        });

        Self { rx, cancelled }
    }

    /// Asks the worker to stop. A pending `wait` reports the cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Blocks up to `timeout` for the load to finish.
    pub fn wait(self, timeout: Duration) -> Result<Dictionary, GameError> {
        match self.rx.recv_timeout(timeout) {
            Ok(Ok(dict)) => {
                if self.cancelled.load(Ordering::Relaxed) {
                    return Err(GameError::dictionary("load cancelled"));
                }
                info!(words = dict.len(), "dictionary ready");
                Ok(dict)
            }
            Ok(Err(e)) => {
                warn!(error = %e, "dictionary load failed");
                Err(e)
            }
            Err(RecvTimeoutError::Timeout) => {
                self.cancel();
                warn!(?timeout, "dictionary load timed out");
                Err(GameError::dictionary(format!(
                    "timed out after {}s",
                    timeout.as_secs_f64()
                )))
            }
            Err(RecvTimeoutError::Disconnected) => {
                Err(GameError::dictionary("loader thread exited"))
            }
        }
    }
}
