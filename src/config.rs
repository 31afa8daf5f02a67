use crate::app_dirs::AppDirs;
use crate::dictionary::DictionarySource;
use crate::letters::LetterDraw;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub letter_draw: LetterDraw,
    /// Newline separated word list; the bundled list when unset
    pub dictionary_path: Option<PathBuf>,
    pub db_path: Option<PathBuf>,
    pub dictionary_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            letter_draw: LetterDraw::Weighted,
            dictionary_path: None,
            db_path: None,
            dictionary_timeout_secs: 10,
        }
    }
}

impl Config {
    pub fn dictionary_source(&self) -> DictionarySource {
        match &self.dictionary_path {
            Some(path) => DictionarySource::File(path.clone()),
            None => DictionarySource::Bundled,
        }
    }

    pub fn dictionary_timeout(&self) -> Duration {
        Duration::from_secs(self.dictionary_timeout_secs)
    }

    pub fn db_path(&self) -> PathBuf {
        self.db_path
            .clone()
            .or_else(AppDirs::db_path)
            .unwrap_or_else(|| PathBuf::from("wordo.db"))
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = AppDirs::config_path().unwrap_or_else(|| PathBuf::from("wordo_config.json"));
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        let Ok(bytes) = fs::read(&self.path) else {
            return Config::default();
        };
        match serde_json::from_slice::<Config>(&bytes) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "ignoring unreadable config");
                Config::default()
            }
        }
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).map_err(std::io::Error::other)?;
        fs::write(&self.path, data)
    }
}
