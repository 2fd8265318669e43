//! High score persistence
//!
//! Each mode persists a single integer under its own key. Storage is a
//! collaborator: the cores only expose the value, the driver saves it.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Key-value store for high scores
pub trait HighScoreStore {
    /// Stored score for `key`, 0 when nothing was saved
    fn load(&self, key: &str) -> u64;

    /// Store `score` under `key` if it beats the stored value
    fn save(&mut self, key: &str, score: u64);
}

/// Volatile store (tests, sessions without a data directory)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    scores: BTreeMap<String, u64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HighScoreStore for MemoryStore {
    fn load(&self, key: &str) -> u64 {
        self.scores.get(key).copied().unwrap_or(0)
    }

    fn save(&mut self, key: &str, score: u64) {
        let entry = self.scores.entry(key.to_string()).or_insert(0);
        *entry = (*entry).max(score);
    }
}

/// JSON file holding `{ "key": score, ... }`
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    scores: BTreeMap<String, u64>,
}

impl JsonFileStore {
    /// Open the store, starting fresh if the file is missing or corrupt
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let scores = match read_scores(&path) {
            Ok(scores) => {
                log::info!("Loaded {} high scores", scores.len());
                scores
            }
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    log::warn!("High score file {} unreadable: {}", path.display(), e);
                }
                log::info!("No high scores found, starting fresh");
                BTreeMap::new()
            }
        };
        Self { path, scores }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(&self.scores).map_err(std::io::Error::other)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, json)
    }
}

fn read_scores(path: &Path) -> std::io::Result<BTreeMap<String, u64>> {
    let json = std::fs::read_to_string(path)?;
    serde_json::from_str(&json).map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}

impl HighScoreStore for JsonFileStore {
    fn load(&self, key: &str) -> u64 {
        self.scores.get(key).copied().unwrap_or(0)
    }

    fn save(&mut self, key: &str, score: u64) {
        let current = self.load(key);
        if score <= current {
            return;
        }
        self.scores.insert(key.to_string(), score);
        match self.flush() {
            Ok(()) => log::info!("High score saved ({} = {})", key, score),
            Err(e) => log::warn!("Failed to save high score to {}: {}", self.path.display(), e),
        }
    }
}
