//! Recently used input folders
//!
//! The history is a JSON array of at most [`MAX_ENTRIES`] absolute folder
//! paths, most recent first, kept in `history.json` inside the per-user
//! config directory.

use std::fs;
use std::path::{Path, PathBuf};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use crate::error::{Error, Result};

/// Maximum number of folders remembered
pub const MAX_ENTRIES: usize = 3;

/// Environment variable that overrides the config directory
pub const CONFIG_DIR_ENV: &str = "HTML_PDF_MERGE_CONFIG_DIR";

const HISTORY_FILE: &str = "history.json";

/// Bounded most-recently-used list of folder paths
///
/// Holds no duplicates and never more than [`MAX_ENTRIES`] items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct HistoryList {
    entries: Vec<String>,
}

impl HistoryList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put `entry` at the front, removing an earlier occurrence and
    /// dropping the oldest entry when the list is full
    pub fn record(&mut self, entry: impl Into<String>) {
        let entry = entry.into();
        self.entries.retain(|existing| *existing != entry);
        self.entries.insert(0, entry);
        self.entries.truncate(MAX_ENTRIES);
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn first(&self) -> Option<&str> {
        self.entries.first().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }
}

impl From<Vec<String>> for HistoryList {
    /// Normalise a list read from disk: keep the first occurrence of each
    /// path and at most [`MAX_ENTRIES`] of them
    fn from(raw: Vec<String>) -> Self {
        let mut entries: Vec<String> = Vec::with_capacity(MAX_ENTRIES);
        for path in raw {
            if entries.len() == MAX_ENTRIES {
                break;
            }
            if !path.is_empty() && !entries.contains(&path) {
                entries.push(path);
            }
        }
        Self { entries }
    }
}

impl From<HistoryList> for Vec<String> {
    fn from(list: HistoryList) -> Self {
        list.entries
    }
}

/// JSON-file backed store for [`HistoryList`]
///
/// No locking is done around the read-modify-write in [`record`](Self::record);
/// one process is expected to use the store at a time.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    /// Open the store in the per-user config directory, creating the
    /// directory if needed
    ///
    /// [`CONFIG_DIR_ENV`] overrides the platform location.
    pub fn open() -> Result<Self> {
        let config_dir = match std::env::var_os(CONFIG_DIR_ENV) {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => ProjectDirs::from("", "", "html-pdf-merge")
                .ok_or_else(|| Error::ConfigDir("no home directory for this user".to_string()))?
                .config_dir()
                .to_path_buf(),
        };

        Self::at(config_dir)
    }

    /// Open the store rooted at `config_dir`, creating the directory if needed
    pub fn at(config_dir: impl Into<PathBuf>) -> Result<Self> {
        let config_dir = config_dir.into();

        if !config_dir.is_dir() {
            fs::create_dir_all(&config_dir)
                .map_err(|e| Error::ConfigDir(format!("{}: {}", config_dir.display(), e)))?;
        }

        Ok(Self { path: config_dir.join(HISTORY_FILE) })
    }

    /// Location of the history file
    pub fn path_of_store(&self) -> &Path {
        &self.path
    }

    /// Read the stored history
    ///
    /// Never fails: a missing file gives an empty list, and an unreadable
    /// or malformed one is logged and treated as empty.
    pub fn load(&self) -> HistoryList {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return HistoryList::new(),
            Err(e) => {
                tracing::warn!("Failed to read history file {}: {}. Starting fresh.", self.path.display(), e);
                return HistoryList::new();
            }
        };

        serde_json::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!("Failed to parse history file {}: {}. Starting fresh.", self.path.display(), e);
            HistoryList::new()
        })
    }

    /// Write `list` to the history file
    pub fn save(&self, list: &HistoryList) -> Result<()> {
        let content = serde_json::to_string_pretty(list)
            .map_err(|e| Error::General(format!("Failed to serialize history: {}", e)))?;
        fs::write(&self.path, content)?;
        Ok(())
    }

    /// Move `folder` to the front of the stored history and write it back
    ///
    /// Entries are plain strings, so callers holding a `Path` pass its
    /// (possibly lossy) UTF-8 form.
    pub fn record(&self, folder: impl Into<String>) -> Result<HistoryList> {
        let mut list = self.load();
        list.record(folder);
        self.save(&list)?;
        tracing::debug!("History now has {} entr(ies) at {}", list.len(), self.path.display());
        Ok(list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn list(items: &[&str]) -> HistoryList {
        HistoryList::from(items.iter().map(|s| s.to_string()).collect::<Vec<_>>())
    }

    #[test]
    fn test_record_moves_existing_to_front() {
        let mut history = list(&["A", "B", "C"]);
        history.record("B");
        assert_eq!(history.entries(), &["B", "A", "C"]);
    }

    #[test]
    fn test_record_drops_oldest() {
        let mut history = list(&["A", "B", "C"]);
        history.record("D");
        assert_eq!(history.entries(), &["D", "A", "B"]);
    }

    #[test]
    fn test_record_front_entry_is_noop() {
        let mut history = list(&["A", "B"]);
        history.record("A");
        assert_eq!(history.entries(), &["A", "B"]);
    }

    #[test]
    fn test_from_raw_dedupes_and_truncates() {
        let history = list(&["A", "A", "", "B", "C", "D"]);
        assert_eq!(history.entries(), &["A", "B", "C"]);
    }

    #[test]
    fn test_json_is_plain_array() {
        let history = list(&["/tmp/a", "/tmp/b"]);
        let json = serde_json::to_string(&history).unwrap();
        assert_eq!(json, r#"["/tmp/a","/tmp/b"]"#);
    }

    #[test]
    fn test_store_creates_config_dir() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");
        let store = HistoryStore::at(&nested).unwrap();
        assert!(nested.is_dir());
        assert_eq!(store.path_of_store(), nested.join("history.json"));
    }

    #[test]
    fn test_store_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = HistoryStore::at(dir.path()).unwrap();

        assert!(store.load().is_empty());
        store.record("/data/x").unwrap();
        assert_eq!(store.load().first(), Some("/data/x"));
    }

    #[test]
    fn test_store_keeps_three_most_recent() {
        let dir = TempDir::new().unwrap();
        let store = HistoryStore::at(dir.path()).unwrap();

        for folder in ["/1", "/2", "/3", "/4", "/2"] {
            store.record(folder).unwrap();
        }

        assert_eq!(store.load().entries(), &["/2", "/4", "/3"]);
    }

    #[test]
    fn test_store_malformed_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let store = HistoryStore::at(dir.path()).unwrap();
        fs::write(store.path_of_store(), "{not json").unwrap();

        assert!(store.load().is_empty());

        let updated = store.record("/fresh").unwrap();
        assert_eq!(updated.entries(), &["/fresh"]);
    }

    #[test]
    fn test_store_config_dir_is_a_file() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();

        let result = HistoryStore::at(blocker.join("sub"));
        assert!(matches!(result.unwrap_err(), Error::ConfigDir(_)));
    }
}
