//! Top-ten score table and where it is kept between runs.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};

pub const MAX_ENTRIES: usize = 10;
pub const MAX_NAME_LEN: usize = 12;
pub const DEFAULT_NAME: &str = "POTATO";
const NAME_PUNCTUATION: &[char] = &['-', '_', '.', '!', '?'];

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub name: String,
    pub score: u32,
    pub level: u32,
    /// Unix seconds when the score was set.
    pub date: u64,
}

/// Whether `c` may appear in a high-score name.
pub fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == ' ' || NAME_PUNCTUATION.contains(&c)
}

/// Strip disallowed characters, trim, cap the length, and fall back to the
/// default name when nothing is left.
pub fn sanitize_name(raw: &str) -> String {
    let kept: String = raw.chars().filter(|&c| is_name_char(c)).collect();
    let trimmed: String = kept.trim().chars().take(MAX_NAME_LEN).collect();
    let trimmed = trimmed.trim_end();
    if trimmed.is_empty() {
        DEFAULT_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}

pub fn now_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

// ── Persistence ───────────────────────────────────────────────────────────────

/// Parse stored text.  Anything but a JSON array is an error; array elements
/// that are not valid entries are skipped.
fn parse_entries(text: &str) -> serde_json::Result<Vec<HighScoreEntry>> {
    let raw: Vec<serde_json::Value> = serde_json::from_str(text)?;
    let entries = raw
        .into_iter()
        .filter_map(|value| match serde_json::from_value(value) {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::warn!("dropping invalid high-score entry: {e}");
                None
            }
        })
        .collect();
    Ok(entries)
}

/// Durable home of the table.
pub trait ScoreStore {
    fn load(&self) -> Result<Vec<HighScoreEntry>>;
    fn save(&mut self, entries: &[HighScoreEntry]) -> Result<()>;
}

/// Pretty-printed JSON file.  A missing file reads as an empty table.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScoreStore for JsonFileStore {
    fn load(&self) -> Result<Vec<HighScoreEntry>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(GameError::io_at(&self.path, e)),
        };
        parse_entries(&text).map_err(|e| GameError::parse_at(&self.path, e))
    }

    fn save(&mut self, entries: &[HighScoreEntry]) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| GameError::io_at(dir, e))?;
        }
        let mut text = serde_json::to_string_pretty(entries)?;
        text.push('\n');
        fs::write(&self.path, text).map_err(|e| GameError::io_at(&self.path, e))
    }
}

/// In-memory store holding the serialised text, for tests and `--no-save` runs.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    pub text: Option<String>,
}

impl ScoreStore for MemoryStore {
    fn load(&self) -> Result<Vec<HighScoreEntry>> {
        match &self.text {
            Some(text) => Ok(parse_entries(text)?),
            None => Ok(Vec::new()),
        }
    }

    fn save(&mut self, entries: &[HighScoreEntry]) -> Result<()> {
        self.text = Some(serde_json::to_string_pretty(entries)?);
        Ok(())
    }
}

// ── Table ─────────────────────────────────────────────────────────────────────

/// Entries sorted by descending score, at most `MAX_ENTRIES` long.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HighScoreTable {
    entries: Vec<HighScoreEntry>,
}

impl HighScoreTable {
    /// Build from arbitrary entries: drops zero scores, sorts, truncates.
    pub fn from_entries(entries: Vec<HighScoreEntry>) -> Self {
        let mut entries: Vec<HighScoreEntry> =
            entries.into_iter().filter(|e| e.score > 0).collect();
        for entry in &mut entries {
            entry.name = sanitize_name(&entry.name);
        }
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(MAX_ENTRIES);
        Self { entries }
    }

    /// Read the table, treating any failure as an empty table.
    pub fn load_or_empty(store: &dyn ScoreStore) -> Self {
        match store.load() {
            Ok(entries) => Self::from_entries(entries),
            Err(e) => {
                log::warn!("high scores unreadable, starting empty: {e}");
                Self::default()
            }
        }
    }

    pub fn entries(&self) -> &[HighScoreEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn best(&self) -> u32 {
        self.entries.first().map(|e| e.score).unwrap_or(0)
    }

    /// True when `score` would earn a place in the table.
    pub fn qualifies(&self, score: u32) -> bool {
        if score == 0 {
            return false;
        }
        match self.entries.get(MAX_ENTRIES - 1) {
            Some(last) => score > last.score,
            None => true,
        }
    }

    /// Insert a score and keep the table ordered and capped.  Returns the
    /// 0-based rank it landed at, or `None` if it fell off the end.
    pub fn insert(&mut self, name: &str, score: u32, level: u32, date: u64) -> Option<usize> {
        let entry = HighScoreEntry { name: sanitize_name(name), score, level, date };
        // Stable: an equal score ranks below the ones already there.
        let rank = self.entries.partition_point(|e| e.score >= score);
        self.entries.insert(rank, entry);
        self.entries.truncate(MAX_ENTRIES);
        (rank < MAX_ENTRIES).then_some(rank)
    }

    /// `insert`, then persist.  The in-memory table is updated even if the
    /// write fails.
    pub fn record(
        &mut self,
        store: &mut dyn ScoreStore,
        name: &str,
        score: u32,
        level: u32,
    ) -> Result<Option<usize>> {
        let rank = self.insert(name, score, level, now_unix());
        log::debug!("recorded {score} for {name:?} at rank {rank:?}");
        store.save(&self.entries)?;
        Ok(rank)
    }
}
