use std::fmt;
use std::path::PathBuf;

/// Every recoverable failure the game can hit.  None of them is fatal to a
/// running session; callers log and degrade.
#[derive(Debug)]
pub enum GameError {
    Io { path: Option<PathBuf>, source: std::io::Error },
    Parse { path: Option<PathBuf>, source: serde_json::Error },
    Audio(String),
}

impl GameError {
    pub fn io_at(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: Some(path.into()), source }
    }

    pub fn parse_at(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Parse { path: Some(path.into()), source }
    }
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path: Some(path), source } => {
                write!(f, "i/o error on {}: {source}", path.display())
            }
            Self::Io { path: None, source } => write!(f, "i/o error: {source}"),
            Self::Parse { path: Some(path), source } => {
                write!(f, "malformed data in {}: {source}", path.display())
            }
            Self::Parse { path: None, source } => write!(f, "malformed data: {source}"),
            Self::Audio(msg) => write!(f, "audio unavailable: {msg}"),
        }
    }
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::Audio(_) => None,
        }
    }
}

impl From<std::io::Error> for GameError {
    fn from(source: std::io::Error) -> Self {
        Self::Io { path: None, source }
    }
}

impl From<serde_json::Error> for GameError {
    fn from(source: serde_json::Error) -> Self {
        Self::Parse { path: None, source }
    }
}

pub type Result<T> = std::result::Result<T, GameError>;
