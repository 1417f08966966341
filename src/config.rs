//! Runtime configuration: compiled-in defaults, then environment overrides.
//! The binary layers its command-line flags on top.

use std::env;
use std::path::PathBuf;

use crate::game::Flow;

pub const DEFAULT_MAX_WIDTH: f32 = 1200.0;
pub const DEFAULT_MAX_HEIGHT: f32 = 800.0;

const SCORES_FILE: &str = ".space_potato_scores.json";
const LOG_FILE: &str = ".space_potato.log";

#[derive(Clone, Debug)]
pub struct Config {
    pub scores_path: PathBuf,
    pub log_path: PathBuf,
    pub muted: bool,
    /// Fixed RNG seed; `None` uses the thread RNG.
    pub seed: Option<u64>,
    pub flow: Flow,
    pub max_width: f32,
    pub max_height: f32,
}

impl Default for Config {
    fn default() -> Self {
        let home = home_dir();
        Self {
            scores_path: home.join(SCORES_FILE),
            log_path: home.join(LOG_FILE),
            muted: false,
            seed: None,
            flow: Flow::Full,
            max_width: DEFAULT_MAX_WIDTH,
            max_height: DEFAULT_MAX_HEIGHT,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(path) = env::var("SPACE_POTATO_SCORES") {
            config.scores_path = PathBuf::from(path);
        }
        if let Ok(path) = env::var("SPACE_POTATO_LOG") {
            config.log_path = PathBuf::from(path);
        }
        if let Some(muted) = read_env_bool("SPACE_POTATO_MUTE") {
            config.muted = muted;
        }
        if let Ok(raw) = env::var("SPACE_POTATO_SEED") {
            match raw.trim().parse::<u64>() {
                Ok(seed) => config.seed = Some(seed),
                Err(_) => log::warn!("SPACE_POTATO_SEED={raw:?} is not a u64; ignoring"),
            }
        }
        if let Ok(raw) = env::var("SPACE_POTATO_FLOW") {
            match parse_flow(&raw) {
                Some(flow) => config.flow = flow,
                None => log::warn!("SPACE_POTATO_FLOW={raw:?} is not full|classic; ignoring"),
            }
        }
        config
    }
}

pub fn parse_flow(raw: &str) -> Option<Flow> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "full" => Some(Flow::Full),
        "classic" => Some(Flow::Classic),
        _ => None,
    }
}

fn read_env_bool(key: &str) -> Option<bool> {
    let raw = env::var(key).ok()?;
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => {
            log::warn!("{key}={raw:?} is not a boolean; ignoring");
            None
        }
    }
}

fn home_dir() -> PathBuf {
    PathBuf::from(env::var("HOME").unwrap_or_else(|_| ".".to_string()))
}
