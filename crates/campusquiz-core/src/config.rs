//! Game configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::clock::DEFAULT_ROUND_SECONDS;
use crate::error::{Error, Result};
use crate::leaderboard::DEFAULT_LEADERBOARD_SIZE;

/// Name of the per-directory config file.
pub const CONFIG_FILE_NAME: &str = "campusquiz.toml";

/// Top-level campusquiz configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// JSON list of user profiles.
    #[serde(default = "default_profiles_path")]
    pub profiles_path: PathBuf,
    /// JSON list of questions.
    #[serde(default = "default_questions_path")]
    pub questions_path: PathBuf,
    /// Length of a round in game seconds.
    #[serde(default = "default_round_seconds")]
    pub round_seconds: u32,
    /// Entries shown on each leaderboard.
    #[serde(default = "default_leaderboard_size")]
    pub leaderboard_size: usize,
    /// Real-time spacing between clock ticks.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

fn default_profiles_path() -> PathBuf {
    PathBuf::from("json_files/users.json")
}
fn default_questions_path() -> PathBuf {
    PathBuf::from("json_files/question.json")
}
fn default_round_seconds() -> u32 {
    DEFAULT_ROUND_SECONDS
}
fn default_leaderboard_size() -> usize {
    DEFAULT_LEADERBOARD_SIZE
}
fn default_tick_interval_ms() -> u64 {
    10
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            profiles_path: default_profiles_path(),
            questions_path: default_questions_path(),
            round_seconds: default_round_seconds(),
            leaderboard_size: default_leaderboard_size(),
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

impl GameConfig {
    /// Parse a TOML document; `source` is only used in error messages.
    pub fn from_toml_str(content: &str, source: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            Error::InvalidConfig(format!("failed to parse {}: {e}", source.display()))
        })
    }

    /// Reject values the engine cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.round_seconds == 0 {
            return Err(Error::InvalidConfig(
                "round_seconds must be at least 1".into(),
            ));
        }
        if self.leaderboard_size == 0 {
            return Err(Error::InvalidConfig(
                "leaderboard_size must be at least 1".into(),
            ));
        }
        if self.tick_interval_ms == 0 {
            return Err(Error::InvalidConfig(
                "tick_interval_ms must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup("CAMPUSQUIZ_PROFILES") {
            self.profiles_path = PathBuf::from(path);
        }
        if let Some(path) = lookup("CAMPUSQUIZ_QUESTIONS") {
            self.questions_path = PathBuf::from(path);
        }
        self.profiles_path = resolve_path(&self.profiles_path, &lookup);
        self.questions_path = resolve_path(&self.questions_path, &lookup);
    }
}

/// Expand `${VAR}` references; unset variables expand to nothing.
fn resolve_env_vars(s: &str, lookup: &impl Fn(&str) -> Option<String>) -> String {
    let mut result = s.to_string();
    let mut from = 0;
    while let Some(offset) = result[from..].find("${") {
        let start = from + offset;
        let Some(end) = result[start..].find('}') else {
            break;
        };
        let value = lookup(&result[start + 2..start + end]).unwrap_or_default();
        result = format!("{}{}{}", &result[..start], value, &result[start + end + 1..]);
        from = start + value.len();
    }
    result
}

fn resolve_path(path: &Path, lookup: &impl Fn(&str) -> Option<String>) -> PathBuf {
    match path.to_str() {
        Some(s) if s.contains("${") => PathBuf::from(resolve_env_vars(s, lookup)),
        _ => path.to_path_buf(),
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `campusquiz.toml` in the current directory
/// 2. `~/.config/campusquiz/config.toml`
///
/// Environment variable overrides: `CAMPUSQUIZ_PROFILES`, `CAMPUSQUIZ_QUESTIONS`.
pub fn load_config() -> Result<GameConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<GameConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => {
            return Err(Error::NotFound {
                path: p.to_path_buf(),
            })
        }
        None => {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            if local.exists() {
                Some(local)
            } else {
                global_config_path().filter(|p| p.exists())
            }
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
            tracing::debug!("loaded config from {}", path.display());
            GameConfig::from_toml_str(&content, &path)?
        }
        None => GameConfig::default(),
    };

    config.apply_overrides(|name| std::env::var(name).ok());
    config.validate()?;
    Ok(config)
}

fn global_config_path() -> Option<PathBuf> {
    std::env::var("HOME").ok().map(|h| {
        PathBuf::from(h)
            .join(".config")
            .join("campusquiz")
            .join("config.toml")
    })
}
