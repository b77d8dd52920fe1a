//! Settings persistence using TOML
//!
//! Stores rule settings in ~/.config/tetrs-rules/rules.toml (or platform equivalent)

use crate::game::Rules;
use crate::score::Progression;
use crate::spawner::SpawnRule;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Rule settings
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub board: BoardSettings,
    pub timing: TimingSettings,
    pub scoring: ScoringSettings,
    pub spawner: SpawnerSettings,
    pub rewards: RewardSettings,
}

/// Playfield size
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardSettings {
    pub width: usize,
    pub height: usize,
}

/// Fall speed curve
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingSettings {
    /// Fall interval at level 1, in milliseconds
    pub base_interval_ms: u64,
    /// Fastest fall interval, in milliseconds
    pub min_interval_ms: u64,
    /// Interval removed per level
    pub step_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringSettings {
    pub clear_bonus: u64,
    pub soft_drop_points: u64,
    pub lines_per_level: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnerSettings {
    /// "uniform" or "bag"
    pub rule: SpawnRule,
    /// Fixed seed; a random one is drawn when absent
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardSettings {
    /// Locks needed per coin, 0 disables
    pub locks_per_coin: u64,
}

impl Default for BoardSettings {
    fn default() -> Self {
        let rules = Rules::default();
        Self {
            width: rules.width,
            height: rules.height,
        }
    }
}

impl Default for TimingSettings {
    fn default() -> Self {
        let progression = Progression::default();
        Self {
            base_interval_ms: progression.base_interval_ms,
            min_interval_ms: progression.min_interval_ms,
            step_ms: progression.step_ms,
        }
    }
}

impl Default for ScoringSettings {
    fn default() -> Self {
        let progression = Progression::default();
        Self {
            clear_bonus: progression.clear_bonus,
            soft_drop_points: progression.soft_drop_points,
            lines_per_level: progression.lines_per_level,
        }
    }
}

impl Default for RewardSettings {
    fn default() -> Self {
        Self { locks_per_coin: 10 }
    }
}

/// Errors from loading or saving settings
#[derive(Debug)]
pub enum SettingsError {
    NoConfigDir,
    Io(PathBuf, std::io::Error),
    Parse(toml::de::Error),
    Serialize(toml::ser::Error),
    Invalid(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::NoConfigDir => write!(f, "could not determine config directory"),
            SettingsError::Io(path, e) => write!(f, "{}: {}", path.display(), e),
            SettingsError::Parse(e) => write!(f, "failed to parse settings: {}", e),
            SettingsError::Serialize(e) => write!(f, "failed to serialize settings: {}", e),
            SettingsError::Invalid(reason) => write!(f, "invalid settings: {}", reason),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SettingsError::Io(_, e) => Some(e),
            SettingsError::Parse(e) => Some(e),
            SettingsError::Serialize(e) => Some(e),
            _ => None,
        }
    }
}

impl Settings {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("com", "tetrs", "tetrs-rules").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get the settings file path
    pub fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("rules.toml"))
    }

    /// Load settings from the default location, or fall back to defaults
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("Ignoring settings file: {}", e);
                Self::default()
            }
        }
    }

    /// Load and validate settings from a specific file
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let contents =
            fs::read_to_string(path).map_err(|e| SettingsError::Io(path.to_path_buf(), e))?;
        let settings = Self::from_toml(&contents)?;
        tracing::debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn from_toml(contents: &str) -> Result<Self, SettingsError> {
        let settings: Settings = toml::from_str(contents).map_err(SettingsError::Parse)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to the default location
    pub fn save(&self) -> Result<(), SettingsError> {
        let path = Self::settings_path().ok_or(SettingsError::NoConfigDir)?;
        self.save_to(&path)
    }

    /// Save settings to a specific file, creating its directory if needed
    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|e| SettingsError::Io(dir.to_path_buf(), e))?;
        }

        let contents = toml::to_string_pretty(self).map_err(SettingsError::Serialize)?;
        fs::write(path, contents).map_err(|e| SettingsError::Io(path.to_path_buf(), e))?;
        Ok(())
    }

    /// Reject settings the engine cannot run with
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.board.width < 4 || self.board.height < 4 {
            return Err(SettingsError::Invalid(format!(
                "board must be at least 4x4, got {}x{}",
                self.board.width, self.board.height
            )));
        }
        if self.timing.min_interval_ms == 0 {
            return Err(SettingsError::Invalid(
                "min_interval_ms must be positive".to_string(),
            ));
        }
        if self.timing.min_interval_ms > self.timing.base_interval_ms {
            return Err(SettingsError::Invalid(format!(
                "min_interval_ms ({}) exceeds base_interval_ms ({})",
                self.timing.min_interval_ms, self.timing.base_interval_ms
            )));
        }
        if self.scoring.lines_per_level == 0 {
            return Err(SettingsError::Invalid(
                "lines_per_level must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// The engine rules these settings describe
    pub fn rules(&self) -> Rules {
        Rules {
            width: self.board.width,
            height: self.board.height,
            progression: Progression {
                base_interval_ms: self.timing.base_interval_ms,
                min_interval_ms: self.timing.min_interval_ms,
                step_ms: self.timing.step_ms,
                clear_bonus: self.scoring.clear_bonus,
                soft_drop_points: self.scoring.soft_drop_points,
                lines_per_level: self.scoring.lines_per_level,
            },
            spawn_rule: self.spawner.rule,
        }
    }
}
