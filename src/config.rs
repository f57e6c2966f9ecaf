use crate::error::{Error, Result};
use crate::retry::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TtsConfig {
    pub base_url: String,
    pub model: String,
    pub voice: String,
    pub timeout_secs: u64,
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini-tts".to_string(),
            voice: "alloy".to_string(),
            timeout_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub initial_delay_ms: u64,
    pub multiplier: u32,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay_ms: 2000,
            multiplier: 2,
        }
    }
}

impl RetryConfig {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            initial_delay: Duration::from_millis(self.initial_delay_ms),
            multiplier: self.multiplier,
        }
    }
}

/// One spelling bee level ("1B", "2B", ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub level: String,
    /// Line-delimited word list, relative to the project root.
    pub source_file: PathBuf,
    /// Defaults to `<data_dir>/words_<level>.json`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json_file: Option<PathBuf>,
    /// Defaults to `<audio_root>/<level>`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_dir: Option<PathBuf>,
}

impl LevelConfig {
    pub fn new(level: impl Into<String>, source_file: impl Into<PathBuf>) -> Self {
        Self {
            level: level.into(),
            source_file: source_file.into(),
            json_file: None,
            audio_dir: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobConfig {
    pub project_root: PathBuf,
    pub data_dir: PathBuf,
    pub audio_root: PathBuf,
    pub levels: Vec<LevelConfig>,
    pub tts: TtsConfig,
    pub retry: RetryConfig,
    /// Pause after every successful request.
    pub courtesy_delay_ms: u64,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            project_root: PathBuf::from("."),
            data_dir: PathBuf::from("data"),
            audio_root: PathBuf::from("audio"),
            levels: vec![
                LevelConfig::new("1B", "schoolBee_1.txt"),
                LevelConfig::new("2B", "schoolBee_2.txt"),
                LevelConfig::new("3B", "schoolBee_3.txt"),
            ],
            tts: TtsConfig::default(),
            retry: RetryConfig::default(),
            courtesy_delay_ms: 500,
        }
    }
}

/// A level with every path resolved against the project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLevel {
    pub level: String,
    pub source_file: PathBuf,
    pub json_file: PathBuf,
    pub audio_dir: PathBuf,
}

impl JobConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let config: JobConfig = serde_json::from_str(&text)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.levels.is_empty() {
            return Err(Error::Config("no levels configured".to_string()));
        }
        let mut seen = HashSet::new();
        for level in &self.levels {
            if level.level.trim().is_empty() {
                return Err(Error::Config("level name must not be empty".to_string()));
            }
            if !seen.insert(level.level.as_str()) {
                return Err(Error::Config(format!("duplicate level '{}'", level.level)));
            }
        }
        if self.retry.max_attempts == 0 {
            return Err(Error::Config("retry.max_attempts must be at least 1".to_string()));
        }
        if self.retry.multiplier == 0 {
            return Err(Error::Config("retry.multiplier must be at least 1".to_string()));
        }
        Ok(())
    }

    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_root.join(path)
        }
    }

    pub fn audio_root(&self) -> PathBuf {
        self.resolve(&self.audio_root)
    }

    pub fn courtesy_delay(&self) -> Duration {
        Duration::from_millis(self.courtesy_delay_ms)
    }

    pub fn resolved_levels(&self) -> Vec<ResolvedLevel> {
        self.levels.iter().map(|l| self.resolve_level(l)).collect()
    }

    pub fn find_level(&self, name: &str) -> Option<ResolvedLevel> {
        self.levels
            .iter()
            .find(|l| l.level == name)
            .map(|l| self.resolve_level(l))
    }

    fn resolve_level(&self, level: &LevelConfig) -> ResolvedLevel {
        let json_file = level
            .json_file
            .clone()
            .unwrap_or_else(|| self.data_dir.join(format!("words_{}.json", level.level)));
        let audio_dir = level
            .audio_dir
            .clone()
            .unwrap_or_else(|| self.audio_root.join(&level.level));
        ResolvedLevel {
            level: level.level.clone(),
            source_file: self.resolve(&level.source_file),
            json_file: self.resolve(&json_file),
            audio_dir: self.resolve(&audio_dir),
        }
    }
}
