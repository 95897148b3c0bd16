// ⚙️ Configuration - paths and formats read from the environment
//
// Every field has a default, so running with no environment at all works.
//
// Environment variables:
// - RENTAL_DATA_PATH   snapshot file (default: data/rental_data.json)
// - RENTAL_LOG_DIR     directory for the daily log file (default: logs)
// - RENTAL_LOG_FORMAT  pretty | json | compact (default: pretty)
// - RENTAL_AUDIT_DB    SQLite file for the action log (default: unset)
// - RENTAL_QUIZ_FILE   question file for the quiz (default: test.txt)

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::logging::LogFormat;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_data_path")]
    pub data_path: PathBuf,

    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Action log database; actions only go to tracing when unset
    #[serde(default)]
    pub audit_db: Option<PathBuf>,

    #[serde(default = "default_quiz_file")]
    pub quiz_file: PathBuf,
}

fn default_data_path() -> PathBuf {
    PathBuf::from("data/rental_data.json")
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

fn default_quiz_file() -> PathBuf {
    PathBuf::from("test.txt")
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            data_path: default_data_path(),
            log_dir: default_log_dir(),
            log_format: LogFormat::default(),
            audit_db: None,
            quiz_file: default_quiz_file(),
        }
    }
}

impl AppConfig {
    /// Read configuration from process environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = AppConfig::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(path) = non_empty("RENTAL_DATA_PATH") {
            config.data_path = PathBuf::from(path);
        }
        if let Some(dir) = non_empty("RENTAL_LOG_DIR") {
            config.log_dir = PathBuf::from(dir);
        }
        if let Some(format) = non_empty("RENTAL_LOG_FORMAT") {
            config.log_format = LogFormat::parse(&format)
                .ok_or_else(|| anyhow!("RENTAL_LOG_FORMAT must be pretty, json or compact, got '{}'", format))?;
        }
        if let Some(db) = non_empty("RENTAL_AUDIT_DB") {
            config.audit_db = Some(PathBuf::from(db));
        }
        if let Some(file) = non_empty("RENTAL_QUIZ_FILE") {
            config.quiz_file = PathBuf::from(file);
        }

        Ok(config)
    }

    /// Load configuration from a JSON file; missing keys take defaults
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }
}
