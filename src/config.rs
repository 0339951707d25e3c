//! Settings for the review binary, read from a JSON file and the environment.
//!
//! `REVIEW_CONFIG` names the file; `REVIEW_DB`, `REVIEW_LOG` and `REVIEW_DECK`
//! override individual fields.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

pub const CONFIG_ENV: &str = "REVIEW_CONFIG";
pub const DB_ENV: &str = "REVIEW_DB";
pub const LOG_ENV: &str = "REVIEW_LOG";
pub const DECK_ENV: &str = "REVIEW_DECK";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewConfig {
    pub database_path: PathBuf,
    /// `EnvFilter` directive, e.g. "info" or "spaced_review=debug".
    pub log_level: String,
    /// Title of the deck to review; the first deck when absent.
    pub deck: Option<String>,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("db.sqlite3"),
            log_level: "info".to_string(),
            deck: None,
        }
    }
}

impl ReviewConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut contents = String::new();
        File::open(path)?.read_to_string(&mut contents)?;
        Ok(serde_json::from_str(&contents)?)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        File::create(path)?.write_all(json.as_bytes())?;
        Ok(())
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match lookup(CONFIG_ENV) {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        if let Some(db) = lookup(DB_ENV) {
            config.database_path = PathBuf::from(db);
        }
        if let Some(level) = lookup(LOG_ENV) {
            config.log_level = level;
        }
        if let Some(deck) = lookup(DECK_ENV) {
            config.deck = Some(deck);
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::fs;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("review.json");
        fs::write(&path, r#"{ "database_path": "/tmp/cards.db" }"#).unwrap();

        let config = ReviewConfig::load(&path).unwrap();

        assert_eq!(config.database_path, PathBuf::from("/tmp/cards.db"));
        assert_eq!(config.log_level, "info");
        assert_eq!(config.deck, None);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("review.json");
        let config = ReviewConfig {
            deck: Some("Polish Vocabulary".to_string()),
            ..ReviewConfig::default()
        };

        config.save(&path).unwrap();
        assert_eq!(ReviewConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_env_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("review.json");
        fs::write(&path, r#"{ "log_level": "debug", "deck": "Spanish" }"#).unwrap();

        let env: HashMap<&str, String> = HashMap::from([
            (CONFIG_ENV, path.to_string_lossy().into_owned()),
            (DB_ENV, "other.sqlite3".to_string()),
        ]);
        let config = ReviewConfig::from_lookup(|key| env.get(key).cloned()).unwrap();

        assert_eq!(config.database_path, PathBuf::from("other.sqlite3"));
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.deck.as_deref(), Some("Spanish"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = ReviewConfig::load("nonexistent_config_xyz123.json");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_invalid_json_is_json_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ this is not valid json }").unwrap();

        assert!(matches!(ReviewConfig::load(&path), Err(ConfigError::Json(_))));
    }
}
