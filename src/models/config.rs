use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};

use crate::error::MurmurError;
use crate::models::identity::Identity;
use crate::models::post::TimelineVariant;

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
    pub api_url: String,
    /// Signed-in user id. Stands in for the identity provider handshake.
    #[serde(default)]
    pub identity: Option<Identity>,
    #[serde(default)]
    pub timeline: TimelineVariant,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Config {
    pub fn default_path() -> Result<PathBuf, MurmurError> {
        Ok(dirs::home_dir()
            .ok_or_else(|| MurmurError::Config("Could not find home directory".to_string()))?
            .join(".config/murmur/config.json"))
    }

    pub fn load(path: &Path) -> Result<Self, MurmurError> {
        let file = File::open(path)
            .map_err(|e| MurmurError::Config(format!("Failed to open config file at {:?}: {}", path, e)))?;

        let config: Config = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| MurmurError::Config(format!("Failed to parse config JSON: {}", e)))?;

        if config.api_url.trim().is_empty() {
            return Err(MurmurError::Config("api_url must not be empty".to_string()));
        }
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), MurmurError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self)?;
        fs::write(path, json)
            .map_err(|e| MurmurError::Config(format!("Failed to write config file at {:?}: {}", path, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_applies_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"api_url": "http://localhost:8080", "identity": "u1"}"#).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.identity, Some(Identity::new("u1")));
        assert_eq!(config.timeline, TimelineVariant::ForYou);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn save_round_trips_timeline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/config.json");
        let config = Config {
            api_url: "http://api".to_string(),
            identity: None,
            timeline: TimelineVariant::Following,
            log_level: "debug".to_string(),
        };
        config.save(&path).unwrap();
        assert_eq!(Config::load(&path).unwrap(), config);
    }

    #[test]
    fn empty_api_url_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"api_url": " "}"#).unwrap();
        assert!(matches!(Config::load(&path), Err(MurmurError::Config(_))));
    }
}
