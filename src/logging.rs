use std::env;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use crate::error::MurmurError;

/// `$XDG_CACHE_HOME/murmur`, or `~/.cache/murmur` when unset.
pub fn cache_dir() -> Result<PathBuf, MurmurError> {
    let base = match env::var_os("XDG_CACHE_HOME") {
        Some(dir) => PathBuf::from(dir),
        None => dirs::home_dir()
            .ok_or_else(|| MurmurError::Config("Could not find home directory".to_string()))?
            .join(".cache"),
    };
    Ok(base.join("murmur"))
}

pub fn default_log_file() -> Result<PathBuf, MurmurError> {
    Ok(cache_dir()?.join("murmur.log"))
}

/// Routes the `log` facade into `path`. The terminal belongs to the UI, so
/// nothing is written to stderr. `RUST_LOG` overrides `level`.
pub fn init(path: &Path, level: &str) -> Result<(), MurmurError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| MurmurError::Io(format!("Failed to create log directory {:?}: {}", parent, e)))?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .try_init()
        .map_err(|e| MurmurError::Config(format!("Logger already initialized: {}", e)))
}
