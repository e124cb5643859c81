// ⚙️ Configuration - environment driven
//
// PORT          listening port (default 8000)
// DATABASE_URL  SQLite location: sqlite::memory:, sqlite://<path> or a path
// DATABASE_NAME logical database name inside that file
//
// Both database variables are optional; without them the server still starts
// and storage endpoints report the database as unavailable.

use anyhow::{Context, Result};
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 8000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub database_url: Option<String>,
    pub database_name: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: DEFAULT_PORT,
            database_url: None,
            database_name: None,
        }
    }
}

/// Load `.env` from the working directory or one of its parents.
///
/// A missing file is not an error; an unreadable or malformed one is.
/// Returns the path that was loaded so the caller can log it once tracing
/// is up.
pub fn load_dotenv() -> Result<Option<PathBuf>> {
    load_env_file(".env")
}

pub fn load_env_file(filename: &str) -> Result<Option<PathBuf>> {
    match dotenvy::from_filename(filename) {
        Ok(path) => Ok(Some(path)),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(e).with_context(|| format!("Failed to load {}", filename)),
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; blank values count as unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let port = match get("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .with_context(|| format!("PORT must be a port number, got {:?}", raw))?,
            None => DEFAULT_PORT,
        };

        Ok(Config {
            port,
            database_url: get("DATABASE_URL"),
            database_name: get("DATABASE_NAME"),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }

    /// (url, name) when both are configured
    pub fn database(&self) -> Option<(&str, &str)> {
        match (&self.database_url, &self.database_name) {
            (Some(url), Some(name)) => Some((url.as_str(), name.as_str())),
            _ => None,
        }
    }
}
