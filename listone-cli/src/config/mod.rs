//! Configuration loading
//!
//! Settings come from a TOML file (explicit `--config` path, or
//! `<config_dir>/listone/config.toml` when present), then environment
//! overrides. Every field has a default so an empty file is valid.

pub mod repository;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable overriding `[database] url`
pub const ENV_DATABASE_URL: &str = "LISTONE_DATABASE_URL";
/// Environment variable overriding `[server] bind`
pub const ENV_BIND: &str = "LISTONE_BIND";

/// Excel refuses sheet names longer than this
const MAX_SHEET_NAME_LEN: usize = 31;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub listone: ListoneSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Socket address the HTTP server listens on
    pub bind: String,
    /// Largest accepted upload, in bytes
    pub max_upload_bytes: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_string(),
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// SQLite connection URL; defaults to a file in the user data directory
    pub url: Option<String>,
}

/// Rules for importing and rendering the listone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListoneSettings {
    /// How many fantasy teams may roster the same player
    pub max_copies: u32,
    /// Team written for players without a real-world club
    pub default_realteam: String,
    /// Quotation used when the cell is empty or zero
    pub default_value: i64,
    /// Worksheet name of the generated listone
    pub sheet_name: String,
    /// File name offered to the browser for the generated listone
    pub download_name: String,
}

impl Default for ListoneSettings {
    fn default() -> Self {
        Self {
            max_copies: 3,
            default_realteam: "Svincolato".to_string(),
            default_value: 1,
            sheet_name: "Listone Aggiornato".to_string(),
            download_name: "Listone_Aggiornato.xlsx".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from `path`, or from the default location if it exists
    pub fn load(path: Option<&Path>) -> Result<Config> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => {
                    log::debug!("No config file found, using defaults");
                    Config::default()
                }
            },
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Config> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        log::debug!("Loaded config from {}", path.display());
        Self::from_toml_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml_str(contents: &str) -> Result<Config> {
        Ok(toml::from_str(contents)?)
    }

    /// Apply overrides from a variable lookup (the process environment in practice)
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_DATABASE_URL).filter(|v| !v.trim().is_empty()) {
            self.database.url = Some(url);
        }
        if let Some(bind) = lookup(ENV_BIND).filter(|v| !v.trim().is_empty()) {
            self.server.bind = bind;
        }
    }

    pub fn validate(&self) -> Result<()> {
        let listone = &self.listone;
        if listone.max_copies == 0 {
            bail!("listone.max_copies must be at least 1");
        }
        if listone.sheet_name.trim().is_empty() {
            bail!("listone.sheet_name must not be empty");
        }
        if listone.sheet_name.chars().count() > MAX_SHEET_NAME_LEN {
            bail!(
                "listone.sheet_name must be at most {} characters",
                MAX_SHEET_NAME_LEN
            );
        }
        if listone.download_name.trim().is_empty() {
            bail!("listone.download_name must not be empty");
        }
        if self.server.max_upload_bytes == 0 {
            bail!("server.max_upload_bytes must be greater than 0");
        }
        Ok(())
    }

    /// Database URL to connect to, falling back to `<data_dir>/listone/listone.db`
    pub fn database_url(&self) -> Result<String> {
        if let Some(url) = &self.database.url {
            return Ok(url.clone());
        }

        let dir = dirs::data_dir()
            .context("Could not determine the user data directory")?
            .join("listone");
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create data directory: {}", dir.display()))?;

        Ok(format!("sqlite://{}", dir.join("listone.db").display()))
    }
}

/// `<config_dir>/listone/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("listone").join("config.toml"))
}
