//! Server configuration file and CLI overrides.
//!
//! # Responsibility
//! - Load `configs/server.json`-style JSON with defaults for every field.
//! - Apply command-line overrides on top of the file.
//!
//! # Invariants
//! - A missing config file means "all defaults"; an unreadable or invalid
//!   one is an error.

use anyhow::{Context, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "configs/server.json";

/// PersonHub HTTP server.
#[derive(Debug, Parser)]
#[command(name = "personhub", version, about)]
pub struct Cli {
    /// Path to the JSON config file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Bind address, e.g. 0.0.0.0:8080
    #[arg(long)]
    pub address: Option<String>,

    /// SQLite database file
    #[arg(long)]
    pub database: Option<PathBuf>,

    /// Use a throwaway in-memory database
    #[arg(long, conflicts_with = "database")]
    pub memory: bool,

    /// trace|debug|info|warn|error
    #[arg(long)]
    pub log_level: Option<String>,

    /// Absolute directory for rotated log files (stderr when unset)
    #[arg(long)]
    pub log_dir: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub database: DatabaseSection,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_dir: Option<String>,
    #[serde(default)]
    pub debug: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_address")]
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseSection {
    /// `None` selects an in-memory database.
    #[serde(default = "default_database_path")]
    pub path: Option<PathBuf>,
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
}

fn default_log_level() -> String {
    personhub_core::default_log_level().to_string()
}

fn default_address() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_database_path() -> Option<PathBuf> {
    Some(PathBuf::from("personhub.sqlite3"))
}

fn default_pool_size() -> u32 {
    8
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server: ServerSection::default(),
            database: DatabaseSection::default(),
            log_level: default_log_level(),
            log_dir: None,
            debug: false,
        }
    }
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            address: default_address(),
        }
    }
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            path: default_database_path(),
            pool_size: default_pool_size(),
        }
    }
}

impl ServerConfig {
    /// Reads the config file, falling back to defaults when it does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config `{}`", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("invalid config `{}`", path.display()))
    }

    /// Applies command-line overrides.
    pub fn apply_cli(mut self, cli: &Cli) -> Self {
        if let Some(address) = cli.address.as_ref() {
            self.server.address = address.clone();
        }
        if cli.memory {
            self.database.path = None;
        } else if let Some(database) = cli.database.as_ref() {
            self.database.path = Some(database.clone());
        }
        if let Some(level) = cli.log_level.as_ref() {
            self.log_level = level.clone();
        }
        if let Some(dir) = cli.log_dir.as_ref() {
            self.log_dir = Some(dir.clone());
        }
        self
    }
}
