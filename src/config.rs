// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Configuration management
//!
//! Layers, lowest first: built-in defaults, the TOML file, `DEXPLORER_*`
//! environment variables (`__` separates nested keys, e.g.
//! `DEXPLORER_CONCURRENCY__PAGE=4`).

use crate::api::DEFAULT_BASE_URL;
use crate::catalog::Limits;
use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Prefix of configuration environment variables
pub const ENV_PREFIX: &str = "DEXPLORER";

/// Name of the configuration file inside the config directory
pub const CONFIG_FILE: &str = "config.toml";

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("com", "hyperpolymath", "dexplorer")
}

/// Fan-out limits per operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Concurrency {
    /// Detail fetches for a browse page
    pub page: usize,
    /// Detail fetches for a filtered listing
    pub filter: usize,
    /// Step resolutions of an evolution chain
    pub evolution: usize,
    /// Detail fetches for the compare view
    pub compare: usize,
}

impl Default for Concurrency {
    fn default() -> Self {
        let limits = Limits::default();
        Self {
            page: limits.page,
            filter: limits.filter,
            evolution: limits.evolution,
            compare: limits.compare,
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory for persistent data (favorites)
    pub data_dir: PathBuf,
    /// Directory for the persisted record store
    pub cache_dir: PathBuf,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Root of the upstream API
    pub api_base_url: String,
    /// Entries per browse page
    pub page_size: u32,
    /// Whether fetched records are written to `cache_dir`
    pub persist_cache: bool,
    /// Per-request timeout; unset means requests never time out
    pub request_timeout_secs: Option<u64>,
    /// Fan-out limits
    pub concurrency: Concurrency,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: project_dirs()
                .map(|d| d.data_dir().to_path_buf())
                .unwrap_or_else(|| PathBuf::from("~/.local/share/dexplorer")),
            cache_dir: project_dirs()
                .map(|d| d.cache_dir().to_path_buf())
                .unwrap_or_else(|| PathBuf::from("~/.cache/dexplorer")),
            log_level: "info".to_string(),
            api_base_url: DEFAULT_BASE_URL.to_string(),
            page_size: 24,
            persist_cache: true,
            request_timeout_secs: None,
            concurrency: Concurrency::default(),
        }
    }
}

impl Config {
    /// Fan-out limits, each at least 1
    #[must_use]
    pub fn limits(&self) -> Limits {
        Limits {
            page: self.concurrency.page.max(1),
            filter: self.concurrency.filter.max(1),
            evolution: self.concurrency.evolution.max(1),
            compare: self.concurrency.compare.max(1),
        }
    }

    /// Configured log level, used when no `-v`, `-q` or `RUST_LOG` is given
    pub fn level(&self) -> Result<tracing::Level> {
        self.log_level
            .trim()
            .parse()
            .map_err(|_| anyhow!("Invalid log_level: {} (trace, debug, info, warn, error)", self.log_level))
    }

    /// Request timeout, if configured
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.filter(|s| *s > 0).map(Duration::from_secs)
    }

    /// Value of a dotted key, rendered as TOML
    pub fn get(&self, key: &str) -> Result<String> {
        let root = toml::Value::try_from(self).context("Failed to serialize configuration")?;
        let mut value = &root;
        for part in key.split('.') {
            value = value
                .get(part)
                .with_context(|| format!("Unknown configuration key: {key}"))?;
        }
        Ok(match value {
            toml::Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }
}

/// Default configuration file location
#[must_use]
pub fn default_path() -> Option<PathBuf> {
    project_dirs().map(|d| d.config_dir().join(CONFIG_FILE))
}

/// Load configuration from defaults, file and environment
///
/// An explicit `path` must exist; the default location is optional.
pub fn load(path: Option<&Path>) -> Result<Config> {
    let defaults = ::config::Config::try_from(&Config::default())
        .context("Failed to build default configuration")?;
    let mut builder = ::config::Config::builder().add_source(defaults);

    match path {
        Some(path) => {
            if !path.exists() {
                bail!("Configuration file not found: {}", path.display());
            }
            builder = builder.add_source(::config::File::from(path).format(::config::FileFormat::Toml));
        }
        None => {
            if let Some(path) = default_path() {
                builder = builder.add_source(
                    ::config::File::from(path)
                        .format(::config::FileFormat::Toml)
                        .required(false),
                );
            }
        }
    }

    builder
        .add_source(
            ::config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .context("Failed to read configuration")?
        .try_deserialize()
        .context("Invalid configuration")
}

fn parse_scalar(raw: &str) -> toml::Value {
    if let Ok(b) = raw.parse::<bool>() {
        toml::Value::Boolean(b)
    } else if let Ok(i) = raw.parse::<i64>() {
        toml::Value::Integer(i)
    } else if let Ok(f) = raw.parse::<f64>() {
        toml::Value::Float(f)
    } else {
        toml::Value::String(raw.to_string())
    }
}

/// Set a dotted key in the TOML file at `path`, creating it if needed
///
/// The file is only written when the result is still a valid configuration.
pub fn set(path: &Path, key: &str, raw: &str) -> Result<()> {
    let mut root = match fs::read_to_string(path) {
        Ok(content) => toml::from_str::<toml::Table>(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?,
        Err(_) => toml::Table::new(),
    };

    let parts: Vec<&str> = key.split('.').collect();
    let Some((leaf, parents)) = parts.split_last() else {
        bail!("Empty configuration key");
    };
    let mut table = &mut root;
    for part in parents {
        table = table
            .entry((*part).to_string())
            .or_insert_with(|| toml::Value::Table(toml::Table::new()))
            .as_table_mut()
            .with_context(|| format!("{part} is not a table"))?;
    }
    table.insert((*leaf).to_string(), parse_scalar(raw));

    let merged: Config = toml::Value::Table(root.clone())
        .try_into()
        .with_context(|| format!("Invalid value for {key}: {raw}"))?;
    merged.get(key)?;
    merged.level()?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    let content = toml::to_string_pretty(&root).context("Failed to serialize configuration")?;
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}
