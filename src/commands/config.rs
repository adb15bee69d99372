// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Config command - get or set configuration keys

use dexplorer::config::{self, Config};
use anyhow::{Context, Result};
use std::path::Path;

/// Run config command
///
/// Without a value prints the effective value of `key`; with one, writes
/// it to the configuration file.
pub fn run(config: &Config, file: Option<&Path>, key: &str, value: Option<String>) -> Result<()> {
    match value {
        Some(v) => {
            let path = match file {
                Some(path) => path.to_path_buf(),
                None => config::default_path().context("No configuration directory available")?,
            };
            config::set(&path, key, &v)?;
            tracing::info!("Set {} = {} in {}", key, v, path.display());
        }
        None => println!("{}", config.get(key)?),
    }
    Ok(())
}
