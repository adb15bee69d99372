// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Cache command - inspect or empty the persisted record store

use dexplorer::cache::{FileStore, KeyValueStore};
use dexplorer::config::Config;
use anyhow::{bail, Result};

/// Run cache command
pub fn run(config: &Config, action: &str) -> Result<()> {
    let store = FileStore::new(config.cache_dir.clone());

    match action {
        "stats" => {
            let stats = store.stats()?;
            println!("Cache: {}", store.dir().display());
            println!("  entries: {}", stats.entries);
            println!("  bytes:   {}", stats.bytes);
        }
        "clear" => {
            let removed = store.clear()?;
            println!("Removed {} cached record(s)", removed);
        }
        "path" => println!("{}", store.dir().display()),
        other => bail!("Unknown cache action: {}. Valid: stats, clear, path", other),
    }
    Ok(())
}
