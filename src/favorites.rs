// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Persisted set of favorite creatures

use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// File name of the favorites list inside the data directory
pub const FAVORITES_FILE: &str = "favorites.json";

/// Favorite creature ids stored as a JSON array
#[derive(Debug, Clone)]
pub struct FavoriteStore {
    path: PathBuf,
}

impl FavoriteStore {
    /// Store kept in `data_dir`
    #[must_use]
    pub fn new(data_dir: &Path) -> Self {
        Self { path: data_dir.join(FAVORITES_FILE) }
    }

    /// Backing file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All favorite ids, ascending
    ///
    /// A missing or unreadable file reads as no favorites.
    #[must_use]
    pub fn all(&self) -> BTreeSet<u32> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(_) => return BTreeSet::new(),
        };
        // Older lists stored ids as strings
        match serde_json::from_str::<Vec<serde_json::Value>>(&content) {
            Ok(values) => values
                .iter()
                .filter_map(|v| v.as_u64().or_else(|| v.as_str().and_then(|s| s.parse().ok())))
                .filter_map(|id| u32::try_from(id).ok())
                .collect(),
            Err(e) => {
                warn!("ignoring unreadable favorites file {}: {}", self.path.display(), e);
                BTreeSet::new()
            }
        }
    }

    /// Whether `id` is a favorite
    #[must_use]
    pub fn has(&self, id: u32) -> bool {
        self.all().contains(&id)
    }

    /// Flip `id` in or out of the set, returning whether it is now a favorite
    pub fn toggle(&self, id: u32) -> Result<bool> {
        let mut set = self.all();
        let now = if set.remove(&id) {
            false
        } else {
            set.insert(id);
            true
        };
        self.save(&set)?;
        Ok(now)
    }

    /// Add `id`, returning whether it was newly added
    pub fn add(&self, id: u32) -> Result<bool> {
        let mut set = self.all();
        let added = set.insert(id);
        if added {
            self.save(&set)?;
        }
        Ok(added)
    }

    /// Remove `id`, returning whether it was present
    pub fn remove(&self, id: u32) -> Result<bool> {
        let mut set = self.all();
        let removed = set.remove(&id);
        if removed {
            self.save(&set)?;
        }
        Ok(removed)
    }

    fn save(&self, set: &BTreeSet<u32>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        let json = serde_json::to_string(&set.iter().collect::<Vec<_>>())
            .context("Failed to serialize favorites")?;
        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write {}", self.path.display()))
    }
}
