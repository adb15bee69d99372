// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Favorites command - list and edit the persisted favorites

use dexplorer::app::App;
use anyhow::{bail, Result};

/// Run favorites command
pub async fn run(app: &App, action: &str, ids: &[u32]) -> Result<()> {
    let store = app.favorites();

    match action {
        "list" | "ls" => {
            super::print(app.present(app.favorites_view()).await?);
        }
        "add" | "remove" | "rm" | "toggle" => {
            if ids.is_empty() {
                bail!("Give at least one creature id");
            }
            for &id in ids {
                let message = match action {
                    "add" if store.add(id)? => "added",
                    "add" => "already a favorite",
                    "toggle" if store.toggle(id)? => "added",
                    "toggle" => "removed",
                    _ if store.remove(id)? => "removed",
                    _ => "not a favorite",
                };
                println!("#{id:04}: {message}");
            }
        }
        other => bail!("Unknown favorites action: {}. Valid: list, add, remove, toggle", other),
    }
    Ok(())
}
