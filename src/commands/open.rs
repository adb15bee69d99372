// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Open command - restore a saved location

use dexplorer::app::App;
use anyhow::Result;

/// Run open command
pub async fn run(app: &mut App, location: &str) -> Result<()> {
    for view in app.open(location).await? {
        println!("{view}");
    }
    Ok(())
}
