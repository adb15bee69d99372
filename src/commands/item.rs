// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Item command - single item detail

use dexplorer::app::App;
use anyhow::Result;

/// Run item command
pub async fn run(app: &App, term: &str) -> Result<()> {
    super::print(app.present(app.item(term)).await?);
    Ok(())
}
