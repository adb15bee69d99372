// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Browse command - one page of the creature listing

use dexplorer::app::App;
use anyhow::Result;

/// Run browse command
pub async fn run(app: &App, page: u32) -> Result<()> {
    super::print(app.present(app.browse(page)).await?);
    Ok(())
}
