// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Items command - one page of the item listing

use dexplorer::app::App;
use anyhow::Result;

/// Run items command
pub async fn run(app: &App, page: u32) -> Result<()> {
    super::print(app.present(app.items(page)).await?);
    Ok(())
}
