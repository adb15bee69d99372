// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Compare command - creatures side by side

use dexplorer::app::App;
use anyhow::Result;

/// Run compare command; without ids, shows the starter listing
pub async fn run(app: &mut App, ids: &[u32]) -> Result<()> {
    app.select(ids)?;
    let view = if app.compare().is_empty() {
        app.present(app.compare_intro()).await?
    } else {
        app.present(app.compare_view()).await?
    };
    super::print(view);
    Ok(())
}
