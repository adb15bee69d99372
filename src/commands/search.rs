// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Search command - single creature by name or id

use dexplorer::app::App;
use dexplorer::catalog::Filter;
use anyhow::Result;

/// Run search command
pub async fn run(app: &App, term: &str, kind: Option<&str>, generation: Option<&str>) -> Result<()> {
    let filter = Filter::new(kind, generation);
    super::print(app.present(app.search(term, &filter)).await?);
    Ok(())
}
