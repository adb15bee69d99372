// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Show command - creature detail with evolutions

use dexplorer::app::App;
use anyhow::Result;

/// Run show command
pub async fn run(app: &App, reference: &str) -> Result<()> {
    super::print(app.present(app.show(reference)).await?);
    Ok(())
}
