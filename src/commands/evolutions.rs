// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Evolutions command - paths of one chain, or the chain catalog

use dexplorer::app::App;
use dexplorer::catalog::Filter;
use anyhow::Result;

/// Run evolutions command
///
/// With a reference, prints that creature's paths. Without one, prints one
/// card per distinct chain among the first `count` (filtered) creatures.
pub async fn run(
    app: &App,
    reference: Option<&str>,
    kind: Option<&str>,
    generation: Option<&str>,
    count: Option<u32>,
) -> Result<()> {
    let view = match reference {
        Some(reference) => app.present(app.evolutions(reference)).await?,
        None => {
            let filter = Filter::new(kind, generation);
            let count = count.unwrap_or(app.config().page_size);
            app.present(app.evolution_catalog(&filter, count)).await?
        }
    };
    super::print(view);
    Ok(())
}
