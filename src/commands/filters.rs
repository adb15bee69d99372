// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Filters command - available categories and generations

use dexplorer::app::App;
use anyhow::Result;

/// Run filters command
pub async fn run(app: &App, json: bool) -> Result<()> {
    let catalog = app.catalog();
    let (types, generations) = futures::try_join!(catalog.type_names(), catalog.generation_names())?;

    if json {
        let value = serde_json::json!({ "types": types, "generations": generations });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("Tipos ({}):", types.len());
    println!("  {}", types.join(", "));
    println!("Generaciones ({}):", generations.len());
    println!("  {}", generations.join(", "));
    Ok(())
}
