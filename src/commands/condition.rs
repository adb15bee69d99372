// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Condition command - label for a raw evolution condition object

use dexplorer::condition;
use dexplorer::types::EvolutionCondition;
use anyhow::{Context, Result};

/// Format `json` (an object or `null`) as a condition label
pub fn format(json: &str) -> Result<String> {
    let parsed: Option<EvolutionCondition> =
        serde_json::from_str(json).context("Condition must be a JSON object or null")?;
    Ok(condition::format_opt(parsed.as_ref()))
}

/// Run condition command
pub fn run(json: &str) -> Result<()> {
    println!("{}", format(json)?);
    Ok(())
}
