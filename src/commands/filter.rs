// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Filter command - creatures by category and/or generation

use dexplorer::app::App;
use dexplorer::catalog::Filter;
use anyhow::{bail, Result};
use std::str::FromStr;

/// How many filtered creatures to show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Count {
    /// Every match
    All,
    /// At most this many
    Max(usize),
}

impl Count {
    /// Limit for the catalog, `None` meaning unbounded
    #[must_use]
    pub fn limit(self) -> Option<usize> {
        match self {
            Self::All => None,
            Self::Max(n) => Some(n),
        }
    }
}

impl FromStr for Count {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        match s.parse::<usize>() {
            Ok(n) if n > 0 => Ok(Self::Max(n)),
            _ => bail!("Invalid count: {}. Use a positive number or 'all'", s),
        }
    }
}

/// Run filter command
pub async fn run(app: &App, kind: Option<&str>, generation: Option<&str>, count: Count) -> Result<()> {
    let filter = Filter::new(kind, generation);
    if filter.is_empty() {
        bail!("Give --type and/or --gen to filter by");
    }
    super::print(app.present(app.filter(&filter, count.limit())).await?);
    Ok(())
}
