// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Command implementations

pub mod browse;
pub mod cache;
pub mod compare;
pub mod completions;
pub mod condition;
pub mod config;
pub mod evolutions;
pub mod favorites;
pub mod filter;
pub mod filters;
pub mod item;
pub mod items;
pub mod open;
pub mod search;
pub mod show;

/// Print a view unless a newer one overtook it
pub fn print(view: Option<String>) {
    if let Some(text) = view {
        println!("{text}");
    }
}
