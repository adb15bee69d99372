// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Evolution condition labels
//!
//! Labels are built in a fixed field order: level, item, held item,
//! trigger, friendship, beauty, affection, time of day, location, known
//! move, known move type, gender, weather, relative stats, inversion. A
//! plain `level-up` trigger adds nothing since the level already says it.

use crate::types::{EvolutionCondition, NamedResource};

/// Separator between label parts
pub const SEPARATOR: &str = " • ";

/// Label for an edge with no applicable condition
pub const UNCONDITIONAL: &str = "→";

/// Label for a trade trigger
pub const TRADE: &str = "Intercambio";

/// Capitalise the first character
#[must_use]
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn named(resource: Option<&NamedResource>) -> Option<&str> {
    resource.map(|r| r.name.as_str()).filter(|n| !n.is_empty())
}

fn positive(value: Option<u32>) -> Option<u32> {
    value.filter(|v| *v > 0)
}

/// Individual label parts in precedence order
#[must_use]
pub fn parts(c: &EvolutionCondition) -> Vec<String> {
    let mut parts = Vec::new();

    if let Some(level) = positive(c.min_level) {
        parts.push(format!("Lv {level}"));
    }
    if let Some(item) = named(c.item.as_ref()) {
        parts.push(capitalize(item));
    }
    if let Some(held) = named(c.held_item.as_ref()) {
        parts.push(format!("Held {}", capitalize(held)));
    }
    match named(c.trigger.as_ref()) {
        Some("trade") => parts.push(TRADE.to_string()),
        Some("level-up") | None => {}
        Some(other) => parts.push(capitalize(other)),
    }
    if let Some(happiness) = positive(c.min_happiness) {
        parts.push(format!("Amistad {happiness}+"));
    }
    if let Some(beauty) = positive(c.min_beauty) {
        parts.push(format!("Belleza {beauty}+"));
    }
    if let Some(affection) = positive(c.min_affection) {
        parts.push(format!("Afecto {affection}+"));
    }
    match c.time_of_day.as_str() {
        "" => {}
        "day" => parts.push("Día".to_string()),
        "night" => parts.push("Noche".to_string()),
        other => parts.push(capitalize(other)),
    }
    if let Some(location) = named(c.location.as_ref()) {
        parts.push(capitalize(location));
    }
    if let Some(known) = named(c.known_move.as_ref()) {
        parts.push(format!("Move {}", capitalize(known)));
    }
    if let Some(move_type) = named(c.known_move_type.as_ref()) {
        parts.push(format!("Tipo {}", capitalize(move_type)));
    }
    match c.gender {
        Some(1) => parts.push("Hembra".to_string()),
        Some(2) => parts.push("Macho".to_string()),
        _ => {}
    }
    if c.needs_overworld_rain {
        parts.push("Lluvia".to_string());
    }
    match c.relative_physical_stats {
        Some(1) => parts.push("Atk>Def".to_string()),
        Some(-1) => parts.push("Def>Atk".to_string()),
        _ => {}
    }
    if c.turn_upside_down {
        parts.push("3DS invertida".to_string());
    }

    parts
}

/// Short human-readable label for a condition
#[must_use]
pub fn format(c: &EvolutionCondition) -> String {
    let parts = parts(c);
    if parts.is_empty() {
        UNCONDITIONAL.to_string()
    } else {
        parts.join(SEPARATOR)
    }
}

/// Label for an optional condition; a missing condition is unconditional
#[must_use]
pub fn format_opt(c: Option<&EvolutionCondition>) -> String {
    c.map_or_else(|| UNCONDITIONAL.to_string(), format)
}
