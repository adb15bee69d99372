// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Terminal rendering of cards, details and evolution paths
//!
//! Every function returns a `String` so callers decide where it goes and
//! whether it is still current when it gets there.

use crate::condition::{self, UNCONDITIONAL};
use crate::evolution::{ChainCard, EvolutionPath, EvolutionStep};
use crate::types::{CreatureRecord, ItemRecord};
use owo_colors::OwoColorize;
use std::fmt::Write as _;

/// Base stat that fills a whole stat bar
pub const STAT_SCALE: f64 = 160.0;

/// Width of a stat bar in cells
pub const BAR_WIDTH: usize = 20;

/// Shown for items without an effect text
pub const NO_DESCRIPTION: &str = "Sin descripción.";

/// Shown for items without a price
pub const UNKNOWN_COST: &str = "Desconocido";

/// Marker for evolution steps whose record is missing
pub const UNRESOLVED_MARKER: &str = "?";

const COMPARE_COLUMN: usize = 14;

/// Badge colour per category
const TYPE_COLORS: &[(&str, (u8, u8, u8))] = &[
    ("normal", (0xa8, 0xa7, 0x7a)),
    ("fire", (0xee, 0x81, 0x30)),
    ("water", (0x63, 0x90, 0xf0)),
    ("electric", (0xf7, 0xd0, 0x2c)),
    ("grass", (0x7a, 0xc7, 0x4c)),
    ("ice", (0x96, 0xd9, 0xd6)),
    ("fighting", (0xc2, 0x2e, 0x28)),
    ("poison", (0xa3, 0x3e, 0xa1)),
    ("ground", (0xe2, 0xbf, 0x65)),
    ("flying", (0xa9, 0x8f, 0xf3)),
    ("psychic", (0xf9, 0x55, 0x87)),
    ("bug", (0xa6, 0xb9, 0x1a)),
    ("rock", (0xb6, 0xa1, 0x36)),
    ("ghost", (0x73, 0x57, 0x97)),
    ("dragon", (0x6f, 0x35, 0xfc)),
    ("dark", (0x70, 0x57, 0x46)),
    ("steel", (0xb7, 0xb7, 0xce)),
    ("fairy", (0xd6, 0x85, 0xad)),
];

/// RGB colour of a category, if it has one
#[must_use]
pub fn type_color(kind: &str) -> Option<(u8, u8, u8)> {
    TYPE_COLORS.iter().find(|(name, _)| *name == kind).map(|(_, rgb)| *rgb)
}

/// Zero-padded catalog number, e.g. `#0025`
#[must_use]
pub fn id_fmt(id: u32) -> String {
    format!("#{id:04}")
}

/// Display form of a resource name
#[must_use]
pub fn title(name: &str) -> String {
    condition::capitalize(&name.replace('-', " "))
}

/// Category badge, coloured when `color` is set
#[must_use]
pub fn badge(kind: &str, color: bool) -> String {
    let text = format!("[{kind}]");
    match type_color(kind) {
        Some((r, g, b)) if color => text.truecolor(r, g, b).to_string(),
        _ => text,
    }
}

fn badges(record: &CreatureRecord, color: bool) -> String {
    record
        .type_names()
        .iter()
        .map(|t| badge(t, color))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Filled cells for a base stat
#[must_use]
pub fn bar_cells(value: u32) -> usize {
    let ratio = (f64::from(value) / STAT_SCALE).min(1.0);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let cells = (ratio * BAR_WIDTH as f64).round() as usize;
    cells
}

/// Stat bar scaled against [`STAT_SCALE`]
#[must_use]
pub fn stat_bar(value: u32) -> String {
    let filled = bar_cells(value);
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

/// One-line creature card
#[must_use]
pub fn creature_card(record: &CreatureRecord, favorite: bool, color: bool) -> String {
    let star = if favorite { " ★" } else { "" };
    let name = title(&record.name);
    let name = if color { name.bold().to_string() } else { name };
    format!("{} {} {}{}", id_fmt(record.id), name, badges(record, color), star)
}

/// Full creature detail with its evolution paths
#[must_use]
pub fn creature_detail(record: &CreatureRecord, paths: &[EvolutionPath], favorite: bool, color: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", creature_card(record, favorite, color));
    let _ = writeln!(out, "  Altura: {:.1} m   Peso: {:.1} kg", record.height_m(), record.weight_kg());

    let abilities = record.ability_names();
    if !abilities.is_empty() {
        let _ = writeln!(out, "  Habilidades: {}", abilities.join(", "));
    }

    if !record.stats.is_empty() {
        let _ = writeln!(out, "  Estadísticas:");
        for stat in &record.stats {
            let _ = writeln!(out, "    {:<16} {} {:>3}", stat.stat.name, stat_bar(stat.base_stat), stat.base_stat);
        }
    }

    let versions = record.versions();
    if !versions.is_empty() {
        let _ = writeln!(out, "  Versiones: {}", versions.join(", "));
    }

    let _ = writeln!(out, "  Evoluciones:");
    if paths.is_empty() {
        let _ = writeln!(out, "    (sin evoluciones)");
    }
    for path in paths {
        let _ = writeln!(out, "    {}", evolution_path(path, color));
    }
    out
}

fn step_text(step: &EvolutionStep, color: bool) -> String {
    let name = title(step.display_name());
    if !step.is_unresolved() {
        return name;
    }
    let marked = format!("{name}{UNRESOLVED_MARKER}");
    if color {
        marked.dimmed().to_string()
    } else {
        marked
    }
}

/// One evolution path on a single line, conditions between the steps
#[must_use]
pub fn evolution_path(path: &EvolutionPath, color: bool) -> String {
    let mut out = String::new();
    for (idx, step) in path.steps.iter().enumerate() {
        if idx > 0 {
            match step.label.as_deref() {
                None | Some(UNCONDITIONAL) => out.push_str(" → "),
                Some(label) => {
                    let _ = write!(out, " ─[{label}]→ ");
                }
            }
        }
        out.push_str(&step_text(step, color));
    }
    out
}

/// Chain card of the evolution catalog
#[must_use]
pub fn chain_card(card: &ChainCard, color: bool) -> String {
    let mut out = format!("{} {}\n", id_fmt(card.root.id), title(&card.root.name));
    for path in &card.paths {
        let _ = writeln!(out, "  {}", evolution_path(path, color));
    }
    out
}

/// Item price text
#[must_use]
pub fn cost_text(cost: Option<u32>) -> String {
    cost.map_or_else(|| UNKNOWN_COST.to_string(), |c| format!("{c} ₽"))
}

/// One-line item card
#[must_use]
pub fn item_card(item: &ItemRecord) -> String {
    let category = item.category.as_ref().map_or("", |c| c.name.as_str());
    format!("{} {} ({}) {}", id_fmt(item.id), title(&item.name), category, cost_text(item.cost))
}

/// Full item detail
#[must_use]
pub fn item_detail(item: &ItemRecord) -> String {
    let mut out = format!("{} {}\n", id_fmt(item.id), title(&item.name));
    if let Some(category) = &item.category {
        let _ = writeln!(out, "  Categoría: {}", category.name);
    }
    let _ = writeln!(out, "  Coste: {}", cost_text(item.cost));
    if !item.attributes.is_empty() {
        let names: Vec<&str> = item.attributes.iter().map(|a| a.name.as_str()).collect();
        let _ = writeln!(out, "  Atributos: {}", names.join(", "));
    }
    let _ = writeln!(out, "  {}", item.effect_text().unwrap_or(NO_DESCRIPTION));
    out
}

/// Side-by-side comparison of creatures
#[must_use]
pub fn compare_table(records: &[std::sync::Arc<CreatureRecord>]) -> String {
    let mut out = String::new();
    let row = |out: &mut String, label: &str, cells: Vec<String>| {
        let _ = write!(out, "{label:<16}");
        for cell in cells {
            let _ = write!(out, "{cell:<width$}", width = COMPARE_COLUMN);
        }
        out.push('\n');
    };

    row(&mut out, "", records.iter().map(|r| title(&r.name)).collect());
    row(&mut out, "id", records.iter().map(|r| id_fmt(r.id)).collect());
    row(&mut out, "tipos", records.iter().map(|r| r.type_names().join("/")).collect());
    row(&mut out, "altura", records.iter().map(|r| format!("{:.1} m", r.height_m())).collect());
    row(&mut out, "peso", records.iter().map(|r| format!("{:.1} kg", r.weight_kg())).collect());

    // Stat rows follow the first record's stat order
    if let Some(first) = records.first() {
        for stat in &first.stats {
            let name = stat.stat.name.as_str();
            let cells = records
                .iter()
                .map(|r| {
                    r.stats
                        .iter()
                        .find(|s| s.stat.name == name)
                        .map_or_else(|| "-".to_string(), |s| s.base_stat.to_string())
                })
                .collect();
            row(&mut out, name, cells);
        }
    }
    out
}

/// One-line status or error banner
#[must_use]
pub fn banner(message: &str, color: bool) -> String {
    if color {
        format!("{} {}", "!".red().bold(), message)
    } else {
        format!("! {message}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{NamedResource, StatValue, TypeSlot};
    use std::sync::Arc;

    fn pikachu() -> CreatureRecord {
        CreatureRecord {
            id: 25,
            name: "pikachu".into(),
            height: 4,
            weight: 60,
            types: vec![TypeSlot { slot: 1, kind: NamedResource::new("electric", "") }],
            stats: vec![StatValue { base_stat: 90, effort: 2, stat: NamedResource::new("speed", "") }],
            ..Default::default()
        }
    }

    fn step(name: &str, label: Option<&str>, resolved: bool) -> EvolutionStep {
        EvolutionStep {
            species: name.into(),
            species_id: None,
            condition: None,
            label: label.map(String::from),
            record: resolved.then(|| Arc::new(CreatureRecord { name: name.into(), ..Default::default() })),
            gap: None,
        }
    }

    #[test]
    fn test_id_fmt_pads() {
        assert_eq!(id_fmt(25), "#0025");
        assert_eq!(id_fmt(10_025), "#10025");
    }

    #[test]
    fn test_stat_bar_caps_at_scale() {
        assert_eq!(bar_cells(0), 0);
        assert_eq!(bar_cells(80), BAR_WIDTH / 2);
        assert_eq!(bar_cells(255), BAR_WIDTH);
        assert_eq!(stat_bar(255).chars().count(), BAR_WIDTH);
    }

    #[test]
    fn test_unknown_type_has_no_color() {
        assert_eq!(type_color("shadow"), None);
        assert_eq!(badge("shadow", true), "[shadow]");
        assert_eq!(type_color("fire"), Some((0xee, 0x81, 0x30)));
    }

    #[test]
    fn test_creature_card_plain() {
        insta::assert_snapshot!(creature_card(&pikachu(), true, false), @"#0025 Pikachu [electric] ★");
    }

    #[test]
    fn test_evolution_path_marks_gaps() {
        let path = EvolutionPath {
            steps: vec![
                step("charmander", None, true),
                step("charmeleon", Some("Lv 16"), true),
                step("charizard", Some(UNCONDITIONAL), false),
            ],
        };
        insta::assert_snapshot!(evolution_path(&path, false), @"Charmander ─[Lv 16]→ Charmeleon → Charizard?");
    }

    #[test]
    fn test_item_cost_and_fallback_text() {
        let item = ItemRecord { id: 1, name: "master-ball".into(), cost: Some(0), ..Default::default() };
        let detail = item_detail(&item);
        assert!(detail.contains("Coste: 0 ₽"));
        assert!(detail.contains(NO_DESCRIPTION));
        assert_eq!(cost_text(None), UNKNOWN_COST);
    }

    #[test]
    fn test_compare_table_one_decimal() {
        let table = compare_table(&[Arc::new(pikachu())]);
        assert!(table.contains("0.4 m"));
        assert!(table.contains("6.0 kg"));
        assert!(table.contains("speed"));
    }
}
