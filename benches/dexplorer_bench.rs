// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Benchmarks for chain traversal and condition labels

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dexplorer::condition;
use dexplorer::evolution::{chain_paths, chain_signature};
use dexplorer::types::{ChainLink, EvolutionCondition, NamedResource};

fn link(name: String, children: Vec<ChainLink>) -> ChainLink {
    ChainLink {
        species: NamedResource::new(name, "https://pokeapi.co/api/v2/pokemon-species/1/"),
        evolution_details: vec![EvolutionCondition { min_level: Some(16), ..Default::default() }],
        evolves_to: children,
    }
}

/// Eevee-like root with `width` branches, each `depth` steps long
fn wide_chain(width: usize, depth: usize) -> ChainLink {
    let branches = (0..width)
        .map(|b| {
            (0..depth)
                .rev()
                .fold(None, |child: Option<ChainLink>, d| {
                    Some(link(format!("s{b}-{d}"), child.into_iter().collect()))
                })
                .unwrap_or_else(|| link(format!("s{b}"), Vec::new()))
        })
        .collect();
    link("root".into(), branches)
}

fn bench_traversal(c: &mut Criterion) {
    let small = wide_chain(8, 2);
    let large = wide_chain(64, 4);

    c.bench_function("chain_paths_eevee_like", |b| b.iter(|| chain_paths(black_box(&small))));
    c.bench_function("chain_paths_wide", |b| b.iter(|| chain_paths(black_box(&large))));
    c.bench_function("chain_signature_wide", |b| {
        let paths = chain_paths(&large);
        b.iter(|| chain_signature(black_box(&paths)));
    });
}

fn bench_condition(c: &mut Criterion) {
    let full = EvolutionCondition {
        min_level: Some(30),
        min_happiness: Some(220),
        time_of_day: "night".into(),
        known_move_type: Some(NamedResource::new("fairy", "")),
        gender: Some(1),
        needs_overworld_rain: true,
        relative_physical_stats: Some(-1),
        turn_upside_down: true,
        ..Default::default()
    };
    c.bench_function("condition_format_full", |b| b.iter(|| condition::format(black_box(&full))));
    c.bench_function("condition_format_empty", |b| {
        b.iter(|| condition::format_opt(black_box(None)));
    });
}

criterion_group!(benches, bench_traversal, bench_condition);
criterion_main!(benches);
