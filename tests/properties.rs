// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Property tests for the mapper, record cache, path dedup and labels

use dexplorer::cache::{MemoryStore, RecordCache, CREATURE_PREFIX};
use dexplorer::condition::{self, UNCONDITIONAL};
use dexplorer::evolution::{chain_paths, signature};
use dexplorer::mapper::map_bounded;
use dexplorer::types::{ChainLink, CreatureRecord, EvolutionCondition, NamedResource};
use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap()
}

fn tree(depth: u32, names: &[String], breadth: &[usize]) -> ChainLink {
    let idx = depth as usize % names.len();
    let children = if depth as usize >= breadth.len() {
        Vec::new()
    } else {
        (0..breadth[depth as usize]).map(|_| tree(depth + 1, names, breadth)).collect()
    };
    ChainLink {
        species: NamedResource::new(names[idx].clone(), ""),
        evolution_details: vec![EvolutionCondition { min_level: Some(depth), ..Default::default() }],
        evolves_to: children,
    }
}

proptest! {
    #[test]
    fn test_mapper_order_and_bound(inputs in prop::collection::vec(0u32..1000, 0..40), limit in 0usize..8) {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let out = runtime().block_on(map_bounded(inputs.clone(), limit, |i| {
            let in_flight = Arc::clone(&in_flight);
            let peak = Arc::clone(&peak);
            async move {
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                for _ in 0..(i % 3) {
                    tokio::task::yield_now().await;
                }
                in_flight.fetch_sub(1, Ordering::SeqCst);
                u64::from(i) + 1
            }
        }));

        let expected: Vec<u64> = inputs.iter().map(|i| u64::from(*i) + 1).collect();
        prop_assert_eq!(out, expected);
        prop_assert!(peak.load(Ordering::SeqCst) <= limit.max(1));
    }

    #[test]
    fn test_cache_registers_id_and_name(id in 1u32..100_000, name in "[a-z][a-z-]{0,15}") {
        let cache = RecordCache::with_store(CREATURE_PREFIX, Arc::new(MemoryStore::new()));
        let record = CreatureRecord { id, name: name.clone(), ..Default::default() };
        cache.set(&name, record.clone());

        let by_id = cache.get(&id.to_string());
        let by_name = cache.get(&name);
        prop_assert_eq!(by_id.as_deref(), Some(&record));
        prop_assert_eq!(by_name.as_deref(), Some(&record));
    }

    #[test]
    fn test_paths_have_unique_signatures(
        names in prop::collection::vec("[a-c]", 1..4),
        breadth in prop::collection::vec(1usize..3, 0..4),
    ) {
        let paths = chain_paths(&tree(0, &names, &breadth));
        prop_assert!(!paths.is_empty());

        let mut seen = HashSet::new();
        for path in &paths {
            prop_assert!(seen.insert(signature(path)));
            prop_assert!(path.windows(2).all(|w| w[0].species != w[1].species));
            prop_assert!(path[0].condition.is_none());
        }
    }

    #[test]
    fn test_label_is_never_empty(level in proptest::option::of(0u32..100), time in "(|day|night|dusk)") {
        let c = EvolutionCondition { min_level: level, time_of_day: time, ..Default::default() };
        let label = condition::format(&c);
        prop_assert!(!label.is_empty());
        prop_assert_eq!(label == UNCONDITIONAL, condition::parts(&c).is_empty());
    }
}
