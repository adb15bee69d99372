// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2026 Jonathan D.A. Jewell
#![no_main]

use dexplorer::evolution::{chain_paths, signature};
use dexplorer::types::EvolutionChain;
use libfuzzer_sys::fuzz_target;
use std::collections::HashSet;

fuzz_target!(|data: &[u8]| {
    if let Ok(chain) = serde_json::from_slice::<EvolutionChain>(data) {
        let paths = chain_paths(&chain.chain);
        let mut seen = HashSet::new();
        for path in &paths {
            assert!(!path.is_empty());
            assert!(seen.insert(signature(path)));
        }
    }
});
