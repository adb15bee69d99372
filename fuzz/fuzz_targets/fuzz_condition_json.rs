// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2026 Jonathan D.A. Jewell
#![no_main]

use dexplorer::condition;
use dexplorer::types::EvolutionCondition;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(c) = serde_json::from_slice::<EvolutionCondition>(data) {
        assert!(!condition::format(&c).is_empty());
    }
});
