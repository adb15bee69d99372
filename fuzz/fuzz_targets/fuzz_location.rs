// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2026 Jonathan D.A. Jewell
#![no_main]

use dexplorer::view::Location;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    if let Ok(location) = Location::parse(data) {
        let reparsed = Location::parse(&location.to_string()).expect("serialized location parses");
        assert_eq!(reparsed.route, location.route);
        assert_eq!(reparsed.query.tab, location.query.tab);
    }
});
