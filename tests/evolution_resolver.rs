// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Evolution resolution against an in-memory API
//!
//! These tests cover the resolver end to end:
//! 1. Linear and branching chains, in tree order
//! 2. Per-step failures leave placeholders instead of failing
//! 3. Species and chain failures abort resolution
//! 4. Step resolution never exceeds its fan-out limit
//! 5. The chain catalog shows each chain once
//! 6. Slow views are discarded once a newer view started

use async_trait::async_trait;
use dexplorer::api::Endpoints;
use dexplorer::app::{App, Output};
use dexplorer::catalog::{Catalog, Limits};
use dexplorer::config::Config;
use dexplorer::error::FetchError;
use dexplorer::evolution::EvolutionResolver;
use dexplorer::fetch::Fetch;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tempfile::TempDir;

const BASE: &str = "https://pokeapi.test/api/v2";

// =============================================================================
// Test Helpers
// =============================================================================

#[derive(Default)]
struct FakeApi {
    responses: HashMap<String, Value>,
    failures: HashMap<String, u16>,
    delays: HashMap<String, Duration>,
    default_delay: Option<Duration>,
    requests: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

#[async_trait]
impl Fetch for FakeApi {
    async fn get_json(&self, url: &str) -> Result<Value, FetchError> {
        self.requests.lock().unwrap().push(url.to_string());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        if let Some(delay) = self.delays.get(url).copied().or(self.default_delay) {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if let Some(status) = self.failures.get(url) {
            return Err(FetchError::Response { url: url.to_string(), status: *status });
        }
        self.responses
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::Response { url: url.to_string(), status: 404 })
    }
}

impl FakeApi {
    /// Register a creature whose species has the same name and id
    fn creature(mut self, name: &str, id: u32, chain: Option<u32>) -> Self {
        let species_url = format!("{BASE}/pokemon-species/{id}/");
        let record = json!({
            "id": id,
            "name": name,
            "species": { "name": name, "url": species_url },
            "types": [{ "slot": 1, "type": { "name": "normal", "url": "" } }],
        });
        self.responses.insert(format!("{BASE}/pokemon/{name}"), record.clone());
        self.responses.insert(format!("{BASE}/pokemon/{id}"), record);

        let species = json!({
            "id": id,
            "name": name,
            "evolution_chain": chain.map(|c| json!({ "url": format!("{BASE}/evolution-chain/{c}/") })),
            "varieties": [{ "is_default": true, "pokemon": { "name": name, "url": "" } }],
        });
        self.responses.insert(species_url, species.clone());
        self.responses.insert(format!("{BASE}/pokemon-species/{name}"), species);
        self
    }

    fn chain(mut self, id: u32, root: Value) -> Self {
        self.responses.insert(format!("{BASE}/evolution-chain/{id}"), json!({ "id": id, "chain": root }));
        self
    }

    fn fail(mut self, url: String, status: u16) -> Self {
        self.failures.insert(url, status);
        self
    }

    fn missing(mut self, url: &str) -> Self {
        self.responses.remove(url);
        self
    }

    fn requests_for(&self, url: &str) -> usize {
        self.requests.lock().unwrap().iter().filter(|u| *u == url).count()
    }
}

fn node(name: &str, id: u32, details: Value, children: Vec<Value>) -> Value {
    json!({
        "species": { "name": name, "url": format!("{BASE}/pokemon-species/{id}/") },
        "evolution_details": details,
        "evolves_to": children,
    })
}

fn catalog(api: FakeApi) -> Catalog<FakeApi> {
    Catalog::new(api, Endpoints::new(BASE), Limits::default())
}

fn starter_api() -> FakeApi {
    FakeApi::default()
        .creature("bulbasaur", 1, Some(1))
        .creature("ivysaur", 2, Some(1))
        .creature("venusaur", 3, Some(1))
        .chain(
            1,
            node(
                "bulbasaur",
                1,
                json!([]),
                vec![node(
                    "ivysaur",
                    2,
                    json!([{ "min_level": 16, "trigger": { "name": "level-up", "url": "" } }]),
                    vec![node("venusaur", 3, json!([{ "min_level": 32 }]), vec![])],
                )],
            ),
        )
}

fn eevee_api() -> FakeApi {
    FakeApi::default()
        .creature("eevee", 133, Some(67))
        .creature("vaporeon", 134, Some(67))
        .creature("jolteon", 135, Some(67))
        .creature("flareon", 136, Some(67))
        .chain(
            67,
            node(
                "eevee",
                133,
                json!([]),
                vec![
                    node("vaporeon", 134, json!([{ "item": { "name": "water-stone", "url": "" } }]), vec![]),
                    node("jolteon", 135, json!([{ "item": { "name": "thunder-stone", "url": "" } }]), vec![]),
                    node("flareon", 136, json!([{ "item": { "name": "fire-stone", "url": "" } }]), vec![]),
                ],
            ),
        )
}

fn psychic_api() -> FakeApi {
    FakeApi::default()
        .creature("abra", 63, Some(26))
        .creature("kadabra", 64, Some(26))
        .creature("alakazam", 65, Some(26))
        .chain(
            26,
            node(
                "abra",
                63,
                json!([]),
                vec![node(
                    "kadabra",
                    64,
                    json!([{ "min_level": 16, "trigger": { "name": "level-up", "url": "" } }]),
                    vec![node("alakazam", 65, json!([{ "trigger": { "name": "trade", "url": "" } }]), vec![])],
                )],
            ),
        )
}

/// One species branching at the same level, by day or by night
fn dusk_api() -> FakeApi {
    let level_up = json!({ "name": "level-up", "url": "" });
    FakeApi::default()
        .creature("nyxling", 901, Some(400))
        .creature("solwing", 902, Some(400))
        .creature("lunwing", 903, Some(400))
        .chain(
            400,
            node(
                "nyxling",
                901,
                json!([]),
                vec![
                    node("solwing", 902, json!([{ "min_level": 20, "trigger": level_up }]), vec![]),
                    node(
                        "lunwing",
                        903,
                        json!([{ "min_level": 20, "time_of_day": "night", "trigger": level_up }]),
                        vec![],
                    ),
                ],
            ),
        )
}

// =============================================================================
// Resolution
// =============================================================================

#[tokio::test]
async fn test_linear_chain() {
    let catalog = catalog(starter_api());
    let paths = EvolutionResolver::new(&catalog).resolve_reference("ivysaur").await.unwrap();

    assert_eq!(paths.len(), 1);
    assert_eq!(paths[0].species(), vec!["bulbasaur", "ivysaur", "venusaur"]);

    let labels: Vec<Option<&str>> = paths[0].steps.iter().map(|s| s.label.as_deref()).collect();
    assert_eq!(labels, vec![None, Some("Lv 16"), Some("Lv 32")]);
    assert!(paths[0].steps.iter().all(|s| !s.is_unresolved()));
    assert_eq!(paths[0].steps[2].record.as_ref().unwrap().id, 3);
}

#[tokio::test]
async fn test_linear_chain_ending_in_trade() {
    let catalog = catalog(psychic_api());
    let paths = EvolutionResolver::new(&catalog).resolve_reference("abra").await.unwrap();

    assert_eq!(paths.len(), 1);
    assert_eq!(paths[0].species(), vec!["abra", "kadabra", "alakazam"]);
    let labels: Vec<Option<&str>> = paths[0].steps.iter().map(|s| s.label.as_deref()).collect();
    assert_eq!(labels, vec![None, Some("Lv 16"), Some("Intercambio")]);
}

#[tokio::test]
async fn test_branching_chain_by_time_of_day() {
    let catalog = catalog(dusk_api());
    let paths = EvolutionResolver::new(&catalog).resolve_reference("nyxling").await.unwrap();

    assert_eq!(paths.len(), 2);
    assert_eq!(paths[0].species(), vec!["nyxling", "solwing"]);
    assert_eq!(paths[1].species(), vec!["nyxling", "lunwing"]);
    assert_eq!(paths[0].steps[1].label.as_deref(), Some("Lv 20"));
    assert_eq!(paths[1].steps[1].label.as_deref(), Some("Lv 20 • Noche"));
    assert!(paths.iter().flat_map(|p| &p.steps).all(|s| !s.is_unresolved()));
}

#[tokio::test]
async fn test_branching_chain_keeps_tree_order() {
    let catalog = catalog(eevee_api());
    let paths = EvolutionResolver::new(&catalog).resolve_reference("133").await.unwrap();

    let leaves: Vec<&str> = paths.iter().map(|p| p.steps[1].species.as_str()).collect();
    assert_eq!(leaves, vec!["vaporeon", "jolteon", "flareon"]);
    assert_eq!(paths[1].steps[1].label.as_deref(), Some("Thunder-stone"));
}

#[tokio::test]
async fn test_species_resolved_once_across_paths() {
    let api = eevee_api();
    let catalog = catalog(api);
    EvolutionResolver::new(&catalog).resolve_reference("eevee").await.unwrap();
    EvolutionResolver::new(&catalog).resolve_reference("eevee").await.unwrap();

    // Root species was fetched by URL, then served by name from the cache
    let fake = catalog.fetcher();
    assert_eq!(fake.requests_for(&format!("{BASE}/pokemon-species/eevee")), 0);
    assert_eq!(fake.requests_for(&format!("{BASE}/pokemon/jolteon")), 1);
    assert_eq!(fake.requests_for(&format!("{BASE}/evolution-chain/67")), 1);
}

#[tokio::test]
async fn test_step_failure_leaves_placeholder() {
    let api = starter_api().fail(format!("{BASE}/pokemon/venusaur"), 500);
    let catalog = catalog(api);
    let paths = EvolutionResolver::new(&catalog).resolve_reference("bulbasaur").await.unwrap();

    let last = &paths[0].steps[2];
    assert!(last.is_unresolved());
    assert_eq!(last.display_name(), "venusaur");
    assert_eq!(last.species_id, Some(3));
    assert!(last.artwork().ends_with("/3.png"));
    assert!(last.gap.as_deref().unwrap().contains("500"));
    assert!(!paths[0].steps[1].is_unresolved());
}

#[tokio::test]
async fn test_species_failure_aborts() {
    let api = starter_api().fail(format!("{BASE}/pokemon-species/1/"), 503);
    let catalog = catalog(api);
    let resolver = EvolutionResolver::new(&catalog);

    let err = resolver.resolve_reference("bulbasaur").await.unwrap_err();
    assert_eq!(err.status(), Some(503));

    let root = catalog.ensure_creature("bulbasaur").await.unwrap();
    assert!(resolver.resolve_or_empty(&root).await.is_empty());
}

#[tokio::test]
async fn test_chain_failure_aborts() {
    let api = starter_api().missing(&format!("{BASE}/evolution-chain/1"));
    let catalog = catalog(api);
    let err = EvolutionResolver::new(&catalog).resolve_reference("bulbasaur").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_species_without_chain() {
    let catalog = catalog(FakeApi::default().creature("tauros", 128, None));
    let paths = EvolutionResolver::new(&catalog).resolve_reference("tauros").await.unwrap();
    assert!(paths.is_empty());
}

#[tokio::test]
async fn test_single_species_chain() {
    let api = FakeApi::default()
        .creature("tauros", 128, Some(60))
        .chain(60, node("tauros", 128, json!([]), vec![]));
    let catalog = catalog(api);
    let paths = EvolutionResolver::new(&catalog).resolve_reference("tauros").await.unwrap();
    assert_eq!(paths.len(), 1);
    assert_eq!(paths[0].species(), vec!["tauros"]);
}

#[tokio::test]
async fn test_duplicate_paths_keep_first_conditions() {
    let api = FakeApi::default()
        .creature("a", 1, Some(9))
        .creature("b", 2, Some(9))
        .chain(
            9,
            node(
                "a",
                1,
                json!([]),
                vec![
                    node("b", 2, json!([{ "min_level": 10 }]), vec![]),
                    node("b", 2, json!([{ "trigger": { "name": "trade", "url": "" } }]), vec![]),
                ],
            ),
        );
    let catalog = catalog(api);
    let paths = EvolutionResolver::new(&catalog).resolve_reference("a").await.unwrap();
    assert_eq!(paths.len(), 1);
    assert_eq!(paths[0].steps[1].label.as_deref(), Some("Lv 10"));
}

#[tokio::test]
async fn test_default_variety_record() {
    let mut api = FakeApi::default().creature("deoxys", 386, Some(200));
    api.responses.insert(
        format!("{BASE}/pokemon-species/deoxys"),
        json!({
            "id": 386,
            "name": "deoxys",
            "evolution_chain": { "url": format!("{BASE}/evolution-chain/200/") },
            "varieties": [
                { "is_default": false, "pokemon": { "name": "deoxys-attack", "url": "" } },
                { "is_default": true, "pokemon": { "name": "deoxys-normal", "url": "" } },
            ],
        }),
    );
    api.responses.insert(
        format!("{BASE}/pokemon/deoxys-normal"),
        json!({ "id": 10001, "name": "deoxys-normal" }),
    );
    let api = api.chain(200, node("deoxys", 386, json!([]), vec![]));

    let catalog = catalog(api);
    let step = EvolutionResolver::new(&catalog).resolve_species("deoxys").await.unwrap();
    assert_eq!(step.name, "deoxys-normal");
}

#[tokio::test]
async fn test_step_resolution_respects_limit() {
    let leaves: Vec<Value> = (2..=13)
        .map(|id| node(&format!("leaf{id}"), id, json!([{ "min_level": id }]), vec![]))
        .collect();
    let mut api = FakeApi::default().creature("hub", 1, Some(5)).chain(5, node("hub", 1, json!([]), leaves));
    for id in 2..=13 {
        api = api.creature(&format!("leaf{id}"), id, Some(5));
    }
    api.default_delay = Some(Duration::from_millis(5));

    let catalog = catalog(api);
    let resolver = EvolutionResolver::new(&catalog).with_limit(3);
    let root = catalog.ensure_creature("hub").await.unwrap();
    let paths = resolver.resolve(&root).await.unwrap();

    assert_eq!(paths.len(), 12);
    assert!(paths.iter().flat_map(|p| &p.steps).all(|s| !s.is_unresolved()));
    assert!(catalog.fetcher().peak.load(Ordering::SeqCst) <= 3);
}

// =============================================================================
// Catalog & views
// =============================================================================

#[tokio::test]
async fn test_chain_catalog_shows_each_chain_once() {
    let api = starter_api()
        .creature("tauros", 128, Some(60))
        .chain(60, node("tauros", 128, json!([]), vec![]));
    let catalog = catalog(api);
    let roots = catalog
        .creatures(&["bulbasaur", "ivysaur", "tauros", "venusaur"].map(String::from), 4)
        .await
        .unwrap();

    let cards = EvolutionResolver::new(&catalog).catalog(&roots).await;
    let heads: Vec<&str> = cards.iter().map(|c| c.root.name.as_str()).collect();
    assert_eq!(heads, vec!["bulbasaur", "tauros"]);
}

#[tokio::test]
async fn test_stale_view_is_discarded() {
    let dir = TempDir::new().unwrap();
    let mut api = starter_api().creature("tauros", 128, None);
    api.delays.insert(format!("{BASE}/pokemon/bulbasaur"), Duration::from_millis(50));

    let config = Config { data_dir: dir.path().to_path_buf(), api_base_url: BASE.into(), ..Config::default() };
    let app = App::with_fetcher(config, api, None, Output::default());

    let (slow, fast) = tokio::join!(app.present(app.show("bulbasaur")), app.present(app.show("tauros")));
    assert_eq!(slow.unwrap(), None);
    let fast = fast.unwrap().unwrap();
    assert!(fast.contains("Tauros"));
    assert!(fast.contains("(sin evoluciones)"));
}

#[tokio::test]
async fn test_open_routes_to_detail() {
    let dir = TempDir::new().unwrap();
    let config = Config { data_dir: dir.path().to_path_buf(), api_base_url: BASE.into(), ..Config::default() };
    let mut app = App::with_fetcher(config, starter_api(), None, Output::default());

    let views = app.open("?q=Ivysaur#/pokemon/bulbasaur").await.unwrap();
    assert_eq!(views.len(), 2);
    assert!(views[0].contains("#0002 Ivysaur"));
    assert!(views[1].contains("Bulbasaur ─[Lv 16]→ Ivysaur ─[Lv 32]→ Venusaur"));
    assert_eq!(app.state().query.search, "ivysaur");
}
