// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Catalog access: fetch-through-cache lookups, listings, filters and search

use crate::api::{self, Endpoints, Resource};
use crate::cache::{KeyValueStore, RecordCache, CREATURE_PREFIX, ITEM_PREFIX};
use crate::error::{FetchError, LookupError};
use crate::fetch::{fetch_as, Fetch};
use crate::mapper::map_bounded;
use crate::types::{
    CreatureRecord, EvolutionChain, GenerationRecord, ItemRecord, ResourceList, SpeciesRecord,
    TypeRecord,
};
use crate::view::normalize_term;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

/// In-flight ceilings for each kind of fan-out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Detail fetches for a listing page
    pub page: usize,
    /// Detail fetches for a filtered result set or favorites
    pub filter: usize,
    /// Record resolution for evolution steps
    pub evolution: usize,
    /// Detail fetches for the comparison view
    pub compare: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self { page: 8, filter: 10, evolution: 8, compare: 6 }
    }
}

/// Category and generation constraints
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    /// Category name
    pub kind: Option<String>,
    /// Generation name
    pub generation: Option<String>,
}

impl Filter {
    /// Build a filter, treating empty strings as unset
    #[must_use]
    pub fn new(kind: Option<&str>, generation: Option<&str>) -> Self {
        let clean = |s: Option<&str>| s.map(str::trim).filter(|s| !s.is_empty()).map(String::from);
        Self { kind: clean(kind), generation: clean(generation) }
    }

    /// Whether neither constraint is set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.kind.is_none() && self.generation.is_none()
    }
}

/// Membership lists fetched for filters, kept for the session
#[derive(Debug, Default)]
struct MembershipCache {
    types: RwLock<HashMap<String, Arc<Vec<String>>>>,
    generations: RwLock<HashMap<String, Arc<Vec<String>>>>,
}

fn cached_list(map: &RwLock<HashMap<String, Arc<Vec<String>>>>, key: &str) -> Option<Arc<Vec<String>>> {
    map.read().unwrap_or_else(PoisonError::into_inner).get(key).cloned()
}

fn store_list(map: &RwLock<HashMap<String, Arc<Vec<String>>>>, key: &str, names: Vec<String>) -> Arc<Vec<String>> {
    let names = Arc::new(names);
    map.write()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(key.to_string(), Arc::clone(&names));
    names
}

/// Read-only view of the upstream catalog with session caches
pub struct Catalog<F> {
    fetcher: F,
    endpoints: Endpoints,
    limits: Limits,
    creatures: RecordCache<CreatureRecord>,
    items: RecordCache<ItemRecord>,
    species: RecordCache<SpeciesRecord>,
    chains: RecordCache<EvolutionChain>,
    membership: MembershipCache,
}

impl<F> std::fmt::Debug for Catalog<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Catalog")
            .field("endpoints", &self.endpoints)
            .field("limits", &self.limits)
            .field("creatures", &self.creatures)
            .field("items", &self.items)
            .finish_non_exhaustive()
    }
}

impl<F: Fetch> Catalog<F> {
    /// Catalog with in-memory caches only
    pub fn new(fetcher: F, endpoints: Endpoints, limits: Limits) -> Self {
        Self {
            fetcher,
            endpoints,
            limits,
            creatures: RecordCache::new(CREATURE_PREFIX),
            items: RecordCache::new(ITEM_PREFIX),
            species: RecordCache::new("spc:"),
            chains: RecordCache::new("evo:"),
            membership: MembershipCache::default(),
        }
    }

    /// Catalog whose creature and item caches persist to `store`
    pub fn with_store(
        fetcher: F,
        endpoints: Endpoints,
        limits: Limits,
        store: Arc<dyn KeyValueStore>,
    ) -> Self {
        Self {
            creatures: RecordCache::with_store(CREATURE_PREFIX, Arc::clone(&store)),
            items: RecordCache::with_store(ITEM_PREFIX, store),
            ..Self::new(fetcher, endpoints, limits)
        }
    }

    /// Underlying fetcher
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Endpoint layout
    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Fan-out ceilings
    pub fn limits(&self) -> Limits {
        self.limits
    }

    /// Creature cache
    pub fn creature_cache(&self) -> &RecordCache<CreatureRecord> {
        &self.creatures
    }

    // =========================================================================
    // Single records
    // =========================================================================

    /// Creature by id, name or detail URL, through the cache
    pub async fn ensure_creature(&self, reference: &str) -> Result<Arc<CreatureRecord>, FetchError> {
        let key = api::cache_key(Resource::Pokemon, reference);
        if let Some(record) = self.creatures.get(&key) {
            return Ok(record);
        }
        let url = self.endpoints.resolve(Resource::Pokemon, reference);
        let record: CreatureRecord = fetch_as(&self.fetcher, &url).await?;
        Ok(self.creatures.set(&key, record))
    }

    /// Item by id, name or detail URL, through the cache
    pub async fn ensure_item(&self, reference: &str) -> Result<Arc<ItemRecord>, FetchError> {
        let key = api::cache_key(Resource::Item, reference);
        if let Some(record) = self.items.get(&key) {
            return Ok(record);
        }
        let url = self.endpoints.resolve(Resource::Item, reference);
        let record: ItemRecord = fetch_as(&self.fetcher, &url).await?;
        Ok(self.items.set(&key, record))
    }

    /// Species by id, name or URL, through the session cache
    pub async fn ensure_species(&self, reference: &str) -> Result<Arc<SpeciesRecord>, FetchError> {
        let key = api::cache_key(Resource::Species, reference);
        if let Some(record) = self.species.get(&key) {
            return Ok(record);
        }
        let url = self.endpoints.resolve(Resource::Species, reference);
        let record: SpeciesRecord = fetch_as(&self.fetcher, &url).await?;
        Ok(self.species.set(&key, record))
    }

    /// Evolution chain addressed by a chain URL, through the session cache
    ///
    /// The chain id is taken from the URL and refetched against the
    /// configured base; URLs without a recognisable id are fetched as-is.
    pub async fn ensure_chain(&self, chain_url: &str) -> Result<Arc<EvolutionChain>, FetchError> {
        let Some(id) = api::id_from_url(Resource::EvolutionChain, chain_url) else {
            let chain: EvolutionChain = fetch_as(&self.fetcher, chain_url).await?;
            return Ok(Arc::new(chain));
        };
        let key = id.to_string();
        if let Some(chain) = self.chains.get(&key) {
            return Ok(chain);
        }
        let chain: EvolutionChain = fetch_as(&self.fetcher, &self.endpoints.evolution_chain(id)).await?;
        Ok(self.chains.set(&key, chain))
    }

    // =========================================================================
    // Listings
    // =========================================================================

    /// One page of a list endpoint
    pub async fn list_page(&self, resource: Resource, limit: u32, offset: u32) -> Result<ResourceList, FetchError> {
        fetch_as(&self.fetcher, &self.endpoints.list(resource, limit, offset)).await
    }

    /// Detailed creatures of one listing page, in listing order
    pub async fn browse_creatures(&self, limit: u32, offset: u32) -> Result<Vec<Arc<CreatureRecord>>, FetchError> {
        let page = self.list_page(Resource::Pokemon, limit, offset).await?;
        map_bounded(page.results, self.limits.page, |r| async move {
            self.ensure_creature(&r.url).await
        })
        .await
        .into_iter()
        .collect()
    }

    /// Detailed items of one listing page, in listing order
    pub async fn browse_items(&self, limit: u32, offset: u32) -> Result<Vec<Arc<ItemRecord>>, FetchError> {
        let page = self.list_page(Resource::Item, limit, offset).await?;
        map_bounded(page.results, self.limits.page, |r| async move {
            self.ensure_item(&r.url).await
        })
        .await
        .into_iter()
        .collect()
    }

    /// Creatures for explicit ids or names, in the given order
    pub async fn creatures(&self, references: &[String], limit: usize) -> Result<Vec<Arc<CreatureRecord>>, FetchError> {
        map_bounded(references, limit, |r| self.ensure_creature(r))
            .await
            .into_iter()
            .collect()
    }

    // =========================================================================
    // Filters
    // =========================================================================

    /// Names of all categories
    pub async fn type_names(&self) -> Result<Vec<String>, FetchError> {
        let list: ResourceList = fetch_as(&self.fetcher, &self.endpoints.index(Resource::Type)).await?;
        Ok(list.results.into_iter().map(|r| r.name).collect())
    }

    /// Names of all generations, oldest first
    pub async fn generation_names(&self) -> Result<Vec<String>, FetchError> {
        let list: ResourceList = fetch_as(&self.fetcher, &self.endpoints.index(Resource::Generation)).await?;
        Ok(list.results.into_iter().map(|r| r.name).collect())
    }

    /// Creature names carrying a category, in API order
    pub async fn type_members(&self, kind: &str) -> Result<Arc<Vec<String>>, FetchError> {
        if let Some(names) = cached_list(&self.membership.types, kind) {
            return Ok(names);
        }
        let record: TypeRecord = fetch_as(&self.fetcher, &self.endpoints.detail(Resource::Type, kind)).await?;
        let names = record.pokemon.into_iter().map(|m| m.pokemon.name).collect();
        Ok(store_list(&self.membership.types, kind, names))
    }

    /// Species names introduced in a generation
    pub async fn generation_members(&self, generation: &str) -> Result<Arc<Vec<String>>, FetchError> {
        if let Some(names) = cached_list(&self.membership.generations, generation) {
            return Ok(names);
        }
        let record: GenerationRecord =
            fetch_as(&self.fetcher, &self.endpoints.detail(Resource::Generation, generation)).await?;
        let mut seen = HashSet::new();
        let names = record
            .pokemon_species
            .into_iter()
            .map(|s| s.name)
            .filter(|n| seen.insert(n.clone()))
            .collect();
        Ok(store_list(&self.membership.generations, generation, names))
    }

    /// Names matching the filter, truncated to `max`
    ///
    /// With both constraints the category list is intersected with the
    /// generation set, keeping category order.
    pub async fn filtered_names(&self, filter: &Filter, max: Option<usize>) -> Result<Vec<String>, FetchError> {
        let names: Vec<String> = match (&filter.kind, &filter.generation) {
            (Some(kind), Some(generation)) => {
                let (kinds, generations) =
                    futures::try_join!(self.type_members(kind), self.generation_members(generation))?;
                let generations: HashSet<&str> = generations.iter().map(String::as_str).collect();
                kinds.iter().filter(|n| generations.contains(n.as_str())).cloned().collect()
            }
            (Some(kind), None) => self.type_members(kind).await?.to_vec(),
            (None, Some(generation)) => self.generation_members(generation).await?.to_vec(),
            (None, None) => Vec::new(),
        };
        Ok(match max {
            Some(max) => names.into_iter().take(max).collect(),
            None => names,
        })
    }

    /// Detailed creatures matching the filter, sorted by id
    pub async fn filter_creatures(&self, filter: &Filter, max: Option<usize>) -> Result<Vec<Arc<CreatureRecord>>, FetchError> {
        let names = self.filtered_names(filter, max).await?;
        debug!("filter {:?} matched {} names", filter, names.len());
        let mut records = self.creatures(&names, self.limits.filter).await?;
        records.sort_by_key(|r| r.id);
        Ok(records)
    }

    // =========================================================================
    // Search
    // =========================================================================

    /// Single creature by name or id, constrained by the filter
    pub async fn search_creature(&self, term: &str, filter: &Filter) -> Result<Arc<CreatureRecord>, LookupError> {
        let term = normalize_term(term);
        let record = self.ensure_creature(&term).await?;

        if let Some(kind) = &filter.kind {
            if !record.has_type(kind) {
                return Err(LookupError::NoMatch { name: record.name.clone(), filter: format!("type {kind}") });
            }
        }
        if let Some(generation) = &filter.generation {
            let members = self.generation_members(generation).await?;
            if !members.iter().any(|n| *n == record.name) {
                return Err(LookupError::NoMatch {
                    name: record.name.clone(),
                    filter: format!("generation {generation}"),
                });
            }
        }
        Ok(record)
    }

    /// Single item by name or id
    pub async fn search_item(&self, term: &str) -> Result<Arc<ItemRecord>, LookupError> {
        Ok(self.ensure_item(&normalize_term(term)).await?)
    }
}
