// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Evolution chain resolution
//!
//! A creature's species points at an evolution chain: a tree of species
//! whose edges carry the conditions for each transition. Resolution turns
//! that tree into root-to-leaf paths:
//!
//! 1. depth-first traversal, keeping only the first condition set of each edge
//! 2. adjacent steps naming the same species are collapsed
//! 3. paths with an already-seen species sequence are dropped, whatever
//!    their conditions
//! 4. every distinct species is resolved to its default variety's record
//!
//! Failing to fetch the species or the chain aborts resolution. Failing to
//! resolve one step only leaves that step without a record.

use crate::api::{self, Resource};
use crate::catalog::Catalog;
use crate::condition;
use crate::error::{FetchError, ResolutionGap};
use crate::fetch::Fetch;
use crate::mapper::map_bounded;
use crate::types::{artwork_by_id, ChainLink, CreatureRecord, EvolutionCondition};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, warn};

/// Separator between species names in a path signature
const SIGNATURE_SEPARATOR: &str = ">";

// =============================================================================
// Traversal
// =============================================================================

/// One species on a traversed path, before record resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawStep {
    /// Species name
    pub species: String,
    /// Species id parsed from its URL
    pub species_id: Option<u32>,
    /// First condition set of the edge entering this step
    pub condition: Option<EvolutionCondition>,
}

/// Root-to-leaf sequence of raw steps
pub type RawPath = Vec<RawStep>;

/// All root-to-leaf paths of a chain tree, in depth-first order
#[must_use]
pub fn traverse(root: &ChainLink) -> Vec<RawPath> {
    walk(root, &[], None)
}

fn walk(node: &ChainLink, prefix: &[RawStep], entering: Option<&EvolutionCondition>) -> Vec<RawPath> {
    let mut path = prefix.to_vec();
    path.push(RawStep {
        species: node.species.name.clone(),
        species_id: api::id_from_url(Resource::Species, &node.species.url),
        condition: entering.cloned(),
    });

    if node.evolves_to.is_empty() {
        return vec![path];
    }

    node.evolves_to
        .iter()
        .flat_map(|child| walk(child, &path, child.evolution_details.first()))
        .collect()
}

/// Drop steps that repeat the species of the step before them
#[must_use]
pub fn collapse_adjacent(path: RawPath) -> RawPath {
    let mut collapsed: RawPath = Vec::with_capacity(path.len());
    for step in path {
        if collapsed.last().is_some_and(|prev| prev.species == step.species) {
            continue;
        }
        collapsed.push(step);
    }
    collapsed
}

/// Ordered species names joined into a dedup key
#[must_use]
pub fn signature(path: &[RawStep]) -> String {
    path.iter()
        .map(|s| s.species.as_str())
        .collect::<Vec<_>>()
        .join(SIGNATURE_SEPARATOR)
}

/// Collapse each path, then keep the first path of every species sequence
///
/// Paths differing only in their conditions count as duplicates.
#[must_use]
pub fn dedupe(paths: Vec<RawPath>) -> Vec<RawPath> {
    let mut seen = HashSet::new();
    paths
        .into_iter()
        .map(collapse_adjacent)
        .filter(|path| seen.insert(signature(path)))
        .collect()
}

/// Deduplicated paths of a chain tree
#[must_use]
pub fn chain_paths(root: &ChainLink) -> Vec<RawPath> {
    dedupe(traverse(root))
}

/// Order-independent key of a whole chain, used to show each chain once
#[must_use]
pub fn chain_signature(paths: &[RawPath]) -> String {
    let mut signatures: Vec<String> = paths.iter().map(|p| signature(p)).collect();
    signatures.sort_unstable();
    signatures.join("|")
}

/// Distinct species names across paths, in first-seen order
#[must_use]
pub fn distinct_species(paths: &[RawPath]) -> Vec<String> {
    let mut seen = HashSet::new();
    paths
        .iter()
        .flatten()
        .filter(|s| seen.insert(s.species.as_str()))
        .map(|s| s.species.clone())
        .collect()
}

// =============================================================================
// Resolved paths
// =============================================================================

/// One displayable step of an evolution path
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvolutionStep {
    /// Species name
    pub species: String,
    /// Species id
    pub species_id: Option<u32>,
    /// Condition of the edge entering this step (none for the root)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<EvolutionCondition>,
    /// Formatted condition label (none for the root)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Record of the species' default variety
    pub record: Option<Arc<CreatureRecord>>,
    /// Why the record is missing, when it is
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gap: Option<String>,
}

impl EvolutionStep {
    /// Name to display: the resolved record's name, else the species name
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.record.as_ref().map_or(self.species.as_str(), |r| r.name.as_str())
    }

    /// Artwork to display, falling back to artwork by species id
    #[must_use]
    pub fn artwork(&self) -> String {
        match &self.record {
            Some(record) => record.artwork().to_string(),
            None => artwork_by_id(self.species_id),
        }
    }

    /// Whether the step's record could not be resolved
    #[must_use]
    pub fn is_unresolved(&self) -> bool {
        self.record.is_none()
    }
}

/// Resolved root-to-leaf evolution path
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvolutionPath {
    /// Steps from root to leaf
    pub steps: Vec<EvolutionStep>,
}

impl EvolutionPath {
    /// Species names from root to leaf
    #[must_use]
    pub fn species(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.species.as_str()).collect()
    }
}

/// Evolution paths of one chain, headed by the creature that led to it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChainCard {
    /// Creature the chain was looked up for
    pub root: Arc<CreatureRecord>,
    /// Resolved paths
    pub paths: Vec<EvolutionPath>,
}

fn annotate(paths: Vec<RawPath>, records: &HashMap<String, Result<Arc<CreatureRecord>, ResolutionGap>>) -> Vec<EvolutionPath> {
    paths
        .into_iter()
        .map(|path| EvolutionPath {
            steps: path
                .into_iter()
                .enumerate()
                .map(|(idx, step)| {
                    let resolved = records.get(&step.species);
                    EvolutionStep {
                        label: (idx > 0).then(|| condition::format_opt(step.condition.as_ref())),
                        record: resolved.and_then(|r| r.as_ref().ok().cloned()),
                        gap: resolved.and_then(|r| r.as_ref().err().map(|g| g.reason.clone())),
                        species: step.species,
                        species_id: step.species_id,
                        condition: step.condition,
                    }
                })
                .collect(),
        })
        .collect()
}

// =============================================================================
// Resolver
// =============================================================================

/// Resolves evolution paths through a [`Catalog`]
#[derive(Debug)]
pub struct EvolutionResolver<'a, F> {
    catalog: &'a Catalog<F>,
    limit: usize,
}

impl<'a, F: Fetch> EvolutionResolver<'a, F> {
    /// Resolver using the catalog's evolution fan-out limit
    #[must_use]
    pub fn new(catalog: &'a Catalog<F>) -> Self {
        Self { catalog, limit: catalog.limits().evolution }
    }

    /// Override the step-resolution fan-out limit
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit.max(1);
        self
    }

    /// Deduplicated raw paths of the chain `root` belongs to
    ///
    /// Returns an empty list when the species has no chain.
    pub async fn raw_paths(&self, root: &CreatureRecord) -> Result<Vec<RawPath>, FetchError> {
        let species_ref = match &root.species {
            Some(species) if !species.url.is_empty() => species.url.clone(),
            Some(species) if !species.name.is_empty() => species.name.clone(),
            _ if root.id > 0 => root.id.to_string(),
            _ => root.name.clone(),
        };
        let species = self.catalog.ensure_species(&species_ref).await?;

        let Some(chain_ref) = &species.evolution_chain else {
            debug!("{} has no evolution chain", species.name);
            return Ok(Vec::new());
        };
        let chain = self.catalog.ensure_chain(&chain_ref.url).await?;
        Ok(chain_paths(&chain.chain))
    }

    /// Record of the default variety of `species`
    pub async fn resolve_species(&self, species: &str) -> Result<Arc<CreatureRecord>, ResolutionGap> {
        let gap = |e: FetchError| ResolutionGap { species: species.to_string(), reason: e.to_string() };
        let record = self.catalog.ensure_species(species).await.map_err(gap)?;
        self.catalog.ensure_creature(record.default_variety()).await.map_err(gap)
    }

    /// Attach records and labels to raw paths
    pub async fn resolve_steps(&self, paths: Vec<RawPath>) -> Vec<EvolutionPath> {
        let names = distinct_species(&paths);
        let resolved = map_bounded(names.clone(), self.limit, |name| async move {
            let result = self.resolve_species(&name).await;
            if let Err(gap) = &result {
                warn!("{}", gap);
            }
            result
        })
        .await;
        let records: HashMap<String, _> = names.into_iter().zip(resolved).collect();
        annotate(paths, &records)
    }

    /// Evolution paths of the chain `root` belongs to
    pub async fn resolve(&self, root: &CreatureRecord) -> Result<Vec<EvolutionPath>, FetchError> {
        let paths = self.raw_paths(root).await?;
        Ok(self.resolve_steps(paths).await)
    }

    /// Like [`resolve`](Self::resolve), but a species or chain failure yields no paths
    pub async fn resolve_or_empty(&self, root: &CreatureRecord) -> Vec<EvolutionPath> {
        match self.resolve(root).await {
            Ok(paths) => paths,
            Err(e) => {
                warn!("evolutions of {} unavailable: {}", root.name, e);
                Vec::new()
            }
        }
    }

    /// Evolution paths for a creature id, name or detail URL
    pub async fn resolve_reference(&self, reference: &str) -> Result<Vec<EvolutionPath>, FetchError> {
        let root = self.catalog.ensure_creature(reference).await?;
        self.resolve(&root).await
    }

    /// One card per distinct chain among `creatures`, in their order
    ///
    /// Creatures whose chain was already shown, or whose chain cannot be
    /// fetched, are skipped.
    pub async fn catalog(&self, creatures: &[Arc<CreatureRecord>]) -> Vec<ChainCard> {
        let mut shown = HashSet::new();
        let mut cards = Vec::new();

        for root in creatures {
            let paths = match self.raw_paths(root).await {
                Ok(paths) if !paths.is_empty() => paths,
                Ok(_) => continue,
                Err(e) => {
                    warn!("skipping evolutions of {}: {}", root.name, e);
                    continue;
                }
            };
            if !shown.insert(chain_signature(&paths)) {
                debug!("chain of {} already shown", root.name);
                continue;
            }
            cards.push(ChainCard { root: Arc::clone(root), paths: self.resolve_steps(paths).await });
        }

        cards
    }
}
