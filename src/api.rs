// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! PokeAPI endpoint layout and resource-reference parsing

/// Default upstream base URL
pub const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2";

/// Resource families exposed by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    /// Creature detail (`pokemon`)
    Pokemon,
    /// Species (`pokemon-species`)
    Species,
    /// Evolution chain (`evolution-chain`)
    EvolutionChain,
    /// Category (`type`)
    Type,
    /// Generation (`generation`)
    Generation,
    /// Item (`item`)
    Item,
}

impl Resource {
    /// Path segment used by the API
    #[must_use]
    pub fn segment(&self) -> &'static str {
        match self {
            Self::Pokemon => "pokemon",
            Self::Species => "pokemon-species",
            Self::EvolutionChain => "evolution-chain",
            Self::Type => "type",
            Self::Generation => "generation",
            Self::Item => "item",
        }
    }
}

/// Builds resource URLs against a configurable base
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl Endpoints {
    /// Create endpoints rooted at `base` (trailing slashes are ignored)
    #[must_use]
    pub fn new(base: &str) -> Self {
        Self { base: base.trim_end_matches('/').to_string() }
    }

    /// Base URL without trailing slash
    #[must_use]
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Detail URL of one resource
    #[must_use]
    pub fn detail(&self, resource: Resource, key: &str) -> String {
        format!("{}/{}/{}", self.base, resource.segment(), key)
    }

    /// Paginated list URL
    #[must_use]
    pub fn list(&self, resource: Resource, limit: u32, offset: u32) -> String {
        format!("{}/{}?limit={limit}&offset={offset}", self.base, resource.segment())
    }

    /// Unpaginated index of a resource family (categories, generations)
    #[must_use]
    pub fn index(&self, resource: Resource) -> String {
        format!("{}/{}", self.base, resource.segment())
    }

    /// Creature detail by id or name
    #[must_use]
    pub fn pokemon(&self, key: &str) -> String {
        self.detail(Resource::Pokemon, key)
    }

    /// Species by id or name
    #[must_use]
    pub fn species(&self, key: &str) -> String {
        self.detail(Resource::Species, key)
    }

    /// Evolution chain by id
    #[must_use]
    pub fn evolution_chain(&self, id: u32) -> String {
        self.detail(Resource::EvolutionChain, &id.to_string())
    }

    /// Item detail by id or name
    #[must_use]
    pub fn item(&self, key: &str) -> String {
        self.detail(Resource::Item, key)
    }

    /// Resolve a user reference (id, name or full URL) to a fetchable URL
    #[must_use]
    pub fn resolve(&self, resource: Resource, reference: &str) -> String {
        if is_url(reference) {
            reference.to_string()
        } else {
            self.detail(resource, &cache_key(resource, reference))
        }
    }
}

/// Whether a reference is a full URL rather than an id or name
#[must_use]
pub fn is_url(reference: &str) -> bool {
    reference.starts_with("http://") || reference.starts_with("https://")
}

/// Cache key for a reference: the trailing id or name of a URL, or the
/// reference itself, trimmed and lower-cased
///
/// `https://pokeapi.co/api/v2/pokemon/25/` and `25` both map to `25`;
/// ` Pikachu ` maps to `pikachu`.
#[must_use]
pub fn cache_key(resource: Resource, reference: &str) -> String {
    let trimmed = reference.trim().trim_end_matches('/');
    if is_url(trimmed) {
        let marker = format!("/{}/", resource.segment());
        if let Some(pos) = trimmed.rfind(&marker) {
            return trimmed[pos + marker.len()..].to_string();
        }
    }
    trimmed.to_lowercase()
}

/// Numeric id at the end of a resource URL of the given family
///
/// Returns `None` when the URL is not of that family or does not end in a
/// number.
#[must_use]
pub fn id_from_url(resource: Resource, url: &str) -> Option<u32> {
    let marker = format!("/{}/", resource.segment());
    let pos = url.rfind(&marker)?;
    let tail = url[pos + marker.len()..].trim_end_matches('/');
    tail.parse().ok()
}
