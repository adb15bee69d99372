// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! View state: tabs, location routing and the comparison set

use anyhow::{bail, Result};
use reqwest::Url;
use std::fmt;
use std::str::FromStr;

/// Most creatures that can be compared at once
pub const MAX_COMPARE: usize = 6;

/// Size of the listing shown on the compare tab while the set is empty
pub const COMPARE_INTRO_SIZE: u32 = 12;

// =============================================================================
// Tabs
// =============================================================================

/// Top-level views
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Tab {
    /// Browse, filter and search creatures
    #[default]
    Explore,
    /// Favorite creatures
    Favorites,
    /// Evolution chains of the listed creatures
    Evolutions,
    /// Item catalog
    Items,
    /// Side-by-side comparison
    Compare,
}

impl Tab {
    /// Name used in the `tab` query parameter
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Explore => "explore",
            Self::Favorites => "favorites",
            Self::Evolutions => "evolutions",
            Self::Items => "items",
            Self::Compare => "compare",
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tab {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "" | "explore" => Ok(Self::Explore),
            "favorites" => Ok(Self::Favorites),
            "evolutions" => Ok(Self::Evolutions),
            "items" => Ok(Self::Items),
            "compare" => Ok(Self::Compare),
            other => bail!("Unknown tab: {}. Valid: explore, favorites, evolutions, items, compare", other),
        }
    }
}

/// How the explore tab produces its results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Paginated listing
    Browse,
    /// Category and/or generation filter
    Filter,
    /// Single-creature search
    Search,
}

/// What the view has to run after switching tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabAction {
    /// First page of the creature listing
    BrowseCreatures,
    /// Re-run the active search or filter
    Recompute,
    /// List favorite creatures
    ListFavorites,
    /// Evolution catalog for the listed creatures
    EvolutionCatalog,
    /// First page of the item listing
    BrowseItems,
    /// Search items by the active term
    SearchItems,
    /// Comparison of the selected creatures
    CompareSelection,
    /// Hint plus a short listing to pick from
    CompareIntro,
}

/// Tab state machine; switching tabs is the only transition
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    /// Active tab
    pub tab: Tab,
    /// Search term and filters
    pub query: QueryState,
}

impl ViewState {
    /// Switch to `tab` and return the action to run there
    pub fn switch_to(&mut self, tab: Tab, compare: &CompareSet) -> TabAction {
        self.tab = tab;
        Self::entry_action(tab, &self.query, compare)
    }

    /// Transition table from target tab and current state to an action
    #[must_use]
    pub fn entry_action(tab: Tab, query: &QueryState, compare: &CompareSet) -> TabAction {
        match tab {
            Tab::Explore => match query.mode() {
                Mode::Browse => TabAction::BrowseCreatures,
                Mode::Filter | Mode::Search => TabAction::Recompute,
            },
            Tab::Favorites => TabAction::ListFavorites,
            Tab::Evolutions => TabAction::EvolutionCatalog,
            Tab::Items if query.search.is_empty() => TabAction::BrowseItems,
            Tab::Items => TabAction::SearchItems,
            Tab::Compare if compare.is_empty() => TabAction::CompareIntro,
            Tab::Compare => TabAction::CompareSelection,
        }
    }
}

// =============================================================================
// Location routing
// =============================================================================

/// Search term and filters carried in the query string
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryState {
    /// Search term, trimmed and lower-cased
    pub search: String,
    /// Category filter
    pub kind: String,
    /// Generation filter
    pub generation: String,
    /// Active tab
    pub tab: Tab,
}

impl QueryState {
    /// Build a state, normalising the search term
    #[must_use]
    pub fn new(search: &str, kind: &str, generation: &str, tab: Tab) -> Self {
        Self {
            search: normalize_term(search),
            kind: kind.trim().to_string(),
            generation: generation.trim().to_string(),
            tab,
        }
    }

    /// Explore mode implied by the current term and filters
    #[must_use]
    pub fn mode(&self) -> Mode {
        if !self.search.is_empty() {
            Mode::Search
        } else if !self.kind.is_empty() || !self.generation.is_empty() {
            Mode::Filter
        } else {
            Mode::Browse
        }
    }

    /// Query string without the leading `?`; empty values and the default tab are omitted
    #[must_use]
    pub fn to_query(&self) -> String {
        let Ok(mut url) = Url::parse("http://localhost/") else {
            return String::new();
        };
        {
            let mut pairs = url.query_pairs_mut();
            if !self.search.is_empty() {
                pairs.append_pair("q", &self.search);
            }
            if !self.kind.is_empty() {
                pairs.append_pair("type", &self.kind);
            }
            if !self.generation.is_empty() {
                pairs.append_pair("gen", &self.generation);
            }
            if self.tab != Tab::Explore {
                pairs.append_pair("tab", self.tab.as_str());
            }
        }
        url.query().unwrap_or_default().to_string()
    }
}

/// Detail view addressed by the location fragment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Route {
    /// No detail open
    #[default]
    None,
    /// `#/pokemon/<id|name>`
    Pokemon(String),
    /// `#/item/<id|name>`
    Item(String),
}

impl Route {
    /// Parse a fragment such as `/pokemon/25` (with or without `#`)
    #[must_use]
    pub fn parse(fragment: &str) -> Self {
        let fragment = fragment.trim_start_matches('#');
        let mut segments = fragment.trim_start_matches('/').split('/');
        let kind = segments.next().unwrap_or_default();
        let key: String = segments
            .next()
            .unwrap_or_default()
            .chars()
            .take_while(|c| c.is_alphanumeric() || *c == '_' || *c == '-')
            .collect();
        if key.is_empty() {
            return Self::None;
        }
        match kind {
            "pokemon" => Self::Pokemon(key),
            "item" => Self::Item(key),
            _ => Self::None,
        }
    }

    /// Fragment without `#`, empty when no detail is open
    #[must_use]
    pub fn to_fragment(&self) -> String {
        match self {
            Self::None => String::new(),
            Self::Pokemon(key) => format!("/pokemon/{key}"),
            Self::Item(key) => format!("/item/{key}"),
        }
    }
}

/// Parsed `?query#fragment` location
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    /// Query state
    pub query: QueryState,
    /// Routed detail
    pub route: Route,
}

impl Location {
    /// Parse a location string; a leading path is ignored
    pub fn parse(location: &str) -> Result<Self> {
        let base = Url::parse("http://localhost/")?;
        let url = base.join(location.trim())?;

        let mut search = String::new();
        let mut kind = String::new();
        let mut generation = String::new();
        let mut tab = Tab::Explore;
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "q" => search = value.into_owned(),
                "type" => kind = value.into_owned(),
                "gen" => generation = value.into_owned(),
                "tab" => tab = value.parse()?,
                _ => {}
            }
        }

        Ok(Self {
            query: QueryState::new(&search, &kind, &generation, tab),
            route: url.fragment().map(Route::parse).unwrap_or_default(),
        })
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let query = self.query.to_query();
        if !query.is_empty() {
            write!(f, "?{query}")?;
        }
        let fragment = self.route.to_fragment();
        if !fragment.is_empty() {
            write!(f, "#{fragment}")?;
        }
        Ok(())
    }
}

/// Trim and lower-case a search term
#[must_use]
pub fn normalize_term(term: &str) -> String {
    term.trim().to_lowercase()
}

// =============================================================================
// Comparison
// =============================================================================

/// Creatures selected for comparison, in selection order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompareSet {
    ids: Vec<u32>,
}

impl CompareSet {
    /// Empty selection
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a creature; re-adding a selected one is a no-op
    pub fn add(&mut self, id: u32) -> Result<()> {
        if self.ids.contains(&id) {
            return Ok(());
        }
        if self.ids.len() >= MAX_COMPARE {
            bail!("At most {} creatures can be compared", MAX_COMPARE);
        }
        self.ids.push(id);
        Ok(())
    }

    /// Remove a creature, returning whether it was selected
    pub fn remove(&mut self, id: u32) -> bool {
        let before = self.ids.len();
        self.ids.retain(|i| *i != id);
        self.ids.len() < before
    }

    /// Drop the whole selection
    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Selected ids in selection order
    #[must_use]
    pub fn ids(&self) -> &[u32] {
        &self.ids
    }

    /// Whether nothing is selected
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Number of selected creatures
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }
}
