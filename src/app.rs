// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Application context
//!
//! [`App`] owns everything a view needs: configuration, the catalog and its
//! caches, favorites, the compare selection, the tab state and the view
//! generation counter. Each view method returns the rendered text (or JSON
//! with `--json`); [`App::present`] drops results that were overtaken by a
//! newer view.

use crate::api::{Endpoints, Resource};
use crate::cache::{FileStore, KeyValueStore};
use crate::catalog::{Catalog, Filter};
use crate::config::Config;
use crate::evolution::{EvolutionPath, EvolutionResolver};
use crate::favorites::FavoriteStore;
use crate::fetch::{Fetch, HttpFetcher};
use crate::generation::ViewGeneration;
use crate::render;
use crate::types::CreatureRecord;
use crate::view::{CompareSet, Location, Mode, Route, Tab, TabAction, ViewState, COMPARE_INTRO_SIZE, MAX_COMPARE};
use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::collections::BTreeSet;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info};

/// Shown when a listing or search yields nothing
pub const NO_RESULTS: &str = "Sin resultados";

#[derive(Serialize)]
struct Detail<'a> {
    record: &'a CreatureRecord,
    favorite: bool,
    evolutions: &'a [EvolutionPath],
}

/// Output preferences
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Output {
    /// Colour badges and banners
    pub color: bool,
    /// Emit JSON instead of text
    pub json: bool,
}

/// Top-level application context
#[derive(Debug)]
pub struct App<F = HttpFetcher> {
    config: Config,
    catalog: Catalog<F>,
    favorites: FavoriteStore,
    generation: ViewGeneration,
    state: ViewState,
    compare: CompareSet,
    output: Output,
}

impl App<HttpFetcher> {
    /// Application talking to the configured API over HTTP
    pub fn from_config(config: Config, output: Output) -> Result<Self> {
        let fetcher = HttpFetcher::new(config.timeout()).context("Failed to build HTTP client")?;
        let store: Option<Arc<dyn KeyValueStore>> = if config.persist_cache {
            Some(Arc::new(FileStore::new(config.cache_dir.clone())))
        } else {
            None
        };
        Ok(Self::with_fetcher(config, fetcher, store, output))
    }
}

impl<F: Fetch> App<F> {
    /// Application over any fetcher, optionally persisting records to `store`
    pub fn with_fetcher(config: Config, fetcher: F, store: Option<Arc<dyn KeyValueStore>>, output: Output) -> Self {
        let endpoints = Endpoints::new(&config.api_base_url);
        let limits = config.limits();
        let catalog = match store {
            Some(store) => Catalog::with_store(fetcher, endpoints, limits, store),
            None => Catalog::new(fetcher, endpoints, limits),
        };
        Self {
            favorites: FavoriteStore::new(&config.data_dir),
            config,
            catalog,
            generation: ViewGeneration::new(),
            state: ViewState::default(),
            compare: CompareSet::new(),
            output,
        }
    }

    /// Active configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Catalog and caches
    pub fn catalog(&self) -> &Catalog<F> {
        &self.catalog
    }

    /// Favorites store
    pub fn favorites(&self) -> &FavoriteStore {
        &self.favorites
    }

    /// Tab and query state
    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Compare selection
    pub fn compare(&self) -> &CompareSet {
        &self.compare
    }

    /// View generation counter
    pub fn generation(&self) -> &ViewGeneration {
        &self.generation
    }

    /// Run a view under a fresh generation ticket
    ///
    /// Returns `None` when a newer view started before this one finished.
    pub async fn present<Fut>(&self, view: Fut) -> Result<Option<String>>
    where
        Fut: Future<Output = Result<String>>,
    {
        self.generation.guard(view).await.transpose()
    }

    fn emit<T: Serialize + ?Sized>(&self, value: &T, text: impl FnOnce(&T) -> String) -> Result<String> {
        if self.output.json {
            serde_json::to_string_pretty(value).context("Failed to serialize output")
        } else {
            Ok(text(value))
        }
    }

    fn no_results(&self) -> String {
        render::banner(NO_RESULTS, self.output.color)
    }

    fn cards(&self, records: &[Arc<CreatureRecord>]) -> Result<String> {
        if records.is_empty() && !self.output.json {
            return Ok(self.no_results());
        }
        let favorites = self.favorites.all();
        self.emit(records, |records| {
            records
                .iter()
                .map(|r| render::creature_card(r, favorites.contains(&r.id), self.output.color))
                .collect::<Vec<_>>()
                .join("\n")
        })
    }

    fn page_size(&self) -> u32 {
        self.config.page_size.max(1)
    }

    fn page_offset(&self, page: u32) -> Result<u32> {
        match page.checked_mul(self.page_size()) {
            Some(offset) => Ok(offset),
            None => bail!("Page {page} is out of range"),
        }
    }

    // =========================================================================
    // Explore
    // =========================================================================

    /// Creature page `page` (zero-based)
    pub async fn browse(&self, page: u32) -> Result<String> {
        let offset = self.page_offset(page)?;
        info!("browsing creatures page {}", page);
        let records = self.catalog.browse_creatures(self.page_size(), offset).await?;
        self.cards(&records)
    }

    /// Creatures matching `filter`, at most `count` (all when `None`)
    pub async fn filter(&self, filter: &Filter, count: Option<usize>) -> Result<String> {
        info!("filtering creatures by {:?}", filter);
        let records = self.catalog.filter_creatures(filter, count).await?;
        self.cards(&records)
    }

    /// Search a single creature, honouring `filter`
    pub async fn search(&self, term: &str, filter: &Filter) -> Result<String> {
        match self.catalog.search_creature(term, filter).await {
            Ok(record) => self.cards(&[record]),
            Err(e) if e.is_no_match() => {
                debug!("search for {} found nothing: {}", term, e);
                Ok(self.no_results())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Explore view for the current query state
    pub async fn recompute(&self) -> Result<String> {
        let query = &self.state.query;
        let filter = Filter::new(Some(&query.kind), Some(&query.generation));
        match query.mode() {
            Mode::Browse => self.browse(0).await,
            Mode::Filter => self.filter(&filter, Some(self.config.page_size as usize)).await,
            Mode::Search => self.search(&query.search, &filter).await,
        }
    }

    // =========================================================================
    // Details
    // =========================================================================

    /// Creature detail with its evolution paths
    pub async fn show(&self, reference: &str) -> Result<String> {
        let record = self.catalog.ensure_creature(reference).await?;
        let paths = EvolutionResolver::new(&self.catalog).resolve_or_empty(&record).await;
        let favorite = self.favorites.has(record.id);
        let detail = Detail { record: &record, favorite, evolutions: &paths };
        self.emit(&detail, |d| render::creature_detail(d.record, d.evolutions, d.favorite, self.output.color))
    }

    /// Evolution paths only
    pub async fn evolutions(&self, reference: &str) -> Result<String> {
        let paths = EvolutionResolver::new(&self.catalog).resolve_reference(reference).await?;
        self.emit(&paths, |paths| {
            if paths.is_empty() {
                return "(sin evoluciones)".to_string();
            }
            paths
                .iter()
                .map(|p| render::evolution_path(p, self.output.color))
                .collect::<Vec<_>>()
                .join("\n")
        })
    }

    /// One card per distinct chain among the first `count` listed creatures
    ///
    /// With a filter the filtered names are used instead of the listing.
    pub async fn evolution_catalog(&self, filter: &Filter, count: u32) -> Result<String> {
        let roots = if filter.is_empty() {
            let page = self.catalog.list_page(Resource::Pokemon, count, 0).await?;
            let names: Vec<String> = page.results.into_iter().map(|r| r.name).collect();
            self.catalog.creatures(&names, self.catalog.limits().page).await?
        } else {
            self.catalog.filter_creatures(filter, Some(count as usize)).await?
        };
        let cards = EvolutionResolver::new(&self.catalog).catalog(&roots).await;
        if cards.is_empty() && !self.output.json {
            return Ok(self.no_results());
        }
        self.emit(&cards, |cards| {
            cards
                .iter()
                .map(|c| render::chain_card(c, self.output.color))
                .collect::<Vec<_>>()
                .join("\n")
        })
    }

    // =========================================================================
    // Items
    // =========================================================================

    /// Item page `page` (zero-based)
    pub async fn items(&self, page: u32) -> Result<String> {
        let offset = self.page_offset(page)?;
        let items = self.catalog.browse_items(self.page_size(), offset).await?;
        self.emit(&items, |items| items.iter().map(|i| render::item_card(i)).collect::<Vec<_>>().join("\n"))
    }

    /// Item detail, or the no-results banner when it does not exist
    pub async fn item(&self, term: &str) -> Result<String> {
        match self.catalog.search_item(term).await {
            Ok(item) => self.emit(&item, |item| render::item_detail(item)),
            Err(e) if e.is_no_match() => Ok(self.no_results()),
            Err(e) => Err(e.into()),
        }
    }

    // =========================================================================
    // Favorites & compare
    // =========================================================================

    /// Favorite creatures, ids ascending
    pub async fn favorites_view(&self) -> Result<String> {
        let ids: BTreeSet<u32> = self.favorites.all();
        if ids.is_empty() && !self.output.json {
            return Ok(render::banner("No hay favoritos", self.output.color));
        }
        let references: Vec<String> = ids.iter().map(u32::to_string).collect();
        let records = self.catalog.creatures(&references, self.catalog.limits().filter).await?;
        self.cards(&records)
    }

    /// Add creatures to the compare selection
    pub fn select(&mut self, ids: &[u32]) -> Result<()> {
        for id in ids {
            self.compare.add(*id)?;
        }
        Ok(())
    }

    /// Side-by-side view of the compare selection
    pub async fn compare_view(&self) -> Result<String> {
        let references: Vec<String> = self.compare.ids().iter().map(u32::to_string).collect();
        let records = self.catalog.creatures(&references, self.catalog.limits().compare).await?;
        self.emit(&records, |records| render::compare_table(records))
    }

    /// Starter listing shown when nothing is selected for comparison
    pub async fn compare_intro(&self) -> Result<String> {
        let records = self.catalog.browse_creatures(COMPARE_INTRO_SIZE, 0).await?;
        let cards = self.cards(&records)?;
        if self.output.json {
            return Ok(cards);
        }
        Ok(format!("Elige hasta {} para comparar:\n{cards}", MAX_COMPARE))
    }

    // =========================================================================
    // Tabs & routing
    // =========================================================================

    /// Switch tabs and render the entered tab
    pub async fn switch_to(&mut self, tab: Tab) -> Result<Option<String>> {
        let action = self.state.switch_to(tab, &self.compare);
        debug!("entering {} tab: {:?}", tab, action);
        self.present(self.run_action(action)).await
    }

    /// Render the view a tab action stands for
    pub async fn run_action(&self, action: TabAction) -> Result<String> {
        let query = &self.state.query;
        let filter = Filter::new(Some(&query.kind), Some(&query.generation));
        match action {
            TabAction::BrowseCreatures => self.browse(0).await,
            TabAction::Recompute => self.recompute().await,
            TabAction::ListFavorites => self.favorites_view().await,
            TabAction::EvolutionCatalog => self.evolution_catalog(&filter, self.config.page_size).await,
            TabAction::BrowseItems => self.items(0).await,
            TabAction::SearchItems => self.item(&query.search).await,
            TabAction::CompareSelection => self.compare_view().await,
            TabAction::CompareIntro => self.compare_intro().await,
        }
    }

    /// Restore a `?q=&type=&gen=&tab=#/kind/id` location
    ///
    /// Applies the query state, renders the tab, then the routed detail.
    pub async fn open(&mut self, location: &str) -> Result<Vec<String>> {
        let location = Location::parse(location).with_context(|| format!("Invalid location: {location}"))?;
        info!("opening {}", location);
        self.state.query = location.query.clone();

        let mut views = Vec::new();
        views.extend(self.switch_to(location.query.tab).await?);

        let detail = match &location.route {
            Route::None => None,
            Route::Pokemon(key) => self.present(self.show(key)).await?,
            Route::Item(key) => self.present(self.item(key)).await?,
        };
        views.extend(detail);
        Ok(views)
    }
}
