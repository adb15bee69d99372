// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Dexplorer library - catalog explorer for the PokeAPI creature database
//!
//! This crate provides a read-only client for browsing, filtering and
//! searching creatures and items, with a best-effort local record cache and
//! an evolution-chain resolver that turns the API's branching chain tree
//! into displayable root-to-leaf paths.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod api;
pub mod app;
pub mod cache;
pub mod catalog;
pub mod condition;
pub mod config;
pub mod error;
pub mod evolution;
pub mod favorites;
pub mod fetch;
pub mod generation;
pub mod mapper;
pub mod render;
pub mod view;

/// Record shapes returned by the PokeAPI, consumed read-only
pub mod types {
    use serde::{Deserialize, Deserializer, Serialize};

    /// Artwork shown when a creature has no sprite or could not be resolved
    pub const PLACEHOLDER_ARTWORK: &str =
        "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/0.png";

    const OFFICIAL_ARTWORK_BASE: &str =
        "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/other/official-artwork";

    /// Height and weight are reported in tenths of the display unit
    pub const MEASUREMENT_SCALE: f64 = 10.0;

    /// Treat an explicit JSON `null` the same as a missing field
    fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: Default + Deserialize<'de>,
    {
        Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
    }

    /// Keys under which a record is registered in a cache
    pub trait Keyed {
        /// Numeric identifier
        fn id(&self) -> u32;
        /// Canonical name
        fn name(&self) -> &str;
    }

    // =========================================================================
    // Shared references
    // =========================================================================

    /// A `{ name, url }` pointer to another resource
    #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct NamedResource {
        /// Resource name
        #[serde(default)]
        pub name: String,
        /// Fully-qualified resource URL
        #[serde(default)]
        pub url: String,
    }

    impl NamedResource {
        /// Build a reference from a name and URL
        #[must_use]
        pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
            Self { name: name.into(), url: url.into() }
        }
    }

    /// A bare `{ url }` pointer
    #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct ApiResource {
        /// Fully-qualified resource URL
        pub url: String,
    }

    /// One page of a list endpoint
    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    pub struct ResourceList {
        /// Total number of resources upstream
        #[serde(default)]
        pub count: u32,
        /// URL of the next page, if any
        pub next: Option<String>,
        /// URL of the previous page, if any
        pub previous: Option<String>,
        /// Page entries
        #[serde(default, deserialize_with = "nullable")]
        pub results: Vec<NamedResource>,
    }

    // =========================================================================
    // Creature
    // =========================================================================

    /// Category tag slot on a creature
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct TypeSlot {
        /// Display order
        #[serde(default)]
        pub slot: u8,
        /// Category reference
        #[serde(rename = "type")]
        pub kind: NamedResource,
    }

    /// Ability slot on a creature
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct AbilitySlot {
        /// Ability reference
        pub ability: NamedResource,
        /// Hidden ability flag
        #[serde(default, deserialize_with = "nullable")]
        pub is_hidden: bool,
        /// Display order
        #[serde(default)]
        pub slot: u8,
    }

    /// Named base statistic
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct StatValue {
        /// Base value
        #[serde(default)]
        pub base_stat: u32,
        /// Effort yield
        #[serde(default)]
        pub effort: u32,
        /// Statistic reference
        pub stat: NamedResource,
    }

    /// Appearance in a game version
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct GameIndex {
        /// Index within that game
        #[serde(default)]
        pub game_index: u32,
        /// Version reference
        pub version: NamedResource,
    }

    /// Sprite URLs under `other.official-artwork`
    #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct OfficialArtwork {
        /// Front artwork
        pub front_default: Option<String>,
    }

    /// Alternative sprite sets
    #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct OtherSprites {
        /// High-resolution artwork
        #[serde(rename = "official-artwork", default, deserialize_with = "nullable")]
        pub official_artwork: OfficialArtwork,
    }

    /// Sprite references of a creature
    #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Sprites {
        /// Default front sprite
        pub front_default: Option<String>,
        /// Other sprite sets
        #[serde(default, deserialize_with = "nullable")]
        pub other: OtherSprites,
    }

    /// A creature detail record (`pokemon/<id|name>`)
    #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct CreatureRecord {
        /// Numeric identifier
        pub id: u32,
        /// Unique name
        pub name: String,
        /// Category tags in slot order
        #[serde(default, deserialize_with = "nullable")]
        pub types: Vec<TypeSlot>,
        /// Abilities in slot order
        #[serde(default, deserialize_with = "nullable")]
        pub abilities: Vec<AbilitySlot>,
        /// Height in decimetres
        #[serde(default)]
        pub height: u32,
        /// Weight in hectograms
        #[serde(default)]
        pub weight: u32,
        /// Base statistics
        #[serde(default, deserialize_with = "nullable")]
        pub stats: Vec<StatValue>,
        /// Species this creature is a variety of
        pub species: Option<NamedResource>,
        /// Sprite references
        #[serde(default, deserialize_with = "nullable")]
        pub sprites: Sprites,
        /// Game appearances
        #[serde(default, deserialize_with = "nullable")]
        pub game_indices: Vec<GameIndex>,
    }

    impl CreatureRecord {
        /// Category names in slot order
        #[must_use]
        pub fn type_names(&self) -> Vec<&str> {
            self.types.iter().map(|t| t.kind.name.as_str()).collect()
        }

        /// Whether this creature carries the given category
        #[must_use]
        pub fn has_type(&self, name: &str) -> bool {
            self.types.iter().any(|t| t.kind.name == name)
        }

        /// Ability names in slot order
        #[must_use]
        pub fn ability_names(&self) -> Vec<&str> {
            self.abilities.iter().map(|a| a.ability.name.as_str()).collect()
        }

        /// Sorted, de-duplicated names of the game versions this creature appears in
        #[must_use]
        pub fn versions(&self) -> Vec<&str> {
            let mut versions: Vec<&str> = self
                .game_indices
                .iter()
                .map(|g| g.version.name.as_str())
                .filter(|v| !v.is_empty())
                .collect();
            versions.sort_unstable();
            versions.dedup();
            versions
        }

        /// Height in metres
        #[must_use]
        pub fn height_m(&self) -> f64 {
            f64::from(self.height) / MEASUREMENT_SCALE
        }

        /// Weight in kilograms
        #[must_use]
        pub fn weight_kg(&self) -> f64 {
            f64::from(self.weight) / MEASUREMENT_SCALE
        }

        /// Best available artwork, falling back to the placeholder
        #[must_use]
        pub fn artwork(&self) -> &str {
            self.sprites
                .other
                .official_artwork
                .front_default
                .as_deref()
                .or(self.sprites.front_default.as_deref())
                .unwrap_or(PLACEHOLDER_ARTWORK)
        }
    }

    impl Keyed for CreatureRecord {
        fn id(&self) -> u32 {
            self.id
        }

        fn name(&self) -> &str {
            &self.name
        }
    }

    /// Official artwork URL for a creature id without fetching its record
    #[must_use]
    pub fn artwork_by_id(id: Option<u32>) -> String {
        match id {
            Some(id) if id > 0 => format!("{OFFICIAL_ARTWORK_BASE}/{id}.png"),
            _ => PLACEHOLDER_ARTWORK.to_string(),
        }
    }

    // =========================================================================
    // Species & Evolution
    // =========================================================================

    /// A displayable variety of a species
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Variety {
        /// Whether this is the species' default variety
        #[serde(default)]
        pub is_default: bool,
        /// Creature record of the variety
        pub pokemon: NamedResource,
    }

    /// A species record (`pokemon-species/<id|name>`)
    #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct SpeciesRecord {
        /// Numeric identifier
        #[serde(default)]
        pub id: u32,
        /// Species name
        pub name: String,
        /// Evolution chain this species belongs to
        pub evolution_chain: Option<ApiResource>,
        /// Displayable varieties, exactly one flagged default
        #[serde(default, deserialize_with = "nullable")]
        pub varieties: Vec<Variety>,
    }

    impl SpeciesRecord {
        /// Name of the creature to display for this species
        ///
        /// Falls back to the species name when no variety is flagged default.
        #[must_use]
        pub fn default_variety(&self) -> &str {
            self.varieties
                .iter()
                .find(|v| v.is_default)
                .map_or(self.name.as_str(), |v| v.pokemon.name.as_str())
        }
    }

    impl Keyed for SpeciesRecord {
        fn id(&self) -> u32 {
            self.id
        }

        fn name(&self) -> &str {
            &self.name
        }
    }

    /// Structured trigger for one evolution edge
    #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(default)]
    pub struct EvolutionCondition {
        /// Minimum level
        pub min_level: Option<u32>,
        /// Item used on the creature
        pub item: Option<NamedResource>,
        /// Item held while triggering
        pub held_item: Option<NamedResource>,
        /// Trigger kind (`level-up`, `trade`, `use-item`, ...)
        pub trigger: Option<NamedResource>,
        /// Minimum friendship
        pub min_happiness: Option<u32>,
        /// Minimum beauty
        pub min_beauty: Option<u32>,
        /// Minimum affection
        pub min_affection: Option<u32>,
        /// `day`, `night`, `dusk` or empty
        #[serde(deserialize_with = "nullable")]
        pub time_of_day: String,
        /// Required location
        pub location: Option<NamedResource>,
        /// Move that must be known
        pub known_move: Option<NamedResource>,
        /// Type of a move that must be known
        pub known_move_type: Option<NamedResource>,
        /// 1 = female, 2 = male
        pub gender: Option<u8>,
        /// Requires overworld rain
        #[serde(deserialize_with = "nullable")]
        pub needs_overworld_rain: bool,
        /// 1 = Attack > Defense, -1 = Defense > Attack, 0 = equal
        pub relative_physical_stats: Option<i8>,
        /// Device held upside down
        #[serde(deserialize_with = "nullable")]
        pub turn_upside_down: bool,
    }

    /// A node of the evolution chain tree
    #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct ChainLink {
        /// Species at this node
        pub species: NamedResource,
        /// Alternative condition sets for the edge entering this node
        #[serde(default, deserialize_with = "nullable")]
        pub evolution_details: Vec<EvolutionCondition>,
        /// Child nodes
        #[serde(default, deserialize_with = "nullable")]
        pub evolves_to: Vec<ChainLink>,
    }

    /// An evolution chain record (`evolution-chain/<id>`)
    #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct EvolutionChain {
        /// Numeric identifier
        #[serde(default)]
        pub id: u32,
        /// Root node
        pub chain: ChainLink,
    }

    impl Keyed for EvolutionChain {
        fn id(&self) -> u32 {
            self.id
        }

        fn name(&self) -> &str {
            &self.chain.species.name
        }
    }

    // =========================================================================
    // Filters
    // =========================================================================

    /// Creature entry inside a category record
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct TypeMember {
        /// Slot the category occupies on that creature
        #[serde(default)]
        pub slot: u8,
        /// Creature reference
        pub pokemon: NamedResource,
    }

    /// A category record (`type/<name>`)
    #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct TypeRecord {
        /// Category name
        pub name: String,
        /// Member creatures in API order
        #[serde(default, deserialize_with = "nullable")]
        pub pokemon: Vec<TypeMember>,
    }

    /// A generation record (`generation/<id|name>`)
    #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct GenerationRecord {
        /// Generation name
        pub name: String,
        /// Species introduced in this generation
        #[serde(default, deserialize_with = "nullable")]
        pub pokemon_species: Vec<NamedResource>,
    }

    // =========================================================================
    // Items
    // =========================================================================

    /// Localised effect text of an item
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct EffectEntry {
        /// Full effect text
        #[serde(default)]
        pub effect: String,
        /// Short effect text
        #[serde(default)]
        pub short_effect: String,
        /// Language of the entry
        pub language: NamedResource,
    }

    /// Item sprite references
    #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct ItemSprites {
        /// Default sprite
        pub default: Option<String>,
    }

    /// An item detail record (`item/<id|name>`)
    #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct ItemRecord {
        /// Numeric identifier
        pub id: u32,
        /// Unique name
        pub name: String,
        /// Price in the games' currency
        pub cost: Option<u32>,
        /// Item category
        pub category: Option<NamedResource>,
        /// Item attributes
        #[serde(default, deserialize_with = "nullable")]
        pub attributes: Vec<NamedResource>,
        /// Effect descriptions
        #[serde(default, deserialize_with = "nullable")]
        pub effect_entries: Vec<EffectEntry>,
        /// Sprite references
        #[serde(default, deserialize_with = "nullable")]
        pub sprites: ItemSprites,
    }

    impl ItemRecord {
        /// Effect text, preferring Spanish, then English
        #[must_use]
        pub fn effect_text(&self) -> Option<&str> {
            ["es", "en"].iter().find_map(|lang| {
                self.effect_entries
                    .iter()
                    .find(|e| e.language.name == *lang)
                    .map(|e| {
                        if e.short_effect.is_empty() {
                            e.effect.as_str()
                        } else {
                            e.short_effect.as_str()
                        }
                    })
                    .filter(|text| !text.is_empty())
            })
        }
    }

    impl Keyed for ItemRecord {
        fn id(&self) -> u32 {
            self.id
        }

        fn name(&self) -> &str {
            &self.name
        }
    }
}

/// Prelude for common imports
pub mod prelude {
    pub use crate::error::{FetchError, LookupError};
    pub use crate::types::*;
    pub use anyhow::{Context, Result};
}
