//! Subject catalog: turns raw image asset names into a deduplicated,
//! classified list of brokers.

pub mod assets;
pub mod extract;
pub mod normalize;
pub mod tables;

pub use assets::{AssetLister, DirAssetLister, DEFAULT_IMAGE_EXTENSIONS};
pub use extract::{EntityExtractor, ExtractionMiss, ExtractionReport, MissReason};
pub use normalize::{normalize_asset_name, slugify};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Broker category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Forex,
    Stock,
    Crypto,
    Futures,
    Options,
    General,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Forex => "forex",
            Category::Stock => "stock",
            Category::Crypto => "crypto",
            Category::Futures => "futures",
            Category::Options => "options",
            Category::General => "general",
        }
    }

    /// Human wording used in prompts and fallback copy.
    pub fn describe(self) -> &'static str {
        match self {
            Category::Forex => "forex and CFD",
            Category::Stock => "stock and ETF",
            Category::Crypto => "cryptocurrency",
            Category::Futures => "futures",
            Category::Options => "options",
            Category::General => "multi-asset",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Primary regulatory region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    Us,
    Eu,
    Uk,
    Global,
    Asia,
}

impl Region {
    pub fn as_str(self) -> &'static str {
        match self {
            Region::Us => "us",
            Region::Eu => "eu",
            Region::Uk => "uk",
            Region::Global => "global",
            Region::Asia => "asia",
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            Region::Us => "United States",
            Region::Eu => "European Union",
            Region::Uk => "United Kingdom",
            Region::Global => "international",
            Region::Asia => "Asia-Pacific",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A canonical subject the pipeline writes a review about.
///
/// Created once per run by [`EntityExtractor`] and never mutated afterwards.
/// `id` is always `slugify(name)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub id: String,
    pub name: String,
    pub category: Category,
    pub region: Region,
    pub source_asset: String,
}

impl Entity {
    /// Build an entity for a display name, classifying it from the static tables.
    pub fn from_display_name(name: &str, source_asset: &str) -> Self {
        let id = slugify(name);
        Self {
            category: tables::category_for(&id),
            region: tables::region_for(&id),
            id,
            name: name.to_string(),
            source_asset: source_asset.to_string(),
        }
    }
}
