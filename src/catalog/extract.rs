//! Entity extraction from asset filenames.

use super::normalize::normalize_asset_name;
use super::tables::{display_name_for_alias, display_name_for_slug};
use super::{Entity, DEFAULT_IMAGE_EXTENSIONS};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info};

const REVIEW_SUFFIX: &str = "-review";

/// Why an asset produced no entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissReason {
    /// Extension missing or outside the image allow-list
    UnsupportedExtension,
    /// Normalized name was empty or matched neither an alias nor a known broker
    UnknownSubject,
}

/// An asset that did not resolve to a broker. Counted, never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionMiss {
    pub asset: String,
    pub reason: MissReason,
}

/// Result of one extraction pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionReport {
    /// Catalog in first-seen input order, unique by id
    pub entities: Vec<Entity>,
    pub misses: Vec<ExtractionMiss>,
    /// Assets that resolved to an id already in the catalog
    pub duplicates: usize,
}

impl ExtractionReport {
    pub fn extracted(&self) -> usize {
        self.entities.len()
    }

    pub fn skipped(&self) -> usize {
        self.misses.len()
    }
}

/// Turns raw asset names into the run's subject catalog.
#[derive(Debug, Clone)]
pub struct EntityExtractor {
    extensions: Vec<String>,
}

impl Default for EntityExtractor {
    fn default() -> Self {
        Self::new(
            DEFAULT_IMAGE_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
        )
    }
}

impl EntityExtractor {
    pub fn new(extensions: Vec<String>) -> Self {
        Self { extensions }
    }

    /// Resolve a single asset name to a canonical display name.
    pub fn resolve(&self, asset: &str) -> Result<&'static str, MissReason> {
        let key = normalize_asset_name(asset, &self.extensions)?;

        if let Some(name) = display_name_for_alias(&key) {
            return Ok(name);
        }

        let stem = key.strip_suffix(REVIEW_SUFFIX).unwrap_or(&key);
        display_name_for_slug(stem)
            .or_else(|| display_name_for_alias(stem))
            .ok_or(MissReason::UnknownSubject)
    }

    /// Build the catalog. Input order is preserved and the first asset
    /// resolving to a given id wins.
    pub fn extract<S: AsRef<str>>(&self, assets: &[S]) -> ExtractionReport {
        let mut report = ExtractionReport::default();
        let mut seen = HashSet::new();

        for asset in assets {
            let asset = asset.as_ref();
            match self.resolve(asset) {
                Ok(name) => {
                    let entity = Entity::from_display_name(name, asset);
                    if seen.insert(entity.id.clone()) {
                        debug!(asset, subject_id = %entity.id, "Asset resolved");
                        report.entities.push(entity);
                    } else {
                        debug!(asset, subject_id = %entity.id, "Duplicate asset ignored");
                        report.duplicates += 1;
                    }
                }
                Err(reason) => {
                    debug!(asset, ?reason, "Asset skipped");
                    report.misses.push(ExtractionMiss {
                        asset: asset.to_string(),
                        reason,
                    });
                }
            }
        }

        info!(
            assets = assets.len(),
            extracted = report.extracted(),
            skipped = report.skipped(),
            duplicates = report.duplicates,
            "Catalog extracted"
        );
        report
    }
}
