//! Catalog extraction over a real asset directory

use super::test_utils::write_assets;
use brokerpress::catalog::{
    AssetLister, Category, DirAssetLister, EntityExtractor, MissReason, Region,
};
use tempfile::TempDir;

#[test]
fn indexed_review_asset_resolves_to_canonical_broker() {
    let temp = TempDir::new().unwrap();
    write_assets(temp.path(), &["imgi_004_etoro-review.png"]);

    let names = DirAssetLister::default().list(temp.path()).unwrap();
    let report = EntityExtractor::default().extract(&names);

    assert_eq!(report.entities.len(), 1);
    let entity = &report.entities[0];
    assert_eq!(entity.id, "etoro");
    assert_eq!(entity.name, "eToro");
    assert_eq!(entity.category, Category::Stock);
    assert_eq!(entity.region, Region::Global);
    assert_eq!(entity.source_asset, "imgi_004_etoro-review.png");
}

#[test]
fn aliases_collapse_to_first_seen_entity() {
    let temp = TempDir::new().unwrap();
    write_assets(
        temp.path(),
        &["admiral-markets-review.png", "admirals-logo.jpg"],
    );

    let names = DirAssetLister::default().list(temp.path()).unwrap();
    let report = EntityExtractor::default().extract(&names);

    assert_eq!(report.entities.len(), 1);
    assert_eq!(report.entities[0].id, "admirals");
    assert_eq!(report.entities[0].source_asset, "admiral-markets-review.png");
    assert_eq!(report.duplicates, 1);
    assert_eq!(report.skipped(), 0);
}

#[test]
fn unknown_and_non_image_files_are_counted_not_fatal() {
    let temp = TempDir::new().unwrap();
    write_assets(
        temp.path(),
        &["kraken.webp", "office-party.jpg", "README.md", "notes"],
    );
    std::fs::create_dir(temp.path().join("nested.png")).unwrap();

    let names = DirAssetLister::default().list(temp.path()).unwrap();
    assert_eq!(names, vec!["kraken.webp", "office-party.jpg"]);

    let report = EntityExtractor::default().extract(&names);
    assert_eq!(report.extracted(), 1);
    assert_eq!(report.skipped(), 1);
    assert_eq!(report.misses[0].reason, MissReason::UnknownSubject);
}

#[test]
fn extraction_is_stable_across_listings() {
    let temp = TempDir::new().unwrap();
    write_assets(
        temp.path(),
        &["003_oanda.png", "12-ibkr.png", "7. Trading212-Review.jpeg"],
    );

    let lister = DirAssetLister::default();
    let first = EntityExtractor::default().extract(&lister.list(temp.path()).unwrap());
    let second = EntityExtractor::default().extract(&lister.list(temp.path()).unwrap());

    let ids: Vec<&str> = first.entities.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["oanda", "interactive-brokers", "trading-212"]);
    assert_eq!(first.entities, second.entities);
}
