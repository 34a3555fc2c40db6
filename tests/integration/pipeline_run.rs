//! End-to-end runs through the pipeline facade with in-memory backends

use super::test_utils::{full_review_json, today, write_assets, ScriptedBackend, ScriptedQa};
use brokerpress::catalog::tables::display_name_for_slug;
use brokerpress::config::PipelineConfig;
use brokerpress::error::PipelineError;
use brokerpress::pipeline::Pipeline;
use brokerpress::provider::GenerationRequest;
use brokerpress::qa::{QaVerdict, RuleQaBackend, RuleSet};
use brokerpress::retry::Provenance;
use std::sync::Arc;
use tempfile::TempDir;

fn fast_config() -> PipelineConfig {
    let mut config = PipelineConfig::default();
    config.batch.chunk_size = 2;
    config.batch.delay_ms = 0;
    config
}

fn complete_reply(request: &GenerationRequest) -> Result<String, PipelineError> {
    let name = display_name_for_slug(&request.subject_id).unwrap_or(request.subject_id.as_str());
    Ok(full_review_json(name))
}

#[tokio::test]
async fn mixed_run_reaches_an_outcome_for_every_subject() {
    let temp = TempDir::new().unwrap();
    let assets = temp.path().join("assets");
    write_assets(
        &assets,
        &[
            "etoro.png",
            "kraken.webp",
            "imgi_003_oanda.png",
            "team-photo.jpg",
            "notes.txt",
        ],
    );

    let backend = Arc::new(
        ScriptedBackend::new()
            .with_default(complete_reply)
            .script(
                "oanda",
                vec![Err(PipelineError::Transport("connection reset".to_string()))],
            ),
    );
    let qa = Arc::new(ScriptedQa::new().script(
        "kraken",
        vec![Ok(QaVerdict::invalid(vec!["Missing fee table".to_string()]))],
    ));

    let report = Pipeline::with_backends(&fast_config(), backend.clone(), qa.clone())
        .with_today(today())
        .run(&assets)
        .await
        .unwrap();

    let stats = &report.stats;
    assert_eq!(stats.extracted, 3);
    assert_eq!(stats.skipped, 1);
    assert_eq!(stats.processed, 3);
    assert_eq!(stats.generated_count, 1);
    assert_eq!(stats.regenerated_count, 1);
    assert_eq!(stats.fallback_count, 1);
    assert_eq!(stats.chunks, 2);
    assert_eq!(stats.pacing_delays, 1);
    assert_eq!(
        stats.processed,
        stats.generated_count + stats.regenerated_count + stats.fallback_count
    );

    let ids: Vec<&str> = report.outcomes.keys().map(String::as_str).collect();
    assert_eq!(ids, vec!["etoro", "kraken", "oanda"]);
    assert_eq!(report.outcome("etoro").unwrap().provenance, Provenance::Generated);
    assert_eq!(report.outcome("kraken").unwrap().provenance, Provenance::Regenerated);

    let oanda = report.outcome("oanda").unwrap();
    assert_eq!(oanda.provenance, Provenance::Fallback);
    assert!(oanda.fallback_reason.is_some());
    assert_eq!(qa.calls_for("oanda"), 0);

    for outcome in report.outcomes.values() {
        assert!(outcome.content.satisfies_invariants(), "{}", outcome.subject_id);
        assert_eq!(outcome.content.last_updated, today());
    }
    assert_eq!(backend.calls_for("kraken").len(), 2);
}

#[tokio::test]
async fn rule_qa_accepts_well_formed_reviews() {
    let temp = TempDir::new().unwrap();
    let assets = temp.path().join("assets");
    write_assets(&assets, &["pepperstone.png", "ig.svg", "xm.jpg"]);

    let backend = Arc::new(ScriptedBackend::new().with_default(complete_reply));
    let qa = Arc::new(RuleQaBackend::new(RuleSet::default()));

    let report = Pipeline::with_backends(&fast_config(), backend.clone(), qa)
        .with_today(today())
        .run(&assets)
        .await
        .unwrap();

    assert_eq!(report.stats.processed, 3);
    assert_eq!(report.stats.generated_count, 3);
    assert_eq!(backend.calls.lock().len(), 3);
}

#[tokio::test]
async fn empty_asset_directory_produces_empty_report() {
    let temp = TempDir::new().unwrap();
    let assets = temp.path().join("assets");
    write_assets(&assets, &[]);

    let backend = Arc::new(ScriptedBackend::new());
    let report = Pipeline::with_backends(&fast_config(), backend.clone(), Arc::new(ScriptedQa::new()))
        .run(&assets)
        .await
        .unwrap();

    assert!(report.outcomes.is_empty());
    assert_eq!(report.stats.processed, 0);
    assert_eq!(report.stats.pacing_delays, 0);
    assert!(backend.calls.lock().is_empty());
}

#[tokio::test]
async fn missing_asset_directory_fails_the_run() {
    let temp = TempDir::new().unwrap();
    let result = Pipeline::with_backends(
        &fast_config(),
        Arc::new(ScriptedBackend::new()),
        Arc::new(ScriptedQa::new()),
    )
    .run(&temp.path().join("nope"))
    .await;
    assert!(matches!(result, Err(PipelineError::Config(_))));
}

#[test]
fn from_config_rejects_invalid_configuration() {
    let mut config = PipelineConfig::default();
    config.batch.chunk_size = 0;
    let err = Pipeline::from_config(&config).err().unwrap();
    match err {
        PipelineError::Config(msg) => assert!(msg.contains("Batch:")),
        other => panic!("unexpected error: {other:?}"),
    }
}
