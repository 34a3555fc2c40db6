//! Run-and-emit: artifacts on disk agree with the in-memory report

use super::test_utils::{thin_review_json, today, write_assets, ScriptedBackend, ScriptedQa};
use brokerpress::config::PipelineConfig;
use brokerpress::emit::{JsonArtifactEmitter, INDEX_FILE_NAME};
use brokerpress::error::PipelineError;
use brokerpress::pipeline::Pipeline;
use brokerpress::provider::GenerationRequest;
use std::sync::Arc;
use tempfile::TempDir;

fn thin_reply(_request: &GenerationRequest) -> Result<String, PipelineError> {
    Ok(thin_review_json("Broker Review"))
}

fn read_json(path: &std::path::Path) -> serde_json::Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[tokio::test]
async fn index_matches_report_and_artifacts() {
    let temp = TempDir::new().unwrap();
    let assets = temp.path().join("assets");
    let out = temp.path().join("out");
    write_assets(&assets, &["coinbase.png", "degiro.jpg", "webull.svg"]);

    let mut config = PipelineConfig::default();
    config.batch.delay_ms = 0;
    let backend = Arc::new(
        ScriptedBackend::new()
            .with_default(thin_reply)
            .script("degiro", vec![Ok("I cannot help with that.".to_string())]),
    );
    let pipeline = Pipeline::with_backends(&config, backend, Arc::new(ScriptedQa::new()))
        .with_today(today());

    let (report, summary) = pipeline
        .run_and_emit(&assets, &JsonArtifactEmitter::new(&out))
        .await
        .unwrap();

    assert_eq!(summary.index, out.join(INDEX_FILE_NAME));
    assert_eq!(summary.artifacts.len(), report.outcomes.len());
    for path in &summary.artifacts {
        assert!(path.is_file(), "{}", path.display());
    }

    let index = read_json(&summary.index);
    assert_eq!(index["stats"]["processed"], 3);
    assert_eq!(index["stats"]["fallback_count"], 1);
    let subjects = index["subjects"].as_array().unwrap();
    let ids: Vec<&str> = subjects.iter().map(|s| s["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["coinbase", "degiro", "webull"]);

    for entry in subjects {
        let id = entry["id"].as_str().unwrap();
        let outcome = report.outcome(id).unwrap();
        assert_eq!(entry["provenance"], outcome.provenance.to_string());
        assert_eq!(entry["attempts"], outcome.attempts);

        let artifact = read_json(&out.join(entry["artifact"].as_str().unwrap()));
        assert_eq!(artifact["subject_id"], id);
        assert_eq!(artifact["content"]["title"], outcome.content.title.as_str());
    }

    let degiro = read_json(&out.join("degiro.json"));
    assert_eq!(degiro["provenance"], "fallback");
    assert_eq!(degiro["content"]["lastUpdated"], "2025-06-01");
}
