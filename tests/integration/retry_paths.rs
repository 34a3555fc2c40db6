//! Retry controller paths against scripted collaborators

use super::test_utils::{full_review_json, thin_review_json, today, ScriptedBackend, ScriptedQa};
use brokerpress::catalog::Entity;
use brokerpress::error::PipelineError;
use brokerpress::fallback;
use brokerpress::generation::{GenerationOrchestrator, GenerationSettings};
use brokerpress::qa::{QaVerdict, RuleQaBackend, RuleSet};
use brokerpress::retry::{Provenance, RetryController, RetryState};
use brokerpress::validation::{ValidationGate, INFRASTRUCTURE_ISSUE_PREFIX};
use std::sync::Arc;

fn controller(backend: Arc<ScriptedBackend>, qa: Arc<ScriptedQa>) -> RetryController {
    let orchestrator =
        GenerationOrchestrator::new(backend, GenerationSettings::default()).with_today(today());
    RetryController::new(Arc::new(orchestrator), Arc::new(ValidationGate::new(qa)))
}

#[tokio::test]
async fn still_flagged_after_feedback_is_accepted_as_regenerated() {
    let backend = Arc::new(ScriptedBackend::new().script(
        "binance",
        vec![
            Ok(thin_review_json("Binance Review")),
            Ok(thin_review_json("Binance Review, Revised")),
        ],
    ));
    let qa = Arc::new(ScriptedQa::new().script(
        "binance",
        vec![
            Ok(QaVerdict::invalid(vec!["Needs at least 5 pros".to_string()])),
            Ok(QaVerdict::invalid(vec!["Needs at least 5 pros".to_string()])),
        ],
    ));
    let outcome = controller(backend.clone(), qa.clone())
        .run(&Entity::from_display_name("Binance", "binance.png"))
        .await;

    assert_eq!(outcome.provenance, Provenance::Regenerated);
    assert_eq!(outcome.content.title, "Binance Review, Revised");
    assert_eq!(outcome.issues, vec!["Needs at least 5 pros"]);
    assert_eq!(
        outcome.transitions,
        vec![
            RetryState::Generating,
            RetryState::Validating,
            RetryState::Regenerating,
            RetryState::RevalidatingAfterFeedback,
            RetryState::Done,
        ]
    );

    let calls = backend.calls_for("binance");
    assert_eq!(calls.len(), 2);
    assert!(calls[1].prompt.starts_with(&calls[0].prompt));
    assert!(calls[1].prompt.contains("Needs at least 5 pros"));
    assert_eq!(qa.calls_for("binance"), 2);
}

#[tokio::test]
async fn first_call_failure_goes_straight_to_fallback() {
    let backend = Arc::new(ScriptedBackend::new().script(
        "webull",
        vec![Err(PipelineError::Transport("connect timeout".to_string()))],
    ));
    let qa = Arc::new(ScriptedQa::new());
    let entity = Entity::from_display_name("Webull", "webull.png");
    let outcome = controller(backend.clone(), qa.clone()).run(&entity).await;

    assert_eq!(outcome.provenance, Provenance::Fallback);
    assert_eq!(outcome.attempts, 1);
    assert!(outcome.content.satisfies_invariants());
    assert_eq!(outcome.content, fallback::synthesize(&entity, today()));
    assert_eq!(backend.calls_for("webull").len(), 1);
    assert_eq!(qa.calls_for("webull"), 0);
}

#[tokio::test]
async fn qa_outage_is_treated_as_rejection() {
    let backend = Arc::new(ScriptedBackend::new().script(
        "xm",
        vec![Ok(full_review_json("XM")), Ok(full_review_json("XM"))],
    ));
    let qa = Arc::new(ScriptedQa::new().script(
        "xm",
        vec![Err(PipelineError::QaInfrastructure("502 bad gateway".to_string()))],
    ));
    let outcome = controller(backend.clone(), qa)
        .run(&Entity::from_display_name("XM", "xm.png"))
        .await;

    assert_eq!(outcome.provenance, Provenance::Regenerated);
    assert!(outcome.issues.is_empty());
    let retry_prompt = &backend.calls_for("xm")[1].prompt;
    assert!(retry_prompt.contains(INFRASTRUCTURE_ISSUE_PREFIX));
}

#[tokio::test]
async fn rule_backend_accepts_complete_review_first_time() {
    let backend = Arc::new(
        ScriptedBackend::new().script("pepperstone", vec![Ok(format!(
            "Here is the review:\n```json\n{}\n```",
            full_review_json("Pepperstone")
        ))]),
    );
    let orchestrator = GenerationOrchestrator::new(backend.clone(), GenerationSettings::default())
        .with_today(today());
    let controller = RetryController::new(
        Arc::new(orchestrator),
        Arc::new(ValidationGate::new(Arc::new(RuleQaBackend::new(
            RuleSet::default(),
        )))),
    );

    let outcome = controller
        .run(&Entity::from_display_name("Pepperstone", "pepperstone.png"))
        .await;
    assert_eq!(outcome.provenance, Provenance::Generated);
    assert_eq!(outcome.attempts, 1);
    assert_eq!(backend.calls_for("pepperstone").len(), 1);
}

#[tokio::test]
async fn no_path_exceeds_two_calls_per_collaborator() {
    let rejected = || Ok(QaVerdict::invalid(vec!["rejected".to_string()]));
    let cases: Vec<(Vec<Result<String, PipelineError>>, Vec<Result<QaVerdict, PipelineError>>)> = vec![
        (vec![Ok(thin_review_json("a"))], vec![]),
        (
            vec![Ok(thin_review_json("a")), Ok(thin_review_json("b"))],
            vec![rejected()],
        ),
        (
            vec![
                Ok(thin_review_json("a")),
                Ok(thin_review_json("b")),
                Ok(thin_review_json("c")),
            ],
            vec![rejected(), rejected(), rejected()],
        ),
        (
            vec![Ok(thin_review_json("a")), Err(PipelineError::RateLimited("429".to_string()))],
            vec![rejected()],
        ),
        (vec![Ok("not json at all".to_string())], vec![]),
        (
            vec![Ok(thin_review_json("a")), Ok(thin_review_json("b"))],
            vec![
                Err(PipelineError::QaInfrastructure("down".to_string())),
                Err(PipelineError::QaInfrastructure("down".to_string())),
                Err(PipelineError::QaInfrastructure("down".to_string())),
            ],
        ),
    ];

    for (replies, verdicts) in cases {
        let backend = Arc::new(ScriptedBackend::new().script("fxcm", replies));
        let qa = Arc::new(ScriptedQa::new().script("fxcm", verdicts));
        let outcome = controller(backend.clone(), qa.clone())
            .run(&Entity::from_display_name("FXCM", "fxcm.png"))
            .await;

        assert!(backend.calls_for("fxcm").len() <= 2);
        assert!(qa.calls_for("fxcm") <= 2);
        assert!(matches!(
            outcome.transitions.last(),
            Some(RetryState::Done) | Some(RetryState::Fallback)
        ));
        assert!(outcome.content.satisfies_invariants());
    }
}
