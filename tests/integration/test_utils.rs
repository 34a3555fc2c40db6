//! Shared test utilities for integration tests
//!
//! Scripted in-memory backends, asset fixtures, and environment isolation
//! for config tests.

use async_trait::async_trait;
use brokerpress::catalog::Entity;
use brokerpress::error::PipelineError;
use brokerpress::fallback;
use brokerpress::provider::{GenerationBackend, GenerationRequest};
use brokerpress::qa::{QaBackend, QaMetadata, QaVerdict};
use chrono::NaiveDate;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::path::Path;
use tempfile::TempDir;

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
}

/// A complete review that passes the default editorial rules, serialized the
/// way a well-behaved model would return it.
pub fn full_review_json(name: &str) -> String {
    let entity = Entity::from_display_name(name, "fixture.png");
    serde_json::to_string(&fallback::synthesize(&entity, today())).unwrap()
}

/// Minimal schema-valid review; passes parsing but fails default rules.
pub fn thin_review_json(title: &str) -> String {
    format!(
        r#"{{"title": "{title}", "pros": ["Low fees"], "cons": ["Few markets"],
        "ratings": {{"overall": 4.2, "fees": 4, "platform": 4, "support": 4, "trust": 4}}}}"#
    )
}

/// Generation backend replaying per-subject scripts. Subjects without a
/// script (or with an exhausted one) get `default_reply`.
pub struct ScriptedBackend {
    scripts: Mutex<HashMap<String, VecDeque<Result<String, PipelineError>>>>,
    default_reply: Option<fn(&GenerationRequest) -> Result<String, PipelineError>>,
    pub calls: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self {
            scripts: Mutex::new(HashMap::new()),
            default_reply: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_default(mut self, reply: fn(&GenerationRequest) -> Result<String, PipelineError>) -> Self {
        self.default_reply = Some(reply);
        self
    }

    pub fn script(self, subject_id: &str, replies: Vec<Result<String, PipelineError>>) -> Self {
        self.scripts
            .lock()
            .insert(subject_id.to_string(), replies.into());
        self
    }

    pub fn calls_for(&self, subject_id: &str) -> Vec<GenerationRequest> {
        self.calls
            .lock()
            .iter()
            .filter(|req| req.subject_id == subject_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl GenerationBackend for ScriptedBackend {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, PipelineError> {
        self.calls.lock().push(request.clone());
        let scripted = self
            .scripts
            .lock()
            .get_mut(&request.subject_id)
            .and_then(VecDeque::pop_front);
        match (scripted, self.default_reply) {
            (Some(reply), _) => reply,
            (None, Some(default)) => default(request),
            (None, None) => Err(PipelineError::Transport(format!(
                "no scripted reply for {}",
                request.subject_id
            ))),
        }
    }

    fn backend_name(&self) -> &str {
        "scripted"
    }
}

/// QA backend replaying per-subject verdicts; unscripted calls are valid.
pub struct ScriptedQa {
    scripts: Mutex<HashMap<String, VecDeque<Result<QaVerdict, PipelineError>>>>,
    pub calls: Mutex<Vec<QaMetadata>>,
}

impl ScriptedQa {
    pub fn new() -> Self {
        Self {
            scripts: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn script(self, subject_id: &str, verdicts: Vec<Result<QaVerdict, PipelineError>>) -> Self {
        self.scripts
            .lock()
            .insert(subject_id.to_string(), verdicts.into());
        self
    }

    pub fn calls_for(&self, subject_id: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|meta| meta.subject_id == subject_id)
            .count()
    }
}

#[async_trait]
impl QaBackend for ScriptedQa {
    async fn validate(
        &self,
        _content: &str,
        _content_type: &str,
        metadata: &QaMetadata,
    ) -> Result<QaVerdict, PipelineError> {
        self.calls.lock().push(metadata.clone());
        self.scripts
            .lock()
            .get_mut(&metadata.subject_id)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Ok(QaVerdict::valid()))
    }

    fn backend_name(&self) -> &str {
        "scripted"
    }
}

/// Create empty files named `names` under `dir`.
pub fn write_assets(dir: &Path, names: &[&str]) {
    std::fs::create_dir_all(dir).unwrap();
    for name in names {
        std::fs::write(dir.join(name), b"").unwrap();
    }
}

static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Run `f` with XDG_CONFIG_HOME and HOME pointed into `test_dir` and every
/// `BROKERPRESS*` variable cleared, restoring the environment afterwards.
pub fn with_isolated_env<F, R>(test_dir: &TempDir, f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = ENV_MUTEX.lock();
    let saved: Vec<(String, String)> = std::env::vars()
        .filter(|(key, _)| {
            key == "HOME" || key == "XDG_CONFIG_HOME" || key.starts_with("BROKERPRESS")
        })
        .collect();
    for (key, _) in &saved {
        std::env::remove_var(key);
    }

    let config_home = test_dir.path().join("xdg");
    let home = test_dir.path().join("home");
    std::fs::create_dir_all(&config_home).unwrap();
    std::fs::create_dir_all(&home).unwrap();
    std::env::set_var("XDG_CONFIG_HOME", &config_home);
    std::env::set_var("HOME", &home);

    let result = f();

    std::env::remove_var("XDG_CONFIG_HOME");
    std::env::remove_var("HOME");
    for (key, _) in std::env::vars().filter(|(key, _)| key.starts_with("BROKERPRESS")) {
        std::env::remove_var(key);
    }
    for (key, value) in saved {
        std::env::set_var(key, value);
    }
    result
}
