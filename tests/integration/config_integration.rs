//! Layered configuration loading against real files and environment

use super::test_utils::with_isolated_env;
use brokerpress::config::{ConfigLoader, PipelineConfig, ValidationError};
use brokerpress::error::PipelineError;
use brokerpress::qa::QaBackendConfig;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const FULL_CONFIG: &str = r#"
[generation]
model = "llama3.1"
max_tokens = 2048
temperature = 0.6
regeneration_temperature = 0.3

[batch]
chunk_size = 4
delay_ms = 500

[backend]
provider = "ollama"

[qa]
kind = "rules"

[qa.rules]
min_pros = 3
min_cons = 2
min_sections = 3
min_section_chars = 200
min_faq = 2
min_introduction_chars = 100
title_max_chars = 80
meta_min_chars = 60
meta_max_chars = 170

[assets]
directory = "media/brokers"
extensions = ["png", "webp"]

[output]
directory = "build/reviews"

[logging]
level = "warn"
format = "json"
"#;

#[test]
fn explicit_file_populates_every_section() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("brokerpress.toml");
    fs::write(&path, FULL_CONFIG).unwrap();

    let config = with_isolated_env(&temp, || ConfigLoader::load_from_file(&path)).unwrap();

    assert_eq!(config.generation.model, "llama3.1");
    assert_eq!(config.generation.max_tokens, 2048);
    assert_eq!(config.batch.chunk_size, 4);
    assert_eq!(config.batch.delay_ms, 500);
    assert_eq!(config.backend.provider_slug(), "ollama");
    match &config.qa {
        QaBackendConfig::Rules { rules } => {
            assert_eq!(rules.min_pros, 3);
            assert_eq!(rules.meta_max_chars, 170);
        }
        other => panic!("unexpected qa config: {other:?}"),
    }
    assert_eq!(config.assets.directory, PathBuf::from("media/brokers"));
    assert_eq!(config.assets.extensions, vec!["png", "webp"]);
    assert_eq!(config.output.directory, PathBuf::from("build/reviews"));
    assert_eq!(config.logging.level, "warn");
    assert_eq!(config.logging.format, "json");
    assert!(config.validate().is_ok());
}

#[test]
fn environment_overrides_explicit_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("brokerpress.toml");
    fs::write(&path, FULL_CONFIG).unwrap();

    let config = with_isolated_env(&temp, || {
        std::env::set_var("BROKERPRESS__BATCH__DELAY_MS", "0");
        std::env::set_var("BROKERPRESS__OUTPUT__DIRECTORY", "/tmp/reviews");
        ConfigLoader::load_from_file(&path)
    })
    .unwrap();

    assert_eq!(config.batch.chunk_size, 4);
    assert_eq!(config.batch.delay_ms, 0);
    assert_eq!(config.output.directory, PathBuf::from("/tmp/reviews"));
}

#[test]
fn workspace_without_files_yields_defaults() {
    let temp = TempDir::new().unwrap();
    let workspace = temp.path().join("ws");
    fs::create_dir_all(&workspace).unwrap();

    let config = with_isolated_env(&temp, || ConfigLoader::load(&workspace)).unwrap();
    assert_eq!(config, PipelineConfig::default());
}

#[test]
fn global_file_is_overridden_by_workspace_file() {
    let temp = TempDir::new().unwrap();
    let workspace = temp.path().join("ws");
    fs::create_dir_all(workspace.join("config")).unwrap();
    fs::write(
        workspace.join("config/config.toml"),
        "[batch]\nchunk_size = 6\n",
    )
    .unwrap();

    let config = with_isolated_env(&temp, || {
        let global = ConfigLoader::global_config_path().unwrap();
        fs::create_dir_all(global.parent().unwrap()).unwrap();
        fs::write(&global, "[batch]\nchunk_size = 9\ndelay_ms = 10\n").unwrap();
        ConfigLoader::load(&workspace)
    })
    .unwrap();

    assert_eq!(config.batch.chunk_size, 6);
    assert_eq!(config.batch.delay_ms, 10);
}

#[test]
fn invalid_values_load_but_fail_validation() {
    let config = ConfigLoader::load_from_str(
        r#"
[batch]
chunk_size = 0

[qa]
kind = "http"
endpoint = "qa.internal/validate"

[logging]
output = "syslog"
"#,
    )
    .unwrap();

    let errors = config.validate().unwrap_err();
    assert_eq!(errors.len(), 3);
    assert!(errors.iter().any(|e| matches!(e, ValidationError::Batch(_))));
    assert!(errors.iter().any(|e| matches!(e, ValidationError::Qa(_))));
    assert!(errors.iter().any(|e| matches!(e, ValidationError::Logging(_))));
}

#[test]
fn malformed_toml_is_config_error() {
    let err = ConfigLoader::load_from_str("[batch\nchunk_size = ").unwrap_err();
    assert!(matches!(err, PipelineError::Config(_)));
}
