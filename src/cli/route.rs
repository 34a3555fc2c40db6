//! CLI route: single route table and run context. Dispatches to the pipeline
//! facade and presentation.

use crate::catalog::{AssetLister, DirAssetLister, EntityExtractor};
use crate::cli::parse::{Commands, OutputFormat};
use crate::cli::presentation::{
    format_catalog_json, format_catalog_text, format_run_summary_json, format_run_summary_text,
};
use crate::config::{ConfigLoader, PipelineConfig};
use crate::emit::JsonArtifactEmitter;
use crate::error::PipelineError;
use crate::pipeline::Pipeline;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

/// Runtime context for CLI execution: workspace and the loaded configuration.
pub struct RunContext {
    workspace_root: PathBuf,
    config: PipelineConfig,
}

impl RunContext {
    /// Load configuration from `config_path` when given, otherwise from the
    /// workspace's layered sources.
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, PipelineError> {
        let config = match config_path {
            Some(ref path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load(&workspace_root)?,
        };
        Ok(Self::with_config(workspace_root, config))
    }

    pub fn with_config(workspace_root: PathBuf, config: PipelineConfig) -> Self {
        Self {
            workspace_root,
            config,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Relative paths resolve against the workspace root.
    fn resolve(&self, path: Option<&Path>, configured: &Path) -> PathBuf {
        let path = path.unwrap_or(configured);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.workspace_root.join(path)
        }
    }

    /// Execute a CLI command via the single route table.
    pub async fn execute(&self, command: &Commands) -> Result<String, PipelineError> {
        let started = Instant::now();
        let result = match command {
            Commands::Catalog { assets, format } => self.handle_catalog(assets.as_deref(), *format),
            Commands::Run {
                assets,
                out,
                format,
            } => {
                self.handle_run(assets.as_deref(), out.as_deref(), *format)
                    .await
            }
        };
        info!(
            ok = result.is_ok(),
            duration_ms = started.elapsed().as_millis(),
            "Command finished"
        );
        result
    }

    fn handle_catalog(
        &self,
        assets: Option<&Path>,
        format: OutputFormat,
    ) -> Result<String, PipelineError> {
        let directory = self.resolve(assets, &self.config.assets.directory);
        let extensions = self.config.assets.extensions.clone();
        let names = DirAssetLister::new(extensions.clone()).list(&directory)?;
        let report = EntityExtractor::new(extensions).extract(&names);
        match format {
            OutputFormat::Text => Ok(format_catalog_text(&report)),
            OutputFormat::Json => format_catalog_json(&report),
        }
    }

    async fn handle_run(
        &self,
        assets: Option<&Path>,
        out: Option<&Path>,
        format: OutputFormat,
    ) -> Result<String, PipelineError> {
        let assets_dir = self.resolve(assets, &self.config.assets.directory);
        let out_dir = self.resolve(out, &self.config.output.directory);

        let pipeline = Pipeline::from_config(&self.config)?;
        let emitter = JsonArtifactEmitter::new(out_dir);
        let (report, emitted) = pipeline.run_and_emit(&assets_dir, &emitter).await?;

        match format {
            OutputFormat::Text => Ok(format_run_summary_text(&report, &emitted)),
            OutputFormat::Json => format_run_summary_json(&report, &emitted),
        }
    }
}
