//! Pipeline facade: config → backends → extractor → scheduler → emitter.

use crate::batch::{BatchPlan, BatchScheduler, BatchSettings, RunReport};
use crate::catalog::{AssetLister, DirAssetLister, EntityExtractor, ExtractionReport};
use crate::config::PipelineConfig;
use crate::emit::{ArtifactEmitter, EmitSummary};
use crate::error::PipelineError;
use crate::generation::{GenerationOrchestrator, GenerationSettings};
use crate::provider::{BackendFactory, GenerationBackend};
use crate::qa::{QaBackend, QaBackendFactory};
use crate::retry::RetryController;
use crate::validation::ValidationGate;
use chrono::NaiveDate;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

pub struct Pipeline {
    backend: Arc<dyn GenerationBackend>,
    qa: Arc<dyn QaBackend>,
    lister: Box<dyn AssetLister>,
    extractor: EntityExtractor,
    generation: GenerationSettings,
    batch: BatchSettings,
    today: Option<NaiveDate>,
}

impl Pipeline {
    /// Validate `config` and build the configured backends.
    pub fn from_config(config: &PipelineConfig) -> Result<Self, PipelineError> {
        config.validate().map_err(|errors| {
            let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            PipelineError::Config(format!(
                "Configuration validation failed:\n{}",
                messages.join("\n")
            ))
        })?;

        let backend: Arc<dyn GenerationBackend> = Arc::from(BackendFactory::create(&config.backend)?);
        let qa: Arc<dyn QaBackend> = Arc::from(QaBackendFactory::create(&config.qa)?);
        Ok(Self::with_backends(config, backend, qa))
    }

    /// Build a pipeline around caller-supplied backends. Configuration is
    /// used as-is for everything else.
    pub fn with_backends(
        config: &PipelineConfig,
        backend: Arc<dyn GenerationBackend>,
        qa: Arc<dyn QaBackend>,
    ) -> Self {
        Self {
            backend,
            qa,
            lister: Box::new(DirAssetLister::new(config.assets.extensions.clone())),
            extractor: EntityExtractor::new(config.assets.extensions.clone()),
            generation: config.generation.clone(),
            batch: config.batch.clone(),
            today: None,
        }
    }

    pub fn with_lister(mut self, lister: Box<dyn AssetLister>) -> Self {
        self.lister = lister;
        self
    }

    /// Pin the date stamped on all content produced by this pipeline.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    /// List `assets_dir` and extract the subject catalog.
    pub fn catalog(&self, assets_dir: &Path) -> Result<ExtractionReport, PipelineError> {
        let assets = self.lister.list(assets_dir)?;
        Ok(self.extractor.extract(&assets))
    }

    fn controller(&self) -> RetryController {
        let mut orchestrator =
            GenerationOrchestrator::new(self.backend.clone(), self.generation.clone());
        if let Some(today) = self.today {
            orchestrator = orchestrator.with_today(today);
        }
        RetryController::new(
            Arc::new(orchestrator),
            Arc::new(ValidationGate::new(self.qa.clone())),
        )
    }

    /// Run every discovered subject to an outcome. Only configuration and
    /// asset-listing problems fail the run.
    pub async fn run(&self, assets_dir: &Path) -> Result<RunReport, PipelineError> {
        let extraction = self.catalog(assets_dir)?;
        let plan = BatchPlan::new(&extraction.entities, &self.batch)?;

        info!(
            backend = self.backend.backend_name(),
            qa = self.qa.backend_name(),
            extracted = extraction.extracted(),
            skipped = extraction.skipped(),
            "Pipeline run started"
        );

        let controller = self.controller();
        let mut report = BatchScheduler::new().execute(&controller, plan).await;
        report.stats.extracted = extraction.extracted();
        report.stats.skipped = extraction.skipped();
        Ok(report)
    }

    /// [`Pipeline::run`] followed by emission of every outcome.
    pub async fn run_and_emit(
        &self,
        assets_dir: &Path,
        emitter: &dyn ArtifactEmitter,
    ) -> Result<(RunReport, EmitSummary), PipelineError> {
        let report = self.run(assets_dir).await?;
        let summary = emitter.emit(&report)?;
        Ok((report, summary))
    }
}
