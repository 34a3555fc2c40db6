//! Config loader: assembles sources in precedence order and deserializes the
//! merged result into [`PipelineConfig`].

use super::merge::merge_policy;
use super::sources::{environment, global_file, workspace_file};
use super::PipelineConfig;
use crate::error::PipelineError;
use config::{File, FileFormat};
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a workspace.
    ///
    /// Precedence (lowest to highest): merge-policy defaults, global user
    /// file, `config/config.toml`, `config/{BROKERPRESS_ENV}.toml`,
    /// `BROKERPRESS__SECTION__KEY` environment variables.
    pub fn load(workspace_root: &Path) -> Result<PipelineConfig, PipelineError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = workspace_file::add_to_builder(builder, workspace_root)?;
        let builder = environment::add_to_builder(builder);

        let config: PipelineConfig = builder.build()?.try_deserialize()?;
        debug!(
            workspace_root = %workspace_root.display(),
            backend = config.backend.provider_slug(),
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Load configuration from one explicit file, still honoring environment
    /// overrides. The file must exist.
    pub fn load_from_file(path: &Path) -> Result<PipelineConfig, PipelineError> {
        if !path.is_file() {
            return Err(PipelineError::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        let builder = merge_policy::builder_with_defaults()?
            .add_source(File::from(path.to_path_buf()).required(true));
        let builder = environment::add_to_builder(builder);
        Ok(builder.build()?.try_deserialize()?)
    }

    /// Parse a TOML string with defaults applied; no files or environment.
    pub fn load_from_str(toml: &str) -> Result<PipelineConfig, PipelineError> {
        let config = merge_policy::builder_with_defaults()?
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?;
        Ok(config.try_deserialize()?)
    }

    /// Location of the global config file, if a home directory is known.
    pub fn global_config_path() -> Option<PathBuf> {
        global_file::global_config_path()
    }
}
