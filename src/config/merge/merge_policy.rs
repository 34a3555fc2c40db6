//! Merge rules: defaults, override order, conflict handling.
//!
//! Later sources win key by key; tables merge rather than replace, so a
//! workspace file can override `batch.delay_ms` without restating `chunk_size`.

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("batch.chunk_size", 3)?
        .set_default("batch.delay_ms", 2000)?
        .set_default("assets.directory", "assets")?
        .set_default("output.directory", "out")
}
