//! CLI parse: clap types for brokerpress. No behavior; definitions only.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// brokerpress - batch broker review generation with QA gating
#[derive(Parser, Debug)]
#[command(name = "brokerpress")]
#[command(about = "Generate schema-valid broker reviews from an asset catalog")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory
    #[arg(long, global = true, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (default: off)
    #[arg(long, global = true, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long, global = true)]
    pub log_output: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the subject catalog extracted from an asset directory
    Catalog {
        /// Asset directory (defaults to `assets.directory` from config)
        #[arg(long)]
        assets: Option<PathBuf>,
        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Generate, validate and emit reviews for every subject
    Run {
        /// Asset directory (defaults to `assets.directory` from config)
        #[arg(long)]
        assets: Option<PathBuf>,
        /// Output directory (defaults to `output.directory` from config)
        #[arg(long)]
        out: Option<PathBuf>,
        /// Summary format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}
