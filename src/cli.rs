//! CLI domain: parse, route, output, and presentation only.
//! No pipeline logic; the route table dispatches to the pipeline facade.

mod output;
mod parse;
mod presentation;
mod route;

pub use output::map_error;
pub use parse::{Cli, Commands, OutputFormat};
pub use presentation::{
    format_catalog_json, format_catalog_text, format_run_summary_json, format_run_summary_text,
};
pub use route::RunContext;
