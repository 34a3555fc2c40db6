//! Integration tests for the brokerpress pipeline

mod catalog_extraction;
mod config_integration;
mod emitter;
mod pipeline_run;
mod retry_paths;
mod test_utils;
