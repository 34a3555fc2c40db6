//! CLI presentation: text (comfy-table) and json formatters for catalog and
//! run results.

use crate::batch::RunReport;
use crate::catalog::{ExtractionReport, MissReason};
use crate::emit::EmitSummary;
use crate::error::PipelineError;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use serde_json::json;

fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

fn miss_reason_label(reason: MissReason) -> &'static str {
    match reason {
        MissReason::UnsupportedExtension => "unsupported extension",
        MissReason::UnknownSubject => "unknown subject",
    }
}

pub fn format_catalog_text(report: &ExtractionReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n\n", format_section_heading("Catalog")));
    if report.entities.is_empty() {
        out.push_str("No subjects found.\n");
    } else {
        let mut table = Table::new();
        table.load_preset(UTF8_BORDERS_ONLY);
        table.set_header(vec!["Id", "Name", "Category", "Region", "Asset"]);
        for entity in &report.entities {
            table.add_row(vec![
                entity.id.clone(),
                entity.name.clone(),
                entity.category.to_string(),
                entity.region.to_string(),
                entity.source_asset.clone(),
            ]);
        }
        out.push_str(&format!("{}\n", table));
    }

    if !report.misses.is_empty() {
        out.push_str(&format!("\n{}\n\n", format_section_heading("Skipped assets")));
        let mut table = Table::new();
        table.load_preset(UTF8_BORDERS_ONLY);
        table.set_header(vec!["Asset", "Reason"]);
        for miss in &report.misses {
            table.add_row(vec![
                miss.asset.clone(),
                miss_reason_label(miss.reason).to_string(),
            ]);
        }
        out.push_str(&format!("{}\n", table));
    }

    out.push_str(&format!(
        "\nExtracted: {}  Skipped: {}  Duplicates: {}",
        report.extracted(),
        report.skipped(),
        report.duplicates
    ));
    out
}

pub fn format_catalog_json(report: &ExtractionReport) -> Result<String, PipelineError> {
    let out = json!({
        "entities": report.entities,
        "misses": report.misses,
        "extracted": report.extracted(),
        "skipped": report.skipped(),
        "duplicates": report.duplicates,
    });
    Ok(serde_json::to_string_pretty(&out)?)
}

pub fn format_run_summary_text(report: &RunReport, emitted: &EmitSummary) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n\n", format_section_heading("Run summary")));

    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Subject", "Provenance", "Attempts", "Overall", "Notes"]);
    for outcome in report.outcomes.values() {
        let notes = match (&outcome.fallback_reason, outcome.issues.len()) {
            (Some(reason), _) => reason.clone(),
            (None, 0) => String::new(),
            (None, n) => format!("{} unresolved QA issue(s)", n),
        };
        table.add_row(vec![
            outcome.subject.name.clone(),
            outcome.provenance.to_string(),
            outcome.attempts.to_string(),
            format!("{:.1}", outcome.content.ratings.overall),
            notes,
        ]);
    }
    out.push_str(&format!("{}\n\n", table));

    let stats = &report.stats;
    let mut totals = Table::new();
    totals.load_preset(UTF8_BORDERS_ONLY);
    totals.set_header(vec![
        "Extracted",
        "Skipped",
        "Generated",
        "Regenerated",
        "Fallback",
        "Chunks",
    ]);
    totals.add_row(vec![
        stats.extracted.to_string(),
        stats.skipped.to_string(),
        stats.generated_count.to_string(),
        stats.regenerated_count.to_string(),
        stats.fallback_count.to_string(),
        stats.chunks.to_string(),
    ]);
    out.push_str(&format!("{}\n\n", totals));
    out.push_str(&format!(
        "Wrote {} artifact(s); index at {}",
        emitted.artifacts.len(),
        emitted.index.display()
    ));
    out
}

pub fn format_run_summary_json(
    report: &RunReport,
    emitted: &EmitSummary,
) -> Result<String, PipelineError> {
    let subjects: Vec<_> = report
        .outcomes
        .values()
        .map(|outcome| {
            json!({
                "id": outcome.subject_id,
                "provenance": outcome.provenance,
                "attempts": outcome.attempts,
                "issues": outcome.issues,
                "fallback_reason": outcome.fallback_reason,
            })
        })
        .collect();
    let out = json!({
        "stats": report.stats,
        "subjects": subjects,
        "index": emitted.index,
    });
    Ok(serde_json::to_string_pretty(&out)?)
}
