//! Report command handler
//!
//! Renders the progress report as Markdown or HTML.

use super::CommandResult;
use chrono::NaiveDateTime;
use cityaid::config::Config;
use cityaid::core::report::{ReportContext, ReportFormat};
use cityaid::core::tracker::Tracker;
use logger::info;
use rand::Rng;
use std::path::{Path, PathBuf};

/// Default report path: `<reports_dir>/cityaid-report-<timestamp>.<ext>`
fn default_output_path(config: &Config, format: ReportFormat, now: NaiveDateTime) -> PathBuf {
    PathBuf::from(&config.paths.reports_dir).join(format!(
        "cityaid-report-{}.{}",
        now.format("%Y%m%d-%H%M%S"),
        format.extension()
    ))
}

/// Run the report command.
///
/// # Arguments
/// * `tracker` - Tracker to report on
/// * `output` - Optional output path
/// * `format` - Report format
/// * `config` - Configuration containing the default reports directory
/// * `now` - Report timestamp
pub fn run<R: Rng>(
    tracker: &Tracker<R>,
    output: Option<&Path>,
    format: ReportFormat,
    config: &Config,
    now: NaiveDateTime,
) -> CommandResult {
    let output_path = output.map_or_else(
        || default_output_path(config, format, now),
        Path::to_path_buf,
    );

    let ctx = ReportContext::from_tracker(tracker, now);
    format
        .generator()
        .generate(&ctx, &output_path)
        .map_err(|e| format!("Failed to generate {format} report: {e}"))?;

    info!("Report written to {}", output_path.display());
    println!("✓ Report generated: {}", output_path.display());
    Ok(())
}
