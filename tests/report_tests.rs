//! Report rendering

use chrono::{NaiveDate, NaiveDateTime};
use cityaid::core::models::{ContributionDraft, ContributionKind};
use cityaid::core::report::{ReportContext, ReportFormat, ReportGenerator};
use cityaid::core::store::Store;
use cityaid::core::tracker::Tracker;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs;
use tempfile::TempDir;

fn at(day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 12, day)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

fn populated(dir: &TempDir) -> Tracker<StdRng> {
    let store = Store::open(dir.path().join("store.json")).unwrap();
    let mut tracker = Tracker::new(store, Vec::new(), StdRng::seed_from_u64(21));
    tracker.run_resets(at(16, 8)).unwrap();
    tracker.set_username("Alex <Park Crew>").unwrap();
    tracker
        .log_contribution(
            ContributionDraft::new(ContributionKind::PlantCare, at(16, 9))
                .with_title("Watered saplings"),
            at(16, 9),
        )
        .unwrap();
    tracker
        .quick_log(ContributionKind::Kindness, None, at(16, 10))
        .unwrap();
    tracker
}

#[test]
fn context_summarizes_tracker() {
    let dir = TempDir::new().unwrap();
    let tracker = populated(&dir);
    let ctx = ReportContext::from_tracker(&tracker, at(16, 12));

    assert_eq!(ctx.total_contributions, 2);
    assert_eq!(ctx.streak, 1);
    assert_eq!(ctx.recent.len(), 2);
    assert_eq!(ctx.recent[0].title, "Kindness #1");
    assert_eq!(ctx.totals.len(), ContributionKind::ALL.len());
    assert_eq!(ctx.challenges.len(), 4);
    assert_eq!(ctx.daily_countdown, "12h 0min");
    assert!(ctx.contribution_milestones[0].unlocked);
}

#[test]
fn markdown_report_lists_contributions() {
    let dir = TempDir::new().unwrap();
    let tracker = populated(&dir);
    let ctx = ReportContext::from_tracker(&tracker, at(16, 12));

    let md = ReportFormat::Markdown.generator().render(&ctx).unwrap();
    assert!(md.starts_with("# CityAid Progress Report: Alex <Park Crew>"));
    assert!(md.contains("| Plant Care | 1 |"));
    assert!(md.contains("Watered saplings"));
    assert!(md.contains("A New Beginning"));
}

#[test]
fn html_report_escapes_user_text() {
    let dir = TempDir::new().unwrap();
    let tracker = populated(&dir);
    let ctx = ReportContext::from_tracker(&tracker, at(16, 12));

    let html = ReportFormat::Html.generator().render(&ctx).unwrap();
    assert!(html.contains("Alex &lt;Park Crew&gt;"));
    assert!(!html.contains("<Park Crew>"));
    assert!(html.contains("Watered saplings"));
}

#[test]
fn generate_writes_file_and_creates_directories() {
    let dir = TempDir::new().unwrap();
    let tracker = populated(&dir);
    let ctx = ReportContext::from_tracker(&tracker, at(16, 12));
    let output = dir.path().join("reports").join("progress.html");

    ReportFormat::Html.generator().generate(&ctx, &output).unwrap();
    let written = fs::read_to_string(&output).unwrap();
    assert!(written.starts_with("<!DOCTYPE html>"));
}
