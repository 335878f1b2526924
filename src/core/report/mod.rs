//! Progress report generation
//!
//! A report summarizes the profile, active challenges, milestones and the
//! contribution log. It can be rendered as Markdown or as a self-contained
//! HTML page.

pub mod formats;

use crate::core::leveling::level_progress;
use crate::core::models::milestone::{next_contribution_milestone, next_level_milestone};
use crate::core::models::ContributionKind;
use crate::core::tracker::{ChallengeStatus, Tracker};
use chrono::NaiveDateTime;
use rand::Rng;
use std::error::Error;
use std::path::Path;

pub use formats::{HtmlReporter, MarkdownReporter, ReportFormat};

/// Number of contributions listed in the "recent" section
pub const RECENT_LIMIT: usize = 10;

/// One challenge line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengeRow {
    /// "Daily" or "Weekly"
    pub cadence: String,
    /// Challenge title
    pub title: String,
    /// "count/target"
    pub progress: String,
    /// XP reward
    pub xp: u32,
    /// Whether the goal is met
    pub completed: bool,
}

impl From<&ChallengeStatus> for ChallengeRow {
    fn from(status: &ChallengeStatus) -> Self {
        Self {
            cadence: status.challenge.cadence.to_string(),
            title: status.challenge.title.clone(),
            progress: format!(
                "{}/{}",
                status.progress.shown_count(),
                status.progress.target
            ),
            xp: status.challenge.xp,
            completed: status.progress.completed,
        }
    }
}

/// One milestone line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MilestoneRow {
    /// Milestone title
    pub title: String,
    /// What unlocks it
    pub description: String,
    /// Whether it is unlocked
    pub unlocked: bool,
}

/// Contributions per category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TotalRow {
    /// Category display name
    pub category: String,
    /// Contributions logged in it
    pub count: usize,
}

/// One recent contribution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentRow {
    /// "YYYY-MM-DD HH:MM"
    pub date: String,
    /// Title
    pub title: String,
    /// Category display name
    pub category: String,
    /// XP earned
    pub xp: u32,
}

/// Data context for report generation
///
/// Everything is precomputed so templates only iterate and print.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportContext {
    /// "YYYY-MM-DD HH:MM" of generation
    pub generated_at: String,
    /// Display name
    pub username: String,
    /// Bio
    pub bio: String,
    /// Current level
    pub level: u32,
    /// XP toward the next level
    pub xp: u32,
    /// XP still missing for the next level
    pub xp_to_next: u32,
    /// Level progress as a whole percentage
    pub level_percent: u32,
    /// Current streak in days
    pub streak: u32,
    /// Completed daily challenges
    pub daily_completed: u32,
    /// Completed weekly challenges
    pub weekly_completed: u32,
    /// Contributions logged
    pub total_contributions: usize,
    /// Active challenges, daily first
    pub challenges: Vec<ChallengeRow>,
    /// Countdown to the daily reset
    pub daily_countdown: String,
    /// Countdown to the weekly reset
    pub weekly_countdown: String,
    /// Next locked level milestone, described
    pub next_level_milestone: Option<String>,
    /// Next unreached contribution milestone, described
    pub next_contribution_milestone: Option<String>,
    /// Level milestones
    pub level_milestones: Vec<MilestoneRow>,
    /// Contribution milestones
    pub contribution_milestones: Vec<MilestoneRow>,
    /// Per-category totals, every category listed
    pub totals: Vec<TotalRow>,
    /// Newest contributions
    pub recent: Vec<RecentRow>,
}

impl ReportContext {
    /// Snapshot the tracker's state at `now`
    #[must_use]
    pub fn from_tracker<R: Rng>(tracker: &Tracker<R>, now: NaiveDateTime) -> Self {
        let profile = tracker.profile();
        let store = tracker.store();
        let board = tracker.challenge_board(now);
        let milestones = tracker.milestone_board();
        let totals = store.totals_by_kind();

        let challenges = board
            .daily
            .iter()
            .chain(board.weekly.iter())
            .map(ChallengeRow::from)
            .collect();

        let level_milestones = milestones
            .level
            .iter()
            .map(|s| MilestoneRow {
                title: s.milestone.title.to_string(),
                description: s.milestone.description(),
                unlocked: s.unlocked,
            })
            .collect();
        let contribution_milestones = milestones
            .contributions
            .iter()
            .map(|s| MilestoneRow {
                title: s.milestone.title.to_string(),
                description: s.milestone.description(),
                unlocked: s.unlocked,
            })
            .collect();

        let recent = store
            .recent(None, Some(RECENT_LIMIT))
            .into_iter()
            .map(|c| RecentRow {
                date: c.date.format("%Y-%m-%d %H:%M").to_string(),
                title: c.title.clone(),
                category: c.kind.display_name().to_string(),
                xp: c.xp,
            })
            .collect();

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let level_percent = (level_progress(profile.level, profile.xp) * 100.0).round() as u32;

        Self {
            generated_at: now.format("%Y-%m-%d %H:%M").to_string(),
            username: profile.username.clone(),
            bio: profile.bio.clone(),
            level: profile.level,
            xp: profile.xp,
            xp_to_next: profile.xp_to_next_level(),
            level_percent,
            streak: profile.streak,
            daily_completed: profile.daily_challenges_completed,
            weekly_completed: profile.weekly_challenges_completed,
            total_contributions: milestones.total_contributions,
            challenges,
            daily_countdown: board.daily_countdown,
            weekly_countdown: board.weekly_countdown,
            next_level_milestone: next_level_milestone(profile.level)
                .map(|m| format!("{}: {}", m.title, m.description())),
            next_contribution_milestone: next_contribution_milestone(milestones.total_contributions)
                .map(|m| format!("{}: {}", m.title, m.description())),
            level_milestones,
            contribution_milestones,
            totals: ContributionKind::ALL
                .iter()
                .map(|kind| TotalRow {
                    category: kind.display_name().to_string(),
                    count: totals.get(kind).copied().unwrap_or(0),
                })
                .collect(),
            recent,
        }
    }
}

/// Trait for report generators
pub trait ReportGenerator {
    /// Generate a report to a file
    ///
    /// # Errors
    /// Returns an error if report generation or file writing fails
    fn generate(&self, ctx: &ReportContext, output_path: &Path) -> Result<(), Box<dyn Error>> {
        let content = self.render(ctx)?;
        if let Some(parent) = output_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(output_path, content)?;
        Ok(())
    }

    /// Generate report content as a string
    ///
    /// # Errors
    /// Returns an error if report generation fails
    fn render(&self, ctx: &ReportContext) -> Result<String, Box<dyn Error>>;
}
