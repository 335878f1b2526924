//! Contribution log commands: log, quick, list, show, edit, delete

use super::{confirm, CommandResult};
use chrono::NaiveDateTime;
use cityaid::core::models::{Contribution, ContributionDraft, ContributionEdit, ContributionKind};
use cityaid::core::tracker::{LogOutcome, Rewards, Tracker};
use logger::verbose;
use rand::Rng;
use std::path::PathBuf;

/// Fields for a new contribution, as given on the command line
pub struct LogArgs {
    /// Category
    pub kind: ContributionKind,
    /// Title
    pub title: Option<String>,
    /// Date; `None` means now
    pub date: Option<NaiveDateTime>,
    /// Notes
    pub notes: Option<String>,
    /// Media paths
    pub media: Vec<PathBuf>,
}

/// Fields to change on an existing contribution
pub struct EditArgs {
    /// New title
    pub title: Option<String>,
    /// New category
    pub kind: Option<ContributionKind>,
    /// New date
    pub date: Option<NaiveDateTime>,
    /// New notes
    pub notes: Option<String>,
    /// Replacement media
    pub media: Vec<PathBuf>,
    /// Drop all media
    pub clear_media: bool,
}

fn media_strings(media: Vec<PathBuf>) -> Vec<String> {
    media
        .into_iter()
        .map(|p| p.to_string_lossy().to_string())
        .collect()
}

/// Log a contribution
pub fn log<R: Rng>(tracker: &mut Tracker<R>, args: LogArgs, now: NaiveDateTime) -> CommandResult {
    let mut draft = ContributionDraft::new(args.kind, args.date.unwrap_or(now))
        .with_media(media_strings(args.media));
    if let Some(title) = args.title {
        draft = draft.with_title(title);
    }
    if let Some(notes) = args.notes {
        draft = draft.with_notes(notes);
    }

    let outcome = tracker.log_contribution(draft, now)?;
    print_outcome(tracker, &outcome);
    Ok(())
}

/// Quick-log a contribution dated now
pub fn quick<R: Rng>(
    tracker: &mut Tracker<R>,
    kind: ContributionKind,
    title: Option<&str>,
    now: NaiveDateTime,
) -> CommandResult {
    let outcome = tracker.quick_log(kind, title, now)?;
    print_outcome(tracker, &outcome);
    Ok(())
}

/// List contributions newest first
pub fn list<R: Rng>(
    tracker: &Tracker<R>,
    kind: Option<ContributionKind>,
    limit: Option<usize>,
) -> CommandResult {
    let entries = tracker.store().recent(kind, limit);
    if entries.is_empty() {
        println!("No contributions logged yet.");
        return Ok(());
    }

    println!(
        "{:<8}  {:<16}  {:<12}  {:>3}  TITLE",
        "ID", "DATE", "CATEGORY", "XP"
    );
    for c in &entries {
        println!(
            "{:<8}  {:<16}  {:<12}  {:>3}  {}",
            c.short_id(),
            c.date.format("%Y-%m-%d %H:%M"),
            c.kind.display_name(),
            c.xp,
            c.title
        );
    }
    verbose!(
        "Listed {} of {} contributions",
        entries.len(),
        tracker.store().contribution_count()
    );
    Ok(())
}

/// Show one contribution in full
pub fn show<R: Rng>(tracker: &Tracker<R>, id: &str) -> CommandResult {
    let contribution = tracker.store().find(id)?;
    print_contribution(contribution);
    Ok(())
}

/// Edit a contribution
pub fn edit<R: Rng>(
    tracker: &mut Tracker<R>,
    id: &str,
    args: EditArgs,
    now: NaiveDateTime,
) -> CommandResult {
    let media = if args.clear_media {
        Some(Vec::new())
    } else if args.media.is_empty() {
        None
    } else {
        Some(media_strings(args.media))
    };
    let edit = ContributionEdit {
        title: args.title,
        kind: args.kind,
        date: args.date,
        notes: args.notes,
        media,
    };

    let (contribution, rewards) = tracker.edit_contribution(id, edit, now)?;
    println!("✓ Updated contribution {}", contribution.short_id());
    print_contribution(&contribution);
    print_rewards(&rewards);
    Ok(())
}

/// Delete a contribution after confirmation
pub fn delete<R: Rng>(tracker: &mut Tracker<R>, id: &str, yes: bool) -> CommandResult {
    let target = tracker.store().find(id)?;
    let prompt = format!("Delete '{}' ({})?", target.title, target.short_id());
    if !yes && !confirm(&prompt) {
        println!("✗ Delete cancelled");
        return Ok(());
    }

    let removed = tracker.delete_contribution(id)?;
    println!("✓ Deleted '{}'", removed.title);
    Ok(())
}

fn print_contribution(c: &Contribution) {
    println!("\n=== {} ===\n", c.title);
    println!("Id:       {}", c.id);
    println!("Category: {}", c.kind);
    println!("Date:     {}", c.date.format("%Y-%m-%d %H:%M"));
    println!("XP:       {}", c.xp);
    println!("Notes:    {}", c.notes);
    if c.media.is_empty() {
        println!("Media:    none");
    } else {
        println!("Media:");
        for path in &c.media {
            println!("  - {path}");
        }
    }
}

fn print_outcome<R: Rng>(tracker: &Tracker<R>, outcome: &LogOutcome) {
    let c = &outcome.contribution;
    let profile = tracker.profile();
    println!("✓ Logged '{}' ({}) +{} XP", c.title, c.kind, c.xp);
    verbose!("Contribution id: {}", c.id);

    if outcome.streak_extended {
        println!("🔥 Streak: {} day(s)", profile.streak);
    }
    if outcome.levels_gained > 0 {
        println!("⬆ Level up! You are now level {}", profile.level);
    }
    print_rewards(&outcome.rewards);
    println!(
        "Level {} · {} XP to next level",
        profile.level,
        profile.xp_to_next_level()
    );
}

/// Print challenge completions and milestones from a reward pass
pub fn print_rewards(rewards: &Rewards) {
    for challenge in &rewards.challenges {
        println!(
            "★ {} challenge completed: {} (+{} XP)",
            challenge.cadence, challenge.title, challenge.xp
        );
    }
    for milestone in &rewards.milestones {
        println!(
            "🏅 Milestone reached: {} (+{} XP)",
            milestone.title, milestone.xp
        );
    }
    if rewards.levels_gained > 0 {
        println!("⬆ Rewards earned {} level(s)", rewards.levels_gained);
    }
}
