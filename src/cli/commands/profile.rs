//! Profile commands

use super::{confirm, CommandResult};
use crate::args::ProfileSubcommand;
use cityaid::core::leveling::{level_progress, required_xp_for_level_up};
use cityaid::core::models::milestone::next_level_milestone;
use cityaid::core::tracker::Tracker;
use rand::Rng;

/// Width of the level progress bar in characters
const BAR_WIDTH: usize = 20;

/// Dispatch profile subcommands
pub fn run<R: Rng>(
    tracker: &mut Tracker<R>,
    subcommand: Option<ProfileSubcommand>,
) -> CommandResult {
    match subcommand {
        None => show(tracker),
        Some(ProfileSubcommand::SetName { name }) => {
            tracker.set_username(&name)?;
            println!("✓ Name set to '{}'", tracker.profile().username);
            Ok(())
        }
        Some(ProfileSubcommand::SetBio { bio }) => {
            tracker.set_bio(&bio)?;
            println!("✓ Bio updated");
            Ok(())
        }
        Some(ProfileSubcommand::Reset { yes }) => {
            if !yes && !confirm("Reset level, XP, streak and challenge counters?") {
                println!("✗ Reset cancelled");
                return Ok(());
            }
            tracker.reset_profile()?;
            println!("✓ Profile progress reset; contributions were kept");
            Ok(())
        }
    }
}

fn progress_bar(fraction: f64) -> String {
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let filled = ((fraction * BAR_WIDTH as f64).round() as usize).min(BAR_WIDTH);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

/// Show the profile summary
pub fn show<R: Rng>(tracker: &Tracker<R>) -> CommandResult {
    let profile = tracker.profile();
    let total = tracker.store().contribution_count();

    println!("\n=== {} ===\n", profile.username);
    println!("{}\n", profile.bio);
    println!(
        "Level {}  {} {}/{} XP",
        profile.level,
        progress_bar(level_progress(profile.level, profile.xp)),
        profile.xp,
        required_xp_for_level_up(profile.level)
    );
    println!("Streak:             {} day(s)", profile.streak);
    println!("Contributions:      {total}");
    println!("Daily challenges:   {}", profile.daily_challenges_completed);
    println!("Weekly challenges:  {}", profile.weekly_challenges_completed);
    if let Some(next) = next_level_milestone(profile.level) {
        println!("Next badge:         {} ({})", next.title, next.description());
    }

    let totals = tracker.store().totals_by_kind();
    if !totals.is_empty() {
        println!("\nBy category:");
        for (kind, count) in &totals {
            println!("  {:<12} {count}", kind.display_name());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_bar() {
        assert_eq!(progress_bar(0.0), format!("[{}]", "-".repeat(BAR_WIDTH)));
        assert_eq!(progress_bar(1.0), format!("[{}]", "#".repeat(BAR_WIDTH)));
        assert_eq!(progress_bar(0.5).matches('#').count(), BAR_WIDTH / 2);
    }
}
