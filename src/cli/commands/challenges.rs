//! Challenge and milestone commands

use super::contributions::print_rewards;
use super::CommandResult;
use crate::args::{ChallengesSubcommand, RerollScope};
use chrono::NaiveDateTime;
use cityaid::core::challenges::ChallengeProgress;
use cityaid::core::models::Challenge;
use cityaid::core::tracker::{ChallengeStatus, Tracker, TrackerError};
use logger::verbose;
use rand::Rng;

/// Dispatch challenge subcommands
pub fn run<R: Rng>(
    tracker: &mut Tracker<R>,
    subcommand: Option<ChallengesSubcommand>,
    now: NaiveDateTime,
) -> CommandResult {
    match subcommand {
        None => show_board(tracker, now),
        Some(ChallengesSubcommand::Reroll { scope }) => reroll(tracker, scope, now),
    }
}

fn status_line(challenge: &Challenge, progress: &ChallengeProgress) -> String {
    let mark = if progress.completed { "✓" } else { "·" };
    let reward = if challenge.xp_rewarded { ", rewarded" } else { "" };
    format!(
        "  {mark} {:<32} {}/{}  ({} XP{reward})",
        challenge.title,
        progress.shown_count(),
        progress.target,
        challenge.xp
    )
}

fn print_status(status: &ChallengeStatus) {
    println!("{}", status_line(&status.challenge, &status.progress));
}

/// Show active challenges with progress and reset countdowns
pub fn show_board<R: Rng>(tracker: &Tracker<R>, now: NaiveDateTime) -> CommandResult {
    let board = tracker.challenge_board(now);

    println!("\n=== Daily Challenge ===  (new in {})\n", board.daily_countdown);
    match &board.daily {
        Some(status) => print_status(status),
        None => println!("  No daily challenge yet"),
    }

    println!("\n=== Weekly Challenges ===  (new in {})\n", board.weekly_countdown);
    if board.weekly.is_empty() {
        println!("  No weekly challenges yet");
    }
    for status in &board.weekly {
        print_status(status);
    }
    verbose!(
        "\nNext daily reset {}, next weekly reset {}",
        board.next_daily_reset.format("%Y-%m-%d %H:%M"),
        board.next_weekly_reset.format("%Y-%m-%d %H:%M")
    );
    Ok(())
}

fn reroll<R: Rng>(
    tracker: &mut Tracker<R>,
    scope: RerollScope,
    now: NaiveDateTime,
) -> CommandResult {
    let rewards = match scope {
        RerollScope::Daily => {
            let reroll = tracker.reroll_daily(now)?;
            if let Some(challenge) = &reroll.daily {
                println!("✓ New daily challenge: {}", challenge.title);
            }
            reroll.rewards
        }
        RerollScope::Weekly => {
            let reroll = tracker.reroll_weekly(now)?;
            println!("✓ Weekly challenges rerolled");
            reroll.rewards
        }
        RerollScope::All => {
            let reroll = tracker.reroll_all(now)?;
            if reroll.daily.is_none() {
                eprintln!("✗ {}", TrackerError::DailyAlreadyCompleted);
            }
            if reroll.weekly.is_none() {
                eprintln!("✗ {}", TrackerError::WeeklyAlreadyCompleted);
            }
            if reroll.daily.is_some() || reroll.weekly.is_some() {
                println!("✓ Challenges rerolled");
            }
            reroll.rewards
        }
    };
    print_rewards(&rewards);
    show_board(tracker, now)
}

/// Show level and contribution milestones
pub fn show_milestones<R: Rng>(tracker: &Tracker<R>) -> CommandResult {
    let board = tracker.milestone_board();
    let mark = |unlocked: bool| if unlocked { "✓" } else { "·" };

    println!("\n=== Level Milestones ===  (level {})\n", board.current_level);
    for status in &board.level {
        println!(
            "  {} {:<24} {}",
            mark(status.unlocked),
            status.milestone.title,
            status.milestone.description()
        );
    }

    println!(
        "\n=== Contribution Milestones ===  ({} logged)\n",
        board.total_contributions
    );
    for status in &board.contributions {
        println!(
            "  {} {:<24} {:<28} +{} XP",
            mark(status.unlocked),
            status.milestone.title,
            status.milestone.description(),
            status.milestone.xp
        );
    }
    Ok(())
}
