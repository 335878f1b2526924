//! Daily and weekly challenges: generation, progress and reset timing

pub mod generator;
pub mod progress;
pub mod schedule;

use crate::core::models::Challenge;
use serde::{Deserialize, Serialize};

pub use generator::{create_challenge, daily_challenge, weekly_challenges, WEEKLY_CHALLENGE_COUNT};
pub use progress::{challenge_progress, count_in_window, ChallengeProgress, DateWindow};
pub use schedule::{
    daily_reset_due, format_countdown, next_daily_reset, next_weekly_reset, streak_survives,
    weekly_reset_due,
};

/// The challenges currently active
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChallengeSet {
    /// Today's challenge; `None` until the first daily reset
    pub daily: Option<Challenge>,
    /// This week's challenges
    pub weekly: Vec<Challenge>,
}

impl ChallengeSet {
    /// All active challenges, daily first
    pub fn iter(&self) -> impl Iterator<Item = &Challenge> {
        self.daily.iter().chain(self.weekly.iter())
    }

    /// Mutable access to all active challenges, daily first
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Challenge> {
        self.daily.iter_mut().chain(self.weekly.iter_mut())
    }
}
