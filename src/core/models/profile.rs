//! User profile: level, XP, streak and challenge bookkeeping

use crate::core::leveling::required_xp_for_level_up;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Name shown until the user picks one
pub const DEFAULT_USERNAME: &str = "Anonymous Contributor";

/// Bio shown until the user writes one
pub const DEFAULT_BIO: &str = "Aiming to make my city a better place, one contribution at a time.";

/// Persistent per-user progress
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    /// Display name
    pub username: String,
    /// Short description
    pub bio: String,
    /// Current level, starting at 1
    pub level: u32,
    /// XP earned toward the next level
    pub xp: u32,
    /// Consecutive days with at least one contribution
    pub streak: u32,
    /// Whether today's contribution has already extended the streak
    pub streak_completed_today: bool,
    /// Number of daily challenges completed
    pub daily_challenges_completed: u32,
    /// Number of weekly challenges completed
    pub weekly_challenges_completed: u32,
    /// Contribution-count milestones whose XP has been granted
    pub claimed_contribution_milestones: BTreeSet<u32>,
    /// Last time the daily challenge was regenerated
    pub last_daily_reset: Option<NaiveDateTime>,
    /// Last time the weekly challenges were regenerated
    pub last_weekly_reset: Option<NaiveDateTime>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            username: DEFAULT_USERNAME.to_string(),
            bio: DEFAULT_BIO.to_string(),
            level: 1,
            xp: 0,
            streak: 0,
            streak_completed_today: false,
            daily_challenges_completed: 0,
            weekly_challenges_completed: 0,
            claimed_contribution_milestones: BTreeSet::new(),
            last_daily_reset: None,
            last_weekly_reset: None,
        }
    }
}

impl Profile {
    /// Add XP and level up as many times as the total allows
    ///
    /// # Returns
    /// The number of levels gained
    pub fn award_xp(&mut self, amount: u32) -> u32 {
        self.xp = self.xp.saturating_add(amount);
        let mut gained = 0;
        loop {
            let needed = required_xp_for_level_up(self.level);
            if self.xp < needed {
                break;
            }
            self.xp -= needed;
            self.level += 1;
            gained += 1;
        }
        gained
    }

    /// XP still needed to reach the next level
    #[must_use]
    pub fn xp_to_next_level(&self) -> u32 {
        required_xp_for_level_up(self.level).saturating_sub(self.xp)
    }

    /// Count today's first contribution toward the streak
    ///
    /// # Returns
    /// `true` if the streak grew
    pub fn mark_streak_today(&mut self) -> bool {
        if self.streak_completed_today {
            return false;
        }
        self.streak_completed_today = true;
        self.streak += 1;
        true
    }

    /// Clear level, XP, streak and counters; keeps name, bio and reset timestamps
    pub fn reset_progress(&mut self) {
        *self = Self {
            username: std::mem::take(&mut self.username),
            bio: std::mem::take(&mut self.bio),
            last_daily_reset: self.last_daily_reset,
            last_weekly_reset: self.last_weekly_reset,
            ..Self::default()
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile() {
        let profile = Profile::default();
        assert_eq!(profile.level, 1);
        assert_eq!(profile.xp, 0);
        assert_eq!(profile.streak, 0);
        assert_eq!(profile.username, DEFAULT_USERNAME);
        assert_eq!(profile.xp_to_next_level(), 15);
    }

    #[test]
    fn test_award_xp_levels_up_with_carry() {
        let mut profile = Profile::default();
        assert_eq!(profile.award_xp(10), 0);
        assert_eq!(profile.award_xp(8), 1);
        assert_eq!(profile.level, 2);
        assert_eq!(profile.xp, 3);
    }

    #[test]
    fn test_award_xp_multiple_levels() {
        let mut profile = Profile::default();
        // 15 (level 1) + 15 (level 2) + 2 left over
        assert_eq!(profile.award_xp(32), 2);
        assert_eq!(profile.level, 3);
        assert_eq!(profile.xp, 2);
    }

    #[test]
    fn test_streak_counts_once_per_day() {
        let mut profile = Profile::default();
        assert!(profile.mark_streak_today());
        assert!(!profile.mark_streak_today());
        assert_eq!(profile.streak, 1);
    }

    #[test]
    fn test_reset_progress_keeps_identity() {
        let mut profile = Profile {
            username: "Sam".to_string(),
            level: 7,
            xp: 4,
            streak: 12,
            daily_challenges_completed: 3,
            ..Profile::default()
        };
        profile.claimed_contribution_milestones.insert(5);
        profile.reset_progress();

        assert_eq!(profile.username, "Sam");
        assert_eq!(profile.level, 1);
        assert_eq!(profile.streak, 0);
        assert_eq!(profile.daily_challenges_completed, 0);
        assert!(profile.claimed_contribution_milestones.is_empty());
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let profile: Profile = serde_json::from_str(r#"{"level": 4, "xp": 9}"#).unwrap();
        assert_eq!(profile.level, 4);
        assert_eq!(profile.bio, DEFAULT_BIO);
        assert!(profile.last_daily_reset.is_none());
    }
}
