//! Fixed milestone catalogs

use serde::Serialize;

/// Badge unlocked by reaching a level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LevelMilestone {
    /// Level required
    pub level: u32,
    /// Milestone title
    pub title: &'static str,
    /// Badge asset name
    pub badge: &'static str,
}

/// Badge and one-off XP unlocked by a total contribution count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ContributionMilestone {
    /// Contributions required
    pub amount: u32,
    /// Milestone title
    pub title: &'static str,
    /// XP granted once when reached
    pub xp: u32,
}

impl LevelMilestone {
    /// "Reach level N"
    #[must_use]
    pub fn description(&self) -> String {
        format!("Reach level {}", self.level)
    }

    /// Whether a user at `level` has unlocked this milestone
    #[must_use]
    pub const fn is_unlocked(&self, level: u32) -> bool {
        level >= self.level
    }
}

impl ContributionMilestone {
    /// "Log your first contribution" / "Log N contributions"
    #[must_use]
    pub fn description(&self) -> String {
        if self.amount == 1 {
            "Log your first contribution".to_string()
        } else {
            format!("Log {} contributions", self.amount)
        }
    }

    /// Whether `total` contributions reach this milestone
    #[must_use]
    pub const fn is_reached(&self, total: usize) -> bool {
        total >= self.amount as usize
    }
}

/// Level milestones in ascending order
pub const LEVEL_MILESTONES: [LevelMilestone; 9] = [
    LevelMilestone { level: 2, title: "Baby Contributor", badge: "Bronze1Badge" },
    LevelMilestone { level: 5, title: "Rookie Contributor", badge: "Bronze2Badge" },
    LevelMilestone { level: 10, title: "Rising Contributor", badge: "Silver1Badge" },
    LevelMilestone { level: 15, title: "Solid Contributor", badge: "Silver2Badge" },
    LevelMilestone { level: 20, title: "Dedicated Contributor", badge: "Gold1Badge" },
    LevelMilestone { level: 30, title: "Contributor Connoisseur", badge: "Gold2Badge" },
    LevelMilestone { level: 50, title: "Legendary Contributor", badge: "Champion1Badge" },
    LevelMilestone { level: 75, title: "Elite Contributor", badge: "Champion2Badge" },
    LevelMilestone { level: 100, title: "Ultimate Contributor", badge: "SuperiorBadge" },
];

/// Contribution-count milestones in ascending order
pub const CONTRIBUTION_MILESTONES: [ContributionMilestone; 9] = [
    ContributionMilestone { amount: 1, title: "A New Beginning", xp: 2 },
    ContributionMilestone { amount: 5, title: "Handy Helper", xp: 5 },
    ContributionMilestone { amount: 10, title: "Community Cleaner", xp: 5 },
    ContributionMilestone { amount: 25, title: "Litter-picking Lion", xp: 5 },
    ContributionMilestone { amount: 50, title: "Garden Guardian", xp: 10 },
    ContributionMilestone { amount: 75, title: "Citywide Custodian", xp: 10 },
    ContributionMilestone { amount: 100, title: "Local Legend", xp: 10 },
    ContributionMilestone { amount: 150, title: "Urban Uplifter", xp: 15 },
    ContributionMilestone { amount: 200, title: "City Saviour", xp: 15 },
];

/// Next level milestone not yet unlocked at `level`
#[must_use]
pub fn next_level_milestone(level: u32) -> Option<&'static LevelMilestone> {
    LEVEL_MILESTONES.iter().find(|m| !m.is_unlocked(level))
}

/// Next contribution milestone not yet reached with `total` contributions
#[must_use]
pub fn next_contribution_milestone(total: usize) -> Option<&'static ContributionMilestone> {
    CONTRIBUTION_MILESTONES.iter().find(|m| !m.is_reached(total))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalogs_are_ascending() {
        assert!(LEVEL_MILESTONES.windows(2).all(|w| w[0].level < w[1].level));
        assert!(CONTRIBUTION_MILESTONES
            .windows(2)
            .all(|w| w[0].amount < w[1].amount));
    }

    #[test]
    fn test_descriptions() {
        assert_eq!(LEVEL_MILESTONES[2].description(), "Reach level 10");
        assert_eq!(
            CONTRIBUTION_MILESTONES[0].description(),
            "Log your first contribution"
        );
        assert_eq!(CONTRIBUTION_MILESTONES[3].description(), "Log 25 contributions");
    }

    #[test]
    fn test_next_milestones() {
        assert_eq!(next_level_milestone(1).map(|m| m.level), Some(2));
        assert_eq!(next_level_milestone(12).map(|m| m.level), Some(15));
        assert!(next_level_milestone(100).is_none());

        assert_eq!(next_contribution_milestone(0).map(|m| m.amount), Some(1));
        assert_eq!(next_contribution_milestone(5).map(|m| m.amount), Some(10));
        assert!(next_contribution_milestone(250).is_none());
    }
}
