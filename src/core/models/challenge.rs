//! Challenge model

use super::ContributionKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// How often a challenge is replaced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChallengeCadence {
    /// Replaced every midnight
    Daily,
    /// Replaced every Monday at midnight
    Weekly,
}

impl fmt::Display for ChallengeCadence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Daily => write!(f, "Daily"),
            Self::Weekly => write!(f, "Weekly"),
        }
    }
}

impl FromStr for ChallengeCadence {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "daily" | "day" => Ok(Self::Daily),
            "weekly" | "week" => Ok(Self::Weekly),
            _ => Err(format!("Unknown challenge cadence: {s}")),
        }
    }
}

/// A randomly generated goal: log `target` contributions (of `kind`, if set)
/// within the current day or week
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
    /// Unique identifier
    pub id: Uuid,
    /// Display title (e.g., "3 Kindness Contributions")
    pub title: String,
    /// Daily or weekly
    pub cadence: ChallengeCadence,
    /// Required category; `None` accepts any category
    pub kind: Option<ContributionKind>,
    /// Number of contributions needed
    pub target: u32,
    /// XP granted on completion
    pub xp: u32,
    /// Whether the XP has already been granted
    #[serde(default)]
    pub xp_rewarded: bool,
}

impl Challenge {
    /// Create a challenge, deriving its title from target and category
    #[must_use]
    pub fn new(
        cadence: ChallengeCadence,
        kind: Option<ContributionKind>,
        target: u32,
        xp: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: Self::title_for(kind, target),
            cadence,
            kind,
            target,
            xp,
            xp_rewarded: false,
        }
    }

    /// "1 Contribution", "3 Kindness Contributions", ...
    #[must_use]
    pub fn title_for(kind: Option<ContributionKind>, target: u32) -> String {
        let noun = if target == 1 {
            "Contribution"
        } else {
            "Contributions"
        };
        match kind {
            Some(kind) => format!("{target} {kind} {noun}"),
            None => format!("{target} {noun}"),
        }
    }

    /// Whether a contribution of `kind` counts toward this challenge
    #[must_use]
    pub fn accepts(&self, kind: ContributionKind) -> bool {
        self.kind.map_or(true, |wanted| wanted == kind)
    }
}
