//! Data models for `CityAid`

pub mod challenge;
pub mod contribution;
pub mod milestone;
pub mod profile;

pub use challenge::{Challenge, ChallengeCadence};
pub use contribution::{Contribution, ContributionDraft, ContributionEdit, ContributionKind};
pub use milestone::{
    ContributionMilestone, LevelMilestone, CONTRIBUTION_MILESTONES, LEVEL_MILESTONES,
};
pub use profile::Profile;
