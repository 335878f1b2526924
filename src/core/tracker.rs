//! Tracker service: every user-facing operation on the store goes through here
//!
//! The tracker owns the [`Store`], the user's selected challenge categories and
//! a random number generator. Operations that change state save the store
//! before returning.

use crate::core::challenges::{
    challenge_progress, daily_challenge, daily_reset_due, format_countdown, next_daily_reset,
    next_weekly_reset, streak_survives, weekly_challenges, weekly_reset_due, ChallengeProgress,
    DateWindow, WEEKLY_CHALLENGE_COUNT,
};
use crate::core::models::{
    profile, Challenge, ChallengeCadence, Contribution, ContributionDraft, ContributionEdit,
    ContributionKind, ContributionMilestone, LevelMilestone, Profile, CONTRIBUTION_MILESTONES,
    LEVEL_MILESTONES,
};
use crate::core::store::{Store, StoreError};
use chrono::NaiveDateTime;
use logger::{debug, info};
use rand::Rng;
use serde::Serialize;
use thiserror::Error;

/// Smallest XP a logged contribution earns
const CONTRIBUTION_XP_MIN: u32 = 4;

/// Largest XP a logged contribution earns
const CONTRIBUTION_XP_MAX: u32 = 8;

/// Notes attached to quick-logged contributions
pub const QUICK_LOG_NOTES: &str = "Added via Quick Log";

/// Errors raised by [`Tracker`]
#[derive(Debug, Error)]
pub enum TrackerError {
    /// The store failed
    #[error(transparent)]
    Store(#[from] StoreError),

    /// An edit with no fields set
    #[error("Nothing to change: give at least one field to edit")]
    EmptyEdit,

    /// The daily challenge was already completed and rewarded
    #[error("Today's challenge is already completed; a new one arrives at midnight")]
    DailyAlreadyCompleted,

    /// Every weekly challenge was already completed and rewarded
    #[error("All weekly challenges are already completed; new ones arrive on Monday")]
    WeeklyAlreadyCompleted,
}

/// What a reset pass changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResetReport {
    /// A new daily challenge was generated
    pub daily: bool,
    /// New weekly challenges were generated
    pub weekly: bool,
    /// The streak that was lost, if one was
    pub streak_lost: Option<u32>,
    /// Rewards for outgoing challenges completed in their own period
    pub rewards: Rewards,
}

/// XP and unlocks granted by completed challenges and milestones
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rewards {
    /// Challenges completed in this pass
    pub challenges: Vec<Challenge>,
    /// Contribution milestones reached in this pass
    pub milestones: Vec<ContributionMilestone>,
    /// Total XP granted
    pub xp: u32,
    /// Levels gained from that XP
    pub levels_gained: u32,
}

impl Rewards {
    /// True when nothing was granted
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.challenges.is_empty() && self.milestones.is_empty()
    }

    fn absorb(&mut self, other: Self) {
        self.challenges.extend(other.challenges);
        self.milestones.extend(other.milestones);
        self.xp += other.xp;
        self.levels_gained += other.levels_gained;
    }
}

/// Result of logging a contribution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogOutcome {
    /// The stored contribution
    pub contribution: Contribution,
    /// Whether today's streak was extended by it
    pub streak_extended: bool,
    /// Levels gained from the contribution's own XP
    pub levels_gained: u32,
    /// Challenge and milestone rewards it triggered
    pub rewards: Rewards,
}

/// A challenge with its current progress
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChallengeStatus {
    /// The challenge
    pub challenge: Challenge,
    /// Progress in the current day or week
    pub progress: ChallengeProgress,
}

/// Snapshot of all active challenges
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengeBoard {
    /// Today's challenge
    pub daily: Option<ChallengeStatus>,
    /// This week's challenges
    pub weekly: Vec<ChallengeStatus>,
    /// When the daily challenge is replaced
    pub next_daily_reset: NaiveDateTime,
    /// When the weekly challenges are replaced
    pub next_weekly_reset: NaiveDateTime,
    /// Countdown text to the daily reset
    pub daily_countdown: String,
    /// Countdown text to the weekly reset
    pub weekly_countdown: String,
}

/// A milestone and whether it is unlocked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MilestoneStatus<M> {
    /// The milestone
    pub milestone: M,
    /// Whether the user has reached it
    pub unlocked: bool,
}

/// Snapshot of every milestone
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MilestoneBoard {
    /// Level milestones in ascending order
    pub level: Vec<MilestoneStatus<LevelMilestone>>,
    /// Contribution milestones in ascending order
    pub contributions: Vec<MilestoneStatus<ContributionMilestone>>,
    /// Contributions logged so far
    pub total_contributions: usize,
    /// Current level
    pub current_level: u32,
}

/// Challenges replaced by a reroll
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reroll {
    /// New daily challenge, if it was replaced
    pub daily: Option<Challenge>,
    /// New weekly slate, if it was replaced
    pub weekly: Option<Vec<Challenge>>,
    /// Rewards for challenges already met by earlier contributions
    pub rewards: Rewards,
}

/// The habit-tracking engine
#[derive(Debug)]
pub struct Tracker<R: Rng> {
    store: Store,
    selected: Vec<ContributionKind>,
    rng: R,
}

impl<R: Rng> Tracker<R> {
    /// Create a tracker over `store`
    ///
    /// # Arguments
    /// * `store` - Opened store
    /// * `selected` - Categories challenges are drawn from (empty for all)
    /// * `rng` - Random source for XP rolls and challenge generation
    pub const fn new(store: Store, selected: Vec<ContributionKind>, rng: R) -> Self {
        Self {
            store,
            selected,
            rng,
        }
    }

    /// The underlying store
    #[must_use]
    pub const fn store(&self) -> &Store {
        &self.store
    }

    /// The user's profile
    #[must_use]
    pub const fn profile(&self) -> &Profile {
        self.store.profile()
    }

    /// Categories challenges are drawn from
    #[must_use]
    pub fn selected_kinds(&self) -> &[ContributionKind] {
        &self.selected
    }

    /// Regenerate challenges and settle the streak at day and week boundaries
    ///
    /// Before a challenge is replaced, it gets one last chance to be rewarded
    /// against the period it belonged to.
    ///
    /// # Errors
    /// Returns an error if the store cannot be saved
    pub fn run_resets(&mut self, now: NaiveDateTime) -> Result<ResetReport, TrackerError> {
        let mut report = ResetReport::default();
        let mut rewards = Rewards::default();

        let last_weekly = self.store.profile().last_weekly_reset;
        if weekly_reset_due(last_weekly, now) {
            if let Some(last) = last_weekly {
                self.claim_challenges(last, Some(ChallengeCadence::Weekly), &mut rewards);
            }
            let slate = weekly_challenges(&mut self.rng, &self.selected, Vec::new());
            self.store.challenges_mut().weekly = slate;
            self.store.profile_mut().last_weekly_reset = Some(now);
            report.weekly = true;
        }

        let last_daily = self.store.profile().last_daily_reset;
        if daily_reset_due(last_daily, now) {
            if let Some(last) = last_daily {
                self.claim_challenges(last, Some(ChallengeCadence::Daily), &mut rewards);
            }
            let daily = daily_challenge(&mut self.rng, &self.selected);
            self.store.challenges_mut().daily = Some(daily);

            let profile = self.store.profile_mut();
            if !streak_survives(last_daily, profile.streak_completed_today, now) {
                if profile.streak > 0 {
                    report.streak_lost = Some(profile.streak);
                }
                profile.streak = 0;
            }
            profile.streak_completed_today = false;
            profile.last_daily_reset = Some(now);
            report.daily = true;
        }

        if report.daily || report.weekly {
            self.store.save()?;
            info!(
                "Challenge reset (daily={}, weekly={}, late rewards={} XP)",
                report.daily, report.weekly, rewards.xp
            );
        }
        report.rewards = rewards;
        Ok(report)
    }

    /// Log a contribution
    ///
    /// Awards 4-8 XP, extends the streak when the contribution is dated today,
    /// then grants any challenge or milestone rewards it completes.
    ///
    /// # Errors
    /// Returns an error if the store cannot be saved
    pub fn log_contribution(
        &mut self,
        draft: ContributionDraft,
        now: NaiveDateTime,
    ) -> Result<LogOutcome, TrackerError> {
        let xp = self.rng.gen_range(CONTRIBUTION_XP_MIN..=CONTRIBUTION_XP_MAX);
        let contribution = Contribution::from_draft(draft, xp);
        let dated_today = DateWindow::day(now).contains(contribution.date);

        let profile = self.store.profile_mut();
        let levels_gained = profile.award_xp(xp);
        let streak_extended = dated_today && profile.mark_streak_today();

        self.store.add_contribution(contribution.clone());

        let mut rewards = Rewards::default();
        self.claim_challenges(now, None, &mut rewards);
        self.claim_milestones(&mut rewards);
        self.store.save()?;

        info!(
            "Logged '{}' ({}, +{xp} XP, streak {})",
            contribution.title,
            contribution.kind,
            self.store.profile().streak
        );
        Ok(LogOutcome {
            contribution,
            streak_extended,
            levels_gained,
            rewards,
        })
    }

    /// Log a contribution titled "{title} #{n}" dated `now`
    ///
    /// `title` defaults to the category name; `n` counts quick logs per title.
    ///
    /// # Errors
    /// Returns an error if the store cannot be saved
    pub fn quick_log(
        &mut self,
        kind: ContributionKind,
        title: Option<&str>,
        now: NaiveDateTime,
    ) -> Result<LogOutcome, TrackerError> {
        let base = title
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map_or_else(|| kind.display_name().to_string(), str::to_string);
        let number = self.store.next_quick_log_number(&base);
        let draft = ContributionDraft::new(kind, now)
            .with_title(format!("{base} #{number}"))
            .with_notes(QUICK_LOG_NOTES);
        self.log_contribution(draft, now)
    }

    /// Edit a contribution by id or unique id prefix
    ///
    /// Rewards already granted stay granted; new completions are rewarded.
    ///
    /// # Errors
    /// Returns an error if the edit is empty, the id does not match exactly
    /// one contribution, or the store cannot be saved
    pub fn edit_contribution(
        &mut self,
        id_or_prefix: &str,
        edit: ContributionEdit,
        now: NaiveDateTime,
    ) -> Result<(Contribution, Rewards), TrackerError> {
        if edit.is_empty() {
            return Err(TrackerError::EmptyEdit);
        }
        let edited = self.store.edit(id_or_prefix, edit)?.clone();

        let mut rewards = Rewards::default();
        self.claim_challenges(now, None, &mut rewards);
        self.store.save()?;

        info!("Edited contribution {}", edited.id);
        Ok((edited, rewards))
    }

    /// Delete a contribution by id or unique id prefix
    ///
    /// XP, streak and rewards earned through it are kept.
    ///
    /// # Errors
    /// Returns an error if the id does not match exactly one contribution or
    /// the store cannot be saved
    pub fn delete_contribution(
        &mut self,
        id_or_prefix: &str,
    ) -> Result<Contribution, TrackerError> {
        let removed = self.store.delete(id_or_prefix)?;
        self.store.save()?;
        info!("Deleted contribution {} ('{}')", removed.id, removed.title);
        Ok(removed)
    }

    /// Replace today's challenge with a new random one
    ///
    /// A replacement already met by today's contributions is rewarded at once.
    ///
    /// # Errors
    /// Returns [`TrackerError::DailyAlreadyCompleted`] once today's challenge
    /// is complete, or an error if the store cannot be saved
    pub fn reroll_daily(&mut self, now: NaiveDateTime) -> Result<Reroll, TrackerError> {
        let mut rewards = Rewards::default();
        self.claim_challenges(now, Some(ChallengeCadence::Daily), &mut rewards);
        if self
            .store
            .challenges()
            .daily
            .as_ref()
            .is_some_and(|c| c.xp_rewarded)
        {
            if !rewards.is_empty() {
                self.store.save()?;
            }
            return Err(TrackerError::DailyAlreadyCompleted);
        }

        let challenge = daily_challenge(&mut self.rng, &self.selected);
        debug!("Rerolled daily challenge: {}", challenge.title);
        self.store.challenges_mut().daily = Some(challenge);
        self.claim_challenges(now, Some(ChallengeCadence::Daily), &mut rewards);
        self.store.save()?;

        Ok(Reroll {
            daily: self.store.challenges().daily.clone(),
            weekly: None,
            rewards,
        })
    }

    /// Replace this week's unfinished challenges with new random ones
    ///
    /// Completed challenges stay on the slate. Replacements already met by
    /// this week's contributions are rewarded at once.
    ///
    /// # Errors
    /// Returns [`TrackerError::WeeklyAlreadyCompleted`] when every weekly
    /// challenge is complete, or an error if the store cannot be saved
    pub fn reroll_weekly(&mut self, now: NaiveDateTime) -> Result<Reroll, TrackerError> {
        let mut rewards = Rewards::default();
        self.claim_challenges(now, Some(ChallengeCadence::Weekly), &mut rewards);
        let kept: Vec<Challenge> = self
            .store
            .challenges()
            .weekly
            .iter()
            .filter(|c| c.xp_rewarded)
            .cloned()
            .collect();
        if kept.len() >= WEEKLY_CHALLENGE_COUNT {
            if !rewards.is_empty() {
                self.store.save()?;
            }
            return Err(TrackerError::WeeklyAlreadyCompleted);
        }

        let slate = weekly_challenges(&mut self.rng, &self.selected, kept);
        self.store.challenges_mut().weekly = slate;
        self.claim_challenges(now, Some(ChallengeCadence::Weekly), &mut rewards);
        self.store.save()?;
        debug!("Rerolled weekly challenges");

        Ok(Reroll {
            daily: None,
            weekly: Some(self.store.challenges().weekly.clone()),
            rewards,
        })
    }

    /// Reroll whatever is still open, skipping completed daily/weekly sets
    ///
    /// # Errors
    /// Returns an error if the store cannot be saved
    pub fn reroll_all(&mut self, now: NaiveDateTime) -> Result<Reroll, TrackerError> {
        let mut result = Reroll::default();
        match self.reroll_daily(now) {
            Ok(daily) => {
                result.daily = daily.daily;
                result.rewards.absorb(daily.rewards);
            }
            Err(TrackerError::DailyAlreadyCompleted) => {}
            Err(e) => return Err(e),
        }
        match self.reroll_weekly(now) {
            Ok(weekly) => {
                result.weekly = weekly.weekly;
                result.rewards.absorb(weekly.rewards);
            }
            Err(TrackerError::WeeklyAlreadyCompleted) => {}
            Err(e) => return Err(e),
        }
        Ok(result)
    }

    /// Grant rewards for every completed challenge and reached milestone
    ///
    /// # Errors
    /// Returns an error if the store cannot be saved
    pub fn claim_rewards(&mut self, now: NaiveDateTime) -> Result<Rewards, TrackerError> {
        let mut rewards = Rewards::default();
        self.claim_challenges(now, None, &mut rewards);
        self.claim_milestones(&mut rewards);
        if !rewards.is_empty() {
            self.store.save()?;
        }
        Ok(rewards)
    }

    /// Active challenges with progress and reset countdowns
    #[must_use]
    pub fn challenge_board(&self, now: NaiveDateTime) -> ChallengeBoard {
        let contributions = self.store.contributions();
        let status = |challenge: &Challenge| ChallengeStatus {
            challenge: challenge.clone(),
            progress: challenge_progress(challenge, contributions, now),
        };
        let challenges = self.store.challenges();
        let next_daily = next_daily_reset(now);
        let next_weekly = next_weekly_reset(now);

        ChallengeBoard {
            daily: challenges.daily.as_ref().map(status),
            weekly: challenges.weekly.iter().map(status).collect(),
            next_daily_reset: next_daily,
            next_weekly_reset: next_weekly,
            daily_countdown: format_countdown(now, next_daily),
            weekly_countdown: format_countdown(now, next_weekly),
        }
    }

    /// Every milestone with its unlocked state
    #[must_use]
    pub fn milestone_board(&self) -> MilestoneBoard {
        let level = self.store.profile().level;
        let total = self.store.contribution_count();
        MilestoneBoard {
            level: LEVEL_MILESTONES
                .iter()
                .map(|m| MilestoneStatus {
                    milestone: *m,
                    unlocked: m.is_unlocked(level),
                })
                .collect(),
            contributions: CONTRIBUTION_MILESTONES
                .iter()
                .map(|m| MilestoneStatus {
                    milestone: *m,
                    unlocked: m.is_reached(total),
                })
                .collect(),
            total_contributions: total,
            current_level: level,
        }
    }

    /// Change the display name; blank restores the default
    ///
    /// # Errors
    /// Returns an error if the store cannot be saved
    pub fn set_username(&mut self, name: &str) -> Result<(), TrackerError> {
        let name = name.trim();
        self.store.profile_mut().username = if name.is_empty() {
            profile::DEFAULT_USERNAME.to_string()
        } else {
            name.to_string()
        };
        self.store.save()?;
        Ok(())
    }

    /// Change the bio; blank restores the default
    ///
    /// # Errors
    /// Returns an error if the store cannot be saved
    pub fn set_bio(&mut self, bio: &str) -> Result<(), TrackerError> {
        let bio = bio.trim();
        self.store.profile_mut().bio = if bio.is_empty() {
            profile::DEFAULT_BIO.to_string()
        } else {
            bio.to_string()
        };
        self.store.save()?;
        Ok(())
    }

    /// Wipe level, XP, streak and counters; contributions are kept
    ///
    /// # Errors
    /// Returns an error if the store cannot be saved
    pub fn reset_profile(&mut self) -> Result<(), TrackerError> {
        self.store.profile_mut().reset_progress();
        self.store.save()?;
        info!("Profile progress reset");
        Ok(())
    }

    fn claim_challenges(
        &mut self,
        at: NaiveDateTime,
        cadence: Option<ChallengeCadence>,
        rewards: &mut Rewards,
    ) {
        let (profile, challenges, contributions) = self.store.split_mut();
        for challenge in challenges.iter_mut() {
            if challenge.xp_rewarded || cadence.is_some_and(|c| c != challenge.cadence) {
                continue;
            }
            if !challenge_progress(challenge, contributions, at).completed {
                continue;
            }

            challenge.xp_rewarded = true;
            match challenge.cadence {
                ChallengeCadence::Daily => profile.daily_challenges_completed += 1,
                ChallengeCadence::Weekly => profile.weekly_challenges_completed += 1,
            }
            rewards.xp += challenge.xp;
            rewards.levels_gained += profile.award_xp(challenge.xp);
            rewards.challenges.push(challenge.clone());
            info!(
                "{} challenge completed: {} (+{} XP)",
                challenge.cadence, challenge.title, challenge.xp
            );
        }
    }

    fn claim_milestones(&mut self, rewards: &mut Rewards) {
        let total = self.store.contribution_count();
        let profile = self.store.profile_mut();
        for milestone in CONTRIBUTION_MILESTONES.iter().filter(|m| m.is_reached(total)) {
            if !profile.claimed_contribution_milestones.insert(milestone.amount) {
                continue;
            }
            rewards.xp += milestone.xp;
            rewards.levels_gained += profile.award_xp(milestone.xp);
            rewards.milestones.push(*milestone);
            info!("Milestone reached: {} (+{} XP)", milestone.title, milestone.xp);
        }
    }
}
