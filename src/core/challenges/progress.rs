//! Challenge progress over day and week windows

use crate::core::models::{Challenge, ChallengeCadence, Contribution, ContributionKind};
use chrono::{Datelike, Days, NaiveDateTime, NaiveTime};
use serde::Serialize;

/// Half-open time range `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    /// Inclusive start
    pub start: NaiveDateTime,
    /// Exclusive end
    pub end: NaiveDateTime,
}

impl DateWindow {
    /// The calendar day containing `at`
    #[must_use]
    pub fn day(at: NaiveDateTime) -> Self {
        let start = at.date().and_time(NaiveTime::MIN);
        Self {
            start,
            end: add_days(start, 1),
        }
    }

    /// The Monday-to-Sunday week containing `at`
    #[must_use]
    pub fn week(at: NaiveDateTime) -> Self {
        let since_monday = u64::from(at.weekday().num_days_from_monday());
        let monday = at
            .date()
            .checked_sub_days(Days::new(since_monday))
            .unwrap_or(chrono::NaiveDate::MIN);
        let start = monday.and_time(NaiveTime::MIN);
        Self {
            start,
            end: add_days(start, 7),
        }
    }

    /// The window a challenge of `cadence` is evaluated over
    #[must_use]
    pub fn for_cadence(cadence: ChallengeCadence, at: NaiveDateTime) -> Self {
        match cadence {
            ChallengeCadence::Daily => Self::day(at),
            ChallengeCadence::Weekly => Self::week(at),
        }
    }

    /// Whether `moment` falls inside the window
    #[must_use]
    pub fn contains(&self, moment: NaiveDateTime) -> bool {
        self.start <= moment && moment < self.end
    }
}

fn add_days(start: NaiveDateTime, days: u64) -> NaiveDateTime {
    start
        .checked_add_days(Days::new(days))
        .unwrap_or(NaiveDateTime::MAX)
}

/// How far a challenge has come
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChallengeProgress {
    /// Matching contributions in the window
    pub count: u32,
    /// Contributions needed
    pub target: u32,
    /// `count >= target`
    pub completed: bool,
}

impl ChallengeProgress {
    /// Count capped at the target, for "2/3" style display
    #[must_use]
    pub fn shown_count(&self) -> u32 {
        self.count.min(self.target)
    }
}

/// Count contributions inside `window`, optionally of one category
#[must_use]
pub fn count_in_window(
    contributions: &[Contribution],
    window: &DateWindow,
    kind: Option<ContributionKind>,
) -> usize {
    contributions
        .iter()
        .filter(|c| window.contains(c.date))
        .filter(|c| kind.map_or(true, |k| c.kind == k))
        .count()
}

/// Progress of `challenge` in the day or week containing `at`
#[must_use]
pub fn challenge_progress(
    challenge: &Challenge,
    contributions: &[Contribution],
    at: NaiveDateTime,
) -> ChallengeProgress {
    let window = DateWindow::for_cadence(challenge.cadence, at);
    let count = count_in_window(contributions, &window, challenge.kind);
    let count = u32::try_from(count).unwrap_or(u32::MAX);
    ChallengeProgress {
        count,
        target: challenge.target,
        completed: count >= challenge.target,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::ContributionDraft;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    fn logged(kind: ContributionKind, date: NaiveDateTime) -> Contribution {
        Contribution::from_draft(ContributionDraft::new(kind, date), 5)
    }

    #[test]
    fn test_day_window() {
        let window = DateWindow::day(at(2025, 12, 21, 15, 30));
        assert_eq!(window.start, at(2025, 12, 21, 0, 0));
        assert_eq!(window.end, at(2025, 12, 22, 0, 0));
        assert!(window.contains(at(2025, 12, 21, 0, 0)));
        assert!(window.contains(at(2025, 12, 21, 23, 59)));
        assert!(!window.contains(at(2025, 12, 22, 0, 0)));
    }

    #[test]
    fn test_week_window_starts_monday() {
        // 2025-12-21 is a Sunday; its week starts Monday 2025-12-15
        let window = DateWindow::week(at(2025, 12, 21, 23, 0));
        assert_eq!(window.start, at(2025, 12, 15, 0, 0));
        assert_eq!(window.end, at(2025, 12, 22, 0, 0));

        let monday = DateWindow::week(at(2025, 12, 22, 0, 0));
        assert_eq!(monday.start, at(2025, 12, 22, 0, 0));
    }

    #[test]
    fn test_week_window_across_year_end() {
        // Wednesday 2025-12-31 belongs to the week of Monday 2025-12-29
        let window = DateWindow::week(at(2025, 12, 31, 9, 0));
        assert_eq!(window.start, at(2025, 12, 29, 0, 0));
        assert!(window.contains(at(2026, 1, 4, 22, 0)));
        assert!(!window.contains(at(2026, 1, 5, 0, 0)));
    }

    #[test]
    fn test_daily_progress_counts_today_only() {
        let now = at(2025, 12, 21, 18, 0);
        let log = vec![
            logged(ContributionKind::Kindness, at(2025, 12, 20, 23, 59)),
            logged(ContributionKind::Kindness, at(2025, 12, 21, 8, 0)),
        ];
        let challenge = Challenge::new(ChallengeCadence::Daily, None, 1, 4);
        let progress = challenge_progress(&challenge, &log, now);
        assert_eq!(progress.count, 1);
        assert!(progress.completed);
    }

    #[test]
    fn test_typed_progress_filters_category() {
        let now = at(2025, 12, 18, 12, 0);
        let log = vec![
            logged(ContributionKind::Donation, at(2025, 12, 15, 9, 0)),
            logged(ContributionKind::Kindness, at(2025, 12, 16, 9, 0)),
            logged(ContributionKind::Donation, at(2025, 12, 21, 9, 0)),
            logged(ContributionKind::Donation, at(2025, 12, 22, 9, 0)),
        ];
        let challenge = Challenge::new(
            ChallengeCadence::Weekly,
            Some(ContributionKind::Donation),
            3,
            11,
        );
        let progress = challenge_progress(&challenge, &log, now);
        assert_eq!(progress.count, 2);
        assert!(!progress.completed);
        assert_eq!(progress.shown_count(), 2);
    }

    #[test]
    fn test_shown_count_is_capped() {
        let progress = ChallengeProgress {
            count: 5,
            target: 3,
            completed: true,
        };
        assert_eq!(progress.shown_count(), 3);
    }
}
