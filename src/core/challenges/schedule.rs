//! Daily and weekly reset timing

use super::progress::DateWindow;
use chrono::{Datelike, NaiveDateTime};

/// Next midnight strictly after `now`
#[must_use]
pub fn next_daily_reset(now: NaiveDateTime) -> NaiveDateTime {
    DateWindow::day(now).end
}

/// Next Monday midnight strictly after `now`
#[must_use]
pub fn next_weekly_reset(now: NaiveDateTime) -> NaiveDateTime {
    DateWindow::week(now).end
}

/// Time left until `next`, e.g. "5h 12min" or "2d 5h 12min"
///
/// A `next` in the past renders as "0h 0min".
#[must_use]
pub fn format_countdown(now: NaiveDateTime, next: NaiveDateTime) -> String {
    let secs = (next - now).num_seconds().max(0);
    let days = secs / 86_400;
    let hours = (secs % 86_400) / 3_600;
    let minutes = (secs % 3_600) / 60;

    if days == 0 {
        format!("{hours}h {minutes}min")
    } else {
        format!("{days}d {hours}h {minutes}min")
    }
}

/// Whether the daily challenge should be regenerated
///
/// Due when it never was or the last reset happened on another calendar day.
#[must_use]
pub fn daily_reset_due(last: Option<NaiveDateTime>, now: NaiveDateTime) -> bool {
    last.map_or(true, |last| last.date() != now.date())
}

/// Whether the weekly challenges should be regenerated
///
/// Due when they never were or the last reset happened in another ISO week.
#[must_use]
pub fn weekly_reset_due(last: Option<NaiveDateTime>, now: NaiveDateTime) -> bool {
    last.map_or(true, |last| last.iso_week() != now.iso_week())
}

/// Whether the streak carries over into the day of `now`
///
/// The day of the last reset must have had a contribution and must be
/// yesterday or today; any skipped day breaks the streak.
#[must_use]
pub fn streak_survives(
    last_reset: Option<NaiveDateTime>,
    completed_on_last_day: bool,
    now: NaiveDateTime,
) -> bool {
    completed_on_last_day
        && last_reset.is_some_and(|last| (now.date() - last.date()).num_days() <= 1)
}
