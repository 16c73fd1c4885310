//! Daily streak tracking
//!
//! A streak counts consecutive calendar days with at least one completed
//! task. Days are compared in the caller's time zone.

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc};

/// Result of recording activity on a day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakUpdate {
    pub streak: u32,
    pub longest_streak: u32,
    /// A running streak was reset to 1
    pub streak_broken: bool,
}

/// Compute the streak after activity on `today`
///
/// `last_activity_day` is the calendar day of the previous activity, if any.
pub fn update_streak(
    last_activity_day: Option<NaiveDate>,
    today: NaiveDate,
    current_streak: u32,
    longest_streak: u32,
) -> StreakUpdate {
    let days_since = last_activity_day.map(|last| (today - last).num_days());

    let (streak, streak_broken) = match days_since {
        // Same day, or a clock that moved backwards: already counted
        Some(days) if days <= 0 => (current_streak, false),
        Some(1) => (current_streak.saturating_add(1), false),
        _ => (1, current_streak > 0),
    };

    StreakUpdate {
        streak,
        longest_streak: longest_streak.max(streak),
        streak_broken,
    }
}

/// Calendar day of a stored UTC instant, seen from `offset`
pub fn activity_day(at: DateTime<Utc>, offset: &FixedOffset) -> NaiveDate {
    offset.from_utc_datetime(&at.naive_utc()).date_naive()
}
