//! Day streak with a weekly rest-day allowance
//!
//! Walks backward from today. Workout days extend the streak; rest days are
//! free until a week has used more than [`REST_DAYS_PER_WEEK`] of them.

use std::collections::{HashMap, HashSet};

use chrono::{Datelike, Days, Local, NaiveDate, TimeZone};

use crate::workout::WorkoutSession;

/// Rest days allowed per week before the streak breaks
pub const REST_DAYS_PER_WEEK: u32 = 2;

/// Hard cap on the backward walk; the streak never exceeds this
pub const MAX_LOOKBACK_DAYS: u32 = 365;

/// Week bucket used to count rest days
///
/// `ceil((days since Jan 4 + weekday(Jan 4) + 1) / 7)`, weekday counted from
/// Sunday. Close to ISO-8601 but not equal to it: weeks here can start on any
/// weekday and early January yields week 0.
pub fn week_key(date: NaiveDate) -> String {
    let year = date.year();
    let Some(jan4) = NaiveDate::from_ymd_opt(year, 1, 4) else {
        return format!("{}-W0", year);
    };

    let n = (date - jan4).num_days() + i64::from(jan4.weekday().num_days_from_sunday()) + 1;
    // integer ceil; n never drops below -6, where truncation already rounds up
    let week = if n > 0 { (n + 6) / 7 } else { n / 7 };

    format!("{}-W{}", year, week)
}

/// Current streak with calendar dates taken in `tz`
pub fn compute_streak_in<Tz: TimeZone>(
    sessions: &[WorkoutSession],
    today: NaiveDate,
    tz: &Tz,
) -> u32 {
    if sessions.is_empty() {
        return 0;
    }

    let workout_days: HashSet<NaiveDate> = sessions
        .iter()
        .map(|s| s.created_at.with_timezone(tz).date_naive())
        .collect();

    let mut rest_days: HashMap<String, u32> = HashMap::new();
    let mut streak = 0;

    for offset in 0..MAX_LOOKBACK_DAYS {
        let Some(day) = today.checked_sub_days(Days::new(u64::from(offset))) else {
            break;
        };

        if workout_days.contains(&day) {
            streak += 1;
            continue;
        }

        let used = rest_days.entry(week_key(day)).or_insert(0);
        *used += 1;
        if *used > REST_DAYS_PER_WEEK {
            break;
        }
    }

    streak
}

/// Current streak in the local timezone
pub fn compute_streak(sessions: &[WorkoutSession], today: NaiveDate) -> u32 {
    compute_streak_in(sessions, today, &Local)
}
