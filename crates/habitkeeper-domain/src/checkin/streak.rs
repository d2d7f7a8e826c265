//! Pure streak math over a set of check-in dates.
//!
//! Both functions are deterministic and stateless; they can be called
//! concurrently from any number of readers. Any record on a date counts as
//! presence, which is what prevents a NORMAL and a RETROACTIVE record on
//! the same date from double-counting: dates are deduplicated first.

use std::collections::BTreeSet;

use chrono::NaiveDate;

/// Count of consecutive present days ending at `today`, or at `today - 1`
/// when the user has not yet checked in today. A gap of two or more days
/// resets the streak to 0.
pub fn current_streak(dates: &[NaiveDate], today: NaiveDate) -> u32 {
    let days: BTreeSet<NaiveDate> = dates.iter().copied().collect();

    let anchor = if days.contains(&today) {
        today
    } else {
        // Not checked in today; the streak is still alive if yesterday is.
        match today.pred_opt() {
            Some(yesterday) if days.contains(&yesterday) => yesterday,
            _ => return 0,
        }
    };

    let mut streak = 0u32;
    let mut cursor = anchor;
    loop {
        if !days.contains(&cursor) {
            break;
        }
        streak += 1;
        cursor = match cursor.pred_opt() {
            Some(prev) => prev,
            None => break,
        };
    }

    streak
}

/// Longest run of day-consecutive dates ever recorded. Returns 0 for an
/// empty input.
pub fn max_streak(dates: &[NaiveDate]) -> u32 {
    let days: BTreeSet<NaiveDate> = dates.iter().copied().collect();

    let mut best = 0u32;
    let mut run = 0u32;
    let mut prev: Option<NaiveDate> = None;

    for &date in &days {
        run = match prev {
            Some(prev_date) if (date - prev_date).num_days() == 1 => run + 1,
            _ => 1,
        };
        best = best.max(run);
        prev = Some(date);
    }

    best
}
