//! Consecutive-day activity streaks.

use chrono::{DateTime, NaiveDate, Utc};

/// Collapse activity timestamps to distinct calendar dates, most recent
/// first. Time-of-day is ignored.
pub fn distinct_activity_dates(
    timestamps: impl IntoIterator<Item = DateTime<Utc>>,
) -> Vec<NaiveDate> {
    let mut dates: Vec<NaiveDate> = timestamps.into_iter().map(|t| t.date_naive()).collect();
    dates.sort_unstable_by(|a, b| b.cmp(a));
    dates.dedup();
    dates
}

/// Count consecutive active days ending at the most recent date.
///
/// Expects distinct dates sorted most recent first, as produced by
/// [`distinct_activity_dates`]. A greedy scan: start at the head, extend
/// while each date is exactly one calendar day earlier, stop at the first
/// gap.
pub fn streak_days(dates: &[NaiveDate]) -> u32 {
    let Some((&first, rest)) = dates.split_first() else {
        return 0;
    };

    let mut streak = 1;
    let mut current = first;
    for &date in rest {
        if current.pred_opt() == Some(date) {
            streak += 1;
            current = date;
        } else {
            break;
        }
    }
    streak
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    #[test]
    fn empty_input_is_zero() {
        assert_eq!(streak_days(&[]), 0);
    }

    #[test]
    fn single_day_is_one() {
        assert_eq!(streak_days(&[day(10)]), 1);
    }

    #[test]
    fn three_consecutive_days() {
        assert_eq!(streak_days(&[day(10), day(9), day(8)]), 3);
    }

    #[test]
    fn gap_breaks_streak() {
        assert_eq!(streak_days(&[day(10), day(8)]), 1);
        assert_eq!(streak_days(&[day(10), day(9), day(7), day(6)]), 2);
    }

    #[test]
    fn same_day_events_collapse_to_one_date() {
        let stamps = vec![
            Utc.with_ymd_and_hms(2026, 3, 10, 9, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 3, 10, 21, 30, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 3, 9, 12, 0, 0).unwrap(),
        ];
        let dates = distinct_activity_dates(stamps);
        assert_eq!(dates, vec![day(10), day(9)]);
        assert_eq!(streak_days(&dates), 2);
    }

    #[test]
    fn unordered_timestamps_are_sorted_descending() {
        let stamps = vec![
            Utc.with_ymd_and_hms(2026, 3, 8, 8, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 3, 10, 8, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 3, 9, 8, 0, 0).unwrap(),
        ];
        let dates = distinct_activity_dates(stamps);
        assert_eq!(streak_days(&dates), 3);
    }

    #[test]
    fn streak_crosses_month_boundary() {
        let dates = vec![
            NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 2, 28).unwrap(),
            NaiveDate::from_ymd_opt(2026, 2, 27).unwrap(),
        ];
        assert_eq!(streak_days(&dates), 3);
    }
}
