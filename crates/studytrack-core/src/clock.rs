//! Study-day window arithmetic.
//!
//! A "study day" runs from 04:30:00.000 to 04:29:59.999 the next calendar
//! day, so a late-night session at 01:30 still counts toward the previous
//! day's totals. All functions here are pure over wall-clock instants --
//! the caller injects `now` (the CLI passes `Local::now().naive_local()`),
//! which keeps aggregation and streak logic deterministic under test.

use chrono::{DateTime, Duration, NaiveDateTime, NaiveTime, Timelike};

/// Hour/minute of the daily rollover.
const ROLLOVER_HOUR: u32 = 4;
const ROLLOVER_MIN: u32 = 30;

/// Start of the study-day window containing `instant`.
///
/// 04:30:00.000 on `instant`'s calendar date, or on the previous date when
/// `instant` is before 04:30.
pub fn study_day_start(instant: NaiveDateTime) -> NaiveDateTime {
    let rollover = NaiveTime::from_hms_opt(ROLLOVER_HOUR, ROLLOVER_MIN, 0).expect("valid time");
    let mut start = instant.date().and_time(rollover);
    let before_rollover = instant.hour() < ROLLOVER_HOUR
        || (instant.hour() == ROLLOVER_HOUR && instant.minute() < ROLLOVER_MIN);
    if before_rollover {
        start -= Duration::days(1);
    }
    start
}

/// End of the study-day window containing `instant`: 04:29:59.999 the
/// following calendar day.
pub fn study_day_end(instant: NaiveDateTime) -> NaiveDateTime {
    study_day_start(instant) + Duration::days(1) - Duration::milliseconds(1)
}

/// Canonical label for the window containing `instant`.
///
/// The calendar date the window started on, formatted `%Y-%m-%d`. Two
/// instants map to the same label iff they fall in the same window.
pub fn study_day_label(instant: NaiveDateTime) -> String {
    study_day_start(instant).format("%Y-%m-%d").to_string()
}

/// Whether `instant` falls inside the study-day window of `reference`.
pub fn within_study_day(instant: NaiveDateTime, reference: NaiveDateTime) -> bool {
    instant >= study_day_start(reference) && instant <= study_day_end(reference)
}

/// Whole study-day difference between the windows of `later` and `earlier`.
pub fn study_days_between(earlier: NaiveDateTime, later: NaiveDateTime) -> i64 {
    (study_day_start(later) - study_day_start(earlier)).num_days()
}

/// Lenient wall-clock parser for persisted timestamps.
///
/// Accepts bare ISO local datetimes (`2024-03-15T23:00:00`) as written by
/// this crate, and RFC 3339 with an offset (`2024-01-01T10:00:00Z`) as
/// found in older records; the offset is discarded, the timestamp is kept
/// as the wall-clock reading it carries.
pub fn parse_wall_clock(s: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    // Bare date labels from streak records.
    if let Ok(d) = chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return d.and_hms_opt(12, 0, 0);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn start_before_rollover_is_previous_day() {
        let t = at(2024, 3, 16, 1, 30, 0);
        assert_eq!(study_day_start(t), at(2024, 3, 15, 4, 30, 0));
    }

    #[test]
    fn start_after_rollover_is_same_day() {
        let t = at(2024, 3, 15, 23, 0, 0);
        assert_eq!(study_day_start(t), at(2024, 3, 15, 4, 30, 0));
    }

    #[test]
    fn boundary_instants() {
        // 04:29:59 still belongs to the previous window, 04:30:00 opens a new one.
        assert_eq!(
            study_day_start(at(2024, 3, 15, 4, 29, 59)),
            at(2024, 3, 14, 4, 30, 0)
        );
        assert_eq!(
            study_day_start(at(2024, 3, 15, 4, 30, 0)),
            at(2024, 3, 15, 4, 30, 0)
        );
    }

    #[test]
    fn end_is_start_plus_day_minus_ms() {
        let t = at(2024, 3, 15, 10, 0, 0);
        let end = study_day_end(t);
        assert_eq!(end, study_day_start(t) + Duration::days(1) - Duration::milliseconds(1));
        assert_eq!(end.format("%H:%M:%S%.3f").to_string(), "04:29:59.999");
    }

    #[test]
    fn label_identifies_window() {
        let late = at(2024, 3, 15, 23, 0, 0);
        let after_midnight = at(2024, 3, 16, 1, 30, 0);
        let next_morning = at(2024, 3, 16, 9, 0, 0);
        assert_eq!(study_day_label(late), "2024-03-15");
        assert_eq!(study_day_label(after_midnight), "2024-03-15");
        assert_eq!(study_day_label(next_morning), "2024-03-16");
    }

    #[test]
    fn within_window() {
        let reference = at(2024, 3, 15, 10, 0, 0);
        assert!(within_study_day(at(2024, 3, 16, 1, 0, 0), reference));
        assert!(within_study_day(at(2024, 3, 15, 4, 30, 0), reference));
        assert!(!within_study_day(at(2024, 3, 16, 4, 30, 0), reference));
        assert!(!within_study_day(at(2024, 3, 15, 4, 0, 0), reference));
    }

    #[test]
    fn days_between_windows() {
        let a = at(2024, 3, 14, 9, 0, 0);
        let b = at(2024, 3, 16, 9, 0, 0);
        assert_eq!(study_days_between(a, b), 2);
        // 01:00 on the 15th is still the 14th's window.
        assert_eq!(study_days_between(a, at(2024, 3, 15, 1, 0, 0)), 0);
    }

    #[test]
    fn parses_bare_and_offset_timestamps() {
        assert_eq!(
            parse_wall_clock("2024-03-15T23:00:00"),
            Some(at(2024, 3, 15, 23, 0, 0))
        );
        assert_eq!(
            parse_wall_clock("2024-01-01T10:00:00Z"),
            Some(at(2024, 1, 1, 10, 0, 0))
        );
        assert!(parse_wall_clock("not a time").is_none());
    }

    proptest! {
        #[test]
        fn instant_always_inside_own_window(secs in 0i64..4_000_000_000) {
            let t = chrono::DateTime::from_timestamp(secs, 0).unwrap().naive_utc();
            prop_assert!(study_day_start(t) <= t);
            prop_assert!(t <= study_day_end(t));
            prop_assert_eq!(
                study_day_end(t),
                study_day_start(t) + Duration::days(1) - Duration::milliseconds(1)
            );
        }

        #[test]
        fn label_stable_across_window(secs in 0i64..4_000_000_000, offset in 0i64..86_399) {
            let t = chrono::DateTime::from_timestamp(secs, 0).unwrap().naive_utc();
            let start = study_day_start(t);
            let inside = start + Duration::seconds(offset);
            prop_assert_eq!(study_day_label(inside), study_day_label(start));
        }
    }
}
