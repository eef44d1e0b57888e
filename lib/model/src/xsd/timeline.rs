//! Calendar arithmetic shared by the [`DateTime`](crate::DateTime) and [`Date`](crate::Date)
//! value types.
//!
//! Years follow the XSD 1.0 convention: there is no year `0`, `-0001` is the year directly before
//! `0001`. All functions that take a year expect this convention and translate it to the
//! proleptic Gregorian "astronomical" numbering internally.

use std::cmp::Ordering;

pub(crate) const SECONDS_PER_MINUTE: i64 = 60;
pub(crate) const SECONDS_PER_HOUR: i64 = 60 * SECONDS_PER_MINUTE;
pub(crate) const SECONDS_PER_DAY: i64 = 24 * SECONDS_PER_HOUR;

/// The largest timezone skew allowed by XSD (`±14:00`), in seconds.
pub(crate) const MAX_TIMEZONE_SKEW_SECONDS: i64 = 14 * SECONDS_PER_HOUR;

/// Returns whether `year` is a leap year in the proleptic Gregorian calendar.
///
/// A year is a leap year if it is divisible by 4 and either not divisible by 100 or divisible by
/// 400. Negative years are first mapped onto the astronomical numbering, so `-0001` (1 BCE) is a
/// leap year.
pub fn is_leap_year(year: i64) -> bool {
    let year = astronomical_year(year);
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Returns the number of days in `month` (1-12) of `year`.
///
/// Returns `0` for months outside `1..=12`.
pub fn days_in_month(month: u8, year: i64) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

/// Maps an XSD year (no year zero) to the astronomical year numbering (with a year zero).
fn astronomical_year(year: i64) -> i64 {
    if year < 0 {
        year + 1
    } else {
        year
    }
}

/// Maps an astronomical year back to the XSD numbering.
fn xsd_year(year: i64) -> i64 {
    if year <= 0 {
        year - 1
    } else {
        year
    }
}

/// Moves `year` by `delta` years while skipping the non-existent year zero.
pub(crate) fn add_years(year: i64, delta: i64) -> i64 {
    xsd_year(astronomical_year(year) + delta)
}

/// Counts the days between 1970-01-01 and the given civil date.
///
/// The algorithm is exact for the full proleptic Gregorian calendar (it works on 400-year eras).
pub(crate) fn days_from_civil(year: i64, month: u8, day: u8) -> i64 {
    let year = astronomical_year(year) - i64::from(month <= 2);
    let era = year.div_euclid(400);
    let year_of_era = year - era * 400;
    let month = i64::from(month);
    let shifted_month = if month > 2 { month - 3 } else { month + 9 };
    let day_of_year = (153 * shifted_month + 2) / 5 + i64::from(day) - 1;
    let day_of_era = year_of_era * 365 + year_of_era / 4 - year_of_era / 100 + day_of_year;
    era * 146_097 + day_of_era - 719_468
}

/// Inverse of [`days_from_civil`]. Returns `(year, month, day)` with an XSD year.
pub(crate) fn civil_from_days(days: i64) -> (i64, u8, u8) {
    let days = days + 719_468;
    let era = days.div_euclid(146_097);
    let day_of_era = days - era * 146_097;
    let year_of_era =
        (day_of_era - day_of_era / 1460 + day_of_era / 36_524 - day_of_era / 146_096) / 365;
    let day_of_year = day_of_era - (365 * year_of_era + year_of_era / 4 - year_of_era / 100);
    let shifted_month = (5 * day_of_year + 2) / 153;
    let day = day_of_year - (153 * shifted_month + 2) / 5 + 1;
    let month = if shifted_month < 10 {
        shifted_month + 3
    } else {
        shifted_month - 9
    };
    let year = year_of_era + era * 400 + i64::from(month <= 2);

    // Both values are in range by construction of the algorithm.
    let month = u8::try_from(month).unwrap_or(1);
    let day = u8::try_from(day).unwrap_or(1);
    (xsd_year(year), month, day)
}

/// A position on the UTC timeline, the canonical instant of a date/time value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimelinePosition {
    /// Seconds since 1970-01-01T00:00:00Z.
    pub seconds: i64,
    /// Sub-second part, `0..=999_999`.
    pub microseconds: u32,
}

impl TimelinePosition {
    /// Computes the position of the given UTC calendar value. This is equivalent to `timegm`.
    pub(crate) fn from_utc_fields(
        year: i64,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
        microseconds: u32,
    ) -> Self {
        let seconds = days_from_civil(year, month, day) * SECONDS_PER_DAY
            + i64::from(hour) * SECONDS_PER_HOUR
            + i64::from(minute) * SECONDS_PER_MINUTE
            + i64::from(second);
        Self {
            seconds,
            microseconds,
        }
    }

    fn shifted(self, seconds: i64) -> Self {
        Self {
            seconds: self.seconds + seconds,
            microseconds: self.microseconds,
        }
    }
}

/// Orders two timeline positions following
/// [XSD 1.0 §3.2.7.4](https://www.w3.org/TR/xmlschema-2/#dateTime-order).
///
/// If exactly one side carries a timezone, the other side may lie anywhere within
/// `±14:00` of its wall-clock value. Inside that band the result is `None` (incomparable).
pub(crate) fn compare_positions(
    lhs: TimelinePosition,
    lhs_has_timezone: bool,
    rhs: TimelinePosition,
    rhs_has_timezone: bool,
) -> Option<Ordering> {
    match (lhs_has_timezone, rhs_has_timezone) {
        (true, false) => compare_with_band(lhs, rhs),
        (false, true) => compare_with_band(rhs, lhs).map(Ordering::reverse),
        _ => Some(lhs.cmp(&rhs)),
    }
}

/// `with_timezone` is a fixed UTC instant, `without_timezone` is a local wall-clock value.
fn compare_with_band(
    with_timezone: TimelinePosition,
    without_timezone: TimelinePosition,
) -> Option<Ordering> {
    if with_timezone < without_timezone.shifted(-MAX_TIMEZONE_SKEW_SECONDS) {
        Some(Ordering::Less)
    } else if with_timezone > without_timezone.shifted(MAX_TIMEZONE_SKEW_SECONDS) {
        Some(Ordering::Greater)
    } else {
        None
    }
}

/// Orders two optional values, treating `None` as smaller than any value.
///
/// This realizes the NULL-first rule of the dateTime comparator. The comparison of two present
/// values is delegated to their [`PartialOrd`] implementation and may therefore be incomparable.
pub fn compare_nullable<T: PartialOrd>(lhs: Option<&T>, rhs: Option<&T>) -> Option<Ordering> {
    match (lhs, rhs) {
        (None, None) => Some(Ordering::Equal),
        (None, Some(_)) => Some(Ordering::Less),
        (Some(_), None) => Some(Ordering::Greater),
        (Some(lhs), Some(rhs)) => lhs.partial_cmp(rhs),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_days_in_month_leap_years() {
        assert_eq!(days_in_month(2, 1900), 28);
        assert_eq!(days_in_month(2, 2000), 29);
        assert_eq!(days_in_month(2, 2004), 29);
        assert_eq!(days_in_month(2, 1901), 28);
        assert_eq!(days_in_month(4, 2001), 30);
        assert_eq!(days_in_month(12, 2001), 31);
        assert_eq!(days_in_month(13, 2001), 0);
    }

    #[test]
    fn test_year_one_bce_is_leap() {
        assert!(is_leap_year(-1));
        assert!(!is_leap_year(-2));
        assert!(is_leap_year(-5));
    }

    #[test]
    fn test_add_years_skips_year_zero() {
        assert_eq!(add_years(1, -1), -1);
        assert_eq!(add_years(-1, 1), 1);
        assert_eq!(add_years(2024, 1), 2025);
    }

    #[test]
    fn test_civil_round_trip() {
        for (year, month, day) in [
            (1970, 1, 1),
            (2000, 2, 29),
            (1, 1, 1),
            (-1, 12, 31),
            (-4713, 11, 24),
            (9999, 12, 31),
        ] {
            let days = days_from_civil(year, month, day);
            assert_eq!(civil_from_days(days), (year, month, day));
        }
    }

    #[test]
    fn test_epoch_is_zero() {
        assert_eq!(days_from_civil(1970, 1, 1), 0);
        assert_eq!(days_from_civil(1969, 12, 31), -1);
        assert_eq!(days_from_civil(1, 1, 1) - days_from_civil(-1, 12, 31), 1);
    }

    #[test]
    fn test_compare_nullable() {
        assert_eq!(compare_nullable::<i32>(None, None), Some(Ordering::Equal));
        assert_eq!(compare_nullable(None, Some(&1)), Some(Ordering::Less));
        assert_eq!(compare_nullable(Some(&1), None), Some(Ordering::Greater));
        assert_eq!(compare_nullable(Some(&1), Some(&2)), Some(Ordering::Less));
    }
}
