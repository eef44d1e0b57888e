use crate::xsd::date_time::format_year;
use crate::xsd::parser::{parse_lexical, ParseDateTimeError};
use crate::xsd::timeline::{compare_positions, TimelinePosition, SECONDS_PER_MINUTE};
use crate::xsd::timezone::Timezone;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// [XML Schema `date` datatype](https://www.w3.org/TR/xmlschema-2/#date)
///
/// Unlike [`DateTime`](crate::DateTime), a date keeps its lexical day and its timezone. For
/// ordering, a date is placed on the timeline at noon of its day in its own timezone, which keeps
/// dates in different timezones on the same day close together.
#[derive(Debug, Clone, Copy)]
pub struct Date {
    year: i64,
    month: u8,
    day: u8,
    timezone: Timezone,
    position: TimelinePosition,
}

impl Date {
    /// [fn:year-from-date](https://www.w3.org/TR/xpath-functions-31/#func-year-from-date)
    pub fn year(&self) -> i64 {
        self.year
    }

    /// [fn:month-from-date](https://www.w3.org/TR/xpath-functions-31/#func-month-from-date)
    pub fn month(&self) -> u8 {
        self.month
    }

    /// [fn:day-from-date](https://www.w3.org/TR/xpath-functions-31/#func-day-from-date)
    pub fn day(&self) -> u8 {
        self.day
    }

    /// The timezone as written in the lexical form.
    pub fn timezone(&self) -> Timezone {
        self.timezone
    }

    /// The timezone as an `xsd:dayTimeDuration` (SPARQL `TIMEZONE`).
    pub fn timezone_duration(&self) -> Option<String> {
        self.timezone.to_day_time_duration()
    }

    /// The timezone as a plain string (SPARQL `TZ`).
    pub fn tz(&self) -> String {
        self.timezone.to_string()
    }

    /// The noon instant used for ordering.
    pub fn timeline_position(&self) -> TimelinePosition {
        self.position
    }
}

impl FromStr for Date {
    type Err = ParseDateTimeError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let lexical = parse_lexical(input, false)?;
        let local_noon = TimelinePosition::from_utc_fields(
            lexical.year,
            lexical.month,
            lexical.day,
            lexical.hour,
            lexical.minute,
            lexical.second,
            lexical.microsecond,
        );
        let offset_seconds =
            i64::from(lexical.timezone.offset_minutes().unwrap_or(0)) * SECONDS_PER_MINUTE;
        let position = TimelinePosition {
            seconds: local_noon.seconds - offset_seconds,
            microseconds: 0,
        };

        Ok(Self {
            year: lexical.year,
            month: lexical.month,
            day: lexical.day,
            timezone: lexical.timezone,
            position,
        })
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        format_year(self.year, f)?;
        write!(f, "-{:02}-{:02}{}", self.month, self.day, self.timezone)
    }
}

impl PartialEq for Date {
    fn eq(&self, other: &Self) -> bool {
        self.partial_cmp(other) == Some(Ordering::Equal)
    }
}

impl Eq for Date {}

impl Hash for Date {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.position.hash(state);
        self.timezone.is_present().hash(state);
    }
}

impl PartialOrd for Date {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        compare_positions(
            self.position,
            self.timezone.is_present(),
            other.position,
            other.timezone.is_present(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(value: &str) -> Date {
        Date::from_str(value).unwrap()
    }

    #[test]
    fn test_round_trip() {
        for value in ["2004-12-31", "2004-12-31Z", "2004-12-31-05:00"] {
            assert_eq!(date(value).to_string(), value);
        }
        assert_eq!(date("-0044-03-15").to_string(), "-0044-03-15");
        assert_eq!(date("2004-12-31+00:00").to_string(), "2004-12-31Z");
    }

    #[test]
    fn test_date_keeps_its_day_across_timezones() {
        let value = date("2004-12-31-14:00");
        assert_eq!(value.year(), 2004);
        assert_eq!(value.month(), 12);
        assert_eq!(value.day(), 31);
        assert_eq!(value.tz(), "-14:00");
        assert_eq!(value.timezone_duration().as_deref(), Some("-PT14H"));
    }

    #[test]
    fn test_instant_is_noon_in_timezone() {
        let utc = date("1970-01-01Z");
        assert_eq!(utc.timeline_position().seconds, 12 * 3600);
        let east = date("1970-01-01+02:00");
        assert_eq!(east.timeline_position().seconds, 10 * 3600);
    }

    #[test]
    fn test_ordering() {
        assert_eq!(
            date("2004-12-30Z").partial_cmp(&date("2004-12-31Z")),
            Some(Ordering::Less)
        );
        assert_eq!(date("2004-12-31Z"), date("2004-12-31+00:00"));
        assert_eq!(date("2004-12-31Z").partial_cmp(&date("2004-12-31")), None);
        assert_eq!(
            date("2004-12-29Z").partial_cmp(&date("2004-12-31")),
            Some(Ordering::Less)
        );
    }

    #[test]
    fn test_rejects_invalid_dates() {
        assert!(Date::from_str("2004-02-30").is_err());
        assert!(Date::from_str("2004-12-31T00:00:00").is_err());
        assert!(Date::from_str("0000-12-31").is_err());
    }
}
