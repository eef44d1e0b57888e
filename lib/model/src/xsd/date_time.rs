use crate::xsd::parser::{parse_lexical, LexicalDateTime, ParseDateTimeError};
use crate::xsd::timeline::{
    add_years, civil_from_days, compare_positions, days_in_month, TimelinePosition,
    SECONDS_PER_DAY, SECONDS_PER_HOUR, SECONDS_PER_MINUTE,
};
use crate::xsd::timezone::Timezone;
use crate::{ThinError, ThinResult};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

const MICROSECONDS_PER_SECOND: u32 = 1_000_000;

/// [XML Schema `dateTime` datatype](https://www.w3.org/TR/xmlschema-2/#dateTime)
///
/// Values are normalized on construction: an `hour` of 24 is carried into the next day and any
/// explicit timezone offset is folded into UTC. Consequently, the timezone of a [`DateTime`] is
/// either [`Timezone::Absent`] or [`Timezone::Zulu`].
///
/// The order is partial. Comparing a value with a timezone to one without yields `None` if the two
/// are less than 14 hours apart.
#[derive(Debug, Clone, Copy)]
pub struct DateTime {
    year: i64,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
    second: u8,
    microsecond: u32,
    timezone: Timezone,
    position: TimelinePosition,
}

impl DateTime {
    /// Creates the UTC value that is `seconds` after the Unix epoch.
    ///
    /// Returns an error if the resulting year is outside the supported range.
    pub fn from_unix_seconds(seconds: i64) -> ThinResult<Self> {
        Self::from_timeval(seconds, 0)
    }

    /// Creates a UTC value from a `timeval`-like pair. Microseconds above one second are carried
    /// into the seconds.
    pub fn from_timeval(seconds: i64, microseconds: u32) -> ThinResult<Self> {
        let seconds = seconds
            .checked_add(i64::from(microseconds / MICROSECONDS_PER_SECOND))
            .ok_or(ThinError::default())?;
        let microsecond = microseconds % MICROSECONDS_PER_SECOND;

        let (year, month, day) = civil_from_days(seconds.div_euclid(SECONDS_PER_DAY));
        if year.unsigned_abs() >= 2_147_483_647 {
            return ThinError::expected();
        }

        let seconds_of_day = seconds.rem_euclid(SECONDS_PER_DAY);
        let hour = seconds_of_day / SECONDS_PER_HOUR;
        let minute = (seconds_of_day % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE;
        let second = seconds_of_day % SECONDS_PER_MINUTE;

        Ok(Self::normalize(LexicalDateTime {
            year,
            month,
            day,
            hour: u8::try_from(hour)?,
            minute: u8::try_from(minute)?,
            second: u8::try_from(second)?,
            microsecond,
            timezone: Timezone::Zulu,
        }))
    }

    /// Resolves `hour == 24`, folds the timezone offset into UTC and computes the canonical
    /// instant.
    pub(crate) fn normalize(value: LexicalDateTime) -> Self {
        let mut year = value.year;
        let mut month = i64::from(value.month);
        let mut day = i64::from(value.day);
        let mut hour = i64::from(value.hour);
        let mut minute = i64::from(value.minute);

        let timezone = match value.timezone.offset_minutes() {
            None => Timezone::Absent,
            Some(offset) => {
                minute -= i64::from(offset);
                Timezone::Zulu
            }
        };

        hour += minute.div_euclid(60);
        minute = minute.rem_euclid(60);
        day += hour.div_euclid(24);
        hour = hour.rem_euclid(24);

        while day < 1 {
            month -= 1;
            if month < 1 {
                month = 12;
                year = add_years(year, -1);
            }
            day += i64::from(days_in_month(checked_month(month), year));
        }
        loop {
            let month_length = i64::from(days_in_month(checked_month(month), year));
            if day <= month_length {
                break;
            }
            day -= month_length;
            month += 1;
            if month > 12 {
                month = 1;
                year = add_years(year, 1);
            }
        }

        let month = checked_month(month);
        let day = u8::try_from(day).unwrap_or(1);
        let hour = u8::try_from(hour).unwrap_or(0);
        let minute = u8::try_from(minute).unwrap_or(0);
        let position = TimelinePosition::from_utc_fields(
            year,
            month,
            day,
            hour,
            minute,
            value.second,
            value.microsecond,
        );

        Self {
            year,
            month,
            day,
            hour,
            minute,
            second: value.second,
            microsecond: value.microsecond,
            timezone,
            position,
        }
    }

    /// [fn:year-from-dateTime](https://www.w3.org/TR/xpath-functions-31/#func-year-from-dateTime)
    pub fn year(&self) -> i64 {
        self.year
    }

    /// [fn:month-from-dateTime](https://www.w3.org/TR/xpath-functions-31/#func-month-from-dateTime)
    pub fn month(&self) -> u8 {
        self.month
    }

    /// [fn:day-from-dateTime](https://www.w3.org/TR/xpath-functions-31/#func-day-from-dateTime)
    pub fn day(&self) -> u8 {
        self.day
    }

    /// [fn:hours-from-dateTime](https://www.w3.org/TR/xpath-functions-31/#func-hours-from-dateTime)
    pub fn hour(&self) -> u8 {
        self.hour
    }

    /// [fn:minutes-from-dateTime](https://www.w3.org/TR/xpath-functions-31/#func-minutes-from-dateTime)
    pub fn minute(&self) -> u8 {
        self.minute
    }

    /// The whole seconds, see [`Self::seconds_decimal`] for the SPARQL `SECONDS` accessor.
    pub fn second(&self) -> u8 {
        self.second
    }

    /// The fractional seconds truncated to microseconds.
    pub fn microsecond(&self) -> u32 {
        self.microsecond
    }

    /// Either [`Timezone::Absent`] or [`Timezone::Zulu`].
    pub fn timezone(&self) -> Timezone {
        self.timezone
    }

    /// The seconds since the Unix epoch of the canonical instant. Values without timezone are
    /// placed on the timeline as if they were UTC.
    pub fn unix_seconds(&self) -> i64 {
        self.position.seconds
    }

    /// The canonical instant of this value.
    pub fn timeline_position(&self) -> TimelinePosition {
        self.position
    }

    /// The seconds including the fractional part as an `xsd:decimal` lexical form, e.g. `3` or
    /// `3.25`. This is the result of the SPARQL `SECONDS` function.
    pub fn seconds_decimal(&self) -> String {
        match format_fraction(self.microsecond) {
            Some(fraction) => format!("{}.{fraction}", self.second),
            None => self.second.to_string(),
        }
    }

    /// The timezone as an `xsd:dayTimeDuration` (SPARQL `TIMEZONE`).
    pub fn timezone_duration(&self) -> Option<String> {
        self.timezone.to_day_time_duration()
    }

    /// The timezone as a plain string (SPARQL `TZ`), `"Z"` or `""`.
    pub fn tz(&self) -> String {
        self.timezone.to_string()
    }
}

/// Month values are kept in `1..=12` by the carry logic of the normalization.
fn checked_month(month: i64) -> u8 {
    u8::try_from(month).unwrap_or(1)
}

/// Returns the fractional digits of `microsecond` without trailing zeros, or `None` for zero.
pub(crate) fn format_fraction(microsecond: u32) -> Option<String> {
    if microsecond == 0 {
        return None;
    }
    let digits = format!("{microsecond:06}");
    Some(digits.trim_end_matches('0').to_owned())
}

/// Writes a year with at least four digits and a leading `-` for negative years.
pub(crate) fn format_year(year: i64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if year < 0 {
        f.write_str("-")?;
    }
    write!(f, "{:04}", year.unsigned_abs())
}

impl FromStr for DateTime {
    type Err = ParseDateTimeError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        parse_lexical(input, true).map(Self::normalize)
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        format_year(self.year, f)?;
        write!(
            f,
            "-{:02}-{:02}T{:02}:{:02}:{:02}",
            self.month, self.day, self.hour, self.minute, self.second
        )?;
        if let Some(fraction) = format_fraction(self.microsecond) {
            write!(f, ".{fraction}")?;
        }
        write!(f, "{}", self.timezone)
    }
}

impl PartialEq for DateTime {
    fn eq(&self, other: &Self) -> bool {
        self.partial_cmp(other) == Some(Ordering::Equal)
    }
}

impl Eq for DateTime {}

impl Hash for DateTime {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.position.hash(state);
        self.timezone.is_present().hash(state);
    }
}

impl PartialOrd for DateTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        compare_positions(
            self.position,
            self.timezone.is_present(),
            other.position,
            other.timezone.is_present(),
        )
    }
}
