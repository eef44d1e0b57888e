use std::fmt;

/// The largest absolute timezone offset allowed by XSD, in minutes (`14:00`).
pub const MAX_TIMEZONE_OFFSET_MINUTES: i16 = 14 * 60;

/// The timezone component of a date/time value.
///
/// An absent timezone is a state of its own and is never conflated with an offset of zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Timezone {
    /// The value carries no timezone.
    #[default]
    Absent,
    /// UTC, written as `Z`.
    Zulu,
    /// An explicit offset from UTC in minutes, within `-840..=840`.
    Offset(i16),
}

impl Timezone {
    /// Returns whether the value carries any timezone.
    pub fn is_present(self) -> bool {
        !matches!(self, Timezone::Absent)
    }

    /// Returns the offset from UTC in minutes, if a timezone is present.
    pub fn offset_minutes(self) -> Option<i16> {
        match self {
            Timezone::Absent => None,
            Timezone::Zulu => Some(0),
            Timezone::Offset(minutes) => Some(minutes),
        }
    }

    /// Formats the timezone as an `xsd:dayTimeDuration` (e.g. `-PT5H30M`), as returned by the
    /// SPARQL `TIMEZONE` function.
    pub fn to_day_time_duration(self) -> Option<String> {
        let minutes = self.offset_minutes()?;
        if minutes == 0 {
            return Some("PT0S".to_owned());
        }

        let sign = if minutes < 0 { "-" } else { "" };
        let hours = minutes.unsigned_abs() / 60;
        let minutes = minutes.unsigned_abs() % 60;
        let mut result = format!("{sign}PT");
        if hours != 0 {
            result.push_str(&format!("{hours}H"));
        }
        if minutes != 0 {
            result.push_str(&format!("{minutes}M"));
        }
        Some(result)
    }
}

/// Writes the lexical suffix of the timezone: nothing, `Z`, or `±HH:MM`.
///
/// An offset of zero is written in its canonical form `Z`.
impl fmt::Display for Timezone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timezone::Absent => Ok(()),
            Timezone::Zulu | Timezone::Offset(0) => f.write_str("Z"),
            Timezone::Offset(minutes) => {
                let sign = if *minutes < 0 { '-' } else { '+' };
                let minutes = minutes.unsigned_abs();
                write!(f, "{sign}{:02}:{:02}", minutes / 60, minutes % 60)
            }
        }
    }
}
