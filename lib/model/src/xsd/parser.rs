//! Lexical parser for `xsd:dateTime` and `xsd:date`.
//!
//! Grammar (XSD 1.0 §3.2.7 / §3.2.9):
//! `'-'? yyyy '-' mm '-' dd ('T' hh ':' mm ':' ss ('.' s+)?)? ('Z' | ('+' | '-') hh ':' mm)?`

use crate::xsd::timeline::days_in_month;
use crate::xsd::timezone::{Timezone, MAX_TIMEZONE_OFFSET_MINUTES};
use std::fmt;

/// Years must stay below the platform integer maximum, leaving room for a one year carry during
/// normalization.
const MAX_YEAR_MAGNITUDE: i64 = 2_147_483_647;

/// The number of fractional digits kept. Further digits are truncated.
const MICROSECOND_DIGITS: usize = 6;

/// The component of a date/time lexical form that failed to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseDateTimeErrorKind {
    BadYear,
    BadMonth,
    BadDay,
    BadHour,
    BadMinute,
    BadSecond,
    BadFraction,
    BadTimezone,
    TrailingChars,
}

impl fmt::Display for ParseDateTimeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ParseDateTimeErrorKind::BadYear => "invalid year",
            ParseDateTimeErrorKind::BadMonth => "invalid month",
            ParseDateTimeErrorKind::BadDay => "invalid day",
            ParseDateTimeErrorKind::BadHour => "invalid hour",
            ParseDateTimeErrorKind::BadMinute => "invalid minute",
            ParseDateTimeErrorKind::BadSecond => "invalid second",
            ParseDateTimeErrorKind::BadFraction => "invalid fractional seconds",
            ParseDateTimeErrorKind::BadTimezone => "invalid timezone",
            ParseDateTimeErrorKind::TrailingChars => "unexpected trailing characters",
        })
    }
}

/// An error raised when parsing an `xsd:dateTime` or `xsd:date` lexical form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at byte {position}")]
pub struct ParseDateTimeError {
    kind: ParseDateTimeErrorKind,
    position: usize,
}

impl ParseDateTimeError {
    fn new(kind: ParseDateTimeErrorKind, position: usize) -> Self {
        Self { kind, position }
    }

    /// The component that failed to parse.
    pub fn kind(&self) -> ParseDateTimeErrorKind {
        self.kind
    }

    /// The byte offset in the input at which the failing component starts.
    pub fn position(&self) -> usize {
        self.position
    }
}

/// The fields of a successfully parsed lexical form, before normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LexicalDateTime {
    pub year: i64,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub microsecond: u32,
    pub timezone: Timezone,
}

/// Parses a lexical date (`with_time == false`) or dateTime (`with_time == true`).
///
/// Dates get the time-of-day `12:00:00` so that they have a well-defined instant.
pub(crate) fn parse_lexical(
    input: &str,
    with_time: bool,
) -> Result<LexicalDateTime, ParseDateTimeError> {
    use ParseDateTimeErrorKind::{BadDay, BadHour, BadMinute, BadMonth, BadSecond, TrailingChars};

    let mut cursor = Cursor::new(input);

    let year = parse_year(&mut cursor)?;

    let month_start = cursor.position + 1;
    cursor.expect(b'-', BadMonth)?;
    let month = cursor.two_digits(BadMonth)?;
    if !(1..=12).contains(&month) {
        return Err(ParseDateTimeError::new(BadMonth, month_start));
    }

    let day_start = cursor.position + 1;
    cursor.expect(b'-', BadDay)?;
    let day = cursor.two_digits(BadDay)?;
    if day < 1 || day > days_in_month(month, year) {
        return Err(ParseDateTimeError::new(BadDay, day_start));
    }

    let (hour, minute, second, microsecond) = if with_time {
        let hour_start = cursor.position + 1;
        cursor.expect(b'T', BadHour)?;
        let hour = cursor.two_digits(BadHour)?;
        if hour > 24 {
            return Err(ParseDateTimeError::new(BadHour, hour_start));
        }

        let minute_start = cursor.position + 1;
        cursor.expect(b':', BadMinute)?;
        let minute = cursor.two_digits(BadMinute)?;
        if minute > 59 {
            return Err(ParseDateTimeError::new(BadMinute, minute_start));
        }

        let second_start = cursor.position + 1;
        cursor.expect(b':', BadSecond)?;
        let second = cursor.two_digits(BadSecond)?;
        if second > 59 {
            return Err(ParseDateTimeError::new(BadSecond, second_start));
        }

        let microsecond = if cursor.eat(b'.') {
            parse_fraction(&mut cursor)?
        } else {
            0
        };

        // 24:00:00 is the only valid time with an hour of 24.
        if hour == 24 && (minute != 0 || second != 0 || microsecond != 0) {
            return Err(ParseDateTimeError::new(BadHour, hour_start));
        }

        (hour, minute, second, microsecond)
    } else {
        (12, 0, 0, 0)
    };

    let timezone = parse_timezone(&mut cursor)?;

    if !cursor.is_at_end() {
        return Err(ParseDateTimeError::new(TrailingChars, cursor.position));
    }

    Ok(LexicalDateTime {
        year,
        month,
        day,
        hour,
        minute,
        second,
        microsecond,
        timezone,
    })
}

fn parse_year(cursor: &mut Cursor<'_>) -> Result<i64, ParseDateTimeError> {
    let negative = cursor.eat(b'-');
    let start = cursor.position;
    let bad_year = ParseDateTimeError::new(ParseDateTimeErrorKind::BadYear, start);

    let digits = cursor.take_digits();
    if digits.len() < 4 || (digits.len() > 4 && digits[0] == b'0') {
        return Err(bad_year);
    }

    let mut magnitude: i64 = 0;
    for digit in digits {
        magnitude = magnitude
            .checked_mul(10)
            .and_then(|value| value.checked_add(i64::from(digit - b'0')))
            .ok_or(bad_year)?;
    }
    if magnitude == 0 || magnitude >= MAX_YEAR_MAGNITUDE {
        return Err(bad_year);
    }

    Ok(if negative { -magnitude } else { magnitude })
}

/// Parses the digits after the decimal point, truncating them to microseconds.
fn parse_fraction(cursor: &mut Cursor<'_>) -> Result<u32, ParseDateTimeError> {
    let start = cursor.position;
    let digits = cursor.take_digits();
    if digits.is_empty() {
        return Err(ParseDateTimeError::new(ParseDateTimeErrorKind::BadFraction, start));
    }

    let mut microsecond = 0;
    for index in 0..MICROSECOND_DIGITS {
        let digit = digits.get(index).map_or(0, |digit| digit - b'0');
        microsecond = microsecond * 10 + u32::from(digit);
    }
    Ok(microsecond)
}

fn parse_timezone(cursor: &mut Cursor<'_>) -> Result<Timezone, ParseDateTimeError> {
    let start = cursor.position;
    let bad_timezone = ParseDateTimeError::new(ParseDateTimeErrorKind::BadTimezone, start);

    let sign = match cursor.peek() {
        Some(b'Z') => {
            cursor.position += 1;
            return Ok(Timezone::Zulu);
        }
        Some(b'+') => 1,
        Some(b'-') => -1,
        _ => return Ok(Timezone::Absent),
    };
    cursor.position += 1;

    let hours = cursor.two_digits(ParseDateTimeErrorKind::BadTimezone)?;
    cursor.expect(b':', ParseDateTimeErrorKind::BadTimezone)?;
    let minutes = cursor.two_digits(ParseDateTimeErrorKind::BadTimezone)?;
    if hours > 14 || minutes > 59 || (hours == 14 && minutes != 0) {
        return Err(bad_timezone);
    }

    let offset = i16::from(hours) * 60 + i16::from(minutes);
    debug_assert!(offset <= MAX_TIMEZONE_OFFSET_MINUTES);
    Ok(Timezone::Offset(sign * offset))
}

struct Cursor<'input> {
    input: &'input [u8],
    position: usize,
}

impl<'input> Cursor<'input> {
    fn new(input: &'input str) -> Self {
        Self {
            input: input.as_bytes(),
            position: 0,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.position).copied()
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn eat(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.position += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, byte: u8, kind: ParseDateTimeErrorKind) -> Result<(), ParseDateTimeError> {
        if self.eat(byte) {
            Ok(())
        } else {
            Err(ParseDateTimeError::new(kind, self.position))
        }
    }

    fn take_digits(&mut self) -> &'input [u8] {
        let start = self.position;
        while self.peek().is_some_and(|byte| byte.is_ascii_digit()) {
            self.position += 1;
        }
        &self.input[start..self.position]
    }

    /// Reads exactly two digits.
    fn two_digits(&mut self, kind: ParseDateTimeErrorKind) -> Result<u8, ParseDateTimeError> {
        let start = self.position;
        match self.input.get(start..start + 2) {
            Some([tens, ones]) if tens.is_ascii_digit() && ones.is_ascii_digit() => {
                self.position += 2;
                Ok((tens - b'0') * 10 + (ones - b'0'))
            }
            _ => Err(ParseDateTimeError::new(kind, start)),
        }
    }
}
