use std::fmt::{self, Display, Formatter};

use colcodec_core::io::{BufExt, ShortRead};
use time::{Duration, Time};

/// The sign of a [`MySqlTime`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MySqlTimeSign {
    Positive,
    Negative,
}

/// A `TIME` value.
///
/// MySQL uses `TIME` both for a time of day and for a signed interval of up to
/// 838 hours in either direction, so this type models the full range:
/// `-838:59:59.999999` to `838:59:59.999999`.
///
/// <https://dev.mysql.com/doc/refman/8.0/en/time.html>
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct MySqlTime {
    sign: MySqlTimeSign,
    hours: u32,
    minutes: u8,
    seconds: u8,
    microseconds: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum MySqlTimeError {
    #[error("value out of range for MySQL TIME: {0}")]
    OutOfRange(String),

    #[error("invalid TIME literal {0:?}")]
    Literal(String),

    #[error("invalid length {0} for a binary TIME value")]
    Length(u8),

    #[error(transparent)]
    Truncated(#[from] ShortRead),
}

const MICROS_PER_SECOND: i64 = 1_000_000;
const MICROS_PER_DAY: i64 = 86_400 * MICROS_PER_SECOND;

impl MySqlTime {
    /// The largest hour component.
    pub const MAX_HOURS: u32 = 838;

    pub const ZERO: MySqlTime = MySqlTime {
        sign: MySqlTimeSign::Positive,
        hours: 0,
        minutes: 0,
        seconds: 0,
        microseconds: 0,
    };

    pub fn new(
        sign: MySqlTimeSign,
        hours: u32,
        minutes: u8,
        seconds: u8,
        microseconds: u32,
    ) -> Result<Self, MySqlTimeError> {
        if hours > Self::MAX_HOURS || minutes > 59 || seconds > 59 || microseconds > 999_999 {
            return Err(MySqlTimeError::OutOfRange(format!(
                "{hours}:{minutes}:{seconds}.{microseconds}"
            )));
        }

        let time = Self {
            sign,
            hours,
            minutes,
            seconds,
            microseconds,
        };

        // there is no negative zero
        Ok(if time.is_zero() {
            Self::ZERO
        } else {
            time
        })
    }

    pub fn sign(&self) -> MySqlTimeSign {
        self.sign
    }

    pub fn is_negative(&self) -> bool {
        self.sign == MySqlTimeSign::Negative
    }

    pub fn hours(&self) -> u32 {
        self.hours
    }

    pub fn minutes(&self) -> u8 {
        self.minutes
    }

    pub fn seconds(&self) -> u8 {
        self.seconds
    }

    pub fn microseconds(&self) -> u32 {
        self.microseconds
    }

    fn is_zero(&self) -> bool {
        self.hours == 0 && self.minutes == 0 && self.seconds == 0 && self.microseconds == 0
    }

    /// The signed length of this interval in microseconds.
    pub fn total_microseconds(&self) -> i64 {
        let magnitude = ((i64::from(self.hours) * 60 + i64::from(self.minutes)) * 60
            + i64::from(self.seconds))
            * MICROS_PER_SECOND
            + i64::from(self.microseconds);

        match self.sign {
            MySqlTimeSign::Positive => magnitude,
            MySqlTimeSign::Negative => -magnitude,
        }
    }

    fn from_total_microseconds(micros: i64) -> Result<Self, MySqlTimeError> {
        let sign = if micros < 0 {
            MySqlTimeSign::Negative
        } else {
            MySqlTimeSign::Positive
        };

        let magnitude = micros.unsigned_abs();
        let secs = magnitude / 1_000_000;

        let out_of_range = || MySqlTimeError::OutOfRange(format!("{micros}us"));

        Self::new(
            sign,
            u32::try_from(secs / 3600).map_err(|_| out_of_range())?,
            u8::try_from(secs / 60 % 60).map_err(|_| out_of_range())?,
            u8::try_from(secs % 60).map_err(|_| out_of_range())?,
            u32::try_from(magnitude % 1_000_000).map_err(|_| out_of_range())?,
        )
    }

    /// The exact signed interval.
    pub fn to_duration(&self) -> Duration {
        Duration::microseconds(self.total_microseconds())
    }

    /// Converts an interval, truncating below a microsecond.
    pub fn from_duration(duration: Duration) -> Result<Self, MySqlTimeError> {
        let micros = i64::try_from(duration.whole_microseconds())
            .map_err(|_| MySqlTimeError::OutOfRange(duration.to_string()))?;

        Self::from_total_microseconds(micros)
    }

    /// The time of day this value lands on, counting from midnight.
    ///
    /// Values outside `00:00:00..24:00:00` wrap around, so `-18:30:12.55` is
    /// `05:29:47.45`.
    pub fn to_time_of_day(&self) -> Time {
        let micros = self.total_microseconds().rem_euclid(MICROS_PER_DAY);

        Time::MIDNIGHT + Duration::microseconds(micros)
    }

    /// A time of day, truncated to the microsecond.
    pub fn from_time_of_day(time: Time) -> Self {
        Self {
            sign: MySqlTimeSign::Positive,
            hours: u32::from(time.hour()),
            minutes: time.minute(),
            seconds: time.second(),
            microseconds: time.microsecond(),
        }
    }

    /// Parses the text protocol form: `[-]H…H:MM:SS[.ffffff]`.
    pub fn parse(s: &str) -> Result<Self, MySqlTimeError> {
        let invalid = || MySqlTimeError::Literal(s.to_owned());

        let (sign, rest) = match s.strip_prefix('-') {
            Some(rest) => (MySqlTimeSign::Negative, rest),
            None => (MySqlTimeSign::Positive, s),
        };

        let (clock, fraction) = match rest.split_once('.') {
            Some((clock, fraction)) => (clock, Some(fraction)),
            None => (rest, None),
        };

        let mut parts = clock.split(':');

        let hours = parse_digits(parts.next(), 1..=3).ok_or_else(invalid)?;
        let minutes = parse_digits(parts.next(), 2..=2).ok_or_else(invalid)?;
        let seconds = parse_digits(parts.next(), 2..=2).ok_or_else(invalid)?;

        if parts.next().is_some() {
            return Err(invalid());
        }

        let microseconds = match fraction {
            Some(fraction) => parse_fraction(fraction).ok_or_else(invalid)?,
            None => 0,
        };

        Self::new(
            sign,
            hours,
            u8::try_from(minutes).map_err(|_| invalid())?,
            u8::try_from(seconds).map_err(|_| invalid())?,
            microseconds,
        )
    }

    /// Decodes the binary protocol form, including its leading length byte.
    ///
    /// <https://mariadb.com/kb/en/resultset-row/#time-binary-encoding>
    pub(crate) fn decode_binary(mut buf: &[u8]) -> Result<Self, MySqlTimeError> {
        let len = buf.checked_u8()?;

        if len == 0 {
            return Ok(Self::ZERO);
        }

        if len != 8 && len != 12 {
            return Err(MySqlTimeError::Length(len));
        }

        let sign = if buf.checked_u8()? == 1 {
            MySqlTimeSign::Negative
        } else {
            MySqlTimeSign::Positive
        };

        let days = buf.checked_u32_le()?;
        let hour = buf.checked_u8()?;
        let minutes = buf.checked_u8()?;
        let seconds = buf.checked_u8()?;

        let microseconds = if len == 12 { buf.checked_u32_le()? } else { 0 };

        let hours = days
            .checked_mul(24)
            .and_then(|h| h.checked_add(u32::from(hour)))
            .ok_or_else(|| MySqlTimeError::OutOfRange(format!("{days} days")))?;

        Self::new(sign, hours, minutes, seconds, microseconds)
    }

    /// Appends the binary protocol form, including its leading length byte.
    pub(crate) fn encode_binary(&self, buf: &mut Vec<u8>) {
        let len: u8 = if self.microseconds == 0 { 8 } else { 12 };

        buf.push(len);
        buf.push(u8::from(self.is_negative()));
        buf.extend_from_slice(&(self.hours / 24).to_le_bytes());

        // `hours % 24` is always below 24
        buf.push(u8::try_from(self.hours % 24).unwrap_or_default());
        buf.push(self.minutes);
        buf.push(self.seconds);

        if len > 8 {
            buf.extend_from_slice(&self.microseconds.to_le_bytes());
        }
    }

    /// Formats with exactly `digits` fractional digits (at most 6).
    pub(crate) fn format_with_fraction(&self, digits: u8) -> String {
        let mut s = String::with_capacity(17);

        if self.is_negative() {
            s.push('-');
        }

        s.push_str(&format!(
            "{:02}:{:02}:{:02}",
            self.hours, self.minutes, self.seconds
        ));

        super::temporal::push_fraction(&mut s, self.microseconds, digits);
        s
    }
}

impl Display for MySqlTime {
    /// Prints `[-]HH:MM:SS`, followed by all six fractional digits if there is a fraction.
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let digits = if self.microseconds == 0 { 0 } else { 6 };
        f.pad(&self.format_with_fraction(digits))
    }
}

impl TryFrom<Duration> for MySqlTime {
    type Error = MySqlTimeError;

    fn try_from(value: Duration) -> Result<Self, Self::Error> {
        Self::from_duration(value)
    }
}

impl From<Time> for MySqlTime {
    fn from(value: Time) -> Self {
        Self::from_time_of_day(value)
    }
}

impl From<MySqlTime> for Duration {
    fn from(time: MySqlTime) -> Self {
        time.to_duration()
    }
}

fn parse_digits(part: Option<&str>, len: std::ops::RangeInclusive<usize>) -> Option<u32> {
    let part = part?;

    if !len.contains(&part.len()) || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    part.parse().ok()
}

// up to nine digits; anything past the microsecond is dropped
pub(crate) fn parse_fraction(fraction: &str) -> Option<u32> {
    if fraction.is_empty()
        || fraction.len() > 9
        || !fraction.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }

    let digits: String = fraction.chars().chain("000000".chars()).take(6).collect();
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::time;

    #[test]
    fn it_parses_text_times() {
        let t = MySqlTime::parse("-18:30:12.55").unwrap();
        assert!(t.is_negative());
        assert_eq!(t.hours(), 18);
        assert_eq!(t.microseconds(), 550_000);

        let t = MySqlTime::parse("838:59:59").unwrap();
        assert_eq!(t.hours(), 838);

        assert!(MySqlTime::parse("839:00:00").is_err());
        assert!(MySqlTime::parse("12:3:00").is_err());
        assert!(MySqlTime::parse("12:30").is_err());
    }

    #[test]
    fn it_wraps_negative_times_into_a_day() {
        let t = MySqlTime::parse("-18:30:12.55").unwrap();

        assert_eq!(t.to_time_of_day(), time!(05:29:47.45));
        assert_eq!(
            t.to_duration(),
            -(Duration::hours(18) + Duration::minutes(30) + Duration::milliseconds(12_550))
        );
    }

    #[test]
    fn it_decodes_binary_days() {
        // 1 day, 10:20:30.000400, negative
        let buf = [12, 1, 1, 0, 0, 0, 10, 20, 30, 0x90, 0x01, 0, 0];
        let t = MySqlTime::decode_binary(&buf).unwrap();

        assert_eq!(t.to_string(), "-34:20:30.000400");

        let mut out = Vec::new();
        t.encode_binary(&mut out);
        assert_eq!(out, buf);
    }

    #[test]
    fn it_rejects_bad_binary_lengths() {
        assert_eq!(
            MySqlTime::decode_binary(&[5, 0, 0, 0, 0, 0]),
            Err(MySqlTimeError::Length(5))
        );
        assert!(MySqlTime::decode_binary(&[8, 0, 0]).is_err());
        assert_eq!(MySqlTime::decode_binary(&[0]), Ok(MySqlTime::ZERO));
    }

    #[test]
    fn it_normalizes_negative_zero() {
        let t = MySqlTime::parse("-00:00:00").unwrap();
        assert!(!t.is_negative());
    }
}
