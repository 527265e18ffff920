//! Lexical and binary layouts of `DATE`, `DATETIME` and `TIMESTAMP` values.
//!
//! Values are first read into a [`RawDateTime`] that keeps the stored fields as-is, so
//! zero dates (`0000-00-00`) and partial dates (`1980-00-10`) survive until a caller
//! decides what to do with them.

use std::fmt::Write;

use colcodec_core::io::{BufExt, ShortRead};
use time::{Date, Month, PrimitiveDateTime, Time};

use super::mysql_time::parse_fraction;

#[derive(Debug, thiserror::Error)]
pub(crate) enum TemporalError {
    #[error("invalid temporal literal {0:?}")]
    Literal(String),

    #[error("invalid length {0} for a binary temporal value")]
    Length(u8),

    #[error("year {0} is out of range for MySQL")]
    Year(i32),

    #[error("fraction of {0} microseconds is not below one second")]
    Fraction(u32),

    #[error(transparent)]
    Truncated(#[from] ShortRead),

    #[error(transparent)]
    Range(#[from] time::error::ComponentRange),
}

/// The fields of a stored date or datetime, unvalidated.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub(crate) struct RawDateTime {
    pub(crate) year: u16,
    pub(crate) month: u8,
    pub(crate) day: u8,
    pub(crate) hour: u8,
    pub(crate) minute: u8,
    pub(crate) second: u8,
    pub(crate) microsecond: u32,
}

impl RawDateTime {
    pub(crate) fn from_date(date: Date) -> Result<Self, TemporalError> {
        Ok(Self {
            year: u16::try_from(date.year()).map_err(|_| TemporalError::Year(date.year()))?,
            month: date.month().into(),
            day: date.day(),
            ..Self::default()
        })
    }

    pub(crate) fn from_datetime(datetime: PrimitiveDateTime) -> Result<Self, TemporalError> {
        Ok(Self {
            hour: datetime.hour(),
            minute: datetime.minute(),
            second: datetime.second(),
            microsecond: datetime.microsecond(),
            ..Self::from_date(datetime.date())?
        })
    }

    /// `true` for a zero date or a date with a zero month or day.
    pub(crate) fn is_zero_date(&self) -> bool {
        self.month == 0 || self.day == 0
    }

    /// The calendar date, or `None` for a zero date.
    pub(crate) fn date(&self) -> Result<Option<Date>, TemporalError> {
        if self.is_zero_date() {
            return Ok(None);
        }

        Ok(Some(Date::from_calendar_date(
            i32::from(self.year),
            Month::try_from(self.month)?,
            self.day,
        )?))
    }

    pub(crate) fn time(&self) -> Result<Time, TemporalError> {
        Ok(Time::from_hms_micro(
            self.hour,
            self.minute,
            self.second,
            self.microsecond,
        )?)
    }

    /// The date and time, or `None` for a zero date.
    pub(crate) fn datetime(&self) -> Result<Option<PrimitiveDateTime>, TemporalError> {
        let Some(date) = self.date()? else {
            return Ok(None);
        };

        Ok(Some(PrimitiveDateTime::new(date, self.time()?)))
    }

    /// Parses `YYYY-MM-DD`.
    pub(crate) fn parse_date(s: &str) -> Result<Self, TemporalError> {
        let invalid = || TemporalError::Literal(s.to_owned());

        let mut parts = s.splitn(3, '-');

        let year = digits(parts.next(), 4).ok_or_else(invalid)?;
        let month = digits(parts.next(), 2).ok_or_else(invalid)?;
        let day = digits(parts.next(), 2).ok_or_else(invalid)?;

        Ok(Self {
            year: u16::try_from(year).map_err(|_| invalid())?,
            month: u8::try_from(month).map_err(|_| invalid())?,
            day: u8::try_from(day).map_err(|_| invalid())?,
            ..Self::default()
        })
    }

    /// Parses `YYYY-MM-DD[( |T)HH:MM:SS[.fraction]]`.
    pub(crate) fn parse_datetime(s: &str) -> Result<Self, TemporalError> {
        let invalid = || TemporalError::Literal(s.to_owned());

        let (date, clock) = match s.split_once([' ', 'T']) {
            Some((date, clock)) => (date, Some(clock)),
            None => (s, None),
        };

        let mut raw = Self::parse_date(date).map_err(|_| invalid())?;

        let Some(clock) = clock else {
            return Ok(raw);
        };

        let (clock, fraction) = match clock.split_once('.') {
            Some((clock, fraction)) => (clock, Some(fraction)),
            None => (clock, None),
        };

        let mut parts = clock.split(':');

        let hour = digits(parts.next(), 2).ok_or_else(invalid)?;
        let minute = digits(parts.next(), 2).ok_or_else(invalid)?;
        let second = digits(parts.next(), 2).ok_or_else(invalid)?;

        if parts.next().is_some() {
            return Err(invalid());
        }

        raw.hour = u8::try_from(hour).map_err(|_| invalid())?;
        raw.minute = u8::try_from(minute).map_err(|_| invalid())?;
        raw.second = u8::try_from(second).map_err(|_| invalid())?;
        raw.microsecond = match fraction {
            Some(fraction) => parse_fraction(fraction).ok_or_else(invalid)?,
            None => 0,
        };

        Ok(raw)
    }

    /// Decodes the binary protocol form, including its leading length byte.
    ///
    /// <https://mariadb.com/kb/en/resultset-row/#timestamp-binary-encoding>
    pub(crate) fn decode(mut buf: &[u8]) -> Result<Self, TemporalError> {
        let len = buf.checked_u8()?;
        let mut raw = Self::default();

        if len == 0 {
            // zero date
            return Ok(raw);
        }

        if !matches!(len, 4 | 7 | 11) {
            return Err(TemporalError::Length(len));
        }

        raw.year = buf.checked_u16_le()?;
        raw.month = buf.checked_u8()?;
        raw.day = buf.checked_u8()?;

        if len > 4 {
            raw.hour = buf.checked_u8()?;
            raw.minute = buf.checked_u8()?;
            raw.second = buf.checked_u8()?;
        }

        if len > 7 {
            raw.microsecond = buf.checked_u32_le()?;

            if raw.microsecond > 999_999 {
                return Err(TemporalError::Fraction(raw.microsecond));
            }
        }

        Ok(raw)
    }

    /// Appends the binary protocol form of the date part alone.
    pub(crate) fn encode_date(&self, buf: &mut Vec<u8>) {
        if self.year == 0 && self.month == 0 && self.day == 0 {
            buf.push(0);
            return;
        }

        buf.push(4);
        self.encode_date_fields(buf);
    }

    /// Appends the binary protocol form, using the shortest length that holds the value.
    pub(crate) fn encode_datetime(&self, buf: &mut Vec<u8>) {
        // to save space the packet can be compressed:
        let len: u8 = match (self.hour, self.minute, self.second, self.microsecond) {
            // if hour, minutes, seconds and micro_seconds are all 0,
            // length is 4 and no other field is sent
            (0, 0, 0, 0) => return self.encode_date(buf),

            // if micro_seconds is 0, length is 7
            // and micro_seconds is not sent
            (_, _, _, 0) => 7,

            // otherwise length is 11
            (_, _, _, _) => 11,
        };

        buf.push(len);
        self.encode_date_fields(buf);

        buf.push(self.hour);
        buf.push(self.minute);
        buf.push(self.second);

        if len > 7 {
            buf.extend_from_slice(&self.microsecond.to_le_bytes());
        }
    }

    fn encode_date_fields(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.year.to_le_bytes());
        buf.push(self.month);
        buf.push(self.day);
    }

    /// `YYYY-MM-DD`, keeping zero fields as stored.
    pub(crate) fn format_date(&self) -> String {
        format!("{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }

    /// `YYYY-MM-DD HH:MM:SS`, followed by `digits` fractional digits.
    pub(crate) fn format_datetime(&self, digits: u8) -> String {
        let mut s = self.format_date();

        // writing to a String cannot fail
        let _ = write!(
            s,
            " {:02}:{:02}:{:02}",
            self.hour, self.minute, self.second
        );

        push_fraction(&mut s, self.microsecond, digits);
        s
    }
}

/// Appends `.` and the leading `digits` digits of a microsecond fraction, if `digits > 0`.
pub(crate) fn push_fraction(s: &mut String, microseconds: u32, digits: u8) {
    if digits == 0 {
        return;
    }

    debug_assert!(microseconds < 1_000_000, "fraction of {microseconds} microseconds");

    let fraction = format!("{microseconds:06}");
    let digits = usize::from(digits.min(6));

    s.push('.');
    s.push_str(&fraction[..digits]);
}

/// The number of fractional digits needed to print `microseconds` exactly.
pub(crate) fn fraction_digits(microseconds: u32) -> u8 {
    if microseconds == 0 {
        return 0;
    }

    let mut digits = 6;
    let mut rest = microseconds;

    while digits > 0 && rest % 10 == 0 {
        rest /= 10;
        digits -= 1;
    }

    digits
}

fn digits(part: Option<&str>, len: usize) -> Option<u32> {
    let part = part?;

    if part.len() != len || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    part.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    #[test]
    fn it_keeps_zero_and_partial_dates() {
        let raw = RawDateTime::parse_datetime("0000-00-00 00:00:00").unwrap();
        assert!(raw.is_zero_date());
        assert_eq!(raw.datetime().unwrap(), None);
        assert_eq!(raw.format_datetime(0), "0000-00-00 00:00:00");

        let raw = RawDateTime::parse_date("1980-00-10").unwrap();
        assert!(raw.is_zero_date());
        assert_eq!(raw.format_date(), "1980-00-10");
    }

    #[test]
    fn it_parses_full_fractions() {
        let raw = RawDateTime::parse_datetime("1000-01-01 01:55:13.212345").unwrap();
        assert_eq!(
            raw.datetime().unwrap(),
            Some(datetime!(1000-01-01 01:55:13.212345))
        );

        let raw = RawDateTime::parse_datetime("2021-05-06T07:08:09.5").unwrap();
        assert_eq!(raw.microsecond, 500_000);

        assert!(RawDateTime::parse_datetime("2021-05-06 7:08:09").is_err());
        assert!(RawDateTime::parse_date("21-05-06").is_err());
    }

    #[test]
    fn it_rejects_impossible_dates() {
        let raw = RawDateTime::parse_date("2021-02-30").unwrap();
        assert!(raw.date().is_err());
    }

    #[test]
    fn it_uses_the_shortest_binary_layout() {
        let mut buf = Vec::new();
        RawDateTime::from_date(date!(2010-10-17))
            .unwrap()
            .encode_datetime(&mut buf);
        assert_eq!(buf, [4, 0xda, 0x07, 10, 17]);

        buf.clear();
        RawDateTime::from_datetime(datetime!(2010-10-17 19:27:30.000001))
            .unwrap()
            .encode_datetime(&mut buf);
        assert_eq!(buf, [11, 0xda, 0x07, 10, 17, 19, 27, 30, 1, 0, 0, 0]);

        let raw = RawDateTime::decode(&buf).unwrap();
        assert_eq!(raw.microsecond, 1);
    }

    #[test]
    fn it_rejects_bad_binary_lengths() {
        assert!(matches!(
            RawDateTime::decode(&[5, 0, 0, 0, 0, 0]),
            Err(TemporalError::Length(5))
        ));
        assert!(matches!(
            RawDateTime::decode(&[7, 0xda, 0x07]),
            Err(TemporalError::Truncated(_))
        ));
        assert!(RawDateTime::decode(&[0]).unwrap().is_zero_date());
    }

    #[test]
    fn it_rejects_fractions_of_a_second_or_more() {
        let mut buf = vec![11, 0xda, 0x07, 10, 17, 19, 27, 30];
        buf.extend_from_slice(&10_000_000_u32.to_le_bytes());

        assert!(matches!(
            RawDateTime::decode(&buf),
            Err(TemporalError::Fraction(10_000_000))
        ));

        assert_eq!(fraction_digits(10_000_000), 0);
        assert_eq!(fraction_digits(1_000_000), 0);
    }

    #[test]
    fn it_counts_fraction_digits() {
        assert_eq!(fraction_digits(0), 0);
        assert_eq!(fraction_digits(550_000), 2);
        assert_eq!(fraction_digits(212_345), 6);
    }
}
