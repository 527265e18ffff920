//! Epoch-based temporal values with millisecond resolution.
//!
//! These mirror the date, time and timestamp handles of older database APIs: each is a
//! wall-clock reading bound to the client zone it was produced in, reporting its
//! position as milliseconds since the Unix epoch. Fractions below a millisecond are
//! truncated when computing that position (never rounded), but a [`SqlTimestamp`] keeps
//! its full fraction for display.

use std::fmt::{self, Display};

use time::{Date, OffsetDateTime, PrimitiveDateTime, Time};

use crate::tz::Zone;

fn epoch_millis(instant: OffsetDateTime) -> i64 {
    // `unix_timestamp` floors to the second; the fraction is always non-negative
    instant.unix_timestamp() * 1000 + i64::from(instant.millisecond())
}

// past the range of the zone database the reading is taken as UTC
fn resolve(local: PrimitiveDateTime, zone: &Zone) -> OffsetDateTime {
    zone.assume_local(local)
        .unwrap_or_else(|| local.assume_utc())
}

fn write_date(f: &mut fmt::Formatter<'_>, date: Date) -> fmt::Result {
    write!(
        f,
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

fn write_time(f: &mut fmt::Formatter<'_>, time: Time) -> fmt::Result {
    write!(
        f,
        "{:02}:{:02}:{:02}",
        time.hour(),
        time.minute(),
        time.second()
    )
}

/// A calendar date at midnight in the zone it was produced in.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SqlDate {
    date: Date,
    zone: Zone,
}

impl SqlDate {
    pub const fn new(date: Date, zone: Zone) -> Self {
        Self { date, zone }
    }

    pub const fn date(&self) -> Date {
        self.date
    }

    pub const fn zone(&self) -> &Zone {
        &self.zone
    }

    pub fn epoch_millis(&self) -> i64 {
        epoch_millis(resolve(self.date.midnight(), &self.zone))
    }
}

impl Display for SqlDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_date(f, self.date)
    }
}

/// A time of day on 1970-01-01 in the zone it was produced in.
///
/// The fraction is kept to the millisecond; it is not shown by `Display`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SqlTime {
    time: Time,
    zone: Zone,
}

impl SqlTime {
    pub fn new(time: Time, zone: Zone) -> Self {
        // the fraction below a millisecond is not representable
        let time = time
            .replace_nanosecond(u32::from(time.millisecond()) * 1_000_000)
            .unwrap_or(time);

        Self { time, zone }
    }

    pub const fn time(&self) -> Time {
        self.time
    }

    pub const fn zone(&self) -> &Zone {
        &self.zone
    }

    pub fn epoch_millis(&self) -> i64 {
        epoch_millis(resolve(
            PrimitiveDateTime::new(OffsetDateTime::UNIX_EPOCH.date(), self.time),
            &self.zone,
        ))
    }
}

impl Display for SqlTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_time(f, self.time)
    }
}

/// A date and time in the zone it was produced in, with nanosecond fraction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SqlTimestamp {
    datetime: PrimitiveDateTime,
    zone: Zone,
}

impl SqlTimestamp {
    pub const fn new(datetime: PrimitiveDateTime, zone: Zone) -> Self {
        Self { datetime, zone }
    }

    /// Presents `instant` on a clock in `zone`.
    pub fn from_instant(instant: OffsetDateTime, zone: Zone) -> Option<Self> {
        let local = zone.localize(instant)?;

        Some(Self {
            datetime: PrimitiveDateTime::new(local.date(), local.time()),
            zone,
        })
    }

    pub const fn datetime(&self) -> PrimitiveDateTime {
        self.datetime
    }

    pub const fn zone(&self) -> &Zone {
        &self.zone
    }

    pub fn instant(&self) -> OffsetDateTime {
        resolve(self.datetime, &self.zone)
    }

    pub fn epoch_millis(&self) -> i64 {
        epoch_millis(self.instant())
    }

    /// The fraction of the second, in nanoseconds.
    pub fn nanos(&self) -> u32 {
        self.datetime.nanosecond()
    }
}

impl Display for SqlTimestamp {
    /// `yyyy-mm-dd hh:mm:ss.f…`, printing the fraction without trailing zeros but with
    /// at least one digit.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_date(f, self.datetime.date())?;
        f.write_str(" ")?;
        write_time(f, self.datetime.time())?;

        let nanos = self.nanos();

        if nanos == 0 {
            return f.write_str(".0");
        }

        let digits = format!("{nanos:09}");
        write!(f, ".{}", digits.trim_end_matches('0'))
    }
}

/// A point in time as milliseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LegacyDate(i64);

impl LegacyDate {
    pub const fn from_epoch_millis(millis: i64) -> Self {
        LegacyDate(millis)
    }

    pub fn from_instant(instant: OffsetDateTime) -> Self {
        LegacyDate(epoch_millis(instant))
    }

    pub const fn epoch_millis(&self) -> i64 {
        self.0
    }

    /// The instant in UTC, if it is within the supported range of years.
    pub fn instant(&self) -> Option<OffsetDateTime> {
        OffsetDateTime::from_unix_timestamp_nanos(i128::from(self.0) * 1_000_000).ok()
    }
}

impl Display for LegacyDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.instant() {
            Some(instant) => {
                write_date(f, instant.date())?;
                f.write_str("T")?;
                write_time(f, instant.time())?;
                write!(f, ".{:03}Z", instant.millisecond())
            }

            None => write!(f, "{}ms", self.0),
        }
    }
}
