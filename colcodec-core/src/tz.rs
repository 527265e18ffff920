//! Time zones and the context temporal values are interpreted in.
//!
//! A [`Zone`] is either a fixed UTC offset or a region of the IANA time zone database,
//! whose offset depends on the instant (daylight saving time and historical changes).
//! Nothing in this module reads the time zone of the host; every zone is supplied
//! explicitly.

use std::fmt::{self, Display};
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use jiff::tz::TimeZone;
use time::{Duration, OffsetDateTime, PrimitiveDateTime, UtcOffset};

/// A time zone: a fixed offset from UTC, or a named region such as `Europe/Paris`.
#[derive(Debug, Clone)]
pub struct Zone(Repr);

#[derive(Debug, Clone)]
enum Repr {
    Fixed(UtcOffset),
    Region(TimeZone),
}

impl Zone {
    pub const UTC: Zone = Zone(Repr::Fixed(UtcOffset::UTC));

    pub const fn fixed(offset: UtcOffset) -> Self {
        Zone(Repr::Fixed(offset))
    }

    pub fn from_hms(hours: i8, minutes: i8, seconds: i8) -> Result<Self, InvalidZone> {
        UtcOffset::from_hms(hours, minutes, seconds)
            .map(Zone::fixed)
            .map_err(|e| InvalidZone(e.to_string()))
    }

    /// Looks up a region of the IANA time zone database, such as `America/New_York`.
    pub fn named(name: &str) -> Result<Self, InvalidZone> {
        TimeZone::get(name)
            .map(|tz| Zone(Repr::Region(tz)))
            .map_err(|_| InvalidZone(name.to_owned()))
    }

    /// The offset of a fixed zone; `None` for a region.
    pub const fn fixed_offset(&self) -> Option<UtcOffset> {
        match self.0 {
            Repr::Fixed(offset) => Some(offset),
            Repr::Region(_) => None,
        }
    }

    /// The database name of a region; `None` for a fixed offset.
    pub fn name(&self) -> Option<&str> {
        match &self.0 {
            Repr::Fixed(_) => None,
            Repr::Region(tz) => tz.iana_name(),
        }
    }

    /// The offset from UTC in effect at `instant`.
    ///
    /// Returns `None` if the instant is outside the range the zone database covers.
    pub fn offset_at(&self, instant: OffsetDateTime) -> Option<UtcOffset> {
        match &self.0 {
            Repr::Fixed(offset) => Some(*offset),
            Repr::Region(tz) => {
                let seconds = tz.to_offset(to_timestamp(instant)?).seconds();
                UtcOffset::from_whole_seconds(seconds).ok()
            }
        }
    }

    /// Expresses `instant` in this zone.
    ///
    /// Returns `None` if the local date falls outside the supported range of years.
    pub fn localize(&self, instant: OffsetDateTime) -> Option<OffsetDateTime> {
        let offset = self.offset_at(instant)?;
        let shift = i64::from(offset.whole_seconds()) - i64::from(instant.offset().whole_seconds());
        let local = PrimitiveDateTime::new(instant.date(), instant.time())
            .checked_add(Duration::seconds(shift))?;

        Some(local.assume_offset(offset))
    }

    /// The instant that shows `local` on a clock in this zone, expressed in this zone.
    ///
    /// A reading skipped by a forward transition is moved forward by the length of the
    /// gap; a reading repeated by a backward transition takes the earlier instant.
    pub fn assume_local(&self, local: PrimitiveDateTime) -> Option<OffsetDateTime> {
        match &self.0 {
            Repr::Fixed(offset) => Some(local.assume_offset(*offset)),
            Repr::Region(tz) => {
                let timestamp = tz.to_ambiguous_timestamp(to_civil(local)?).compatible().ok()?;
                let instant = OffsetDateTime::from_unix_timestamp_nanos(timestamp.as_nanosecond()).ok()?;

                self.localize(instant)
            }
        }
    }
}

fn to_timestamp(instant: OffsetDateTime) -> Option<jiff::Timestamp> {
    let nanos = i32::try_from(instant.nanosecond()).ok()?;
    jiff::Timestamp::new(instant.unix_timestamp(), nanos).ok()
}

fn to_civil(local: PrimitiveDateTime) -> Option<jiff::civil::DateTime> {
    jiff::civil::DateTime::new(
        i16::try_from(local.year()).ok()?,
        i8::try_from(u8::from(local.month())).ok()?,
        i8::try_from(local.day()).ok()?,
        i8::try_from(local.hour()).ok()?,
        i8::try_from(local.minute()).ok()?,
        i8::try_from(local.second()).ok()?,
        i32::try_from(local.nanosecond()).ok()?,
    )
    .ok()
}

impl Default for Zone {
    fn default() -> Self {
        Zone::UTC
    }
}

// regions compare by name: two lookups of one name are the same zone
impl PartialEq for Zone {
    fn eq(&self, other: &Self) -> bool {
        match (&self.0, &other.0) {
            (Repr::Fixed(a), Repr::Fixed(b)) => a == b,
            (Repr::Region(a), Repr::Region(b)) => a.iana_name() == b.iana_name(),
            _ => false,
        }
    }
}

impl Eq for Zone {}

impl Hash for Zone {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match &self.0 {
            Repr::Fixed(offset) => offset.hash(state),
            Repr::Region(tz) => tz.iana_name().hash(state),
        }
    }
}

impl Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let offset = match &self.0 {
            Repr::Fixed(offset) => *offset,
            Repr::Region(tz) => return f.write_str(tz.iana_name().unwrap_or("unnamed")),
        };

        if offset.is_utc() {
            return f.write_str("UTC");
        }

        let (h, m, s) = offset.as_hms();
        let sign = if offset.is_negative() { '-' } else { '+' };

        write!(f, "{sign}{:02}:{:02}", h.unsigned_abs(), m.unsigned_abs())?;

        if s != 0 {
            write!(f, ":{:02}", s.unsigned_abs())?;
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time zone: {0}")]
pub struct InvalidZone(String);

impl FromStr for Zone {
    type Err = InvalidZone;

    /// Accepts `UTC`, `Z`, `GMT`, offsets such as `+02:00`, `-0530`, `+2` or
    /// `GMT+01:00`, and region names such as `Europe/Paris`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if ["UTC", "Z", "GMT", "UT"]
            .iter()
            .any(|name| s.eq_ignore_ascii_case(name))
        {
            return Ok(Zone::UTC);
        }

        let offset = ["UTC", "GMT", "UT"]
            .iter()
            .find_map(|prefix| {
                s.get(..prefix.len())
                    .filter(|head| head.eq_ignore_ascii_case(prefix))
                    .map(|_| &s[prefix.len()..])
            })
            .unwrap_or(s);

        if offset.starts_with(['+', '-']) {
            return parse_offset(offset).ok_or_else(|| InvalidZone(s.to_owned()));
        }

        Zone::named(s)
    }
}

fn parse_offset(s: &str) -> Option<Zone> {
    let (negative, rest) = match s.as_bytes().first()? {
        b'+' => (false, &s[1..]),
        b'-' => (true, &s[1..]),
        _ => return None,
    };

    let mut parts = [0_i8; 3];

    if rest.contains(':') {
        for (i, part) in rest.split(':').enumerate() {
            if i >= 3 || part.is_empty() || part.len() > 2 {
                return None;
            }

            parts[i] = part.parse().ok()?;
        }
    } else {
        if !rest.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }

        match rest.len() {
            1 | 2 => parts[0] = rest.parse().ok()?,
            4 => {
                parts[0] = rest[..2].parse().ok()?;
                parts[1] = rest[2..].parse().ok()?;
            }
            _ => return None,
        }
    }

    if negative {
        parts.iter_mut().for_each(|p| *p = -*p);
    }

    UtcOffset::from_hms(parts[0], parts[1], parts[2])
        .ok()
        .map(Zone::fixed)
}

/// An instant together with the zone it is presented in.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ZonedDateTime {
    datetime: OffsetDateTime,
    zone: Zone,
}

impl ZonedDateTime {
    /// The instant that shows `local` on a clock in `zone`.
    ///
    /// Returns `None` if the reading is outside the range the zone can resolve.
    pub fn from_local(local: PrimitiveDateTime, zone: Zone) -> Option<Self> {
        Some(Self {
            datetime: zone.assume_local(local)?,
            zone,
        })
    }

    /// Presents `instant` in `zone`.
    pub fn from_instant(instant: OffsetDateTime, zone: Zone) -> Option<Self> {
        Some(Self {
            datetime: zone.localize(instant)?,
            zone,
        })
    }

    pub fn zone(&self) -> &Zone {
        &self.zone
    }

    /// The wall-clock reading in this value's zone.
    pub fn local(&self) -> PrimitiveDateTime {
        PrimitiveDateTime::new(self.datetime.date(), self.datetime.time())
    }

    pub fn offset_date_time(&self) -> OffsetDateTime {
        self.datetime
    }

    /// Re-presents the same instant in another zone.
    pub fn with_zone_same_instant(&self, zone: Zone) -> Option<Self> {
        Self::from_instant(self.datetime, zone)
    }
}

impl Display for ZonedDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}T{}{}[{}]",
            self.datetime.date(),
            self.datetime.time(),
            self.datetime.offset(),
            self.zone
        )
    }
}

/// Time zone parameters for interpreting and producing temporal wire values.
///
/// Columns such as `DATETIME` carry wall-clock digits without a zone. The zone those
/// digits are read in (the *data zone*) is the session zone when instants are preserved,
/// and the client zone otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TimeZoneContext {
    pub session: Zone,
    pub client: Zone,
    pub preserve_instants: bool,
}

impl TimeZoneContext {
    pub fn new(session: Zone, client: Zone, preserve_instants: bool) -> Self {
        Self {
            session,
            client,
            preserve_instants,
        }
    }

    /// The zone stored wall-clock values are interpreted in.
    pub fn data_zone(&self) -> &Zone {
        if self.preserve_instants {
            &self.session
        } else {
            &self.client
        }
    }

    /// The instant a stored wall-clock value denotes.
    pub fn to_instant(&self, stored: PrimitiveDateTime) -> Option<OffsetDateTime> {
        self.data_zone().assume_local(stored)
    }

    /// The wall-clock value to store for `instant`.
    pub fn to_stored(&self, instant: OffsetDateTime) -> Option<PrimitiveDateTime> {
        let local = self.data_zone().localize(instant)?;

        Some(PrimitiveDateTime::new(local.date(), local.time()))
    }

    /// A stored wall-clock value as a zoned value in the client zone.
    pub fn to_client(&self, stored: PrimitiveDateTime) -> Option<ZonedDateTime> {
        ZonedDateTime::from_instant(self.to_instant(stored)?, self.client.clone())
    }
}
