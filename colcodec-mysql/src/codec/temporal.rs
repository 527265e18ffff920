use colcodec_core::types::{LegacyDate, SqlDate, SqlTime, SqlTimestamp};
use colcodec_core::{DecodeError, HostType, HostValue, ZonedDateTime};
use time::{OffsetDateTime, PrimitiveDateTime};

use super::{is_text, text_value, Cell};
use crate::types::temporal::{fraction_digits, RawDateTime};
use crate::types::MySqlTime;
use crate::MySqlValueFormat;

/// `true` for targets that read a calendar date (possibly with a time).
fn is_date_shaped(target: HostType) -> bool {
    matches!(
        target,
        HostType::Date
            | HostType::Timestamp
            | HostType::LocalDate
            | HostType::LocalDateTime
            | HostType::ZonedDateTime
            | HostType::OffsetDateTime
            | HostType::Instant
            | HostType::LegacyDate
    )
}

/// `true` for targets that read a time of day or an interval.
fn is_time_shaped(target: HostType) -> bool {
    matches!(
        target,
        HostType::Time | HostType::LocalTime | HostType::Duration
    )
}

pub(super) fn decode_date(cell: &Cell<'_>) -> Result<Option<HostValue>, DecodeError> {
    let target = cell.target;

    if !is_text(target) && !is_date_shaped(target) {
        return Err(cell.incompatible());
    }

    let raw = read_datetime(cell)?;

    if is_text(target) {
        let s = match cell.format {
            MySqlValueFormat::Text => cell.str()?.to_owned(),
            MySqlValueFormat::Binary => raw.format_date(),
        };

        return Ok(Some(text_value(target, s)));
    }

    if raw.is_zero_date() {
        return cell.zero_date(&raw.format_date());
    }

    let date = raw
        .date()
        .map_err(|e| cell.format_error(raw.format_date(), e))?
        .ok_or_else(|| cell.incompatible())?;

    calendar_value(cell, date.midnight()).map(Some)
}

pub(super) fn decode_time(cell: &Cell<'_>) -> Result<Option<HostValue>, DecodeError> {
    let target = cell.target;

    if !is_text(target) && !is_time_shaped(target) {
        return Err(cell.incompatible());
    }

    let time = match cell.format {
        MySqlValueFormat::Binary => {
            MySqlTime::decode_binary(cell.bytes).map_err(|e| cell.malformed(e))?
        }

        MySqlValueFormat::Text => {
            let s = cell.str()?;
            MySqlTime::parse(s).map_err(|e| cell.format_error(s, e))?
        }
    };

    if is_text(target) {
        let s = match cell.format {
            MySqlValueFormat::Text => cell.str()?.to_owned(),
            MySqlValueFormat::Binary => time.format_with_fraction(
                cell.ty
                    .decimals()
                    .min(6)
                    .max(fraction_digits(time.microseconds())),
            ),
        };

        return Ok(Some(text_value(target, s)));
    }

    time_value(cell, time).map(Some)
}

pub(super) fn decode_datetime(cell: &Cell<'_>) -> Result<Option<HostValue>, DecodeError> {
    let target = cell.target;

    if !is_text(target) && !is_date_shaped(target) && !is_time_of_day(target) {
        return Err(cell.incompatible());
    }

    let raw = read_datetime(cell)?;
    let digits = cell.ty.decimals().min(6).max(fraction_digits(raw.microsecond));

    if is_text(target) {
        let s = match cell.format {
            MySqlValueFormat::Text => cell.str()?.to_owned(),
            MySqlValueFormat::Binary => raw.format_datetime(digits),
        };

        return Ok(Some(text_value(target, s)));
    }

    if raw.is_zero_date() {
        return cell.zero_date(&raw.format_datetime(digits));
    }

    let stored = raw
        .datetime()
        .map_err(|e| cell.format_error(raw.format_datetime(digits), e))?
        .ok_or_else(|| cell.incompatible())?;

    instant_value(cell, stored).map(Some)
}

// a DATETIME can be read as a time of day but not as an interval
fn is_time_of_day(target: HostType) -> bool {
    matches!(target, HostType::Time | HostType::LocalTime)
}

fn read_datetime(cell: &Cell<'_>) -> Result<RawDateTime, DecodeError> {
    match cell.format {
        MySqlValueFormat::Binary => RawDateTime::decode(cell.bytes).map_err(|e| cell.malformed(e)),

        MySqlValueFormat::Text => {
            let s = cell.str()?;
            RawDateTime::parse_datetime(s).map_err(|e| cell.format_error(s, e))
        }
    }
}

/// A stored `DATETIME` or `TIMESTAMP`: wall-clock digits in the data zone.
pub(super) fn instant_value(
    cell: &Cell<'_>,
    stored: PrimitiveDateTime,
) -> Result<HostValue, DecodeError> {
    let instant = cell
        .options
        .time_zone_context()
        .to_instant(stored)
        .ok_or_else(|| DecodeError::overflow(cell.sql_type(), cell.target, stored))?;

    to_host(cell, stored, instant)
}

/// A calendar value (`DATE`, `YEAR`, text): the same digits in the client zone.
pub(super) fn calendar_value(
    cell: &Cell<'_>,
    stored: PrimitiveDateTime,
) -> Result<HostValue, DecodeError> {
    let instant = cell
        .options
        .time_zone_context()
        .client
        .assume_local(stored)
        .ok_or_else(|| DecodeError::overflow(cell.sql_type(), cell.target, stored))?;

    to_host(cell, stored, instant)
}

fn to_host(
    cell: &Cell<'_>,
    stored: PrimitiveDateTime,
    instant: OffsetDateTime,
) -> Result<HostValue, DecodeError> {
    let client = &cell.options.time_zone_context().client;
    let target = cell.target;

    let local = client
        .localize(instant)
        .ok_or_else(|| DecodeError::overflow(cell.sql_type(), target, instant))?;
    let local_datetime = PrimitiveDateTime::new(local.date(), local.time());

    Ok(match target {
        HostType::Date => HostValue::Date(SqlDate::new(local.date(), client.clone())),
        HostType::Time => HostValue::Time(SqlTime::new(local.time(), client.clone())),
        HostType::Timestamp => {
            HostValue::Timestamp(SqlTimestamp::new(local_datetime, client.clone()))
        }

        HostType::LocalDate => HostValue::LocalDate(stored.date()),
        HostType::LocalTime => HostValue::LocalTime(stored.time()),
        HostType::LocalDateTime => HostValue::LocalDateTime(stored),

        HostType::ZonedDateTime => HostValue::ZonedDateTime(
            ZonedDateTime::from_instant(instant, client.clone())
                .ok_or_else(|| DecodeError::overflow(cell.sql_type(), target, instant))?,
        ),
        HostType::OffsetDateTime => HostValue::OffsetDateTime(local),
        HostType::Instant => HostValue::instant(instant),
        HostType::LegacyDate => HostValue::LegacyDate(LegacyDate::from_instant(instant)),

        _ => return Err(cell.incompatible()),
    })
}

/// A `TIME` value for a time-shaped target.
pub(super) fn time_value(cell: &Cell<'_>, time: MySqlTime) -> Result<HostValue, DecodeError> {
    let client = &cell.options.time_zone_context().client;

    Ok(match cell.target {
        HostType::Time => HostValue::Time(SqlTime::new(time.to_time_of_day(), client.clone())),
        HostType::LocalTime => HostValue::LocalTime(time.to_time_of_day()),
        HostType::Duration => HostValue::Duration(time.to_duration()),

        _ => return Err(cell.incompatible()),
    })
}

/// Decodes a date, datetime or time literal held in a text column.
pub(super) fn decode_literal(cell: &Cell<'_>, s: &str) -> Result<Option<HostValue>, DecodeError> {
    let s = s.trim();

    if is_time_shaped(cell.target) {
        let time = match MySqlTime::parse(s) {
            Ok(time) => time,

            // a full datetime literal still has a time of day
            Err(e) => match RawDateTime::parse_datetime(s) {
                Ok(raw) if cell.target != HostType::Duration => {
                    let time = raw.time().map_err(|e| cell.format_error(s, e))?;
                    MySqlTime::from_time_of_day(time)
                }
                _ => return Err(cell.format_error(s, e)),
            },
        };

        return time_value(cell, time).map(Some);
    }

    let raw = RawDateTime::parse_datetime(s).map_err(|e| cell.format_error(s, e))?;

    if raw.is_zero_date() {
        return cell.zero_date(s);
    }

    let stored = raw
        .datetime()
        .map_err(|e| cell.format_error(s, e))?
        .ok_or_else(|| cell.incompatible())?;

    calendar_value(cell, stored).map(Some)
}
