use colcodec_core::io::BufExt;
use colcodec_core::{DecodeError, HostType, HostValue};
use time::{Date, Month};

use super::{is_numeric, is_text, temporal, text_value, Cell};
use crate::protocol::ColumnFlags;
use crate::types::numeric::Numeric;
use crate::MySqlValueFormat;

pub(super) fn decode(cell: &Cell<'_>) -> Result<Option<HostValue>, DecodeError> {
    let target = cell.target;

    if is_numeric(target) {
        let value = read(cell)?;
        return Numeric::Int(value).convert(cell.sql_type(), target).map(Some);
    }

    if is_text(target) {
        return render(cell).map(|s| Some(text_value(target, s)));
    }

    Err(cell.incompatible())
}

/// `YEAR` is stored as an integer; date-shaped targets get January 1st of that year.
pub(super) fn decode_year(cell: &Cell<'_>) -> Result<Option<HostValue>, DecodeError> {
    let target = cell.target;

    if is_numeric(target) {
        let value = read(cell)?;
        return Numeric::Int(value).convert(cell.sql_type(), target).map(Some);
    }

    if is_text(target) {
        return render(cell).map(|s| Some(text_value(target, s)));
    }

    if !matches!(
        target,
        HostType::Date
            | HostType::Timestamp
            | HostType::LocalDate
            | HostType::LocalDateTime
            | HostType::ZonedDateTime
            | HostType::OffsetDateTime
            | HostType::Instant
            | HostType::LegacyDate
    ) {
        return Err(cell.incompatible());
    }

    let stored = read(cell)?;

    // YEAR(2)
    let year = if cell.ty.max_size() == 2 {
        match stored {
            0..=69 => stored + 2000,
            70..=99 => stored + 1900,
            _ => stored,
        }
    } else {
        stored
    };

    if year == 0 {
        return cell.zero_date("0000");
    }

    let date = i32::try_from(year)
        .ok()
        .and_then(|year| Date::from_calendar_date(year, Month::January, 1).ok())
        .ok_or_else(|| DecodeError::overflow(cell.sql_type(), target, year))?;

    temporal::calendar_value(cell, date.midnight()).map(Some)
}

/// Reads the stored integer.
fn read(cell: &Cell<'_>) -> Result<i128, DecodeError> {
    match cell.format {
        MySqlValueFormat::Binary => {
            let width = cell.ty.r#type().integer_width().unwrap_or(8);
            let mut buf = cell.bytes;

            let value = if cell.ty.is_unsigned() {
                buf.checked_uint_le(width).map(i128::from)
            } else {
                buf.checked_int_le(width).map(i128::from)
            };

            value.map_err(|e| cell.malformed(e))
        }

        MySqlValueFormat::Text => {
            let s = cell.str()?;
            s.trim().parse().map_err(|e| cell.format_error(s, e))
        }
    }
}

/// The text a `getString` of this cell returns.
fn render(cell: &Cell<'_>) -> Result<String, DecodeError> {
    match cell.format {
        // the server already renders ZEROFILL
        MySqlValueFormat::Text => cell.str().map(str::to_owned),

        MySqlValueFormat::Binary => {
            let value = read(cell)?;
            let mut buffer = itoa::Buffer::new();
            let digits = buffer.format(value);

            if cell.ty.flags().contains(ColumnFlags::ZEROFILL) {
                let width = usize::try_from(cell.ty.max_size()).unwrap_or(0);
                return Ok(format!("{digits:0>width$}"));
            }

            Ok(digits.to_owned())
        }
    }
}
