use byteorder::{ByteOrder, LittleEndian};
use colcodec_core::io::BufExt;
use colcodec_core::{DecodeError, HostValue};

use super::{is_numeric, is_text, text_value, Cell};
use crate::type_info::TypeFamily;
use crate::types::numeric::Numeric;
use crate::MySqlValueFormat;

/// `DECIMAL`, `FLOAT` and `DOUBLE`.
pub(super) fn decode(cell: &Cell<'_>) -> Result<Option<HostValue>, DecodeError> {
    let target = cell.target;

    if !is_numeric(target) && !is_text(target) {
        return Err(cell.incompatible());
    }

    let value = read(cell)?;

    if is_text(target) {
        let s = match cell.format {
            MySqlValueFormat::Text => cell.str()?.to_owned(),
            MySqlValueFormat::Binary => value.to_string(),
        };

        return Ok(Some(text_value(target, s)));
    }

    value.convert(cell.sql_type(), target).map(Some)
}

fn read(cell: &Cell<'_>) -> Result<Numeric, DecodeError> {
    let family = cell.ty.family();

    match (family, cell.format) {
        (TypeFamily::Float, MySqlValueFormat::Binary) => {
            cell.bytes.ensure(4).map_err(|e| cell.malformed(e))?;
            Ok(Numeric::Float(LittleEndian::read_f32(cell.bytes)))
        }

        (TypeFamily::Double, MySqlValueFormat::Binary) => {
            cell.bytes.ensure(8).map_err(|e| cell.malformed(e))?;
            Ok(Numeric::Double(LittleEndian::read_f64(cell.bytes)))
        }

        (TypeFamily::Float, MySqlValueFormat::Text) => {
            let s = cell.str()?;
            s.trim()
                .parse()
                .map(Numeric::Float)
                .map_err(|e| cell.format_error(s, e))
        }

        (TypeFamily::Double, MySqlValueFormat::Text) => {
            let s = cell.str()?;
            s.trim()
                .parse()
                .map(Numeric::Double)
                .map_err(|e| cell.format_error(s, e))
        }

        // DECIMAL is a string in both protocols
        _ => {
            let s = cell.str()?;
            Numeric::parse(s).map_err(|e| cell.format_error(s, e))
        }
    }
}
