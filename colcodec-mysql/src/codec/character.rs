use colcodec_core::types::{Url, Uuid};
use colcodec_core::{DecodeError, HostType, HostValue};

use super::{binary_value, is_binary, is_numeric, is_text, temporal, text_value, Cell};
use crate::types::numeric::Numeric;

/// `CHAR`, `VARCHAR`, `TEXT`, `JSON`, `ENUM` and `SET`.
pub(super) fn decode(cell: &Cell<'_>) -> Result<Option<HostValue>, DecodeError> {
    let target = cell.target;

    if is_text(target) {
        return cell.str().map(|s| Some(text_value(target, s.to_owned())));
    }

    match target {
        HostType::Bytes | HostType::BinaryStream => {
            Ok(Some(binary_value(target, cell.bytes.to_vec())))
        }

        _ => decode_str(cell, cell.str()?),
    }
}

/// Decodes text into a non-textual target, the way a numeric or temporal literal would
/// be read.
pub(super) fn decode_str(cell: &Cell<'_>, s: &str) -> Result<Option<HostValue>, DecodeError> {
    let target = cell.target;

    match target {
        HostType::Boolean => {
            let s = s.trim();
            let value = !(s.is_empty() || s == "0" || s.eq_ignore_ascii_case("false"));

            Ok(Some(HostValue::Boolean(value)))
        }

        _ if is_numeric(target) => {
            let value = Numeric::parse(s).map_err(|e| cell.format_error(s, e))?;
            value.convert(cell.sql_type(), target).map(Some)
        }

        _ if target.is_temporal() => temporal::decode_literal(cell, s),

        HostType::Uuid => Uuid::parse_str(s.trim())
            .map(|uuid| Some(HostValue::Uuid(uuid)))
            .map_err(|e| cell.format_error(s, e)),

        HostType::Url => Url::parse(s.trim())
            .map(|url| Some(HostValue::Url(url)))
            .map_err(|e| cell.format_error(s, e)),

        _ => Err(cell.incompatible()),
    }
}

/// A `UUID` column (MariaDB), which travels as its 36-character text form.
pub(super) fn decode_uuid(cell: &Cell<'_>) -> Result<Option<HostValue>, DecodeError> {
    let target = cell.target;

    match target {
        HostType::Uuid => {
            let s = cell.str()?;

            Uuid::parse_str(s.trim())
                .map(|uuid| Some(HostValue::Uuid(uuid)))
                .map_err(|e| cell.format_error(s, e))
        }

        _ if is_text(target) => cell.str().map(|s| Some(text_value(target, s.to_owned()))),
        _ if is_binary(target) && target != HostType::Blob => {
            Ok(Some(binary_value(target, cell.bytes.to_vec())))
        }

        _ => Err(cell.incompatible()),
    }
}

#[cfg(test)]
mod tests {
    use colcodec_core::types::{BigDecimal, Url, Uuid};
    use colcodec_core::{ErrorKind, GeometryKind, HostType, HostValue};

    use crate::{MySqlCodecOptions, MySqlTypeInfo, MySqlValueRef};

    #[test]
    fn it_reads_numbers_from_text() {
        let options = MySqlCodecOptions::new();
        let ty = MySqlTypeInfo::varchar(20);

        let value = MySqlValueRef::text(Some(b" 1.5 "), &ty, &options);
        assert_eq!(value.decode::<i32>().unwrap(), 1);
        assert_eq!(
            value.decode::<BigDecimal>().unwrap(),
            "1.5".parse::<BigDecimal>().unwrap()
        );

        let value = MySqlValueRef::text(Some(b"300"), &ty, &options);
        assert_eq!(value.decode::<i8>().unwrap_err().kind(), ErrorKind::RangeOverflow);

        let value = MySqlValueRef::text(Some(b"abc"), &ty, &options);
        assert_eq!(value.decode::<i32>().unwrap_err().kind(), ErrorKind::FormatError);
    }

    #[test]
    fn it_reads_booleans_from_text() {
        let options = MySqlCodecOptions::new();
        let ty = MySqlTypeInfo::varchar(20);

        for (text, expected) in [("", false), ("0", false), ("FALSE", false), ("1", true), ("yes", true)]
        {
            let value = MySqlValueRef::binary(Some(text.as_bytes()), &ty, &options);
            assert_eq!(value.decode::<bool>().unwrap(), expected, "{text:?}");
        }
    }

    #[test]
    fn it_keeps_supplementary_characters() {
        let options = MySqlCodecOptions::new();
        let ty = MySqlTypeInfo::text();
        let text = "🙏 emoji";

        let value = MySqlValueRef::binary(Some(text.as_bytes()), &ty, &options);
        assert_eq!(value.decode::<String>().unwrap(), text);
        assert_eq!(value.decode::<Vec<u8>>().unwrap(), text.as_bytes());
    }

    #[test]
    fn it_parses_urls_and_uuids() {
        let options = MySqlCodecOptions::new();
        let ty = MySqlTypeInfo::varchar(64);

        let value = MySqlValueRef::text(Some(b"https://mariadb.org/"), &ty, &options);
        assert_eq!(
            value.decode::<Url>().unwrap(),
            Url::parse("https://mariadb.org/").unwrap()
        );

        let value = MySqlValueRef::text(Some(b"not a url"), &ty, &options);
        assert_eq!(value.decode::<Url>().unwrap_err().kind(), ErrorKind::FormatError);

        let value = MySqlValueRef::text(
            Some(b"123e4567-e89b-12d3-a456-426655440000"),
            &ty,
            &options,
        );
        assert_eq!(
            value.decode::<Uuid>().unwrap(),
            Uuid::parse_str("123e4567-e89b-12d3-a456-426655440000").unwrap()
        );
    }

    #[test]
    fn it_rejects_object_targets_without_a_codec() {
        let options = MySqlCodecOptions::new();
        let ty = MySqlTypeInfo::varchar(20);
        let value = MySqlValueRef::text(Some(b"1"), &ty, &options);

        for target in [
            HostType::BitSet,
            HostType::FloatArray,
            HostType::Geometry(GeometryKind::Point),
        ] {
            let err = value.decode_as(Some(target)).unwrap_err();
            assert!(err.is_not_supported(), "{target}");
        }

        let err = value.decode_as(Some(HostType::Blob)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        assert!(!err.is_not_supported());
    }

    #[test]
    fn it_follows_uuid_as_string() {
        let ty = MySqlTypeInfo::uuid();
        let cell = b"123e4567-e89b-12d3-a456-426655440000";

        let options = MySqlCodecOptions::new();
        let value = MySqlValueRef::text(Some(cell), &ty, &options);
        assert!(matches!(value.decode_as(None).unwrap(), Some(HostValue::Uuid(_))));

        let options = MySqlCodecOptions::new().uuid_as_string(true);
        let value = MySqlValueRef::text(Some(cell), &ty, &options);
        assert_eq!(
            value.decode_as(None).unwrap(),
            Some(HostValue::String(
                "123e4567-e89b-12d3-a456-426655440000".into()
            ))
        );
    }
}
