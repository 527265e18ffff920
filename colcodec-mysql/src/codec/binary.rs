use std::str::from_utf8;

use colcodec_core::types::Uuid;
use colcodec_core::{DecodeError, HostType, HostValue};

use super::{binary_value, character, geometry, is_binary, is_text, text_value, Cell};
use crate::protocol::ColumnFlags;

#[derive(Debug, thiserror::Error)]
#[error("length {0} is not a multiple of 4")]
struct FloatArrayLength(usize);

/// `BINARY`, `VARBINARY` and the `BLOB` family.
pub(super) fn decode(cell: &Cell<'_>) -> Result<Option<HostValue>, DecodeError> {
    let target = cell.target;
    let bytes = cell.bytes;

    match target {
        _ if is_binary(target) => Ok(Some(binary_value(target, bytes.to_vec()))),

        _ if is_text(target) => Ok(Some(text_value(target, lossy(cell)))),

        HostType::Boolean if is_pure_blob(cell) => Err(cell.incompatible()),
        _ if target.is_temporal() && is_pure_blob(cell) => Err(cell.incompatible()),

        HostType::FloatArray => {
            let chunks = bytes.chunks_exact(4);

            if !chunks.remainder().is_empty() {
                return Err(cell.format_error(
                    format!("<{} bytes>", bytes.len()),
                    FloatArrayLength(bytes.len()),
                ));
            }

            let values = chunks
                .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
                .collect();

            Ok(Some(HostValue::FloatArray(values)))
        }

        HostType::Uuid if bytes.len() == 16 => Uuid::from_slice(bytes)
            .map(|uuid| Some(HostValue::Uuid(uuid)))
            .map_err(|e| cell.malformed(e)),

        HostType::Geometry(kind) => {
            let geometry = geometry::read_geometry(bytes).map_err(|e| cell.malformed(e))?;

            geometry
                .into_kind(kind)
                .map(|g| Some(HostValue::Geometry(g)))
                .map_err(|g| DecodeError::incompatible(g.kind().sql_name(), target))
        }

        HostType::BitSet => Err(cell.incompatible()),

        // the server does not tell `"0"` in a VARBINARY apart from a number
        _ => character::decode_str(cell, cell.str()?),
    }
}

fn is_pure_blob(cell: &Cell<'_>) -> bool {
    cell.ty.r#type().is_blob() || cell.ty.flags().contains(ColumnFlags::BLOB)
}

fn lossy(cell: &Cell<'_>) -> String {
    match from_utf8(cell.bytes) {
        Ok(s) => s.to_owned(),

        Err(error) => {
            tracing::debug!(
                target: "colcodec::decode",
                sql_type = cell.sql_type(),
                %error,
                "binary column decoded as text with replacement characters"
            );

            String::from_utf8_lossy(cell.bytes).into_owned()
        }
    }
}

#[cfg(test)]
mod tests {
    use colcodec_core::{ErrorKind, HostType, HostValue};

    use crate::{MySqlCodecOptions, MySqlTypeInfo, MySqlValueRef};

    #[test]
    fn it_reads_ascii_digits_as_numbers() {
        let options = MySqlCodecOptions::new();
        let ty = MySqlTypeInfo::varbinary(10);
        let value = MySqlValueRef::binary(Some(b"0"), &ty, &options);

        assert_eq!(value.decode::<i32>().unwrap(), 0);
        assert_eq!(value.decode::<String>().unwrap(), "0");
        assert_eq!(value.decode::<i8>().unwrap(), 0);
    }

    #[test]
    fn it_rejects_booleans_and_dates_from_blobs() {
        let options = MySqlCodecOptions::new();
        let ty = MySqlTypeInfo::blob();
        let value = MySqlValueRef::binary(Some(b"1"), &ty, &options);

        for target in [HostType::Boolean, HostType::Date, HostType::Timestamp] {
            let err = value.decode_as(Some(target)).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::TypeMismatch, "{target}");
        }

        assert_eq!(value.decode::<i64>().unwrap(), 1);
    }

    #[test]
    fn it_replaces_invalid_utf8() {
        let options = MySqlCodecOptions::new();
        let ty = MySqlTypeInfo::varbinary(10);
        let value = MySqlValueRef::binary(Some(&[b'a', 0xff]), &ty, &options);

        assert_eq!(value.decode::<String>().unwrap(), "a\u{fffd}");
    }

    #[test]
    fn it_unpacks_float_arrays() {
        let options = MySqlCodecOptions::new();
        let ty = MySqlTypeInfo::varbinary(16);

        let mut bytes = Vec::new();
        bytes.extend_from_slice(&1.5_f32.to_le_bytes());
        bytes.extend_from_slice(&(-2.0_f32).to_le_bytes());

        let value = MySqlValueRef::binary(Some(&bytes), &ty, &options);
        assert_eq!(
            value.decode_as(Some(HostType::FloatArray)).unwrap(),
            Some(HostValue::FloatArray(vec![1.5, -2.0]))
        );

        let value = MySqlValueRef::binary(Some(&bytes[..6]), &ty, &options);
        assert_eq!(
            value.decode_as(Some(HostType::FloatArray)).unwrap_err().kind(),
            ErrorKind::FormatError
        );
    }

    #[test]
    fn it_defaults_blobs_to_lob_handles() {
        let options = MySqlCodecOptions::new();
        let ty = MySqlTypeInfo::blob();
        let value = MySqlValueRef::binary(Some(b"abc"), &ty, &options);

        let Some(HostValue::Blob(blob)) = value.decode_as(None).unwrap() else {
            panic!("expected a blob");
        };
        assert_eq!(blob.as_bytes(), b"abc");
    }
}
