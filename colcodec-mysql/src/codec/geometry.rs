//! MySQL's internal geometry format: a little-endian SRID followed by WKB.
//!
//! <https://dev.mysql.com/doc/refman/8.0/en/gis-data-formats.html#gis-internal-format>

use colcodec_core::geometry::wkb::{self, WkbError};
use colcodec_core::io::BufExt;
use colcodec_core::{DecodeError, Geometry, HostType, HostValue};

use super::{binary_value, is_binary, is_text, text_value, Cell};

/// Reads a geometry value, ignoring its SRID.
pub(crate) fn read_geometry(mut bytes: &[u8]) -> Result<Geometry, WkbError> {
    let _srid = bytes.checked_u32_le()?;

    wkb::read(bytes)
}

/// Writes a geometry value with SRID 0.
pub(crate) fn write_geometry(geometry: &Geometry, buf: &mut Vec<u8>) {
    buf.reserve(4 + wkb::size_hint(geometry));
    buf.extend_from_slice(&0_u32.to_le_bytes());

    wkb::write(geometry, buf);
}

pub(super) fn decode(cell: &Cell<'_>) -> Result<Option<HostValue>, DecodeError> {
    let target = cell.target;

    if is_binary(target) {
        return Ok(Some(binary_value(target, cell.bytes.to_vec())));
    }

    if !is_text(target) && !matches!(target, HostType::Geometry(_)) {
        return Err(cell.incompatible());
    }

    let geometry = read_geometry(cell.bytes).map_err(|e| cell.malformed(e))?;

    match target {
        HostType::Geometry(kind) => geometry
            .into_kind(kind)
            .map(|g| Some(HostValue::Geometry(g)))
            .map_err(|g| DecodeError::incompatible(g.kind().sql_name(), target)),

        _ => Ok(Some(text_value(target, geometry.to_wkt()))),
    }
}

#[cfg(test)]
mod tests {
    use colcodec_core::geometry::{GeometryCollection, LineString, Point};
    use colcodec_core::{ErrorKind, Geometry, GeometryKind, HostType, HostValue};

    use super::*;
    use crate::{MySqlCodecOptions, MySqlTypeInfo, MySqlValueRef};

    fn square() -> Geometry {
        Geometry::LineString(LineString::new(vec![
            Point::new(10.0, 10.0),
            Point::new(20.0, 10.0),
            Point::new(20.0, 20.0),
            Point::new(10.0, 20.0),
            Point::new(10.0, 10.0),
        ]))
    }

    #[test]
    fn it_skips_the_srid() {
        let mut bytes = Vec::new();
        write_geometry(&Geometry::Point(Point::new(1.0, 2.0)), &mut bytes);

        assert_eq!(&bytes[..4], &[0, 0, 0, 0]);
        assert_eq!(
            read_geometry(&bytes).unwrap(),
            Geometry::Point(Point::new(1.0, 2.0))
        );
    }

    #[test]
    fn it_defaults_to_collections_without_extended_metadata() {
        let options = MySqlCodecOptions::new();
        let ty = MySqlTypeInfo::geometry(GeometryKind::Any);

        let mut bytes = Vec::new();
        write_geometry(&square(), &mut bytes);

        let value = MySqlValueRef::binary(Some(&bytes), &ty, &options);

        assert_eq!(
            value.decode_as(None).unwrap(),
            Some(HostValue::Geometry(Geometry::GeometryCollection(
                GeometryCollection::new(vec![square()])
            )))
        );
        assert_eq!(
            value
                .decode_as(Some(HostType::Geometry(GeometryKind::LineString)))
                .unwrap(),
            Some(HostValue::Geometry(square()))
        );

        let options = MySqlCodecOptions::new().extended_metadata(true);
        let value = MySqlValueRef::binary(Some(&bytes), &ty, &options);
        assert_eq!(value.decode_as(None).unwrap(), Some(HostValue::Geometry(square())));
    }

    #[test]
    fn it_rejects_other_shapes() {
        let options = MySqlCodecOptions::new();
        let ty = MySqlTypeInfo::geometry(GeometryKind::Any);

        let mut bytes = Vec::new();
        write_geometry(&square(), &mut bytes);

        let value = MySqlValueRef::binary(Some(&bytes), &ty, &options);
        let err = value
            .decode_as(Some(HostType::Geometry(GeometryKind::Point)))
            .unwrap_err();

        assert!(err.is_not_supported());
    }

    #[test]
    fn it_renders_wkt() {
        let options = MySqlCodecOptions::new();
        let ty = MySqlTypeInfo::geometry(GeometryKind::Point);

        let mut bytes = Vec::new();
        write_geometry(&Geometry::Point(Point::new(1.0, 2.0)), &mut bytes);

        let value = MySqlValueRef::binary(Some(&bytes), &ty, &options);
        assert_eq!(value.decode::<String>().unwrap(), "POINT(1 2)");
    }

    #[test]
    fn it_reports_truncated_values() {
        let options = MySqlCodecOptions::new();
        let ty = MySqlTypeInfo::geometry(GeometryKind::Any);

        let mut bytes = Vec::new();
        write_geometry(&square(), &mut bytes);
        bytes.truncate(bytes.len() - 3);

        let value = MySqlValueRef::binary(Some(&bytes), &ty, &options);
        assert_eq!(
            value.decode::<Geometry>().unwrap_err().kind(),
            ErrorKind::FormatError
        );
    }
}
