use colcodec::geometry::{GeometryCollection, LineString, Point, Polygon};
use colcodec::mysql::{MySqlArguments, MySqlCodecOptions, MySqlTypeInfo};
use colcodec::{ErrorKind, Geometry, GeometryKind, HostType, HostValue};
use colcodec_test::{binary, binary_with, encode_as};

fn collection() -> Geometry {
    Geometry::GeometryCollection(GeometryCollection::new(vec![
        Point::new(0., 0.).into(),
        LineString::from(vec![(10., 10.), (20., 10.), (20., 20.), (10., 20.), (10., 10.)]).into(),
    ]))
}

/// SRID 0 followed by little-endian WKB.
fn point_bytes(x: f64, y: f64) -> Vec<u8> {
    let mut bytes = vec![0, 0, 0, 0, 1, 1, 0, 0, 0];
    bytes.extend_from_slice(&x.to_le_bytes());
    bytes.extend_from_slice(&y.to_le_bytes());
    bytes
}

#[test]
fn it_reads_points() -> anyhow::Result<()> {
    let cell = binary(MySqlTypeInfo::geometry(GeometryKind::Point), point_bytes(1.5, -2.0));
    let value = cell.as_ref();

    assert_eq!(value.decode::<Point>()?, Point::new(1.5, -2.0));
    assert_eq!(value.decode::<String>()?, "POINT(1.5 -2)");
    assert_eq!(value.decode::<Vec<u8>>()?, point_bytes(1.5, -2.0));

    Ok(())
}

#[test]
fn it_reads_collections() -> anyhow::Result<()> {
    let ty = MySqlTypeInfo::geometry(GeometryKind::GeometryCollection);
    let cell = encode_as(collection(), &ty, MySqlCodecOptions::new())?;
    let value = cell.as_ref();

    assert_eq!(value.decode::<Geometry>()?, collection());
    assert_eq!(
        value.decode::<String>()?,
        "GEOMETRYCOLLECTION(POINT(0 0),LINESTRING(10 10,20 10,20 20,10 20,10 10))"
    );

    let GeometryCollection { shapes } = value.decode::<GeometryCollection>()?;
    assert_eq!(shapes.len(), 2);

    let err = value
        .decode_as(Some(HostType::Geometry(GeometryKind::Polygon)))
        .unwrap_err();
    assert!(err.is_not_supported());
    assert_eq!(err.kind(), ErrorKind::TypeMismatch);

    Ok(())
}

#[test]
fn it_defaults_to_the_concrete_shape_with_extended_metadata() -> anyhow::Result<()> {
    let ty = MySqlTypeInfo::geometry(GeometryKind::Point);

    let cell = binary(ty.clone(), point_bytes(3.0, 4.0));
    assert_eq!(
        cell.as_ref().decode_as(None)?,
        Some(HostValue::Geometry(Geometry::GeometryCollection(
            GeometryCollection::new(vec![Point::new(3.0, 4.0).into()])
        )))
    );

    let options = MySqlCodecOptions::new().extended_metadata(true);
    let cell = binary_with(ty, point_bytes(3.0, 4.0), options);
    assert_eq!(
        cell.as_ref().decode_as(None)?,
        Some(HostValue::Geometry(Point::new(3.0, 4.0).into()))
    );

    Ok(())
}

#[test]
fn it_wraps_shapes_for_collection_columns() -> anyhow::Result<()> {
    let ty = MySqlTypeInfo::geometry(GeometryKind::GeometryCollection);
    let cell = encode_as(Point::new(1.0, 1.0), &ty, MySqlCodecOptions::new())?;

    assert_eq!(
        cell.as_ref().decode::<GeometryCollection>()?,
        GeometryCollection::new(vec![Point::new(1.0, 1.0).into()])
    );

    Ok(())
}

#[test]
fn it_rejects_other_shapes_on_write() {
    let mut args = MySqlArguments::default();
    let polygon = Geometry::Polygon(Polygon::new(vec![LineString::from(vec![
        (0., 0.),
        (1., 0.),
        (1., 1.),
        (0., 0.),
    ])]));

    let err = args
        .add_as(
            Some(&HostValue::Geometry(polygon)),
            &MySqlTypeInfo::geometry(GeometryKind::Point),
        )
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    assert!(args.is_empty());
}

#[test]
fn it_reports_truncated_geometry() {
    let mut bytes = point_bytes(1.0, 2.0);
    bytes.truncate(bytes.len() - 1);

    let cell = binary(MySqlTypeInfo::geometry(GeometryKind::Point), bytes);

    assert_eq!(
        cell.as_ref().decode::<Point>().unwrap_err().kind(),
        ErrorKind::FormatError
    );
}
