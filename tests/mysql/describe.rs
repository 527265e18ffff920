use std::sync::Arc;

use colcodec::mysql::{
    describe, MySqlCodecOptions, MySqlColumn, MySqlRow, MySqlTypeInfo, MySqlValueFormat,
    SqlTypeCode,
};
use colcodec::{GeometryKind, HostType};
use time::macros::offset;

fn row(options: MySqlCodecOptions) -> MySqlRow {
    let columns = vec![
        MySqlColumn::new(0, "id", MySqlTypeInfo::bigint().unsigned()),
        MySqlColumn::new(1, "active", MySqlTypeInfo::boolean()),
        MySqlColumn::new(2, "token", MySqlTypeInfo::uuid()),
        MySqlColumn::new(3, "location", MySqlTypeInfo::geometry(GeometryKind::Point)),
        MySqlColumn::new(4, "founded", MySqlTypeInfo::year()),
    ];

    MySqlRow::new(
        Arc::new(columns),
        Vec::new(),
        MySqlValueFormat::Text,
        options,
    )
}

#[test]
fn it_describes_columns_of_a_row() -> anyhow::Result<()> {
    colcodec_test::setup_if_needed();

    let row = row(MySqlCodecOptions::new());

    let id = row.describe("id")?;
    assert_eq!(id.type_name(), "BIGINT UNSIGNED");
    assert_eq!(id.default_type(), HostType::BigInteger);
    assert_eq!(id.sql_type().code(), -5);

    let active = row.describe(1)?;
    assert_eq!(active.type_name(), "BIT");
    assert_eq!(active.default_type(), HostType::Boolean);

    assert_eq!(row.describe("token")?.default_type(), HostType::Uuid);
    assert_eq!(
        row.describe("location")?.default_type(),
        HostType::Geometry(GeometryKind::GeometryCollection)
    );
    assert_eq!(row.describe("founded")?.default_type(), HostType::Date);

    Ok(())
}

#[test]
fn it_follows_options_from_a_url() -> anyhow::Result<()> {
    let options: MySqlCodecOptions = "mariadb://localhost/app?uuid-as-string=true&tinyInt1isBit=false&year-is-date-type=false&ssl-mode=required".parse()?;
    let row = row(options);

    let active = row.describe("active")?;
    assert_eq!(active.type_name(), "TINYINT");
    assert_eq!(active.sql_type(), SqlTypeCode::TinyInt);

    let token = row.describe("token")?;
    assert_eq!(token.default_type(), HostType::String);
    assert_eq!(token.sql_type(), SqlTypeCode::Char);

    // mariadb servers report extended type names
    assert_eq!(
        row.describe("location")?.default_type(),
        HostType::Geometry(GeometryKind::Point)
    );
    assert_eq!(row.describe("founded")?.default_type(), HostType::Short);

    Ok(())
}

#[test]
fn it_parses_time_zones() -> anyhow::Result<()> {
    let options: MySqlCodecOptions =
        "mysql://localhost?session-time-zone=%2B02:00&client-time-zone=-05:30&preserve-instants=true"
            .parse()?;
    let ctx = options.time_zone_context();

    assert_eq!(ctx.session.fixed_offset(), Some(offset!(+2)));
    assert_eq!(ctx.client.fixed_offset(), Some(offset!(-5:30)));
    assert!(ctx.preserve_instants);

    Ok(())
}

#[test]
fn it_rejects_bad_urls() {
    assert!("postgres://localhost".parse::<MySqlCodecOptions>().is_err());
    assert!("mysql://localhost?preserve-instants=maybe"
        .parse::<MySqlCodecOptions>()
        .is_err());
}

#[test]
fn it_describes_every_type() {
    let options = MySqlCodecOptions::new();

    for ty in [
        MySqlTypeInfo::tinyint(),
        MySqlTypeInfo::mediumint(),
        MySqlTypeInfo::double(),
        MySqlTypeInfo::decimal(65, 30),
        MySqlTypeInfo::bit(64),
        MySqlTypeInfo::year2(),
        MySqlTypeInfo::date(),
        MySqlTypeInfo::time(3),
        MySqlTypeInfo::datetime(6),
        MySqlTypeInfo::timestamp(0),
        MySqlTypeInfo::char(36),
        MySqlTypeInfo::json(),
        MySqlTypeInfo::r#enum(),
        MySqlTypeInfo::set(),
        MySqlTypeInfo::binary_fixed(16),
        MySqlTypeInfo::longblob(),
        MySqlTypeInfo::inet6(),
        MySqlTypeInfo::geometry(GeometryKind::Any),
        MySqlTypeInfo::null(),
    ] {
        let d = describe(&ty, &options);

        assert!(!d.type_name().is_empty(), "{ty:?}");
    }

    assert_eq!(
        describe(&MySqlTypeInfo::null(), &options).sql_type(),
        SqlTypeCode::Null
    );
    assert_eq!(
        describe(&MySqlTypeInfo::json(), &options).sql_type(),
        SqlTypeCode::LongVarChar
    );
}
