//! Conversions between Rust and [MySQL types](https://dev.mysql.com/doc/refman/8.0/en/data-types.html).
//!
//! Conversions are not strict: reading an `i8` from a `BIGINT` column works as long as the
//! value fits, and reading an `i32` from a `VARCHAR` holding `"1.5"` yields `1`. A value
//! that does not fit is a range overflow, never a wrapped or saturated result.
//!
//! ## Integer Types
//!
//! | Rust type                             | MySQL type(s)                                        |
//! |---------------------------------------|------------------------------------------------------|
//! | [`bool`][std::primitive::bool]        | `TINYINT(1)`<sup>[[1]](#1)</sup>, `BOOLEAN`, `BIT(1)` |
//! | [`i8`]                                | `TINYINT`                                            |
//! | [`i16`]                               | `SMALLINT`, `YEAR`<sup>[[2]](#2)</sup>               |
//! | [`i32`]                               | `INT`, `MEDIUMINT`                                   |
//! | [`i64`]                               | `BIGINT`                                             |
//! | [`u8`] … [`u64`]                      | the `UNSIGNED` variants                              |
//! | [`num_bigint::BigInt`]                | `BIGINT UNSIGNED`, `DECIMAL(N, 0)`                   |
//!
//! 1. <a id="1"></a> With `tiny-int1-is-bit` (the default), `TINYINT(1)` reports `BIT` and
//!    decodes to `bool` unless asked otherwise.
//! 2. <a id="2"></a> `YEAR` decodes to a date (January 1st) by default; see
//!    `year-is-date-type`.
//!
//! ## Fixed-Point and Floating-Point Types
//!
//! | Rust type                  | MySQL type(s)                     |
//! |----------------------------|-----------------------------------|
//! | [`bigdecimal::BigDecimal`] | `DECIMAL`, `NUMERIC`              |
//! | [`f32`]                    | `FLOAT`                           |
//! | [`f64`]                    | `DOUBLE`, `REAL`                  |
//!
//! ## Bit-Value Type - `BIT`
//!
//! | Rust type                             | MySQL type(s)         |
//! |---------------------------------------|-----------------------|
//! | [`bool`]                              | `BIT(1)`              |
//! | [`bit_vec::BitVec`]                   | `BIT`                 |
//! | [`Vec<u8>`]                           | `BIT`                 |
//!
//! ## String Types
//!
//! | Rust type                                 | MySQL type(s)                                  |
//! |-------------------------------------------|------------------------------------------------|
//! | [`String`], [`&'r str`][&str], `Clob`     | `TEXT`, `VARCHAR`, `CHAR`, `JSON`, `ENUM`, `SET` |
//! | [`url::Url`]                              | `TEXT`, `VARCHAR`, `CHAR`                      |
//! | [`uuid::Uuid`]                            | `UUID` (MariaDB), `CHAR(36)`, `BINARY(16)`     |
//!
//! ## Binary String Types
//!
//! | Rust type                             | MySQL type(s)                                        |
//! |---------------------------------------|------------------------------------------------------|
//! | [`Vec<u8>`], [`&'r [u8]`][slice], `Blob` | `BLOB`, `VARBINARY`, `BINARY`                     |
//! | [`Vec<f32>`]                          | `VARBINARY`, `BLOB` (packed little-endian floats)    |
//!
//! ## Date and Time Types
//!
//! | Rust type                             | MySQL type(s)         |
//! |---------------------------------------|-----------------------|
//! | [`time::Date`]                        | `DATE`, `YEAR`        |
//! | [`time::Time`]                        | `TIME` (time of day)  |
//! | [`time::Duration`], [`MySqlTime`]     | `TIME`                |
//! | [`time::PrimitiveDateTime`]           | `DATETIME`, `TIMESTAMP` |
//! | [`time::OffsetDateTime`], `ZonedDateTime` | `DATETIME`, `TIMESTAMP` |
//! | `SqlDate`, `SqlTime`, `SqlTimestamp`, `LegacyDate` | `DATE`, `TIME`, `DATETIME`, `TIMESTAMP` |
//!
//! ## Spatial Types
//!
//! | Rust type                             | MySQL type(s)         |
//! |---------------------------------------|-----------------------|
//! | `Geometry`                            | `GEOMETRY` and every shape type |
//! | `Point`, `LineString`, `Polygon`, …   | the matching shape type |

mod mysql_time;
pub(crate) mod numeric;
pub(crate) mod temporal;

pub use mysql_time::{MySqlTime, MySqlTimeError, MySqlTimeSign};
