//! Column metadata as reported to callers: type name, default host type, SQL type code,
//! precision, scale and display size.

use colcodec_core::{GeometryKind, HostType};

use crate::protocol::{ColumnFlags, ColumnType};
use crate::type_info::TypeFamily;
use crate::{MySqlCodecOptions, MySqlTypeInfo};

/// Generic SQL type codes, as used by ODBC and JDBC metadata.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "offline", derive(serde::Serialize, serde::Deserialize))]
#[repr(i32)]
pub enum SqlTypeCode {
    Bit = -7,
    TinyInt = -6,
    SmallInt = 5,
    Integer = 4,
    BigInt = -5,
    Real = 7,
    Double = 8,
    Decimal = 3,
    Char = 1,
    VarChar = 12,
    LongVarChar = -1,
    Binary = -2,
    VarBinary = -3,
    LongVarBinary = -4,
    Date = 91,
    Time = 92,
    Timestamp = 93,
    Blob = 2004,
    Null = 0,
    Other = 1111,
}

impl SqlTypeCode {
    pub const fn code(self) -> i32 {
        self as i32
    }
}

/// Everything a metadata caller needs to know about a column.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "offline", derive(serde::Serialize, serde::Deserialize))]
pub struct TypeDescriptor {
    type_name: &'static str,
    default_type: HostType,
    sql_type: SqlTypeCode,
    precision: u32,
    scale: u8,
    display_size: u32,
}

impl TypeDescriptor {
    /// The SQL name of the column type (`BIGINT UNSIGNED`, `VARBINARY`, `POINT`, …).
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// The host type an unqualified decode produces.
    pub fn default_type(&self) -> HostType {
        self.default_type
    }

    pub fn sql_type(&self) -> SqlTypeCode {
        self.sql_type
    }

    /// Digits for numeric types, characters for character types, bytes otherwise.
    pub fn precision(&self) -> u32 {
        self.precision
    }

    pub fn scale(&self) -> u8 {
        self.scale
    }

    pub fn display_size(&self) -> u32 {
        self.display_size
    }
}

/// Describes a column.
///
/// Pure and total: every [`MySqlTypeInfo`] has a descriptor.
pub fn describe(ty: &MySqlTypeInfo, options: &MySqlCodecOptions) -> TypeDescriptor {
    let family = ty.family();
    let len = ty.max_size();

    let (precision, display_size) = match family {
        TypeFamily::Decimal => {
            // the server counts the sign and the decimal point in the column length
            let overhead = match (ty.is_unsigned(), ty.decimals() > 0) {
                (false, true) => 2,
                (false, false) | (true, true) => 1,
                (true, false) => 0,
            };

            (len.saturating_sub(overhead), len)
        }

        TypeFamily::Character | TypeFamily::Uuid => {
            let chars = len / ty.collation().max_bytes_per_char();
            (chars, chars)
        }

        _ => (len, len),
    };

    TypeDescriptor {
        type_name: type_name(ty, options),
        default_type: default_type(ty, options),
        sql_type: sql_type(ty, options),
        precision,
        scale: ty.decimals(),
        display_size,
    }
}

fn is_tiny_int1_bit(ty: &MySqlTypeInfo, options: &MySqlCodecOptions) -> bool {
    options.tiny_int1_is_bit && ty.r#type() == ColumnType::Tiny && ty.max_size() == 1
}

fn type_name(ty: &MySqlTypeInfo, options: &MySqlCodecOptions) -> &'static str {
    match ty.r#type() {
        ColumnType::Tiny if ty.max_size() == 1 => {
            if options.tiny_int1_is_bit {
                "BIT"
            } else if ty.is_unsigned() {
                "TINYINT UNSIGNED"
            } else {
                "TINYINT"
            }
        }

        _ => ty.name(),
    }
}

/// The host type produced when the caller does not ask for one.
pub(crate) fn default_type(ty: &MySqlTypeInfo, options: &MySqlCodecOptions) -> HostType {
    let unsigned = ty.is_unsigned();

    match ty.family() {
        TypeFamily::Integer => match ty.r#type() {
            _ if is_tiny_int1_bit(ty, options) => HostType::Boolean,
            ColumnType::Short if !unsigned => HostType::Short,
            ColumnType::Long if unsigned => HostType::Long,
            ColumnType::LongLong if unsigned => HostType::BigInteger,
            ColumnType::LongLong => HostType::Long,
            _ => HostType::Int,
        },

        TypeFamily::Year if options.year_is_date_type => HostType::Date,
        TypeFamily::Year => HostType::Short,

        TypeFamily::Decimal => HostType::BigDecimal,
        TypeFamily::Float => HostType::Float,
        TypeFamily::Double => HostType::Double,

        TypeFamily::Bit if ty.max_size() == 1 => HostType::Boolean,
        TypeFamily::Bit => HostType::Bytes,

        TypeFamily::Date => HostType::Date,
        TypeFamily::Time => HostType::Time,
        TypeFamily::DateTime => HostType::Timestamp,

        TypeFamily::Character | TypeFamily::Null => HostType::String,

        TypeFamily::Binary if is_blob(ty) => HostType::Blob,
        TypeFamily::Binary => HostType::Bytes,

        TypeFamily::Uuid if options.uuid_as_string => HostType::String,
        TypeFamily::Uuid => HostType::Uuid,

        // only servers reporting extended metadata tell us the concrete shape
        TypeFamily::Geometry if options.geometry_default_concrete && options.extended_metadata => {
            HostType::Geometry(ty.geometry_kind())
        }
        TypeFamily::Geometry => HostType::Geometry(GeometryKind::GeometryCollection),
    }
}

fn is_blob(ty: &MySqlTypeInfo) -> bool {
    ty.r#type().is_blob() || ty.flags().contains(ColumnFlags::BLOB)
}

fn sql_type(ty: &MySqlTypeInfo, options: &MySqlCodecOptions) -> SqlTypeCode {
    match ty.family() {
        TypeFamily::Integer => match ty.r#type() {
            _ if is_tiny_int1_bit(ty, options) => SqlTypeCode::Bit,
            ColumnType::Tiny => SqlTypeCode::TinyInt,
            ColumnType::Short => SqlTypeCode::SmallInt,
            ColumnType::LongLong => SqlTypeCode::BigInt,
            _ => SqlTypeCode::Integer,
        },

        TypeFamily::Year if options.year_is_date_type => SqlTypeCode::Date,
        TypeFamily::Year => SqlTypeCode::SmallInt,

        TypeFamily::Decimal => SqlTypeCode::Decimal,
        TypeFamily::Float => SqlTypeCode::Real,
        TypeFamily::Double => SqlTypeCode::Double,
        TypeFamily::Bit => SqlTypeCode::Bit,
        TypeFamily::Date => SqlTypeCode::Date,
        TypeFamily::Time => SqlTypeCode::Time,
        TypeFamily::DateTime => SqlTypeCode::Timestamp,

        TypeFamily::Character => match ty.r#type() {
            ColumnType::Json => SqlTypeCode::LongVarChar,
            _ if is_blob(ty) => SqlTypeCode::LongVarChar,
            _ if ty.flags().intersects(ColumnFlags::ENUM.union(ColumnFlags::SET)) => {
                SqlTypeCode::VarChar
            }
            ColumnType::String => SqlTypeCode::Char,
            _ => SqlTypeCode::VarChar,
        },

        TypeFamily::Binary => match ty.r#type() {
            ColumnType::LongBlob => SqlTypeCode::LongVarBinary,
            _ if is_blob(ty) => SqlTypeCode::Blob,
            ColumnType::String => SqlTypeCode::Binary,
            _ => SqlTypeCode::VarBinary,
        },

        TypeFamily::Uuid if options.uuid_as_string => SqlTypeCode::Char,
        TypeFamily::Uuid => SqlTypeCode::Other,

        TypeFamily::Geometry => SqlTypeCode::Other,
        TypeFamily::Null => SqlTypeCode::Null,
    }
}

impl MySqlTypeInfo {
    /// Shorthand for [`describe`].
    pub fn describe(&self, options: &MySqlCodecOptions) -> TypeDescriptor {
        describe(self, options)
    }
}
