use std::fmt::{self, Display, Formatter};

use colcodec_core::GeometryKind;

use crate::collation::Collation;
use crate::protocol::{ColumnFlags, ColumnType};

/// A type name reported through MariaDB's extended metadata.
///
/// These types share a wire type code with a plain type (`UUID` and `INET6` are strings,
/// `POINT` is a `GEOMETRY`) and are only distinguishable through this name.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "offline", derive(serde::Serialize, serde::Deserialize))]
pub enum ExtendedType {
    Json,
    Uuid,
    Inet4,
    Inet6,
    Geometry(GeometryKind),
}

impl ExtendedType {
    /// Parses the `format` or `type` extended metadata value.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "json" => Some(ExtendedType::Json),
            "uuid" => Some(ExtendedType::Uuid),
            "inet4" => Some(ExtendedType::Inet4),
            "inet6" => Some(ExtendedType::Inet6),

            other => GeometryKind::from_sql_name(other).map(ExtendedType::Geometry),
        }
    }
}

/// Type information for a MySQL column or parameter.
///
/// `max_size` is the column length the server reports: the display width of numeric
/// types and the length in bytes (not characters) of string types.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "offline", derive(serde::Serialize, serde::Deserialize))]
pub struct MySqlTypeInfo {
    pub(crate) r#type: ColumnType,
    pub(crate) flags: ColumnFlags,
    pub(crate) collation: Collation,
    pub(crate) max_size: u32,
    pub(crate) decimals: u8,
    pub(crate) extended: Option<ExtendedType>,
}

/// The group of SQL types that share a codec.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum TypeFamily {
    Integer,
    Year,
    Decimal,
    Float,
    Double,
    Bit,
    Date,
    Time,
    DateTime,
    Character,
    Binary,
    Uuid,
    Geometry,
    Null,
}

// lengths reported for a full-width utf8mb4 character column
const UTF8MB4_WIDTH: u32 = 4;

impl MySqlTypeInfo {
    /// Type information exactly as described by a column definition.
    pub const fn new(
        r#type: ColumnType,
        flags: ColumnFlags,
        collation: Collation,
        max_size: u32,
        decimals: u8,
    ) -> Self {
        Self {
            r#type,
            flags,
            collation,
            max_size,
            decimals,
            extended: None,
        }
    }

    const fn numeric(r#type: ColumnType, max_size: u32, decimals: u8) -> Self {
        Self::new(
            r#type,
            ColumnFlags::BINARY.union(ColumnFlags::NUM),
            Collation::BINARY,
            max_size,
            decimals,
        )
    }

    const fn binary(r#type: ColumnType, max_size: u32) -> Self {
        Self::new(r#type, ColumnFlags::BINARY, Collation::BINARY, max_size, 0)
    }

    const fn character(r#type: ColumnType, chars: u32) -> Self {
        Self::new(
            r#type,
            ColumnFlags::empty(),
            Collation::UTF8MB4_GENERAL_CI,
            chars.saturating_mul(UTF8MB4_WIDTH),
            0,
        )
    }

    pub const fn tinyint() -> Self {
        Self::numeric(ColumnType::Tiny, 4, 0)
    }

    /// `BOOLEAN`, an alias for `TINYINT(1)`.
    pub const fn boolean() -> Self {
        Self::numeric(ColumnType::Tiny, 1, 0)
    }

    pub const fn smallint() -> Self {
        Self::numeric(ColumnType::Short, 6, 0)
    }

    pub const fn mediumint() -> Self {
        Self::numeric(ColumnType::Int24, 9, 0)
    }

    pub const fn int() -> Self {
        Self::numeric(ColumnType::Long, 11, 0)
    }

    pub const fn bigint() -> Self {
        Self::numeric(ColumnType::LongLong, 20, 0)
    }

    pub const fn float() -> Self {
        Self::numeric(ColumnType::Float, 12, 31)
    }

    pub const fn double() -> Self {
        Self::numeric(ColumnType::Double, 22, 31)
    }

    /// `DECIMAL(precision, scale)`; the reported length counts the sign and the point.
    pub const fn decimal(precision: u32, scale: u8) -> Self {
        let point = if scale > 0 { 1 } else { 0 };

        Self::numeric(ColumnType::NewDecimal, precision.saturating_add(point + 1), scale)
    }

    pub const fn bit(bits: u32) -> Self {
        Self::new(
            ColumnType::Bit,
            ColumnFlags::UNSIGNED,
            Collation::BINARY,
            bits,
            0,
        )
    }

    pub const fn year() -> Self {
        Self::new(
            ColumnType::Year,
            ColumnFlags::UNSIGNED.union(ColumnFlags::ZEROFILL.union(ColumnFlags::NUM)),
            Collation::BINARY,
            4,
            0,
        )
    }

    /// The deprecated two-digit `YEAR(2)`.
    pub const fn year2() -> Self {
        Self::year().with_length(2)
    }

    pub const fn date() -> Self {
        Self::binary(ColumnType::Date, 10)
    }

    /// `TIME(fsp)`.
    pub const fn time(fsp: u8) -> Self {
        Self::temporal(ColumnType::Time, 10, fsp)
    }

    /// `DATETIME(fsp)`.
    pub const fn datetime(fsp: u8) -> Self {
        Self::temporal(ColumnType::Datetime, 19, fsp)
    }

    /// `TIMESTAMP(fsp)`.
    pub const fn timestamp(fsp: u8) -> Self {
        Self::temporal(ColumnType::Timestamp, 19, fsp)
    }

    const fn temporal(r#type: ColumnType, len: u32, fsp: u8) -> Self {
        let fraction = if fsp > 0 { fsp as u32 + 1 } else { 0 };

        Self {
            decimals: fsp,
            ..Self::binary(r#type, len + fraction)
        }
    }

    /// `CHAR(chars)`.
    pub const fn char(chars: u32) -> Self {
        Self::character(ColumnType::String, chars)
    }

    /// `VARCHAR(chars)`.
    pub const fn varchar(chars: u32) -> Self {
        Self::character(ColumnType::VarString, chars)
    }

    pub const fn tinytext() -> Self {
        Self::text_with_length(255)
    }

    pub const fn text() -> Self {
        Self::text_with_length(65_535)
    }

    pub const fn mediumtext() -> Self {
        Self::text_with_length(16_777_215)
    }

    pub const fn longtext() -> Self {
        Self::text_with_length(u32::MAX)
    }

    const fn text_with_length(chars: u32) -> Self {
        Self::new(
            ColumnType::Blob,
            ColumnFlags::BLOB,
            Collation::UTF8MB4_GENERAL_CI,
            chars.saturating_mul(UTF8MB4_WIDTH),
            0,
        )
    }

    /// `BINARY(len)`.
    pub const fn binary_fixed(len: u32) -> Self {
        Self::binary(ColumnType::String, len)
    }

    /// `VARBINARY(len)`.
    pub const fn varbinary(len: u32) -> Self {
        Self::binary(ColumnType::VarString, len)
    }

    pub const fn tinyblob() -> Self {
        Self::blob_with_length(255)
    }

    pub const fn blob() -> Self {
        Self::blob_with_length(65_535)
    }

    pub const fn mediumblob() -> Self {
        Self::blob_with_length(16_777_215)
    }

    pub const fn longblob() -> Self {
        Self::blob_with_length(u32::MAX)
    }

    const fn blob_with_length(bytes: u32) -> Self {
        Self::new(
            ColumnType::Blob,
            ColumnFlags::BLOB.union(ColumnFlags::BINARY),
            Collation::BINARY,
            bytes,
            0,
        )
    }

    pub const fn json() -> Self {
        Self::new(
            ColumnType::Json,
            ColumnFlags::BLOB,
            Collation::UTF8MB4_BIN,
            u32::MAX,
            0,
        )
    }

    pub const fn r#enum() -> Self {
        Self::new(
            ColumnType::String,
            ColumnFlags::ENUM,
            Collation::UTF8MB4_GENERAL_CI,
            4,
            0,
        )
    }

    pub const fn set() -> Self {
        Self::new(
            ColumnType::String,
            ColumnFlags::SET,
            Collation::UTF8MB4_GENERAL_CI,
            4,
            0,
        )
    }

    /// MariaDB's `UUID`, sent as a 36 character string.
    pub const fn uuid() -> Self {
        Self {
            extended: Some(ExtendedType::Uuid),
            ..Self::new(
                ColumnType::String,
                ColumnFlags::BINARY,
                Collation::UTF8_GENERAL_CI,
                36 * 3,
                0,
            )
        }
    }

    pub const fn inet6() -> Self {
        Self {
            extended: Some(ExtendedType::Inet6),
            ..Self::new(
                ColumnType::String,
                ColumnFlags::empty(),
                Collation::LATIN1_SWEDISH_CI,
                39,
                0,
            )
        }
    }

    /// A spatial column, restricted to `kind` unless it is [`GeometryKind::Any`].
    pub const fn geometry(kind: GeometryKind) -> Self {
        let extended = match kind {
            GeometryKind::Any => None,
            kind => Some(ExtendedType::Geometry(kind)),
        };

        Self {
            extended,
            ..Self::new(
                ColumnType::Geometry,
                ColumnFlags::BLOB.union(ColumnFlags::BINARY),
                Collation::BINARY,
                u32::MAX,
                0,
            )
        }
    }

    /// The type of a bare `NULL`.
    pub const fn null() -> Self {
        Self::binary(ColumnType::Null, 0)
    }

    /// Marks a numeric type `UNSIGNED`.
    ///
    /// Integer and decimal lengths shrink by the sign position, as the server reports them.
    pub const fn unsigned(mut self) -> Self {
        if !self.flags.contains(ColumnFlags::UNSIGNED) {
            self.max_size = match self.r#type {
                ColumnType::Tiny if self.max_size == 1 => 1,
                ColumnType::LongLong => 20,
                ColumnType::Tiny
                | ColumnType::Short
                | ColumnType::Int24
                | ColumnType::Long
                | ColumnType::Decimal
                | ColumnType::NewDecimal => self.max_size.saturating_sub(1),
                _ => self.max_size,
            };
        }

        self.flags = self.flags.union(ColumnFlags::UNSIGNED);
        self
    }

    pub const fn zerofill(mut self) -> Self {
        self.flags = self.flags.union(ColumnFlags::ZEROFILL.union(ColumnFlags::UNSIGNED));
        self
    }

    pub const fn with_length(mut self, max_size: u32) -> Self {
        self.max_size = max_size;
        self
    }

    pub const fn with_decimals(mut self, decimals: u8) -> Self {
        self.decimals = decimals;
        self
    }

    pub const fn with_collation(mut self, collation: Collation) -> Self {
        self.collation = collation;
        self
    }

    pub const fn with_flags(mut self, flags: ColumnFlags) -> Self {
        self.flags = flags;
        self
    }

    pub const fn with_extended(mut self, extended: Option<ExtendedType>) -> Self {
        self.extended = extended;
        self
    }

    pub const fn r#type(&self) -> ColumnType {
        self.r#type
    }

    pub const fn flags(&self) -> ColumnFlags {
        self.flags
    }

    pub const fn collation(&self) -> Collation {
        self.collation
    }

    pub const fn max_size(&self) -> u32 {
        self.max_size
    }

    pub const fn decimals(&self) -> u8 {
        self.decimals
    }

    pub const fn extended(&self) -> Option<ExtendedType> {
        self.extended
    }

    pub const fn is_unsigned(&self) -> bool {
        self.flags.contains(ColumnFlags::UNSIGNED)
    }

    /// `true` if the column holds bytes rather than text.
    pub const fn is_binary(&self) -> bool {
        self.collation.is_binary()
    }

    /// The shape a spatial column is restricted to.
    pub(crate) fn geometry_kind(&self) -> GeometryKind {
        match self.extended {
            Some(ExtendedType::Geometry(kind)) => kind,
            _ => GeometryKind::Any,
        }
    }

    /// Returns the SQL name of this type.
    pub fn name(&self) -> &'static str {
        let unsigned = self.is_unsigned();

        match self.r#type {
            ColumnType::Null => "NULL",

            ColumnType::Tiny if self.max_size == 1 => "BOOLEAN",
            ColumnType::Tiny if unsigned => "TINYINT UNSIGNED",
            ColumnType::Tiny => "TINYINT",
            ColumnType::Short if unsigned => "SMALLINT UNSIGNED",
            ColumnType::Short => "SMALLINT",
            ColumnType::Int24 if unsigned => "MEDIUMINT UNSIGNED",
            ColumnType::Int24 => "MEDIUMINT",
            ColumnType::Long if unsigned => "INT UNSIGNED",
            ColumnType::Long => "INT",
            ColumnType::LongLong if unsigned => "BIGINT UNSIGNED",
            ColumnType::LongLong => "BIGINT",

            ColumnType::Float if unsigned => "FLOAT UNSIGNED",
            ColumnType::Float => "FLOAT",
            ColumnType::Double if unsigned => "DOUBLE UNSIGNED",
            ColumnType::Double => "DOUBLE",
            ColumnType::Decimal | ColumnType::NewDecimal if unsigned => "DECIMAL UNSIGNED",
            ColumnType::Decimal | ColumnType::NewDecimal => "DECIMAL",

            ColumnType::Bit => "BIT",
            ColumnType::Year => "YEAR",
            ColumnType::Date => "DATE",
            ColumnType::Time => "TIME",
            ColumnType::Datetime => "DATETIME",
            ColumnType::Timestamp => "TIMESTAMP",

            ColumnType::Json => "JSON",

            _ => self.string_name(),
        }
    }

    fn string_name(&self) -> &'static str {
        match self.extended {
            Some(ExtendedType::Uuid) => return "UUID",
            Some(ExtendedType::Inet4) => return "INET4",
            Some(ExtendedType::Inet6) => return "INET6",
            Some(ExtendedType::Json) => return "JSON",
            Some(ExtendedType::Geometry(kind)) => return kind.sql_name(),
            None => {}
        }

        let binary = self.is_binary();

        match self.r#type {
            ColumnType::Geometry => "GEOMETRY",

            ColumnType::String if self.flags.contains(ColumnFlags::ENUM) => "ENUM",
            ColumnType::String if self.flags.contains(ColumnFlags::SET) => "SET",
            ColumnType::Enum => "ENUM",
            ColumnType::Set => "SET",

            ColumnType::VarChar | ColumnType::VarString if binary => "VARBINARY",
            ColumnType::VarChar | ColumnType::VarString => "VARCHAR",
            ColumnType::String if binary => "BINARY",
            ColumnType::String => "CHAR",

            ColumnType::TinyBlob if binary => "TINYBLOB",
            ColumnType::TinyBlob => "TINYTEXT",
            ColumnType::MediumBlob if binary => "MEDIUMBLOB",
            ColumnType::MediumBlob => "MEDIUMTEXT",
            ColumnType::LongBlob if binary => "LONGBLOB",
            ColumnType::LongBlob => "LONGTEXT",

            // the server sends every BLOB and TEXT as `Blob` and reports the size class
            // through the column length
            ColumnType::Blob => self.blob_name(binary),

            _ => "",
        }
    }

    fn blob_name(&self, binary: bool) -> &'static str {
        let len = self.max_size / self.collation.max_bytes_per_char();

        match (len, binary) {
            (0..=255, true) => "TINYBLOB",
            (0..=255, false) => "TINYTEXT",
            (256..=65_535, true) => "BLOB",
            (256..=65_535, false) => "TEXT",
            (65_536..=16_777_215, true) => "MEDIUMBLOB",
            (65_536..=16_777_215, false) => "MEDIUMTEXT",
            (_, true) => "LONGBLOB",
            (_, false) => "LONGTEXT",
        }
    }

    pub(crate) fn family(&self) -> TypeFamily {
        match self.extended {
            Some(ExtendedType::Uuid) => return TypeFamily::Uuid,
            Some(ExtendedType::Geometry(_)) => return TypeFamily::Geometry,
            _ => {}
        }

        match self.r#type {
            ColumnType::Tiny
            | ColumnType::Short
            | ColumnType::Int24
            | ColumnType::Long
            | ColumnType::LongLong => TypeFamily::Integer,

            ColumnType::Year => TypeFamily::Year,
            ColumnType::Decimal | ColumnType::NewDecimal => TypeFamily::Decimal,
            ColumnType::Float => TypeFamily::Float,
            ColumnType::Double => TypeFamily::Double,
            ColumnType::Bit => TypeFamily::Bit,
            ColumnType::Date => TypeFamily::Date,
            ColumnType::Time => TypeFamily::Time,
            ColumnType::Datetime | ColumnType::Timestamp => TypeFamily::DateTime,
            ColumnType::Geometry => TypeFamily::Geometry,
            ColumnType::Null => TypeFamily::Null,

            ColumnType::Json | ColumnType::Enum | ColumnType::Set => TypeFamily::Character,

            ColumnType::VarChar
            | ColumnType::VarString
            | ColumnType::String
            | ColumnType::TinyBlob
            | ColumnType::MediumBlob
            | ColumnType::LongBlob
            | ColumnType::Blob => {
                if self.is_binary() {
                    TypeFamily::Binary
                } else {
                    TypeFamily::Character
                }
            }
        }
    }

    /// `true` if binary protocol values of this type carry a length-encoded prefix.
    pub(crate) fn is_length_encoded(&self) -> bool {
        matches!(
            self.family(),
            TypeFamily::Decimal
                | TypeFamily::Bit
                | TypeFamily::Character
                | TypeFamily::Binary
                | TypeFamily::Uuid
                | TypeFamily::Geometry
        )
    }
}

impl Display for MySqlTypeInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}
