// https://dev.mysql.com/doc/refman/8.0/en/data-types.html
// https://github.com/mysql/mysql-server/blob/7ed30a748964c009d4909cb8b4b22036ebdef239/include/field_types.h#L57

/// The type code sent for a column in the column definition packet.
///
/// Several SQL types share a code: `TEXT` and `BLOB` are told apart by collation, and
/// `BOOLEAN` is `TINYINT(1)`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "offline", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum ColumnType {
    Decimal = 0x00,
    Tiny = 0x01,
    Short = 0x02,
    Long = 0x03,
    Float = 0x04,
    Double = 0x05,
    Null = 0x06,
    Timestamp = 0x07,
    LongLong = 0x08,
    Int24 = 0x09,
    Date = 0x0a,
    Time = 0x0b,
    Datetime = 0x0c,
    Year = 0x0d,
    VarChar = 0x0f,
    Bit = 0x10,
    Json = 0xf5,
    NewDecimal = 0xf6,
    Enum = 0xf7,
    Set = 0xf8,
    TinyBlob = 0xf9,
    MediumBlob = 0xfa,
    LongBlob = 0xfb,
    Blob = 0xfc,
    VarString = 0xfd,
    String = 0xfe,
    Geometry = 0xff,
}

impl ColumnType {
    /// Parses a type code from a column definition.
    pub fn try_from_u16(id: u16) -> Option<Self> {
        Some(match id {
            0x00 => ColumnType::Decimal,
            0x01 => ColumnType::Tiny,
            0x02 => ColumnType::Short,
            0x03 => ColumnType::Long,
            0x04 => ColumnType::Float,
            0x05 => ColumnType::Double,
            0x06 => ColumnType::Null,
            0x07 => ColumnType::Timestamp,
            0x08 => ColumnType::LongLong,
            0x09 => ColumnType::Int24,
            0x0a => ColumnType::Date,
            0x0b => ColumnType::Time,
            0x0c => ColumnType::Datetime,
            0x0d => ColumnType::Year,
            0x0f => ColumnType::VarChar,
            0x10 => ColumnType::Bit,
            0xf5 => ColumnType::Json,
            0xf6 => ColumnType::NewDecimal,
            0xf7 => ColumnType::Enum,
            0xf8 => ColumnType::Set,
            0xf9 => ColumnType::TinyBlob,
            0xfa => ColumnType::MediumBlob,
            0xfb => ColumnType::LongBlob,
            0xfc => ColumnType::Blob,
            0xfd => ColumnType::VarString,
            0xfe => ColumnType::String,
            0xff => ColumnType::Geometry,

            _ => return None,
        })
    }

    pub(crate) const fn is_blob(self) -> bool {
        matches!(
            self,
            ColumnType::TinyBlob | ColumnType::MediumBlob | ColumnType::LongBlob | ColumnType::Blob
        )
    }

    /// Width in bytes of the binary protocol form of an integer type.
    pub(crate) const fn integer_width(self) -> Option<usize> {
        match self {
            ColumnType::Tiny => Some(1),
            ColumnType::Short | ColumnType::Year => Some(2),
            ColumnType::Int24 | ColumnType::Long => Some(4),
            ColumnType::LongLong => Some(8),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_parses_type_codes() {
        assert_eq!(ColumnType::try_from_u16(0x0c), Some(ColumnType::Datetime));
        assert_eq!(ColumnType::try_from_u16(0xff), Some(ColumnType::Geometry));
        assert_eq!(ColumnType::try_from_u16(0x0e), None);
        assert_eq!(ColumnType::Geometry as u8, 0xff);
    }
}
