// MySQL conflates *how stored data is sorted* with the character encoding used over the wire,
// and collation IDs are assigned mostly sequentially with unexplained gaps. The lower 8 bits
// of an ID do not identify the character set, and MariaDB adds collations of its own.
//
// For the codec this matters in two places only:
//
// * whether a column is a string at all: any collation except `binary` (63) is text, because
//   the server transcodes to `character_set_results`, while `binary` is never transcoded;
//
// * the maximum width of one character, which the server multiplies into the reported column
//   length. Precision and display size of character columns divide it back out.
//
// The ranges below cover the character sets whose width is not 1. An unknown collation is
// assumed to be single-byte, which never overstates the precision.

/// A collation identifier from a column definition.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "offline", derive(serde::Deserialize, serde::Serialize))]
pub struct Collation(pub u16);

impl Collation {
    /// Collation used for all non-string data.
    pub const BINARY: Self = Collation(63);

    pub const LATIN1_SWEDISH_CI: Self = Collation(8);

    pub const UTF8_GENERAL_CI: Self = Collation(33);

    /// Most broadly supported UTF-8 collation.
    pub const UTF8MB4_GENERAL_CI: Self = Collation(45);

    pub const UTF8MB4_BIN: Self = Collation(46);

    pub const UTF8MB4_UNICODE_CI: Self = Collation(224);

    /// Default collation of MySQL 8.
    pub const UTF8MB4_0900_AI_CI: Self = Collation(255);

    pub const fn is_binary(self) -> bool {
        self.0 == Self::BINARY.0
    }

    /// The most bytes a single character takes in this collation's character set.
    pub const fn max_bytes_per_char(self) -> u32 {
        match self.0 {
            // utf8mb3
            33 | 83 | 192..=223 => 3,

            // utf8mb4; everything from 255 up is a utf8mb4 collation of MySQL 8 or MariaDB
            45 | 46 | 224..=247 | 255.. => 4,

            // ucs2
            35 | 90 | 128..=159 => 2,

            // utf16, utf16le and utf32
            54 | 55 | 56 | 62 | 101..=124 | 60 | 61 | 160..=183 => 4,

            // multi-byte Asian character sets
            1 | 84 | 13 | 88 | 19 | 85 | 24 | 86 | 28 | 87 | 95 | 96 => 2,
            12 | 91 | 97 | 98 => 3,

            _ => 1,
        }
    }
}

impl Default for Collation {
    fn default() -> Self {
        Collation::UTF8MB4_GENERAL_CI
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_knows_character_widths() {
        assert_eq!(Collation::UTF8MB4_GENERAL_CI.max_bytes_per_char(), 4);
        assert_eq!(Collation::UTF8MB4_0900_AI_CI.max_bytes_per_char(), 4);
        assert_eq!(Collation::UTF8_GENERAL_CI.max_bytes_per_char(), 3);
        assert_eq!(Collation::LATIN1_SWEDISH_CI.max_bytes_per_char(), 1);
        assert_eq!(Collation::BINARY.max_bytes_per_char(), 1);
        assert!(Collation::BINARY.is_binary());
    }
}
