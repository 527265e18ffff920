//! [MySQL] and [MariaDB] column codec.
//!
//! Turns the cells of a result set into host values, and host values into statement
//! parameters, for both the text and the binary protocol.
//!
//! [MySQL]: https://www.mysql.com/
//! [MariaDB]: https://mariadb.org/
#![deny(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(future_incompatible)]

mod arguments;
mod codec;
mod collation;
mod column;
mod decode;
mod describe;
mod encode;
mod io;
mod options;
mod protocol;
mod row;
mod type_info;
pub mod types;
mod value;

pub use arguments::{MySqlArguments, MySqlTextArguments};
pub use codec::{decode, encode_binary, encode_text};
pub use collation::Collation;
pub use column::{ColumnIndex, MySqlColumn};
pub use decode::Decode;
pub use describe::{describe, SqlTypeCode, TypeDescriptor};
pub use encode::{Encode, IsNull, Type};
pub use io::{MySqlBufExt, MySqlBufMutExt};
pub use options::MySqlCodecOptions;
pub use protocol::{ColumnFlags, ColumnType};
pub use row::MySqlRow;
pub use type_info::{ExtendedType, MySqlTypeInfo};
pub use types::{MySqlTime, MySqlTimeError, MySqlTimeSign};
pub use value::{MySqlValue, MySqlValueFormat, MySqlValueRef};
