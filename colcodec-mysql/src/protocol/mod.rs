//! Column metadata as it appears in the column definition packet.

mod column_flags;
mod column_type;

pub use column_flags::ColumnFlags;
pub use column_type::ColumnType;
