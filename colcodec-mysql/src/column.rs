use std::fmt::Debug;

use colcodec_core::Error;

use crate::{MySqlRow, MySqlTypeInfo};

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "offline", derive(serde::Serialize, serde::Deserialize))]
pub struct MySqlColumn {
    pub(crate) ordinal: usize,
    pub(crate) name: String,
    pub(crate) type_info: MySqlTypeInfo,
}

impl MySqlColumn {
    pub fn new(ordinal: usize, name: impl Into<String>, type_info: MySqlTypeInfo) -> Self {
        Self {
            ordinal,
            name: name.into(),
            type_info,
        }
    }

    /// Gets the column ordinal.
    ///
    /// This can be used to unambiguously refer to this column within a row in case more than
    /// one column have the same name
    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    /// Gets the column name or alias.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_info(&self) -> &MySqlTypeInfo {
        &self.type_info
    }
}

/// A type that can be used to index into a [`MySqlRow`].
///
/// `usize` indexes by position and `&str` by column name. Names match without regard
/// to ASCII case, as MySQL column names do; the first matching column wins.
pub trait ColumnIndex: Debug {
    /// Returns a valid positional index into the row, or an error.
    fn index(&self, row: &MySqlRow) -> Result<usize, Error>;
}

impl ColumnIndex for usize {
    fn index(&self, row: &MySqlRow) -> Result<usize, Error> {
        if *self >= row.len() {
            return Err(Error::ColumnIndexOutOfBounds {
                len: row.len(),
                index: *self,
            });
        }

        Ok(*self)
    }
}

impl ColumnIndex for &'_ str {
    fn index(&self, row: &MySqlRow) -> Result<usize, Error> {
        row.columns()
            .iter()
            .position(|c| c.name.eq_ignore_ascii_case(self))
            .ok_or_else(|| Error::ColumnNotFound((*self).into()))
    }
}

impl<I: ColumnIndex + ?Sized> ColumnIndex for &'_ I {
    #[inline]
    fn index(&self, row: &MySqlRow) -> Result<usize, Error> {
        (**self).index(row)
    }
}
