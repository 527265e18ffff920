use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

use bytes::Bytes;
use colcodec_core::{Error, HostType, HostValue};

use crate::column::ColumnIndex;
use crate::decode::Decode;
use crate::describe::{describe, TypeDescriptor};
use crate::{MySqlCodecOptions, MySqlColumn, MySqlValueFormat, MySqlValueRef};

/// One row of a result set: column definitions plus one cell per column.
#[derive(Clone)]
pub struct MySqlRow {
    pub(crate) columns: Arc<Vec<MySqlColumn>>,
    pub(crate) values: Vec<Option<Bytes>>,
    pub(crate) format: MySqlValueFormat,
    pub(crate) options: MySqlCodecOptions,
}

impl MySqlRow {
    /// Creates a row. Cells beyond the last column are ignored and missing cells are
    /// `NULL`.
    pub fn new(
        columns: Arc<Vec<MySqlColumn>>,
        mut values: Vec<Option<Bytes>>,
        format: MySqlValueFormat,
        options: MySqlCodecOptions,
    ) -> Self {
        values.resize(columns.len(), None);

        Self {
            columns,
            values,
            format,
            options,
        }
    }

    pub fn columns(&self) -> &[MySqlColumn] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn format(&self) -> MySqlValueFormat {
        self.format
    }

    /// Index into the row and decode a single value.
    ///
    /// ```rust
    /// # use std::sync::Arc;
    /// # use bytes::Bytes;
    /// # use colcodec_mysql::{MySqlCodecOptions, MySqlColumn, MySqlRow, MySqlTypeInfo, MySqlValueFormat};
    /// let columns = vec![MySqlColumn::new(0, "id", MySqlTypeInfo::int())];
    /// let row = MySqlRow::new(
    ///     Arc::new(columns),
    ///     vec![Some(Bytes::from_static(b"42"))],
    ///     MySqlValueFormat::Text,
    ///     MySqlCodecOptions::new(),
    /// );
    ///
    /// let id: i64 = row.try_get("id")?;
    /// assert_eq!(id, 42);
    /// # Ok::<(), colcodec_core::Error>(())
    /// ```
    pub fn try_get<'r, T, I>(&'r self, index: I) -> Result<T, Error>
    where
        I: ColumnIndex,
        T: Decode<'r>,
    {
        let value = self.try_get_raw(&index)?;

        T::decode(value).map_err(|source| Error::ColumnDecode {
            index: format!("{index:?}"),
            source,
        })
    }

    /// Decodes a single value into `target`, or `None` for SQL `NULL`.
    pub fn try_get_as<I>(&self, index: I, target: HostType) -> Result<Option<HostValue>, Error>
    where
        I: ColumnIndex,
    {
        let value = self.try_get_raw(&index)?;

        value
            .decode_as(Some(target))
            .map_err(|source| Error::ColumnDecode {
                index: format!("{index:?}"),
                source,
            })
    }

    /// Decodes a single value into the column's default host type.
    pub fn try_get_object<I>(&self, index: I) -> Result<Option<HostValue>, Error>
    where
        I: ColumnIndex,
    {
        let value = self.try_get_raw(&index)?;

        value.decode_as(None).map_err(|source| Error::ColumnDecode {
            index: format!("{index:?}"),
            source,
        })
    }

    /// Index into the row and borrow the cell without decoding it.
    pub fn try_get_raw<I>(&self, index: I) -> Result<MySqlValueRef<'_>, Error>
    where
        I: ColumnIndex,
    {
        let index = index.index(self)?;
        let column = &self.columns[index];

        Ok(MySqlValueRef::new(
            self.values[index].as_deref(),
            &column.type_info,
            self.format,
            &self.options,
        ))
    }

    /// Describes the type of a column as the options see it.
    pub fn describe<I>(&self, index: I) -> Result<TypeDescriptor, Error>
    where
        I: ColumnIndex,
    {
        let index = index.index(self)?;

        Ok(describe(&self.columns[index].type_info, &self.options))
    }
}

impl Debug for MySqlRow {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "MySqlRow ")?;

        let mut debug_map = f.debug_map();

        for (column, value) in self.columns.iter().zip(&self.values) {
            match value {
                Some(bytes) => debug_map.entry(&column.name, &String::from_utf8_lossy(bytes)),
                None => debug_map.entry(&column.name, &"NULL"),
            };
        }

        debug_map.finish()
    }
}

#[cfg(test)]
mod tests {
    use colcodec_core::ErrorKind;

    use super::*;
    use crate::MySqlTypeInfo;

    fn row() -> MySqlRow {
        let columns = vec![
            MySqlColumn::new(0, "id", MySqlTypeInfo::bigint()),
            MySqlColumn::new(1, "Name", MySqlTypeInfo::varchar(20)),
            MySqlColumn::new(2, "deleted_at", MySqlTypeInfo::datetime(0)),
        ];

        MySqlRow::new(
            Arc::new(columns),
            vec![Some(Bytes::from_static(b"7")), Some(Bytes::from_static(b"ada"))],
            MySqlValueFormat::Text,
            MySqlCodecOptions::new(),
        )
    }

    #[test]
    fn it_indexes_by_name_and_position() {
        let row = row();

        assert_eq!(row.try_get::<i64, _>(0).unwrap(), 7);
        assert_eq!(row.try_get::<&str, _>("name").unwrap(), "ada");
        assert_eq!(row.try_get::<Option<String>, _>("deleted_at").unwrap(), None);
    }

    #[test]
    fn it_reports_bad_indexes() {
        let row = row();

        assert!(matches!(
            row.try_get::<i64, _>(3),
            Err(Error::ColumnIndexOutOfBounds { index: 3, len: 3 })
        ));
        assert!(matches!(
            row.try_get::<i64, _>("missing"),
            Err(Error::ColumnNotFound(_))
        ));
    }

    #[test]
    fn it_names_the_column_in_decode_errors() {
        let row = row();
        let err = row.try_get::<i64, _>("Name").unwrap_err();

        assert_eq!(err.kind(), Some(ErrorKind::FormatError));
        assert!(err.to_string().contains("\"Name\""), "{err}");
    }

    #[test]
    fn it_decodes_default_objects() {
        let row = row();

        assert_eq!(row.try_get_object(0).unwrap(), Some(HostValue::Long(7)));
        assert_eq!(
            row.try_get_as(0, HostType::String).unwrap(),
            Some(HostValue::String("7".into()))
        );
    }
}
