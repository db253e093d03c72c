//! Ordered collection of [`Column`]s, all the same length, addressed by
//! name. This is the node (or edge) property table a [`crate::Graph`] owns;
//! node ids and edge ids double as row indices into it.

use super::column::{Column, ColumnData, ScalarType};
use hashbrown::HashMap;
use shared::{Error, Result};

#[derive(Debug, Default)]
pub struct PropertyTable {
    columns: Vec<Column>,
    index_of: HashMap<String, usize>,
    row_count: usize,
}

impl PropertyTable {
    pub fn new(row_count: usize) -> Self {
        PropertyTable {
            columns: Vec::new(),
            index_of: HashMap::new(),
            row_count,
        }
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name())
    }

    pub fn has_property(&self, name: &str) -> bool {
        self.index_of.contains_key(name)
    }

    /// Appends a column; fails with `AlreadyExists` if the name is taken.
    pub fn add_property(&mut self, column: Column) -> Result<()> {
        if self.index_of.contains_key(column.name()) {
            return Err(Error::already_exists(format!(
                "property '{}' already exists",
                column.name()
            )));
        }
        self.insert_checked(column)
    }

    /// Appends the column, or replaces the existing one of the same name.
    pub fn upsert_property(&mut self, column: Column) -> Result<()> {
        if let Some(&idx) = self.index_of.get(column.name()) {
            if column.len() != self.row_count {
                return Err(Error::invalid_argument(format!(
                    "property '{}' has length {} but the table has {} rows",
                    column.name(),
                    column.len(),
                    self.row_count
                )));
            }
            self.columns[idx] = column;
            return Ok(());
        }
        self.insert_checked(column)
    }

    fn insert_checked(&mut self, column: Column) -> Result<()> {
        if column.len() != self.row_count {
            return Err(Error::invalid_argument(format!(
                "property '{}' has length {} but the table has {} rows",
                column.name(),
                column.len(),
                self.row_count
            )));
        }
        self.index_of
            .insert(column.name().to_string(), self.columns.len());
        self.columns.push(column);
        Ok(())
    }

    /// Appends every column of the batch, or none of them: the batch is
    /// validated in full before the first column lands, so a failure never
    /// leaves a partial append behind.
    pub fn add_properties(&mut self, columns: Vec<Column>) -> Result<()> {
        {
            let mut batch_names = hashbrown::HashSet::new();
            for column in &columns {
                if self.index_of.contains_key(column.name()) || !batch_names.insert(column.name())
                {
                    return Err(Error::already_exists(format!(
                        "property '{}' already exists",
                        column.name()
                    )));
                }
                if column.len() != self.row_count {
                    return Err(Error::invalid_argument(format!(
                        "property '{}' has length {} but the table has {} rows",
                        column.name(),
                        column.len(),
                        self.row_count
                    )));
                }
            }
        }
        for column in columns {
            self.index_of
                .insert(column.name().to_string(), self.columns.len());
            self.columns.push(column);
        }
        Ok(())
    }

    /// As [`PropertyTable::add_properties`], replacing existing columns of
    /// the same name instead of failing on them.
    pub fn upsert_properties(&mut self, columns: Vec<Column>) -> Result<()> {
        for column in &columns {
            if column.len() != self.row_count {
                return Err(Error::invalid_argument(format!(
                    "property '{}' has length {} but the table has {} rows",
                    column.name(),
                    column.len(),
                    self.row_count
                )));
            }
        }
        for column in columns {
            self.upsert_property(column)?;
        }
        Ok(())
    }

    pub fn remove_property(&mut self, name: &str) -> Result<Column> {
        let idx = self
            .index_of
            .remove(name)
            .ok_or_else(|| Error::not_found(format!("property '{}' not found", name)))?;
        let removed = self.columns.remove(idx);
        for value in self.index_of.values_mut() {
            if *value > idx {
                *value -= 1;
            }
        }
        Ok(removed)
    }

    pub fn get_property(&self, name: &str) -> Result<&Column> {
        let idx = self
            .index_of
            .get(name)
            .ok_or_else(|| Error::not_found(format!("property '{}' not found", name)))?;
        Ok(&self.columns[*idx])
    }

    pub fn get_property_mut(&mut self, name: &str) -> Result<&mut Column> {
        let idx = *self
            .index_of
            .get(name)
            .ok_or_else(|| Error::not_found(format!("property '{}' not found", name)))?;
        Ok(&mut self.columns[idx])
    }

    /// Borrows `name` as a typed slice, failing with `TypeError` if the
    /// column's logical type does not match the caller's expectation.
    pub fn typed_column<'a, T>(&'a self, name: &str) -> Result<&'a [T]>
    where
        ColumnData: TypedColumn<T>,
    {
        let column = self.get_property(name)?;
        ColumnData::as_typed(column.data()).ok_or_else(|| {
            Error::type_error(format!(
                "property '{}' is {:?}, not the requested scalar type",
                name,
                column.scalar_type()
            ))
        })
    }
}

/// Bridges a Rust scalar type to the matching [`ColumnData`] variant, used
/// by [`PropertyTable::typed_column`] and the view constructors to give
/// typed, allocation-free access.
pub trait TypedColumn<T> {
    fn as_typed(data: &ColumnData) -> Option<&[T]>;
    fn as_typed_mut(data: &mut ColumnData) -> Option<&mut [T]>;
    fn scalar_type() -> ScalarType;
}

macro_rules! impl_typed_column {
    ($ty:ty, $scalar:ident, $accessor:ident, $accessor_mut:ident) => {
        impl TypedColumn<$ty> for ColumnData {
            fn as_typed(data: &ColumnData) -> Option<&[$ty]> {
                data.$accessor()
            }
            fn as_typed_mut(data: &mut ColumnData) -> Option<&mut [$ty]> {
                data.$accessor_mut()
            }
            fn scalar_type() -> ScalarType {
                ScalarType::$scalar
            }
        }
    };
}

impl_typed_column!(bool, Bool, as_bool, as_bool_mut);
impl_typed_column!(u8, U8, as_u8, as_u8_mut);
impl_typed_column!(i8, I8, as_i8, as_i8_mut);
impl_typed_column!(u16, U16, as_u16, as_u16_mut);
impl_typed_column!(i16, I16, as_i16, as_i16_mut);
impl_typed_column!(u32, U32, as_u32, as_u32_mut);
impl_typed_column!(i32, I32, as_i32, as_i32_mut);
impl_typed_column!(u64, U64, as_u64, as_u64_mut);
impl_typed_column!(i64, I64, as_i64, as_i64_mut);
impl_typed_column!(f32, F32, as_f32, as_f32_mut);
impl_typed_column!(f64, F64, as_f64, as_f64_mut);
impl_typed_column!(String, String, as_string, as_string_mut);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_then_remove_restores_the_schema() {
        let mut table = PropertyTable::new(3);
        table
            .add_property(Column::new("age", ColumnData::from(vec![1u32, 2, 3])))
            .unwrap();
        assert!(table.has_property("age"));
        table.remove_property("age").unwrap();
        assert!(!table.has_property("age"));
        assert_eq!(table.column_names().count(), 0);
    }

    #[test]
    fn add_fails_on_duplicate_name() {
        let mut table = PropertyTable::new(2);
        table
            .add_property(Column::new("x", ColumnData::from(vec![1u32, 2])))
            .unwrap();
        let err = table
            .add_property(Column::new("x", ColumnData::from(vec![3u32, 4])))
            .unwrap_err();
        assert!(matches!(err, Error::AlreadyExists(_)));
    }

    #[test]
    fn upsert_replaces_an_existing_column() {
        let mut table = PropertyTable::new(2);
        table
            .add_property(Column::new("x", ColumnData::from(vec![1u32, 2])))
            .unwrap();
        table
            .upsert_property(Column::new("x", ColumnData::from(vec![9u32, 9])))
            .unwrap();
        let col = table.typed_column::<u32>("x").unwrap();
        assert_eq!(col, &[9, 9]);
    }

    #[test]
    fn typed_column_rejects_a_type_mismatch() {
        let mut table = PropertyTable::new(2);
        table
            .add_property(Column::new("x", ColumnData::from(vec![1u32, 2])))
            .unwrap();
        let err = table.typed_column::<f64>("x").unwrap_err();
        assert!(matches!(err, Error::TypeError(_)));
    }

    #[test]
    fn get_property_on_a_missing_name_fails_with_not_found() {
        let table = PropertyTable::new(2);
        let err = table.get_property("missing").unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn a_rejected_batch_add_leaves_the_table_untouched() {
        let mut table = PropertyTable::new(2);
        table
            .add_property(Column::new("taken", ColumnData::from(vec![0u32, 0])))
            .unwrap();
        let err = table
            .add_properties(vec![
                Column::new("fresh", ColumnData::from(vec![1u32, 2])),
                Column::new("taken", ColumnData::from(vec![3u32, 4])),
            ])
            .unwrap_err();
        assert!(matches!(err, Error::AlreadyExists(_)));
        assert!(!table.has_property("fresh"));
    }

    #[test]
    fn batch_upsert_replaces_and_appends_in_one_call() {
        let mut table = PropertyTable::new(2);
        table
            .add_property(Column::new("x", ColumnData::from(vec![1u32, 2])))
            .unwrap();
        table
            .upsert_properties(vec![
                Column::new("x", ColumnData::from(vec![9u32, 9])),
                Column::new("y", ColumnData::from(vec![1.0f64, 2.0])),
            ])
            .unwrap();
        assert_eq!(table.typed_column::<u32>("x").unwrap(), &[9, 9]);
        assert!(table.has_property("y"));
    }
}
