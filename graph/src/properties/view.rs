//! Typed views: column references specified by property name and a
//! compile-time scalar type, validated once at construction so that
//! afterwards every element access is O(1) and type-checked by the
//! compiler rather than on every read. The tuple constructors below bundle
//! several columns into one validated handle for algorithms that read more
//! than one property per element.

use super::column::ColumnData;
use super::table::{PropertyTable, TypedColumn};
use shared::{Error, Result};

/// A read-only typed view over a single column. Multiple read views over
/// the same or different columns may coexist freely, mirroring §4.3's
/// "multiple readers, single writer" discipline for property columns.
#[derive(Debug)]
pub struct TypedView<'a, T> {
    data: &'a [T],
}

impl<'a, T> TypedView<'a, T> {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline(always)]
    pub fn get(&self, index: usize) -> T
    where
        T: Copy,
    {
        self.data[index]
    }

    pub fn as_slice(&self) -> &[T] {
        self.data
    }
}

pub fn typed_view<'a, T>(table: &'a PropertyTable, name: &str) -> Result<TypedView<'a, T>>
where
    ColumnData: TypedColumn<T>,
{
    Ok(TypedView {
        data: table.typed_column(name)?,
    })
}

macro_rules! typed_view_arity {
    ($name:ident, $count:literal, $($ty:ident => $idx:tt),+) => {
        /// Borrows several columns at once as a tuple of read views,
        /// validating every name and scalar type before returning any
        /// of them.
        pub fn $name<'a, $($ty),+>(
            table: &'a PropertyTable,
            names: [&str; $count],
        ) -> Result<($(TypedView<'a, $ty>,)+)>
        where
            $(ColumnData: TypedColumn<$ty>),+
        {
            Ok(($(typed_view(table, names[$idx])?,)+))
        }
    };
}

typed_view_arity!(typed_view2, 2, A => 0, B => 1);
typed_view_arity!(typed_view3, 3, A => 0, B => 1, C => 2);
typed_view_arity!(typed_view4, 4, A => 0, B => 1, C => 2, D => 3);

/// A read-write typed view holding exclusive borrow of its column. Obtained
/// through [`exclusive_view`], never constructed alongside any other view
/// (read or write) of the same property, matching §4.3's "a read-write
/// view holds exclusive borrow of its columns".
#[derive(Debug)]
pub struct TypedViewMut<'a, T> {
    data: &'a mut [T],
}

impl<'a, T> TypedViewMut<'a, T> {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline(always)]
    pub fn set(&mut self, index: usize, value: T) {
        self.data[index] = value;
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self.data
    }
}

pub fn exclusive_view<'a, T>(
    table: &'a mut PropertyTable,
    name: &str,
) -> Result<TypedViewMut<'a, T>>
where
    ColumnData: TypedColumn<T>,
{
    let column = table.get_property_mut(name)?;
    let actual = column.scalar_type();
    match ColumnData::as_typed_mut(column.data_mut()) {
        Some(data) => Ok(TypedViewMut { data }),
        None => Err(Error::type_error(format!(
            "property '{}' is {:?}, not the requested scalar type",
            name, actual
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::properties::column::Column;

    #[test]
    fn typed_view_reads_values_by_index() {
        let mut table = PropertyTable::new(3);
        table
            .add_property(Column::new("x", ColumnData::from(vec![10u32, 20, 30])))
            .unwrap();
        let view: TypedView<u32> = typed_view(&table, "x").unwrap();
        assert_eq!(view.len(), 3);
        assert_eq!(view.get(1), 20);
    }

    #[test]
    fn tuple_view_validates_every_column_before_returning_any() {
        let mut table = PropertyTable::new(2);
        table
            .add_property(Column::new("id", ColumnData::from(vec![1u32, 2])))
            .unwrap();
        table
            .add_property(Column::new("weight", ColumnData::from(vec![0.5f64, 1.5])))
            .unwrap();

        let (ids, weights) = typed_view2::<u32, f64>(&table, ["id", "weight"]).unwrap();
        assert_eq!(ids.get(0), 1);
        assert_eq!(weights.get(1), 1.5);

        let err = typed_view2::<u32, u32>(&table, ["id", "weight"]).unwrap_err();
        assert!(matches!(err, Error::TypeError(_)));
        let err = typed_view2::<u32, f64>(&table, ["id", "missing"]).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn exclusive_view_writes_back_into_the_table() {
        let mut table = PropertyTable::new(2);
        table
            .add_property(Column::new("x", ColumnData::from(vec![0u32, 0])))
            .unwrap();
        {
            let mut view: TypedViewMut<u32> = exclusive_view(&mut table, "x").unwrap();
            view.set(0, 7);
            view.set(1, 8);
        }
        let view: TypedView<u32> = typed_view(&table, "x").unwrap();
        assert_eq!(view.as_slice(), &[7, 8]);
    }

    #[test]
    fn exclusive_view_rejects_a_type_mismatch() {
        let mut table = PropertyTable::new(2);
        table
            .add_property(Column::new("x", ColumnData::from(vec![0u32, 0])))
            .unwrap();
        let err = exclusive_view::<f64>(&mut table, "x").unwrap_err();
        assert!(matches!(err, Error::TypeError(_)));
    }
}
