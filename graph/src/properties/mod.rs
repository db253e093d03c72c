//! Columnar property storage for nodes and edges: [`table::PropertyTable`]
//! owns named [`column::Column`]s; [`view`] hands out typed, zero-copy
//! borrows of one column at a time.

pub mod column;
pub mod table;
pub mod view;

pub use column::{Column, ColumnData, ScalarType};
pub use table::PropertyTable;
pub use view::{
    exclusive_view, typed_view, typed_view2, typed_view3, typed_view4, TypedView, TypedViewMut,
};
