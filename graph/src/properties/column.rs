//! A single property column: one scalar type, one name, one array of
//! length `N` (nodes) or `M` (edges).

/// The logical scalar type of a property column, per spec.md §6.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarType {
    Bool,
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    U64,
    I64,
    F32,
    F64,
    String,
}

/// A named, typed, contiguous array. Immutable once published inside a
/// [`super::table::PropertyTable`]; the table is what may add, remove or
/// replace columns, never the column itself.
#[derive(Debug, Clone)]
pub struct Column {
    name: String,
    data: ColumnData,
}

#[derive(Debug, Clone)]
pub enum ColumnData {
    Bool(Vec<bool>),
    U8(Vec<u8>),
    I8(Vec<i8>),
    U16(Vec<u16>),
    I16(Vec<i16>),
    U32(Vec<u32>),
    I32(Vec<i32>),
    U64(Vec<u64>),
    I64(Vec<i64>),
    F32(Vec<f32>),
    F64(Vec<f64>),
    String(Vec<String>),
}

impl ColumnData {
    pub fn scalar_type(&self) -> ScalarType {
        match self {
            ColumnData::Bool(_) => ScalarType::Bool,
            ColumnData::U8(_) => ScalarType::U8,
            ColumnData::I8(_) => ScalarType::I8,
            ColumnData::U16(_) => ScalarType::U16,
            ColumnData::I16(_) => ScalarType::I16,
            ColumnData::U32(_) => ScalarType::U32,
            ColumnData::I32(_) => ScalarType::I32,
            ColumnData::U64(_) => ScalarType::U64,
            ColumnData::I64(_) => ScalarType::I64,
            ColumnData::F32(_) => ScalarType::F32,
            ColumnData::F64(_) => ScalarType::F64,
            ColumnData::String(_) => ScalarType::String,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ColumnData::Bool(v) => v.len(),
            ColumnData::U8(v) => v.len(),
            ColumnData::I8(v) => v.len(),
            ColumnData::U16(v) => v.len(),
            ColumnData::I16(v) => v.len(),
            ColumnData::U32(v) => v.len(),
            ColumnData::I32(v) => v.len(),
            ColumnData::U64(v) => v.len(),
            ColumnData::I64(v) => v.len(),
            ColumnData::F32(v) => v.len(),
            ColumnData::F64(v) => v.len(),
            ColumnData::String(v) => v.len(),
        }
    }
}

impl Column {
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        Column {
            name: name.into(),
            data,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn scalar_type(&self) -> ScalarType {
        self.data.scalar_type()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn data(&self) -> &ColumnData {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut ColumnData {
        &mut self.data
    }
}

/// Generates `as_*`/`as_*_mut` typed accessors plus a `From` impl for a
/// single Rust scalar type, mirroring how the teacher exposes typed column
/// access without a copy.
macro_rules! typed_accessor {
    ($variant:ident, $ty:ty, $getter:ident, $getter_mut:ident) => {
        impl ColumnData {
            pub fn $getter(&self) -> Option<&[$ty]> {
                match self {
                    ColumnData::$variant(v) => Some(v.as_slice()),
                    _ => None,
                }
            }

            pub fn $getter_mut(&mut self) -> Option<&mut [$ty]> {
                match self {
                    ColumnData::$variant(v) => Some(v.as_mut_slice()),
                    _ => None,
                }
            }
        }

        impl From<Vec<$ty>> for ColumnData {
            fn from(v: Vec<$ty>) -> Self {
                ColumnData::$variant(v)
            }
        }
    };
}

typed_accessor!(Bool, bool, as_bool, as_bool_mut);
typed_accessor!(U8, u8, as_u8, as_u8_mut);
typed_accessor!(I8, i8, as_i8, as_i8_mut);
typed_accessor!(U16, u16, as_u16, as_u16_mut);
typed_accessor!(I16, i16, as_i16, as_i16_mut);
typed_accessor!(U32, u32, as_u32, as_u32_mut);
typed_accessor!(I32, i32, as_i32, as_i32_mut);
typed_accessor!(U64, u64, as_u64, as_u64_mut);
typed_accessor!(I64, i64, as_i64, as_i64_mut);
typed_accessor!(F32, f32, as_f32, as_f32_mut);
typed_accessor!(F64, f64, as_f64, as_f64_mut);
typed_accessor!(String, String, as_string, as_string_mut);
