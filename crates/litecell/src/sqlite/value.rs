use crate::sqlite::{ColumnType, SqliteError, statement::StatementHandle};

/// An owned copy of a single SQLite value.
///
/// Produced by [`Column::to_value`](crate::Column::to_value) and
/// [`Connection::query_value`](crate::Connection::query_value), and accepted
/// anywhere a bind parameter is.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Value {
    Null,
    Integer(i64),
    Float(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl Value {
    /// The storage class this value would be stored with.
    pub fn column_type(&self) -> ColumnType {
        match self {
            Value::Null => ColumnType::Null,
            Value::Integer(_) => ColumnType::Integer,
            Value::Float(_) => ColumnType::Float,
            Value::Text(_) => ColumnType::Text,
            Value::Blob(_) => ColumnType::Blob,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_int64(&self) -> Option<i64> {
        match self {
            Value::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Floats, and integers widened to `f64`.
    pub fn as_double(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(v) => Some(v),
            _ => None,
        }
    }

    /// Blob bytes, or the UTF-8 bytes of a text value.
    pub fn as_blob(&self) -> Option<&[u8]> {
        match self {
            Value::Blob(v) => Some(v),
            Value::Text(v) => Some(v.as_bytes()),
            _ => None,
        }
    }

    pub(crate) fn bind(&self, handle: &StatementHandle, index: usize) -> Result<(), SqliteError> {
        match self {
            Value::Null => handle.bind_null(index),
            Value::Integer(v) => handle.bind_int64(index, *v),
            Value::Float(v) => handle.bind_double(index, *v),
            Value::Text(v) => handle.bind_text(index, v),
            Value::Blob(v) => handle.bind_blob(index, v),
        }
    }
}
