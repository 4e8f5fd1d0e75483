use std::fmt::{self, Display, Formatter};
use std::os::raw::c_int;

use libsqlite3_sys::{SQLITE_BLOB, SQLITE_FLOAT, SQLITE_INTEGER, SQLITE_NULL, SQLITE_TEXT};

/// Storage class of a single SQLite value.
///
/// See <https://www.sqlite.org/datatype3.html#storage_classes_and_datatypes>.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ColumnType {
    Integer,
    Float,
    Text,
    Blob,
    Null,
}

impl Display for ColumnType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl ColumnType {
    pub fn is_null(&self) -> bool {
        matches!(self, ColumnType::Null)
    }

    /// The SQL name of the storage class.
    pub fn name(&self) -> &'static str {
        match self {
            ColumnType::Integer => "INTEGER",
            ColumnType::Float => "REAL",
            ColumnType::Text => "TEXT",
            ColumnType::Blob => "BLOB",
            ColumnType::Null => "NULL",
        }
    }

    pub(crate) fn from_code(code: c_int) -> Option<Self> {
        match code {
            SQLITE_INTEGER => Some(ColumnType::Integer),
            SQLITE_FLOAT => Some(ColumnType::Float),
            SQLITE_TEXT => Some(ColumnType::Text),
            SQLITE_BLOB => Some(ColumnType::Blob),
            SQLITE_NULL => Some(ColumnType::Null),

            // https://sqlite.org/c3ref/c_blob.html
            _ => None,
        }
    }
}

#[test]
fn test_from_code() {
    assert_eq!(ColumnType::from_code(SQLITE_INTEGER), Some(ColumnType::Integer));
    assert_eq!(ColumnType::from_code(SQLITE_FLOAT), Some(ColumnType::Float));
    assert_eq!(ColumnType::from_code(SQLITE_TEXT), Some(ColumnType::Text));
    assert_eq!(ColumnType::from_code(SQLITE_BLOB), Some(ColumnType::Blob));
    assert_eq!(ColumnType::from_code(SQLITE_NULL), Some(ColumnType::Null));
    assert!(ColumnType::from_code(9999).is_none());
}

#[test]
fn test_display_pads() {
    assert_eq!(format!("{}", ColumnType::Float), "REAL");
    assert_eq!(format!("[{:>7}]", ColumnType::Null), "[   NULL]");
}
