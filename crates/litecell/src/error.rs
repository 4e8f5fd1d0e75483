//! Types for working with errors produced by litecell.
//!
//! Only the statement and connection layers return errors. Reads through a
//! [`Column`](crate::Column) never fail: they fall back to SQLite's default
//! conversions instead. [`Column::get`](crate::Column::get) is the strict
//! alternative and reports a [`DecodeError`].

use std::io;
use std::num::TryFromIntError;

use crate::sqlite::{ColumnType, SqliteError};

/// A specialized `Result` type for litecell.
pub type Result<T> = std::result::Result<T, Error>;

/// Why a cell could not be decoded into the requested Rust type.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    #[error("incompatible source data type: {0}")]
    DataType(ColumnType),
    #[error("unexpected NULL")]
    UnexpectedNull,
    #[error("decoding conversion error: {0}")]
    Conversion(String),
}

impl From<TryFromIntError> for DecodeError {
    fn from(err: TryFromIntError) -> Self {
        DecodeError::Conversion(err.to_string())
    }
}

impl From<std::str::Utf8Error> for DecodeError {
    fn from(err: std::str::Utf8Error) -> Self {
        DecodeError::Conversion(err.to_string())
    }
}

/// Represents all the ways a method can fail within litecell.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Error returned from the database.
    #[error("error returned from database: {0}")]
    Sqlite(#[source] SqliteError),

    /// Error opening the database file.
    #[error("error communicating with database: {0}")]
    Io(#[from] io::Error),

    /// The request could not be passed to SQLite as given (embedded NUL
    /// bytes, trailing statements, binding while a statement is running).
    #[error("encountered unexpected or invalid data: {0}")]
    Protocol(String),

    /// No rows returned by a query that expected to return at least one row.
    #[error("no rows returned by a query that expected to return at least one row")]
    RowNotFound,

    /// A column was requested while the statement was not positioned on a row.
    #[error("statement is not positioned on a row")]
    NoRow,

    /// Column index was out of bounds.
    #[error("column index out of bounds: the len is {len}, but the index is {index}")]
    ColumnIndexOutOfBounds { index: usize, len: usize },

    /// No column found for the given name.
    #[error("no column found for name: {0}")]
    ColumnNotFound(String),

    /// No bind parameter found for the given name.
    #[error("no parameter found for name: {0}")]
    ParameterNotFound(String),

    /// Error occurred while decoding a value from a specific column.
    #[error("error occurred while decoding column {index}: {source}")]
    ColumnDecode {
        index: usize,

        #[source]
        source: DecodeError,
    },

    /// Error occurred while decoding a value.
    #[error("error occurred while decoding: {0}")]
    Decode(#[source] DecodeError),
}

impl Error {
    /// Consume this error, returning the SQLite error behind it, if any.
    pub fn into_sqlite_error(self) -> Option<SqliteError> {
        match self {
            Error::Sqlite(err) => Some(err),
            _ => None,
        }
    }

    /// The SQLite error behind this error, if any.
    pub fn as_sqlite_error(&self) -> Option<&SqliteError> {
        match self {
            Error::Sqlite(err) => Some(err),
            _ => None,
        }
    }
}

impl From<SqliteError> for Error {
    fn from(error: SqliteError) -> Self {
        Error::Sqlite(error)
    }
}

impl From<DecodeError> for Error {
    fn from(error: DecodeError) -> Self {
        Error::Decode(error)
    }
}
