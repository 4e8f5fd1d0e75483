pub use connection::Connection;
pub use error::{PrimaryErrCode, SqliteError};
pub use statement::Statement;
pub use type_info::ColumnType;
pub use value::Value;

/// SQLite connection handling.
pub(crate) mod connection;
/// SQLite error types and helpers.
mod error;
/// Raw FFI bindings.
mod ffi;
/// Prepared statements and their handles.
pub(crate) mod statement;
/// SQLite storage classes.
mod type_info;
/// Owned SQLite values.
mod value;
