//! A synchronous SQLite driver built around [`Column`], a cheap accessor
//! for one cell of the row a [`Statement`] is positioned on.
//!
//! ```
//! # fn main() -> litecell::Result<()> {
//! use litecell::{ColumnType, Connection};
//!
//! let conn = Connection::open_in_memory()?;
//! let mut stmt = conn.prepare("SELECT 123, 4.5, 'hello', NULL")?;
//! assert!(stmt.step()?);
//!
//! let types: Vec<ColumnType> = stmt.columns().map(|c| c.declared_type()).collect();
//! assert_eq!(
//!     types,
//!     [ColumnType::Integer, ColumnType::Float, ColumnType::Text, ColumnType::Null]
//! );
//! assert_eq!(stmt.column(0)?.as_int(), 123);
//! assert_eq!(stmt.column(2)?.as_text(), "hello");
//! assert_eq!(stmt.get::<Option<i64>>(3)?, None);
//! # Ok(())
//! # }
//! ```

#[macro_use]
mod enum_mode;

mod column;
pub mod decode;
pub mod encode;
mod error;
mod logger;
mod options;
mod sqlite;
mod transaction;
pub mod types;

pub use crate::{
    column::{Column, write_column},
    decode::Decode,
    encode::Encode,
    error::{DecodeError, Error, Result},
    logger::LogSettings,
    options::{JournalMode, OpenOptions, Synchronous},
    sqlite::{ColumnType, Connection, PrimaryErrCode, SqliteError, Statement, Value},
    transaction::Transaction,
};
