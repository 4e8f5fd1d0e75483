use std::{
    fmt::{self, Display, Formatter},
    marker::PhantomData,
    rc::Rc,
    slice,
};

use libsqlite3_sys::{SQLITE_BLOB, SQLITE_NULL};

use crate::{
    Statement,
    decode::Decode,
    error::DecodeError,
    sqlite::{ColumnType, Value, statement::StatementHandle},
};

/// One cell of the row a [`Statement`] is currently positioned on.
///
/// A `Column` is a shared handle to the statement plus a column index.
/// Cloning it is cheap and clones alias the same cell. The `'s` lifetime
/// borrows the statement, so it cannot be stepped, reset or dropped while a
/// `Column`, or any text or blob borrowed from one, is alive.
///
/// Getters never fail. Each forwards to the matching `sqlite3_column_*`
/// function, and type mismatches resolve to SQLite's own conversions: text
/// that does not start with a number reads as `0`, NULL reads as `0`, `0.0`
/// or an empty slice. Use [`Column::get`] to have mismatches reported
/// instead.
///
/// # Coercion changes the storage type
///
/// Reading a cell as a different type may convert SQLite's internal copy of
/// it. After that, [`declared_type`](Self::declared_type) and the `is_*`
/// predicates are unspecified. Capture the type first if you need it:
///
/// ```
/// # fn main() -> litecell::Result<()> {
/// use litecell::{ColumnType, Connection};
///
/// let conn = Connection::open_in_memory()?;
/// let mut stmt = conn.prepare("SELECT 42")?;
/// assert!(stmt.step()?);
///
/// let col = stmt.column(0)?;
/// let ty = col.declared_type();
/// assert_eq!(col.as_text(), "42");
/// assert_eq!(ty, ColumnType::Integer);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Column<'s> {
    handle: Rc<StatementHandle>,
    index: usize,
    _statement: PhantomData<&'s Statement>,
}

impl<'s> Column<'s> {
    /// Callers guarantee that the statement is on a row and `index` is in
    /// range.
    pub(crate) fn new(handle: Rc<StatementHandle>, index: usize) -> Self {
        Self {
            handle,
            index,
            _statement: PhantomData,
        }
    }

    /// Zero-based index of this column in the result row.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Name of the result column, as given by `AS` or derived by SQLite.
    pub fn name(&self) -> &'s str {
        let name = self.handle.column_name(self.index);
        // SAFETY: column names live until the statement is finalized, which
        // the `'s` borrow rules out.
        unsafe { &*(name as *const str) }
    }

    /// Declared SQL type of the table column behind this result column.
    ///
    /// `None` for expressions and subqueries.
    pub fn decl_type(&self) -> Option<&'s str> {
        let decl = self.handle.column_decltype(self.index)?;
        Some(unsafe { &*(decl as *const str) })
    }

    /// The cell value as a 32-bit integer.
    ///
    /// Out-of-range integers keep their low 32 bits; text is parsed for a
    /// leading number, otherwise `0`.
    pub fn as_int(&self) -> i32 {
        self.handle.column_int(self.index)
    }

    /// The cell value as a 64-bit integer.
    pub fn as_int64(&self) -> i64 {
        self.handle.column_int64(self.index)
    }

    /// The cell value as a double.
    pub fn as_double(&self) -> f64 {
        self.handle.column_double(self.index)
    }

    /// The cell value as text.
    ///
    /// Numbers are rendered by SQLite. NULL and text that is not valid UTF-8
    /// read as `""`; use [`as_text_bytes`](Self::as_text_bytes) for the raw
    /// bytes. Copy the result out if it must outlive the row.
    pub fn as_text(&self) -> &'s str {
        std::str::from_utf8(self.as_text_bytes()).unwrap_or("")
    }

    /// The cell value as text bytes, without the NUL terminator and without
    /// a UTF-8 check.
    pub fn as_text_bytes(&self) -> &'s [u8] {
        self.raw_bytes()
    }

    /// The cell value as a blob.
    ///
    /// Blobs are not NUL-terminated and may contain zero bytes; the slice
    /// covers exactly [`byte_length`](Self::byte_length) bytes. Numbers and
    /// text come back as their text bytes.
    pub fn as_blob(&self) -> &'s [u8] {
        self.raw_bytes()
    }

    /// Storage class of the cell as SQLite currently holds it.
    ///
    /// Only meaningful before the cell has been read as another type; see
    /// the type-level docs.
    pub fn declared_type(&self) -> ColumnType {
        ColumnType::from_code(self.handle.column_type(self.index)).unwrap_or(ColumnType::Null)
    }

    /// `declared_type() == ColumnType::Integer`. Meaningful only before any
    /// coercion.
    pub fn is_integer(&self) -> bool {
        self.declared_type() == ColumnType::Integer
    }

    /// `declared_type() == ColumnType::Float`. Meaningful only before any
    /// coercion.
    pub fn is_float(&self) -> bool {
        self.declared_type() == ColumnType::Float
    }

    /// `declared_type() == ColumnType::Text`. Meaningful only before any
    /// coercion.
    pub fn is_text(&self) -> bool {
        self.declared_type() == ColumnType::Text
    }

    /// `declared_type() == ColumnType::Blob`. Meaningful only before any
    /// coercion.
    pub fn is_blob(&self) -> bool {
        self.declared_type() == ColumnType::Blob
    }

    /// `declared_type() == ColumnType::Null`. Meaningful only before any
    /// coercion.
    pub fn is_null(&self) -> bool {
        self.declared_type() == ColumnType::Null
    }

    /// Number of bytes in the text or blob form of the cell, excluding any
    /// NUL terminator. For numbers, the length of their text form; `0` for
    /// NULL.
    pub fn byte_length(&self) -> usize {
        self.handle.column_bytes(self.index)
    }

    /// The most recent error message on the owning connection.
    ///
    /// This is connection-wide and is not necessarily related to this
    /// column.
    pub fn last_error_message(&self) -> String {
        self.handle.last_error_message()
    }

    /// Decode the cell into `T`, reporting type mismatches instead of
    /// coercing.
    ///
    /// Reads the cell in its storage type, so it does not disturb
    /// [`declared_type`](Self::declared_type).
    pub fn get<T>(&self) -> Result<T, DecodeError>
    where
        T: Decode<'s>,
    {
        T::decode(self)
    }

    /// Copy the cell out in its storage type.
    ///
    /// Text that is not valid UTF-8 is copied lossily.
    pub fn to_value(&self) -> Value {
        match self.declared_type() {
            ColumnType::Null => Value::Null,
            ColumnType::Integer => Value::Integer(self.as_int64()),
            ColumnType::Float => Value::Float(self.as_double()),
            ColumnType::Text => {
                Value::Text(String::from_utf8_lossy(self.as_text_bytes()).into_owned())
            }
            ColumnType::Blob => Value::Blob(self.as_blob().to_vec()),
        }
    }

    // BLOB cells are read with `sqlite3_column_blob` and everything else with
    // `sqlite3_column_text`. Asking a BLOB for text may append a terminator
    // and move the buffer, which would leave earlier slices dangling; this
    // split means a cell is only ever read through one of the two.
    fn raw_bytes(&self) -> &'s [u8] {
        let ptr = match self.handle.column_type(self.index) {
            SQLITE_NULL => return &[],
            SQLITE_BLOB => self.handle.column_blob(self.index) as *const u8,
            _ => self.handle.column_text(self.index),
        };

        // https://www.sqlite.org/c3ref/column_blob.html: call _bytes after
        // _text/_blob so the length matches the returned form.
        let len = self.handle.column_bytes(self.index);
        if ptr.is_null() || len == 0 {
            return &[];
        }

        // SAFETY: SQLite owns `len` bytes at `ptr` until the statement is
        // stepped, reset or finalized, all of which need the `'s` borrow to
        // have ended.
        unsafe { slice::from_raw_parts(ptr, len) }
    }
}

impl fmt::Debug for Column<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("index", &self.index)
            .field("name", &self.name())
            .finish()
    }
}

/// Writes [`Column::as_text`].
impl Display for Column<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_text())
    }
}

/// Insert the text value of `column` into `out` and hand `out` back, so
/// insertions can be chained.
///
/// ```
/// # fn main() -> litecell::Result<()> {
/// use std::fmt::Write;
/// use litecell::{Connection, write_column};
///
/// let conn = Connection::open_in_memory()?;
/// let mut stmt = conn.prepare("SELECT 'a', 1")?;
/// assert!(stmt.step()?);
///
/// let mut out = String::new();
/// write_column(&mut out, &stmt.column(0)?)
///     .and_then(|out| out.write_char('='))
///     .expect("writing to a String cannot fail");
/// write_column(&mut out, &stmt.column(1)?).expect("writing to a String cannot fail");
/// assert_eq!(out, "a=1");
/// # Ok(())
/// # }
/// ```
pub fn write_column<'w, W>(out: &'w mut W, column: &Column<'_>) -> Result<&'w mut W, fmt::Error>
where
    W: fmt::Write + ?Sized,
{
    out.write_str(column.as_text())?;
    Ok(out)
}

impl From<&Column<'_>> for i32 {
    fn from(column: &Column<'_>) -> Self {
        column.as_int()
    }
}

impl From<&Column<'_>> for i64 {
    fn from(column: &Column<'_>) -> Self {
        column.as_int64()
    }
}

impl From<&Column<'_>> for f64 {
    fn from(column: &Column<'_>) -> Self {
        column.as_double()
    }
}

impl From<&Column<'_>> for String {
    fn from(column: &Column<'_>) -> Self {
        column.as_text().to_owned()
    }
}

impl From<&Column<'_>> for Vec<u8> {
    fn from(column: &Column<'_>) -> Self {
        column.as_blob().to_vec()
    }
}

impl<'s> From<&Column<'s>> for Value {
    fn from(column: &Column<'s>) -> Self {
        column.to_value()
    }
}
