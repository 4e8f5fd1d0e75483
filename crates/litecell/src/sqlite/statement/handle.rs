use std::ffi::{CStr, CString, c_void};
use std::os::raw::{c_char, c_int};
use std::ptr::NonNull;
use std::rc::Rc;

use libsqlite3_sys::{
    SQLITE_DONE, SQLITE_MISUSE, SQLITE_OK, SQLITE_RANGE, SQLITE_ROW, SQLITE_TRANSIENT,
    SQLITE_UTF8, sqlite3, sqlite3_bind_blob64, sqlite3_bind_double, sqlite3_bind_int64,
    sqlite3_bind_null, sqlite3_bind_parameter_count, sqlite3_bind_parameter_index,
    sqlite3_bind_text64, sqlite3_clear_bindings, sqlite3_column_blob, sqlite3_column_bytes,
    sqlite3_column_count, sqlite3_column_decltype, sqlite3_column_double, sqlite3_column_int,
    sqlite3_column_int64, sqlite3_column_name, sqlite3_column_text, sqlite3_column_type,
    sqlite3_finalize, sqlite3_reset, sqlite3_step, sqlite3_stmt,
};

use crate::sqlite::{SqliteError, connection::ConnectionHandle, ffi};

/// Owned handle to a prepared `sqlite3_stmt`.
///
/// The handle keeps its connection alive, so the statement is always
/// finalized before the connection is closed. Every method takes `&self`:
/// the handle is shared between a `Statement` and its `Column`s, and the
/// `Statement` API is what serializes stepping against column reads.
#[derive(Debug)]
pub(crate) struct StatementHandle {
    ptr: NonNull<sqlite3_stmt>,
    conn: Rc<ConnectionHandle>,
}

impl StatementHandle {
    pub(crate) fn new(ptr: NonNull<sqlite3_stmt>, conn: Rc<ConnectionHandle>) -> Self {
        Self { ptr, conn }
    }

    fn as_ptr(&self) -> *mut sqlite3_stmt {
        self.ptr.as_ptr()
    }

    pub(crate) fn db_handle(&self) -> *mut sqlite3 {
        self.conn.as_ptr()
    }

    pub(crate) fn last_error(&self) -> SqliteError {
        SqliteError::new(self.db_handle())
    }

    pub(crate) fn last_error_message(&self) -> String {
        ffi::errmsg(self.db_handle())
    }

    /// Rows changed by the most recent write on the owning connection.
    pub(crate) fn changes(&self) -> u64 {
        self.conn.changes()
    }

    /// Rows changed on the owning connection since it was opened, triggers
    /// included.
    pub(crate) fn total_changes(&self) -> u64 {
        self.conn.total_changes()
    }

    fn check(&self, rc: c_int) -> Result<(), SqliteError> {
        if rc == SQLITE_OK {
            Ok(())
        } else {
            Err(self.last_error())
        }
    }

    pub(crate) fn column_count(&self) -> usize {
        // https://sqlite.org/c3ref/column_count.html
        unsafe { sqlite3_column_count(self.as_ptr()) as usize }
    }

    /// Name of a result column, or `""` if SQLite could not allocate it or it
    /// is not valid UTF-8.
    pub(crate) fn column_name(&self, index: usize) -> &str {
        // https://sqlite.org/c3ref/column_name.html
        unsafe {
            let name = sqlite3_column_name(self.as_ptr(), index as c_int);
            if name.is_null() {
                return "";
            }
            CStr::from_ptr(name).to_str().unwrap_or("")
        }
    }

    /// Declared type of the table column behind a result column.
    pub(crate) fn column_decltype(&self, index: usize) -> Option<&str> {
        unsafe {
            let decl = sqlite3_column_decltype(self.as_ptr(), index as c_int);
            if decl.is_null() {
                // If the Nth column of the result set is an expression or subquery,
                // then a NULL pointer is returned.
                return None;
            }
            CStr::from_ptr(decl).to_str().ok()
        }
    }

    // Number Of SQL Parameters

    pub(crate) fn bind_parameter_count(&self) -> usize {
        // https://www.sqlite.org/c3ref/bind_parameter_count.html
        unsafe { sqlite3_bind_parameter_count(self.as_ptr()) as usize }
    }

    /// Index of a named parameter, including its prefix (`:name`).
    pub(crate) fn bind_parameter_index(&self, name: &str) -> Option<usize> {
        let name = CString::new(name).ok()?;
        // https://www.sqlite.org/c3ref/bind_parameter_index.html
        let index = unsafe { sqlite3_bind_parameter_index(self.as_ptr(), name.as_ptr()) };
        (index > 0).then_some(index as usize)
    }

    // Binding Values To Prepared Statements
    // https://www.sqlite.org/c3ref/bind_blob.html
    // NOTE: The first host parameter has an index of 1, not 0.

    /// An index past `c_int` would wrap onto a valid parameter.
    fn param_index(index: usize) -> Result<c_int, SqliteError> {
        c_int::try_from(index).map_err(|_| {
            SqliteError::from_code(SQLITE_RANGE, format!("parameter index {index} out of range"))
        })
    }

    pub(crate) fn bind_blob(&self, index: usize, v: &[u8]) -> Result<(), SqliteError> {
        let index = Self::param_index(index)?;
        self.check(unsafe {
            sqlite3_bind_blob64(
                self.as_ptr(),
                index,
                v.as_ptr() as *const c_void,
                v.len() as u64,
                SQLITE_TRANSIENT(),
            )
        })
    }

    pub(crate) fn bind_text(&self, index: usize, v: &str) -> Result<(), SqliteError> {
        let index = Self::param_index(index)?;
        self.check(unsafe {
            sqlite3_bind_text64(
                self.as_ptr(),
                index,
                v.as_ptr() as *const c_char,
                v.len() as u64,
                SQLITE_TRANSIENT(),
                SQLITE_UTF8 as u8,
            )
        })
    }

    pub(crate) fn bind_int64(&self, index: usize, v: i64) -> Result<(), SqliteError> {
        let index = Self::param_index(index)?;
        self.check(unsafe { sqlite3_bind_int64(self.as_ptr(), index, v) })
    }

    pub(crate) fn bind_double(&self, index: usize, v: f64) -> Result<(), SqliteError> {
        let index = Self::param_index(index)?;
        self.check(unsafe { sqlite3_bind_double(self.as_ptr(), index, v) })
    }

    pub(crate) fn bind_null(&self, index: usize) -> Result<(), SqliteError> {
        let index = Self::param_index(index)?;
        self.check(unsafe { sqlite3_bind_null(self.as_ptr(), index) })
    }

    pub(crate) fn clear_bindings(&self) {
        unsafe { sqlite3_clear_bindings(self.as_ptr()) };
    }

    // Result values from the query.
    // https://www.sqlite.org/c3ref/column_blob.html
    //
    // These are only meaningful while the statement is positioned on a row;
    // outside of one SQLite returns NULL/0 defaults.

    pub(crate) fn column_type(&self, index: usize) -> c_int {
        unsafe { sqlite3_column_type(self.as_ptr(), index as c_int) }
    }

    pub(crate) fn column_int(&self, index: usize) -> i32 {
        unsafe { sqlite3_column_int(self.as_ptr(), index as c_int) }
    }

    pub(crate) fn column_int64(&self, index: usize) -> i64 {
        unsafe { sqlite3_column_int64(self.as_ptr(), index as c_int) }
    }

    pub(crate) fn column_double(&self, index: usize) -> f64 {
        unsafe { sqlite3_column_double(self.as_ptr(), index as c_int) }
    }

    pub(crate) fn column_text(&self, index: usize) -> *const u8 {
        unsafe { sqlite3_column_text(self.as_ptr(), index as c_int) }
    }

    pub(crate) fn column_blob(&self, index: usize) -> *const c_void {
        unsafe { sqlite3_column_blob(self.as_ptr(), index as c_int) }
    }

    pub(crate) fn column_bytes(&self, index: usize) -> usize {
        let n = unsafe { sqlite3_column_bytes(self.as_ptr(), index as c_int) };
        usize::try_from(n).unwrap_or(0)
    }

    /// Reset the statement so it can be stepped again. Bindings are kept.
    ///
    /// If the most recent step failed, SQLite reports that error again here;
    /// the statement is reset either way.
    pub(crate) fn reset(&self) -> Result<(), SqliteError> {
        self.check(unsafe { sqlite3_reset(self.as_ptr()) })
    }

    /// Advance to the next row. Returns `false` once the statement is done.
    pub(crate) fn step(&self) -> Result<bool, SqliteError> {
        match unsafe { sqlite3_step(self.as_ptr()) } {
            SQLITE_ROW => Ok(true),
            SQLITE_DONE => Ok(false),
            _ => Err(self.last_error()),
        }
    }
}

impl Drop for StatementHandle {
    fn drop(&mut self) {
        unsafe {
            // A failed last step is reported again by reset; it has already
            // been surfaced to the caller, so only trace it here.
            if sqlite3_reset(self.as_ptr()) != SQLITE_OK {
                tracing::trace!("sqlite3_reset before finalize: {}", self.last_error());
            }

            // https://sqlite.org/c3ref/finalize.html
            let status = sqlite3_finalize(self.as_ptr());
            if status == SQLITE_MISUSE {
                // sqlite3_finalize returns SQLITE_MISUSE for a detected double
                // free, i.e. calling it on an already finalized statement.
                panic!("Detected sqlite3_finalize misuse.");
            } else if status != SQLITE_OK {
                tracing::error!("sqlite3_finalize failed: {}", self.last_error());
            }
        }
    }
}
