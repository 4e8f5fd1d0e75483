use std::{ffi::CString, ptr::NonNull};

use libsqlite3_sys::sqlite3;

use crate::{Error, sqlite::ffi};

/// Managed handle to the raw SQLite3 database handle.
///
/// Statements hold an `Rc` to this handle, so it is closed only after the
/// connection and every statement prepared on it have been dropped.
#[derive(Debug)]
pub(crate) struct ConnectionHandle(NonNull<sqlite3>);

// A SQLite3 handle is safe to send between threads, provided not more than
// one is accessing it at the same time. We open connections with
// SQLITE_OPEN_NOMUTEX unless serialized mode is requested.

// <https://www.sqlite.org/c3ref/threadsafe.html>

unsafe impl Send for ConnectionHandle {}

impl ConnectionHandle {
    pub(super) fn new(ptr: NonNull<sqlite3>) -> Self {
        Self(ptr)
    }

    pub(crate) fn as_ptr(&self) -> *mut sqlite3 {
        self.0.as_ptr()
    }

    pub(crate) fn last_insert_rowid(&self) -> i64 {
        ffi::last_insert_rowid(self.as_ptr())
    }

    pub(crate) fn changes(&self) -> u64 {
        ffi::changes(self.as_ptr())
    }

    pub(crate) fn total_changes(&self) -> u64 {
        ffi::total_changes(self.as_ptr())
    }

    pub(crate) fn last_error_message(&self) -> String {
        ffi::errmsg(self.as_ptr())
    }

    /// Run one or more `;`-separated statements, discarding any rows.
    pub(crate) fn exec(&self, query: &str) -> Result<(), Error> {
        let query = CString::new(query)
            .map_err(|_| Error::Protocol("query contains nul bytes".into()))?;

        ffi::exec(self.as_ptr(), query.as_ptr())?;
        Ok(())
    }
}

impl Drop for ConnectionHandle {
    fn drop(&mut self) {
        // https://sqlite.org/c3ref/close.html
        if let Err(e) = ffi::close(self.0.as_ptr()) {
            // This only happens if a SQLite object (statement, blob handle,
            // backup) was left open on the connection.
            tracing::error!("sqlite3_close failed: {}", e);
        }
    }
}
