// Safe wrappers around the connection-level libsqlite3_sys functions used by
// this crate. Statement-level calls live on `StatementHandle`.

use std::ffi::CStr;
use std::os::raw::{c_char, c_int};
use std::ptr;

use crate::sqlite::error::SqliteError;
use libsqlite3_sys::{self as ffi_sys, sqlite3, sqlite3_stmt};

// `Column::as_int` returns the engine's `int` unchanged as an `i32`.
const _: () = assert!(std::mem::size_of::<c_int>() == 4);

/// Wrapper around [`sqlite3_open_v2`].
///
/// On failure the handle (if one was allocated) is closed before returning,
/// and `*handle` is reset to null.
pub(crate) fn open_v2(
    filename: *const c_char,
    handle: *mut *mut sqlite3,
    flags: i32,
    vfs: *const c_char,
) -> Result<(), SqliteError> {
    let rc = unsafe { ffi_sys::sqlite3_open_v2(filename, handle, flags, vfs) };
    if rc == ffi_sys::SQLITE_OK {
        return Ok(());
    }

    // handle may be null on OOM
    let db = unsafe { *handle };
    if db.is_null() {
        return Err(SqliteError::from_code(rc, "sqlite3_open_v2 failed"));
    }

    // Capture the message while the handle is still alive.
    let err = SqliteError::new(db);
    unsafe {
        ffi_sys::sqlite3_close(db);
        *handle = ptr::null_mut();
    }
    Err(err)
}

/// Map a result code from a call on `db` to a `Result`, reading the error
/// details off the connection.
fn check(db: *mut sqlite3, rc: c_int) -> Result<(), SqliteError> {
    match rc {
        ffi_sys::SQLITE_OK => Ok(()),
        _ => Err(SqliteError::new(db)),
    }
}

/// Wrapper around [`sqlite3_extended_result_codes`].
pub(crate) fn extended_result_codes(db: *mut sqlite3, on: bool) -> Result<(), SqliteError> {
    check(db, unsafe {
        ffi_sys::sqlite3_extended_result_codes(db, c_int::from(on))
    })
}

/// Wrapper around [`sqlite3_busy_timeout`].
pub(crate) fn busy_timeout(db: *mut sqlite3, ms: i32) -> Result<(), SqliteError> {
    check(db, unsafe { ffi_sys::sqlite3_busy_timeout(db, ms) })
}

/// Wrapper around [`sqlite3_prepare_v3`]. `sql` is NUL-terminated.
pub(crate) fn prepare_v3(
    db: *mut sqlite3,
    sql: *const c_char,
    flags: u32,
    stmt: &mut *mut sqlite3_stmt,
    tail: &mut *const c_char,
) -> Result<(), SqliteError> {
    check(db, unsafe {
        ffi_sys::sqlite3_prepare_v3(db, sql, -1, flags, stmt, tail)
    })
}

/// Wrapper around [`sqlite3_extended_errcode`].
pub(crate) fn extended_errcode(db: *mut sqlite3) -> i32 {
    unsafe { ffi_sys::sqlite3_extended_errcode(db) }
}

/// Wrapper around [`sqlite3_errmsg`], copied out of SQLite's buffer.
///
/// The message is connection-wide: it describes the most recent failed API
/// call on `db`, whichever statement made it. Invalid UTF-8 is replaced.
pub(crate) fn errmsg(db: *mut sqlite3) -> String {
    let msg = unsafe { ffi_sys::sqlite3_errmsg(db) };
    if msg.is_null() {
        return String::new();
    }
    unsafe { CStr::from_ptr(msg) }.to_string_lossy().into_owned()
}

/// Wrapper around [`sqlite3_close`].
pub(crate) fn close(db: *mut sqlite3) -> Result<(), SqliteError> {
    check(db, unsafe { ffi_sys::sqlite3_close(db) })
}

/// Wrapper around [`sqlite3_exec`] with no callback.
pub(crate) fn exec(db: *mut sqlite3, sql: *const c_char) -> Result<(), SqliteError> {
    check(db, unsafe {
        ffi_sys::sqlite3_exec(db, sql, None, ptr::null_mut(), ptr::null_mut())
    })
}

/// Wrapper around [`sqlite3_last_insert_rowid`].
pub(crate) fn last_insert_rowid(db: *mut sqlite3) -> i64 {
    unsafe { ffi_sys::sqlite3_last_insert_rowid(db) }
}

/// Wrapper around [`sqlite3_changes64`].
pub(crate) fn changes(db: *mut sqlite3) -> u64 {
    let n = unsafe { ffi_sys::sqlite3_changes64(db) };
    u64::try_from(n).unwrap_or(0)
}

/// Wrapper around [`sqlite3_total_changes64`].
pub(crate) fn total_changes(db: *mut sqlite3) -> u64 {
    let n = unsafe { ffi_sys::sqlite3_total_changes64(db) };
    u64::try_from(n).unwrap_or(0)
}
