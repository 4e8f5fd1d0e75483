use std::os::raw::c_int;

use crate::sqlite::ffi;
use libsqlite3_sys::{self, sqlite3};

// Error Codes And Messages
// https://www.sqlite.org/c3ref/errcode.html

/// Primary Sqlite error codes.
///
/// **Note:** This enum is marked `#[non_exhaustive]`; avoid exhaustive
/// matches as new variants may be introduced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum PrimaryErrCode {
    Error,
    Internal,
    Perm,
    Abort,
    Busy,
    Locked,
    NoMem,
    ReadOnly,
    Interrupt,
    IoErr,
    Corrupt,
    NotFound,
    Full,
    CantOpen,
    Protocol,
    Empty,
    Schema,
    TooBig,
    Constraint,
    Mismatch,
    Misuse,
    NoLfs,
    Auth,
    Format,
    Range,
    NotADB,
    Notice,
    Warning,
    Unknown(u32),
}

impl PrimaryErrCode {
    /// Map a primary or extended result code onto its primary code.
    pub(crate) fn from_code(code: c_int) -> PrimaryErrCode {
        use libsqlite3_sys as sys;

        match code & 0xff {
            sys::SQLITE_ERROR => PrimaryErrCode::Error,
            sys::SQLITE_INTERNAL => PrimaryErrCode::Internal,
            sys::SQLITE_PERM => PrimaryErrCode::Perm,
            sys::SQLITE_ABORT => PrimaryErrCode::Abort,
            sys::SQLITE_BUSY => PrimaryErrCode::Busy,
            sys::SQLITE_LOCKED => PrimaryErrCode::Locked,
            sys::SQLITE_NOMEM => PrimaryErrCode::NoMem,
            sys::SQLITE_READONLY => PrimaryErrCode::ReadOnly,
            sys::SQLITE_INTERRUPT => PrimaryErrCode::Interrupt,
            sys::SQLITE_IOERR => PrimaryErrCode::IoErr,
            sys::SQLITE_CORRUPT => PrimaryErrCode::Corrupt,
            sys::SQLITE_NOTFOUND => PrimaryErrCode::NotFound,
            sys::SQLITE_FULL => PrimaryErrCode::Full,
            sys::SQLITE_CANTOPEN => PrimaryErrCode::CantOpen,
            sys::SQLITE_PROTOCOL => PrimaryErrCode::Protocol,
            sys::SQLITE_EMPTY => PrimaryErrCode::Empty,
            sys::SQLITE_SCHEMA => PrimaryErrCode::Schema,
            sys::SQLITE_TOOBIG => PrimaryErrCode::TooBig,
            sys::SQLITE_CONSTRAINT => PrimaryErrCode::Constraint,
            sys::SQLITE_MISMATCH => PrimaryErrCode::Mismatch,
            sys::SQLITE_MISUSE => PrimaryErrCode::Misuse,
            sys::SQLITE_NOLFS => PrimaryErrCode::NoLfs,
            sys::SQLITE_AUTH => PrimaryErrCode::Auth,
            sys::SQLITE_FORMAT => PrimaryErrCode::Format,
            sys::SQLITE_RANGE => PrimaryErrCode::Range,
            sys::SQLITE_NOTADB => PrimaryErrCode::NotADB,
            sys::SQLITE_NOTICE => PrimaryErrCode::Notice,
            sys::SQLITE_WARNING => PrimaryErrCode::Warning,
            _ => PrimaryErrCode::Unknown(code as u32),
        }
    }
}

/// An error returned from Sqlite.
///
/// Extended result codes are enabled on every connection, so `extended`
/// carries the full code (e.g. `SQLITE_CONSTRAINT_UNIQUE`); `primary` is its
/// low byte.
#[derive(Debug, thiserror::Error)]
#[error("(code: {primary:?}/{extended}) {message}")]
pub struct SqliteError {
    pub(crate) primary: PrimaryErrCode,
    pub(crate) extended: i32,
    pub message: String,
}

impl SqliteError {
    /// Capture the most recent error recorded on `handle`.
    pub(crate) fn new(handle: *mut sqlite3) -> Self {
        let code = ffi::extended_errcode(handle);
        Self::from_code(code, ffi::errmsg(handle))
    }

    pub(crate) fn from_code(code: c_int, message: impl Into<String>) -> Self {
        Self {
            primary: PrimaryErrCode::from_code(code),
            extended: code,
            message: message.into(),
        }
    }

    pub fn primary_code(&self) -> PrimaryErrCode {
        self.primary
    }

    pub fn extended_code(&self) -> i32 {
        self.extended
    }

    pub fn is_busy(&self) -> bool {
        self.primary == PrimaryErrCode::Busy
    }

    pub fn is_constraint(&self) -> bool {
        self.primary == PrimaryErrCode::Constraint
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extended_codes_map_to_primary() {
        assert_eq!(
            PrimaryErrCode::from_code(libsqlite3_sys::SQLITE_CONSTRAINT_UNIQUE),
            PrimaryErrCode::Constraint
        );
        assert_eq!(
            PrimaryErrCode::from_code(libsqlite3_sys::SQLITE_BUSY_TIMEOUT),
            PrimaryErrCode::Busy
        );
        assert_eq!(
            PrimaryErrCode::from_code(libsqlite3_sys::SQLITE_RANGE),
            PrimaryErrCode::Range
        );
    }

    #[test]
    fn unknown_code_is_preserved() {
        assert_eq!(PrimaryErrCode::from_code(0xfe), PrimaryErrCode::Unknown(0xfe));
    }

    #[test]
    fn display_includes_message() {
        let err = SqliteError::from_code(libsqlite3_sys::SQLITE_CONSTRAINT_UNIQUE, "boom");
        assert!(err.is_constraint());
        assert!(!err.is_busy());
        let shown = err.to_string();
        assert!(shown.contains("Constraint"), "{shown}");
        assert!(shown.ends_with("boom"), "{shown}");
    }
}
