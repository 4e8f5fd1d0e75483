use std::{
    ffi::CString,
    io,
    ptr::{NonNull, null, null_mut},
    time::Duration,
};

use libsqlite3_sys::{
    SQLITE_OPEN_CREATE, SQLITE_OPEN_FULLMUTEX, SQLITE_OPEN_MEMORY, SQLITE_OPEN_NOMUTEX,
    SQLITE_OPEN_READONLY, SQLITE_OPEN_READWRITE, SQLITE_OPEN_URI,
};

use crate::{Error, OpenOptions, sqlite::ffi};

use super::handle::ConnectionHandle;

/// The arguments to `sqlite3_open_v2`, derived from [`OpenOptions`].
#[derive(Debug)]
pub(crate) struct EstablishParams {
    filename: CString,
    open_flags: i32,
    busy_timeout: Duration,
}

impl EstablishParams {
    pub(crate) fn from_options(options: &OpenOptions) -> Result<Self, Error> {
        let mut filename = options
            .filename
            .to_str()
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    "filename passed to SQLite must be valid UTF-8",
                )
            })?
            .to_owned();

        // [SQLITE_OPEN_NOMUTEX] makes [sqlite3_open_v2] fail if it cannot
        // give us a lock-free connection object.
        let mut flags = if options.serialized {
            SQLITE_OPEN_FULLMUTEX
        } else {
            SQLITE_OPEN_NOMUTEX
        };

        flags |= if options.read_only {
            SQLITE_OPEN_READONLY
        } else if options.create_if_missing || options.in_memory {
            SQLITE_OPEN_CREATE | SQLITE_OPEN_READWRITE
        } else {
            SQLITE_OPEN_READWRITE
        };

        if options.in_memory {
            flags |= SQLITE_OPEN_MEMORY;
        }

        let mut query_params: Vec<String> = vec![];

        if options.immutable {
            query_params.push("immutable=1".into())
        }

        if let Some(vfs) = &options.vfs {
            query_params.push(format!("vfs={vfs}"))
        }

        if !query_params.is_empty() {
            filename = format!("file:{}?{}", filename, query_params.join("&"));
            flags |= SQLITE_OPEN_URI;
        }

        let filename = CString::new(filename).map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                "filename passed to SQLite must not contain nul bytes",
            )
        })?;

        Ok(Self {
            filename,
            open_flags: flags,
            busy_timeout: options.busy_timeout,
        })
    }

    /// Open the database.
    ///
    /// The busy timeout is passed to [`sqlite3_busy_timeout`] in
    /// milliseconds, clamped to `i32::MAX`.
    pub(crate) fn establish(&self) -> Result<ConnectionHandle, Error> {
        let mut handle = null_mut();

        // <https://www.sqlite.org/c3ref/open.html>
        ffi::open_v2(self.filename.as_ptr(), &mut handle, self.open_flags, null())?;

        let handle = NonNull::new(handle).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::OutOfMemory,
                "SQLite is unable to allocate memory to hold the sqlite3 object",
            )
        })?;
        let handle = ConnectionHandle::new(handle);

        // https://www.sqlite.org/c3ref/extended_result_codes.html
        // NOTE: ignore the failure here
        let _ = ffi::extended_result_codes(handle.as_ptr(), true);

        // SQLite sleeps in increasing intervals while something is locked
        // during [sqlite3_step], up to this limit.
        let ms = i32::try_from(self.busy_timeout.as_millis()).unwrap_or(i32::MAX);
        ffi::busy_timeout(handle.as_ptr(), ms)?;

        tracing::trace!(
            filename = ?self.filename,
            flags = self.open_flags,
            "opened sqlite connection"
        );
        Ok(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_is_always_writable() -> Result<(), Error> {
        let params = EstablishParams::from_options(&OpenOptions::new().in_memory())?;
        assert_ne!(params.open_flags & SQLITE_OPEN_CREATE, 0);
        assert_ne!(params.open_flags & SQLITE_OPEN_MEMORY, 0);
        assert_ne!(params.open_flags & SQLITE_OPEN_NOMUTEX, 0);
        Ok(())
    }

    #[test]
    fn uri_parameters() -> Result<(), Error> {
        let options = OpenOptions::new()
            .filename("data.db")
            .immutable(true)
            .vfs("unix-none")
            .read_only(true)
            .serialized(true);
        let params = EstablishParams::from_options(&options)?;
        assert_eq!(
            params.filename.to_str().unwrap_or_default(),
            "file:data.db?immutable=1&vfs=unix-none"
        );
        assert_ne!(params.open_flags & SQLITE_OPEN_URI, 0);
        assert_ne!(params.open_flags & SQLITE_OPEN_READONLY, 0);
        assert_ne!(params.open_flags & SQLITE_OPEN_FULLMUTEX, 0);
        assert_eq!(params.open_flags & SQLITE_OPEN_CREATE, 0);
        Ok(())
    }

    #[test]
    fn nul_in_filename_is_an_io_error() {
        let options = OpenOptions::new().filename("a\0b");
        assert!(matches!(
            EstablishParams::from_options(&options),
            Err(Error::Io(_))
        ));
    }
}
