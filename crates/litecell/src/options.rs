use std::{
    fmt::Write,
    path::{Path, PathBuf},
    time::Duration,
};

use indexmap::IndexMap;
use log::LevelFilter;

use crate::{Connection, Result, logger::LogSettings};

enum_mode! {
    /// Refer to [SQLite documentation] for the meaning of the database journaling mode.
    ///
    /// [SQLite documentation]: https://www.sqlite.org/pragma.html#pragma_journal_mode
    pub JournalMode {
        Delete => "DELETE",
        Truncate => "TRUNCATE",
        Persist => "PERSIST",
        Memory => "MEMORY",
        Wal => "WAL",
        Off => "OFF",
    }
    default Delete
}

enum_mode! {
    /// Refer to [SQLite documentation] for the meaning of various synchronous settings.
    ///
    /// [SQLite documentation]: https://www.sqlite.org/pragma.html#pragma_synchronous
    pub Synchronous {
        Off => "OFF",
        Normal => "NORMAL",
        Full => "FULL",
        Extra => "EXTRA",
    }
    default Full
}

/// Options for opening a [`Connection`].
///
/// ```no_run
/// use std::time::Duration;
/// use litecell::{JournalMode, OpenOptions};
///
/// let conn = OpenOptions::new()
///     .create_if_missing(true)
///     .journal_mode(JournalMode::Wal)
///     .busy_timeout(Duration::from_millis(250))
///     .open("app.db")?;
/// # Ok::<(), litecell::Error>(())
/// ```
#[derive(Clone, Debug)]
pub struct OpenOptions {
    pub(crate) filename: PathBuf,
    pub(crate) in_memory: bool,
    pub(crate) read_only: bool,
    pub(crate) create_if_missing: bool,
    pub(crate) busy_timeout: Duration,
    pub(crate) log_settings: LogSettings,
    pub(crate) immutable: bool,
    pub(crate) vfs: Option<String>,
    pub(crate) serialized: bool,

    pub(crate) pragmas: IndexMap<String, Option<String>>,
}

impl Default for OpenOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl OpenOptions {
    /// Construct `Self` with default options.
    #[must_use]
    pub fn new() -> Self {
        let mut pragmas: IndexMap<String, Option<String>> = IndexMap::new();

        // Inserting keys up front fixes the order pragmas are issued in, even
        // when a setter later overwrites them.

        // page_size must be set before anything else touches the database.
        pragmas.insert("page_size".into(), None);

        pragmas.insert("journal_mode".into(), None);

        // SQLite leaves foreign keys off for backward compatibility; we turn
        // them on: https://www.sqlite.org/foreignkeys.html#fk_enable
        pragmas.insert("foreign_keys".into(), Some("ON".into()));

        pragmas.insert("synchronous".into(), None);

        Self {
            filename: ":memory:".into(),
            in_memory: false,
            read_only: false,
            create_if_missing: false,
            busy_timeout: Duration::from_secs(5),
            log_settings: LogSettings::default(),
            immutable: false,
            vfs: None,
            serialized: false,
            pragmas,
        }
    }

    /// Use a private in-memory database instead of a file.
    #[must_use]
    pub fn in_memory(mut self) -> Self {
        self.in_memory = true;
        self.filename = ":memory:".into();
        self
    }

    /// Sets the name of the database file.
    #[must_use]
    pub fn filename(mut self, filename: impl AsRef<Path>) -> Self {
        self.filename = filename.as_ref().to_owned();
        self.in_memory = false;
        self
    }

    /// Set the enforcement of [foreign key constraints](https://www.sqlite.org/pragma.html#pragma_foreign_keys).
    ///
    /// Enabled by default.
    #[must_use]
    pub fn foreign_keys(self, on: bool) -> Self {
        self.pragma("foreign_keys", if on { "ON" } else { "OFF" })
    }

    /// Sets the [journal mode](https://www.sqlite.org/pragma.html#pragma_journal_mode) for the database connection.
    ///
    /// No journal mode is set unless requested, so opening a WAL database
    /// does not silently switch it out of WAL.
    #[must_use]
    pub fn journal_mode(self, mode: JournalMode) -> Self {
        self.pragma("journal_mode", mode.as_str())
    }

    /// Sets the [synchronous](https://www.sqlite.org/pragma.html#pragma_synchronous) setting for the database connection.
    #[must_use]
    pub fn synchronous(self, synchronous: Synchronous) -> Self {
        self.pragma("synchronous", synchronous.as_str())
    }

    /// Sets the [page_size](https://www.sqlite.org/pragma.html#pragma_page_size) setting for the database connection.
    #[must_use]
    pub fn page_size(self, page_size: u32) -> Self {
        self.pragma("page_size", &page_size.to_string())
    }

    /// Sets a custom pragma, issued after the built-in ones in insertion order.
    #[must_use]
    pub fn pragma(mut self, key: &str, value: &str) -> Self {
        self.pragmas.insert(key.into(), Some(value.into()));
        self
    }

    /// Open the database with `SQLITE_OPEN_READONLY`.
    #[must_use]
    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    /// Create the database file if it does not exist.
    ///
    /// Off by default for [`OpenOptions`]; [`Connection::open`] turns it on.
    #[must_use]
    pub fn create_if_missing(mut self, create: bool) -> Self {
        self.create_if_missing = create;
        self
    }

    /// Sets a timeout value to wait when the database is locked, before
    /// returning a busy error.
    ///
    /// The default busy timeout is 5 seconds. Durations beyond `i32::MAX`
    /// milliseconds are clamped.
    #[must_use]
    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    /// Tell SQLite the file is on read-only media (the `immutable=1` URI
    /// parameter). Locking and change detection are disabled.
    #[must_use]
    pub fn immutable(mut self, immutable: bool) -> Self {
        self.immutable = immutable;
        self
    }

    /// Sets the [threading mode](https://www.sqlite.org/threadsafe.html) for the database connection.
    ///
    /// `false` (the default) opens with `SQLITE_OPEN_NOMUTEX`, `true` with
    /// `SQLITE_OPEN_FULLMUTEX`.
    #[must_use]
    pub fn serialized(mut self, serialized: bool) -> Self {
        self.serialized = serialized;
        self
    }

    /// Sets the [`vfs`](https://www.sqlite.org/vfs.html) parameter of the database connection.
    #[must_use]
    pub fn vfs(mut self, vfs_name: &str) -> Self {
        self.vfs = Some(vfs_name.into());
        self
    }

    /// Level at which every finished statement is logged.
    #[must_use]
    pub fn log_statements(mut self, level: LevelFilter) -> Self {
        self.log_settings.log_statements(level);
        self
    }

    /// Level at which statements slower than `duration` are logged.
    #[must_use]
    pub fn log_slow_statements(mut self, level: LevelFilter, duration: Duration) -> Self {
        self.log_settings.log_slow_statements(level, duration);
        self
    }

    /// Collect all `PRAGMA` commands into a single string.
    pub(crate) fn pragma_string(&self) -> String {
        let mut string = String::new();
        for (key, opt_value) in &self.pragmas {
            if let Some(value) = opt_value {
                write!(string, "PRAGMA {key} = {value}; ").ok();
            }
        }
        string
    }

    /// Open a connection with these options.
    pub fn open(self, filename: impl AsRef<Path>) -> Result<Connection> {
        Connection::open_with(&self.filename(filename))
    }

    /// Open a private in-memory database with these options.
    pub fn open_in_memory(self) -> Result<Connection> {
        Connection::open_with(&self.in_memory())
    }
}
