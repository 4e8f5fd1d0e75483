use std::{path::Path, rc::Rc};

use crate::{
    Encode, OpenOptions, Statement, Transaction, Value,
    error::{Error, Result},
    logger::LogSettings,
    sqlite::ffi,
};

mod establish;
mod handle;

pub(crate) use handle::ConnectionHandle;

use establish::EstablishParams;

/// A single connection to a SQLite database.
///
/// Statements prepared on a connection share its handle, so the database is
/// closed only once the connection and all of its statements are dropped.
#[derive(Debug)]
pub struct Connection {
    handle: Rc<ConnectionHandle>,
    log_settings: LogSettings,
}

impl Connection {
    /// Open the database file at `path`, creating it if needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        OpenOptions::new().create_if_missing(true).open(path)
    }

    /// Open a private, empty in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        OpenOptions::new().open_in_memory()
    }

    /// Open a database as described by `options`.
    pub fn open_with(options: &OpenOptions) -> Result<Self> {
        let handle = EstablishParams::from_options(options)?.establish()?;

        let pragmas = options.pragma_string();
        if !pragmas.is_empty() {
            handle.exec(&pragmas)?;
        }

        Ok(Self {
            handle: Rc::new(handle),
            log_settings: options.log_settings.clone(),
        })
    }

    /// Run zero or more `;`-separated statements, discarding any rows.
    pub fn execute_batch(&self, sql: &str) -> Result<()> {
        self.handle.exec(sql)
    }

    /// Prepare and run a single statement with positional parameters,
    /// returning the number of rows changed.
    ///
    /// ```
    /// # fn main() -> litecell::Result<()> {
    /// let conn = litecell::Connection::open_in_memory()?;
    /// conn.execute_batch("CREATE TABLE kv (k TEXT, v INTEGER)")?;
    /// let n = conn.execute("INSERT INTO kv VALUES (?, ?), (?, ?)", &[&"a", &1, &"b", &2])?;
    /// assert_eq!(n, 2);
    /// # Ok(())
    /// # }
    /// ```
    pub fn execute(&self, sql: &str, params: &[&dyn Encode]) -> Result<u64> {
        let mut stmt = self.prepare(sql)?;
        for (i, param) in params.iter().enumerate() {
            stmt.bind(i + 1, *param)?;
        }
        stmt.execute()
    }

    /// Compile `sql`, which must hold exactly one statement.
    pub fn prepare(&self, sql: &str) -> Result<Statement> {
        Statement::prepare(&self.handle, sql, self.log_settings.clone())
    }

    /// The first column of the first row returned by `sql`.
    ///
    /// Fails with [`Error::RowNotFound`] if there are no rows.
    pub fn query_value(&self, sql: &str) -> Result<Value> {
        let mut stmt = self.prepare(sql)?;
        if !stmt.step()? {
            return Err(Error::RowNotFound);
        }
        Ok(stmt.column(0)?.to_value())
    }

    /// `true` if a table or view called `name` exists in the main schema.
    pub fn table_exists(&self, name: &str) -> Result<bool> {
        let mut stmt = self.prepare(
            "SELECT 1 FROM sqlite_schema WHERE type IN ('table', 'view') AND name = ?1",
        )?;
        stmt.bind(1, name)?;
        stmt.step()
    }

    /// Rowid of the most recent successful insert.
    pub fn last_insert_rowid(&self) -> i64 {
        self.handle.last_insert_rowid()
    }

    /// Rows changed by the most recent `INSERT`, `UPDATE` or `DELETE`.
    pub fn changes(&self) -> u64 {
        self.handle.changes()
    }

    /// Message for the most recent failed call on this connection.
    pub fn last_error_message(&self) -> String {
        self.handle.last_error_message()
    }

    /// Extended result code of the most recent call on this connection.
    pub fn last_error_code(&self) -> i32 {
        ffi::extended_errcode(self.handle.as_ptr())
    }

    /// Start a transaction. It is rolled back on drop unless committed.
    pub fn begin(&self) -> Result<Transaction<'_>> {
        Transaction::begin(self)
    }
}
