use std::{
    ffi::CString,
    fmt::{self, Debug, Formatter},
    os::raw::c_char,
    ptr::{NonNull, null, null_mut},
    rc::Rc,
};

use libsqlite3_sys::sqlite3_stmt;

use crate::{
    Column,
    decode::Decode,
    encode::Encode,
    error::{Error, Result},
    logger::{LogSettings, QueryLogger},
    sqlite::{connection::ConnectionHandle, ffi},
};

mod handle;

pub(crate) use handle::StatementHandle;

/// Where a statement is in its current run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum StepState {
    /// Freshly prepared or reset; parameters may be bound.
    Idle,
    /// Positioned on a row; columns may be read.
    Row,
    /// Finished, either by running out of rows or by an error.
    Done,
}

/// A single prepared SQL statement.
///
/// Rows are visited by calling [`step`](Self::step) and reading the current
/// row through [`column`](Self::column). Columns borrow the statement, so
/// it cannot be stepped while any are alive:
///
/// ```
/// # fn main() -> litecell::Result<()> {
/// use litecell::Connection;
///
/// let conn = Connection::open_in_memory()?;
/// let mut stmt = conn.prepare("SELECT value FROM json_each('[1, 2, 3]')")?;
/// let mut total = 0;
/// while stmt.step()? {
///     total += stmt.column(0)?.as_int64();
/// }
/// assert_eq!(total, 6);
/// # Ok(())
/// # }
/// ```
pub struct Statement {
    pub(crate) handle: Rc<StatementHandle>,
    sql: String,
    state: StepState,
    logger: QueryLogger,
    /// Connection-wide change counter when the current run started.
    changes_before: u64,
}

impl Statement {
    pub(crate) fn prepare(
        conn: &Rc<ConnectionHandle>,
        sql: &str,
        log_settings: LogSettings,
    ) -> Result<Self> {
        if sql.len() > i32::MAX as usize {
            return Err(Error::Protocol(format!(
                "query string must be smaller than {} bytes",
                i32::MAX
            )));
        }
        let query = CString::new(sql)
            .map_err(|_| Error::Protocol("query contains nul bytes".into()))?;

        let (handle, tail) = prepare_one(conn, query.as_ptr())?;
        let handle = handle.ok_or_else(|| Error::Protocol("query contains no statement".into()))?;

        // Anything after the first statement must be whitespace or comments,
        // which SQLite compiles to nothing.
        if !tail.is_null() {
            let (rest, _) = prepare_one(conn, tail)?;
            if rest.is_some() {
                return Err(Error::Protocol(
                    "query contains more than one statement".into(),
                ));
            }
        }

        Ok(Self {
            handle: Rc::new(handle),
            sql: sql.to_owned(),
            state: StepState::Idle,
            logger: QueryLogger::new(log_settings),
            changes_before: 0,
        })
    }

    /// The SQL text this statement was prepared from.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Number of columns in each result row. Zero for statements that
    /// return no data.
    pub fn column_count(&self) -> usize {
        self.handle.column_count()
    }

    /// Name of the result column at `index`.
    pub fn column_name(&self, index: usize) -> Result<&str> {
        self.check_index(index)?;
        Ok(self.handle.column_name(index))
    }

    /// Index of the result column called `name`.
    ///
    /// Exact matches win; otherwise names are compared ignoring ASCII case,
    /// as SQLite does for identifiers.
    pub fn column_index(&self, name: &str) -> Result<usize> {
        let count = self.column_count();
        (0..count)
            .find(|&i| self.handle.column_name(i) == name)
            .or_else(|| {
                (0..count).find(|&i| self.handle.column_name(i).eq_ignore_ascii_case(name))
            })
            .ok_or_else(|| Error::ColumnNotFound(name.into()))
    }

    /// Number of bind parameters. Parameters are numbered from 1.
    pub fn parameter_count(&self) -> usize {
        self.handle.bind_parameter_count()
    }

    /// Bind `value` to the 1-based parameter `index`.
    ///
    /// The statement must be idle: freshly prepared or reset.
    pub fn bind<T>(&mut self, index: usize, value: &T) -> Result<()>
    where
        T: Encode + ?Sized,
    {
        if self.state != StepState::Idle {
            return Err(Error::Protocol(
                "parameters can only be bound before the first step or after a reset".into(),
            ));
        }
        value.encode().bind(&self.handle, index)?;
        Ok(())
    }

    /// Bind `value` to the parameter called `name`.
    ///
    /// The name may be given with its prefix (`:id`) or without it (`id`);
    /// `:`, `@` and `$` prefixes are tried in that order.
    pub fn bind_named<T>(&mut self, name: &str, value: &T) -> Result<()>
    where
        T: Encode + ?Sized,
    {
        let index = self
            .handle
            .bind_parameter_index(name)
            .or_else(|| {
                [':', '@', '$']
                    .iter()
                    .find_map(|p| self.handle.bind_parameter_index(&format!("{p}{name}")))
            })
            .ok_or_else(|| Error::ParameterNotFound(name.into()))?;
        self.bind(index, value)
    }

    /// Reset every parameter to NULL.
    pub fn clear_bindings(&mut self) {
        self.handle.clear_bindings();
    }

    /// Advance to the next row.
    ///
    /// Returns `true` when a row is available and `false` once the statement
    /// is done. After that, or after an error, further calls return `false`
    /// without touching SQLite until the statement is [`reset`](Self::reset).
    pub fn step(&mut self) -> Result<bool> {
        if self.state == StepState::Done {
            return Ok(false);
        }

        if self.state == StepState::Idle {
            self.changes_before = self.handle.total_changes();
        }

        self.logger.start();
        match self.handle.step() {
            Ok(true) => {
                self.state = StepState::Row;
                self.logger.increment_rows_returned();
                Ok(true)
            }
            Ok(false) => {
                self.state = StepState::Done;
                self.logger.increase_rows_affected(self.rows_changed());
                self.logger.finish(&self.sql);
                Ok(false)
            }
            Err(e) => {
                self.state = StepState::Done;
                self.logger.finish(&self.sql);
                Err(e.into())
            }
        }
    }

    /// Run the statement to completion and return the number of rows it
    /// inserted, updated or deleted.
    ///
    /// A statement that is part-way through a run is reset first. Fails with
    /// [`Error::Protocol`] if the statement returns rows; use
    /// [`step`](Self::step) for queries. For a write with a `RETURNING`
    /// clause SQLite has already applied every change by the time the first
    /// row comes back, so the error does not undo them.
    pub fn execute(&mut self) -> Result<u64> {
        if self.state != StepState::Idle
            && let Err(e) = self.reset()
        {
            // The previous run's error has already been returned by step().
            tracing::trace!("reset before execute: {}", e);
        }

        if self.step()? {
            self.reset()?;
            return Err(Error::Protocol(
                "execute() on a statement that returns rows; any changes were applied; use step()"
                    .into(),
            ));
        }
        Ok(self.rows_changed())
    }

    /// Reset the statement so it can be run again. Bindings are kept.
    ///
    /// If the last step failed, its error is returned again here; the
    /// statement is reset either way.
    pub fn reset(&mut self) -> Result<()> {
        self.logger.finish(&self.sql);
        self.state = StepState::Idle;
        self.handle.reset()?;
        Ok(())
    }

    /// `true` while positioned on a row.
    pub fn has_row(&self) -> bool {
        self.state == StepState::Row
    }

    /// `true` once the current run has finished.
    pub fn is_done(&self) -> bool {
        self.state == StepState::Done
    }

    /// The cell at `index` in the current row.
    pub fn column(&self, index: usize) -> Result<Column<'_>> {
        if self.state != StepState::Row {
            return Err(Error::NoRow);
        }
        self.check_index(index)?;
        Ok(Column::new(Rc::clone(&self.handle), index))
    }

    /// The cell in the column called `name` in the current row.
    pub fn column_by_name(&self, name: &str) -> Result<Column<'_>> {
        let index = self.column_index(name)?;
        self.column(index)
    }

    /// Every cell of the current row, in order. Empty when not on a row.
    pub fn columns(&self) -> impl ExactSizeIterator<Item = Column<'_>> + '_ {
        let count = if self.has_row() { self.column_count() } else { 0 };
        (0..count).map(move |i| Column::new(Rc::clone(&self.handle), i))
    }

    /// Decode the cell at `index` in the current row.
    pub fn get<'s, T>(&'s self, index: usize) -> Result<T>
    where
        T: Decode<'s>,
    {
        self.column(index)?
            .get()
            .map_err(|source| Error::ColumnDecode { index, source })
    }

    /// Decode the cell in the column called `name` in the current row.
    pub fn get_by_name<'s, T>(&'s self, name: &str) -> Result<T>
    where
        T: Decode<'s>,
    {
        let index = self.column_index(name)?;
        self.get(index)
    }

    fn check_index(&self, index: usize) -> Result<()> {
        let len = self.column_count();
        if index >= len {
            return Err(Error::ColumnIndexOutOfBounds { index, len });
        }
        Ok(())
    }

    fn rows_changed(&self) -> u64 {
        // sqlite3_changes keeps the count of the last INSERT, UPDATE or
        // DELETE, so it is stale after a read or DDL.
        if self.handle.total_changes() == self.changes_before {
            0
        } else {
            self.handle.changes()
        }
    }
}

impl Debug for Statement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Statement")
            .field("sql", &self.sql)
            .field("state", &self.state)
            .finish()
    }
}

impl Drop for Statement {
    fn drop(&mut self) {
        self.logger.finish(&self.sql);
    }
}

/// Compile the first statement in `sql`.
///
/// Returns `None` for input that holds only whitespace or comments, along
/// with a pointer to whatever follows the compiled statement.
fn prepare_one(
    conn: &Rc<ConnectionHandle>,
    sql: *const c_char,
) -> Result<(Option<StatementHandle>, *const c_char)> {
    let mut stmt: *mut sqlite3_stmt = null_mut();
    let mut tail: *const c_char = null();

    // <https://www.sqlite.org/c3ref/prepare.html>
    ffi::prepare_v3(conn.as_ptr(), sql, 0, &mut stmt, &mut tail)?;

    let handle = NonNull::new(stmt).map(|ptr| StatementHandle::new(ptr, Rc::clone(conn)));
    Ok((handle, tail))
}
