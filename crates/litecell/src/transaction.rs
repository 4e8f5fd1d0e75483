use std::{
    fmt::{self, Debug, Formatter},
    ops::Deref,
};

use crate::{Connection, Result};

/// An in-progress database transaction.
///
/// A transaction starts with a call to [`Connection::begin`] and should end
/// with a call to [`commit`] or [`rollback`]. If neither is called before
/// the transaction goes out of scope, it is rolled back on drop.
///
/// [`commit`]: Self::commit()
/// [`rollback`]: Self::rollback()
pub struct Transaction<'c> {
    connection: &'c Connection,
    open: bool,
}

impl<'c> Transaction<'c> {
    pub(crate) fn begin(connection: &'c Connection) -> Result<Self> {
        connection.execute_batch("BEGIN")?;
        Ok(Self {
            connection,
            open: true,
        })
    }

    /// Commits this transaction.
    pub fn commit(mut self) -> Result<()> {
        self.connection.execute_batch("COMMIT")?;
        self.open = false;
        Ok(())
    }

    /// Aborts this transaction.
    pub fn rollback(mut self) -> Result<()> {
        self.connection.execute_batch("ROLLBACK")?;
        self.open = false;
        Ok(())
    }
}

impl Debug for Transaction<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transaction")
            .field("open", &self.open)
            .finish()
    }
}

impl Deref for Transaction<'_> {
    type Target = Connection;

    fn deref(&self) -> &Self::Target {
        self.connection
    }
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        if self.open
            && let Err(e) = self.connection.execute_batch("ROLLBACK")
        {
            tracing::error!("rollback of dropped transaction failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commit_and_drop() -> Result<()> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("CREATE TABLE t (x INTEGER)")?;

        let tx = conn.begin()?;
        tx.execute("INSERT INTO t VALUES (1)", &[])?;
        tx.commit()?;

        {
            let tx = conn.begin()?;
            tx.execute("INSERT INTO t VALUES (2)", &[])?;
        }

        let tx = conn.begin()?;
        tx.execute("INSERT INTO t VALUES (3)", &[])?;
        tx.rollback()?;

        assert_eq!(
            conn.query_value("SELECT group_concat(x) FROM t")?,
            crate::Value::Text("1".into())
        );
        Ok(())
    }

    #[test]
    fn nested_begin_fails() -> Result<()> {
        let conn = Connection::open_in_memory()?;
        let _tx = conn.begin()?;
        assert!(conn.begin().is_err());
        Ok(())
    }
}
