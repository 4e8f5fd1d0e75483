use std::path::PathBuf;

use litecell::Connection;
use tempfile::TempDir;

/// A database file in a fresh temporary directory, holding one table `t`
/// with a single row. The directory is removed when the guard is dropped.
pub fn file_db() -> anyhow::Result<(TempDir, PathBuf)> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("test.db");

    let conn = Connection::open(&path)?;
    conn.execute_batch("CREATE TABLE t (id INTEGER PRIMARY KEY, v TEXT); INSERT INTO t (v) VALUES ('one');")?;
    drop(conn);

    Ok((dir, path))
}
