#![allow(dead_code)]

pub mod db;

use litecell::{Connection, Statement};

pub use litecell_test::{connection, tdb};

/// Prepare `sql` and step it onto its first row.
pub fn first_row(conn: &Connection, sql: &str) -> anyhow::Result<Statement> {
    let mut stmt = conn.prepare(sql)?;
    anyhow::ensure!(stmt.step()?, "no rows for {sql}");
    Ok(stmt)
}
