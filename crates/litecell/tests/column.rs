//! Integration tests for the column accessor.

mod support;

use litecell::{ColumnType, Value};

use crate::support::{connection, first_row};

#[test]
fn storage_types_agree_with_predicates() -> anyhow::Result<()> {
    let conn = connection()?;
    let stmt = first_row(&conn, "SELECT 1, 1.5, 'a', x'01', NULL")?;

    let expected = [
        ColumnType::Integer,
        ColumnType::Float,
        ColumnType::Text,
        ColumnType::Blob,
        ColumnType::Null,
    ];
    for (col, want) in stmt.columns().zip(expected) {
        let ty = col.declared_type();
        assert_eq!(ty, want, "column {}", col.index());

        let flags = [
            col.is_integer(),
            col.is_float(),
            col.is_text(),
            col.is_blob(),
            col.is_null(),
        ];
        assert_eq!(flags.iter().filter(|f| **f).count(), 1);
        assert_eq!(col.is_null(), ty.is_null());
    }
    Ok(())
}

#[test]
fn integer_reads_as_every_type() -> anyhow::Result<()> {
    let conn = connection()?;
    let stmt = first_row(&conn, "SELECT 42")?;
    let col = stmt.column(0)?;

    assert_eq!(col.declared_type(), ColumnType::Integer);
    assert_eq!(col.as_int(), 42);
    assert_eq!(col.as_int64(), 42);
    assert_eq!(col.as_double(), 42.0);
    assert_eq!(col.as_text(), "42");
    assert_eq!(col.byte_length(), 2);
    Ok(())
}

#[test]
fn null_reads_as_defaults() -> anyhow::Result<()> {
    let conn = connection()?;
    let stmt = first_row(&conn, "SELECT NULL")?;
    let col = stmt.column(0)?;

    assert_eq!(col.declared_type(), ColumnType::Null);
    assert_eq!(col.as_int(), 0);
    assert_eq!(col.as_int64(), 0);
    assert_eq!(col.as_double(), 0.0);
    assert_eq!(col.as_text(), "");
    assert!(col.as_blob().is_empty());
    assert_eq!(col.byte_length(), 0);
    assert_eq!(col.to_value(), Value::Null);
    Ok(())
}

#[test]
fn blob_with_embedded_zero_round_trips() -> anyhow::Result<()> {
    let conn = connection()?;
    conn.execute_batch("CREATE TABLE files (data BLOB)")?;
    conn.execute("INSERT INTO files VALUES (?)", &[&vec![0x00_u8, 0xFF, 0x10]])?;

    let stmt = first_row(&conn, "SELECT data FROM files")?;
    let col = stmt.column(0)?;
    assert!(col.is_blob());
    assert_eq!(col.byte_length(), 3);
    assert_eq!(col.as_blob(), [0x00, 0xFF, 0x10]);
    assert_eq!(hex::encode(col.as_blob()), "00ff10");
    Ok(())
}

#[test]
fn clone_outlives_original() -> anyhow::Result<()> {
    let conn = connection()?;
    let stmt = first_row(&conn, "SELECT 'kept'")?;

    let copy = {
        let original = stmt.column(0)?;
        original.clone()
    };
    assert_eq!(copy.as_text(), "kept");
    assert_eq!(copy.index(), 0);
    Ok(())
}

#[test]
fn mixed_row() -> anyhow::Result<()> {
    let conn = connection()?;
    let stmt = first_row(&conn, "SELECT 123, 4.5, 'hello', NULL")?;

    let c0 = stmt.column(0)?;
    assert!(c0.is_integer());
    assert_eq!(c0.as_int(), 123);

    let c1 = stmt.column(1)?;
    assert!(c1.is_float());
    assert_eq!(c1.as_double(), 4.5);

    let c2 = stmt.column(2)?;
    assert!(c2.is_text());
    assert_eq!(c2.as_text(), "hello");
    assert_eq!(c2.byte_length(), 5);

    let c3 = stmt.column(3)?;
    assert!(c3.is_null());
    assert_eq!(c3.as_int(), 0);
    Ok(())
}

#[test]
fn text_prefix_coercion() -> anyhow::Result<()> {
    let conn = connection()?;
    let stmt = first_row(&conn, "SELECT '12abc', 'abc', '3.5x', 4.9")?;

    assert_eq!(stmt.column(0)?.as_int(), 12);
    assert_eq!(stmt.column(1)?.as_int64(), 0);
    assert_eq!(stmt.column(2)?.as_double(), 3.5);
    assert_eq!(stmt.column(3)?.as_int(), 4);
    Ok(())
}

#[test]
fn column_metadata_by_name() -> anyhow::Result<()> {
    let conn = support::tdb()?;
    let stmt = first_row(&conn, "SELECT id, text AS body FROM tweet ORDER BY id")?;

    let body = stmt.column_by_name("body")?;
    assert_eq!(body.index(), 1);
    assert_eq!(body.name(), "body");
    assert_eq!(body.decl_type(), Some("TEXT"));
    assert_eq!(body.as_text(), "Hello, World!");
    Ok(())
}

#[test]
fn last_error_message_is_connection_wide() -> anyhow::Result<()> {
    let conn = connection()?;
    assert!(conn.prepare("SELECT missing_column").is_err());
    assert!(conn.last_error_message().contains("missing_column"));

    let stmt = first_row(&conn, "SELECT 1")?;
    assert_eq!(stmt.column(0)?.last_error_message(), conn.last_error_message());
    Ok(())
}

#[test]
fn values_serialize() -> anyhow::Result<()> {
    let conn = connection()?;
    let stmt = first_row(&conn, "SELECT 1, 'two', x'03'")?;
    let values: Vec<Value> = stmt.columns().map(|c| c.to_value()).collect();

    assert_eq!(
        serde_json::to_string(&values)?,
        r#"[{"Integer":1},{"Text":"two"},{"Blob":[3]}]"#
    );
    Ok(())
}
