use litecell::{Connection, OpenOptions};

const TEST_SCHEMA: &str = include_str!("setup.sql");

// Make a new connection
pub fn connection() -> anyhow::Result<Connection> {
    Ok(OpenOptions::new().open_in_memory()?)
}

/// Return a connection to a database pre-configured with our test schema.
pub fn tdb() -> anyhow::Result<Connection> {
    let conn = connection()?;
    conn.execute_batch(TEST_SCHEMA)?;
    Ok(conn)
}

// Test that a value survives a bind and comes back out of a column, and that
// a SQL literal decodes to the same value.
#[macro_export]
macro_rules! test_column {
    ($name:ident<$ty:ty>($($text:literal == $value:expr),+ $(,)?)) => {
        paste::item! {
            #[test]
            fn [< test_column_ $name >] () -> anyhow::Result<()> {
                let conn = $crate::connection()?;

                $(
                    {
                        let query = format!($crate::query_for_test_column!(), $text);
                        println!("{query} bound to {:?}", $value);

                        let mut stmt = conn.prepare(&query)?;
                        stmt.bind(1, &$value)?;
                        assert!(stmt.step()?, "no row for {query}");

                        let matches: bool = stmt.get(0)?;
                        let returned: $ty = stmt.get(1)?;
                        let round_trip: $ty = stmt.get(2)?;

                        assert!(matches,
                                "[1] DB value mismatch; given value: {:?}\n\
                                 as returned: {:?}\n\
                                 round-trip: {:?}",
                                $value, returned, round_trip);

                        assert_eq!($value, returned,
                                "[2] DB value mismatch; given value: {:?}\n\
                                 as returned: {:?}\n\
                                 round-trip: {:?}",
                                $value, returned, round_trip);

                        assert_eq!($value, round_trip,
                                "[3] DB value mismatch; given value: {:?}\n\
                                 as returned: {:?}\n\
                                 round-trip: {:?}",
                                $value, returned, round_trip);
                    }
                )+

                Ok(())
            }
        }
    };

    ($name:ident($($text:literal == $value:expr),+ $(,)?)) => {
        $crate::test_column!($name<$name>($($text == $value),+));
    };
}

#[macro_export]
macro_rules! query_for_test_column {
    () => {
        "SELECT {0} IS ?1, {0}, ?1"
    };
}
