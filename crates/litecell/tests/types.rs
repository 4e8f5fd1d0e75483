//! Integration tests for strict decoding.

mod support;

#[cfg(test)]
mod tests {
    // Allow approximate constants in this test file - we're testing specific float representations
    #![allow(clippy::approx_constant)]

    use litecell::{ColumnType, DecodeError, Error, Value};
    use litecell_test::test_column;

    use crate::support::{connection, first_row};

    test_column!(null<Option<i32>>(
        "NULL" == None::<i32>
    ));

    test_column!(bool("FALSE" == false, "TRUE" == true));

    test_column!(i8("-128" == i8::MIN));

    test_column!(i32("94101" == 94101_i32));

    test_column!(i64("9358295312" == 9358295312_i64));

    test_column!(u32("4294967295" == u32::MAX));

    // NOTE: Floating-point parameters are widened to double, which can
    //       result in strange rounding.
    test_column!(f32("3.1410000324249268" == 3.141f32 as f64 as f32));

    test_column!(f64("939399419.1225182" == 939399419.1225182_f64));

    test_column!(str<String>(
        "'this is foo'" == "this is foo",
        "cast(x'7468697320006973206E756C2D636F6E7461696E696E67' as text)" == "this \0is nul-containing",
        "''" == ""
    ));

    test_column!(borrowed_str<&str>("'borrowed'" == "borrowed"));

    test_column!(bytes<Vec<u8>>(
        "X'DEADBEEF'"
            == vec![0xDE_u8, 0xAD, 0xBE, 0xEF],
        "X''"
            == Vec::<u8>::new(),
        "X'0000000052'"
            == vec![0_u8, 0, 0, 0, 0x52]
    ));

    test_column!(value<Value>(
        "7" == Value::Integer(7),
        "2.5" == Value::Float(2.5),
        "'seven'" == Value::Text("seven".into()),
        "x'07'" == Value::Blob(vec![7]),
        "NULL" == Value::Null,
    ));

    #[test]
    fn decoding_never_coerces() -> anyhow::Result<()> {
        let conn = connection()?;
        let stmt = first_row(&conn, "SELECT '12', 1.5, 300, NULL, x'00'")?;

        assert!(matches!(
            stmt.get::<i64>(0),
            Err(Error::ColumnDecode {
                index: 0,
                source: DecodeError::DataType(ColumnType::Text)
            })
        ));
        assert!(matches!(
            stmt.get::<i32>(1),
            Err(Error::ColumnDecode {
                source: DecodeError::DataType(ColumnType::Float),
                ..
            })
        ));
        assert!(matches!(
            stmt.get::<i8>(2),
            Err(Error::ColumnDecode {
                source: DecodeError::Conversion(_),
                ..
            })
        ));
        assert!(matches!(
            stmt.get::<String>(3),
            Err(Error::ColumnDecode {
                index: 3,
                source: DecodeError::UnexpectedNull
            })
        ));
        assert!(matches!(
            stmt.get::<&str>(4),
            Err(Error::ColumnDecode {
                source: DecodeError::DataType(ColumnType::Blob),
                ..
            })
        ));

        // A failed decode leaves the storage type untouched.
        assert_eq!(stmt.column(0)?.declared_type(), ColumnType::Text);
        Ok(())
    }

    #[test]
    fn widening_decodes() -> anyhow::Result<()> {
        let conn = connection()?;
        let stmt = first_row(&conn, "SELECT 3, 'abc', 1")?;

        assert_eq!(stmt.get::<f64>(0)?, 3.0);
        assert_eq!(stmt.get::<Vec<u8>>(1)?, b"abc");
        assert_eq!(stmt.get::<&[u8]>(1)?, b"abc");
        assert!(stmt.get::<bool>(2)?);
        assert_eq!(stmt.get::<Option<i64>>(0)?, Some(3));
        Ok(())
    }

    #[test]
    fn invalid_utf8_is_a_conversion_error() -> anyhow::Result<()> {
        let conn = connection()?;
        let stmt = first_row(&conn, "SELECT CAST(x'c328' AS TEXT)")?;
        let col = stmt.column(0)?;

        assert_eq!(col.as_text(), "");
        assert!(matches!(
            col.get::<String>(),
            Err(DecodeError::Conversion(_))
        ));
        assert_eq!(col.to_value(), Value::Text("\u{fffd}(".into()));
        Ok(())
    }

    #[test]
    fn decode_by_name() -> anyhow::Result<()> {
        let conn = crate::support::tdb()?;
        let stmt = first_row(
            &conn,
            "SELECT text, owner_id, attachment FROM tweet WHERE id = 2",
        )?;

        assert_eq!(stmt.get_by_name::<&str>("text")?, "Second tweet");
        assert_eq!(stmt.get_by_name::<Option<u8>>("owner_id")?, Some(7));
        assert_eq!(stmt.get_by_name::<Vec<u8>>("attachment")?, [0x00, 0xff, 0x10]);
        assert!(matches!(
            stmt.get_by_name::<i64>("nope"),
            Err(Error::ColumnNotFound(_))
        ));
        Ok(())
    }
}
