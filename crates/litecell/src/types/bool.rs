use crate::{Column, ColumnType, Value, decode::Decode, encode::Encode, error::DecodeError};

impl Encode for bool {
    fn encode(&self) -> Value {
        Value::Integer(i64::from(*self))
    }
}

impl<'s> Decode<'s> for bool {
    fn decode(column: &Column<'s>) -> Result<Self, DecodeError> {
        compatible!(column, ColumnType::Integer);
        Ok(column.as_int64() != 0)
    }
}
