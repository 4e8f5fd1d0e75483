use crate::{Column, ColumnType, Value, decode::Decode, encode::Encode, error::DecodeError};

impl Encode for f32 {
    fn encode(&self) -> Value {
        Value::Float(f64::from(*self))
    }
}

impl<'s> Decode<'s> for f32 {
    fn decode(column: &Column<'s>) -> Result<Self, DecodeError> {
        compatible!(column, ColumnType::Float | ColumnType::Integer);
        Ok(column.as_double() as f32)
    }
}

impl Encode for f64 {
    fn encode(&self) -> Value {
        Value::Float(*self)
    }
}

impl<'s> Decode<'s> for f64 {
    fn decode(column: &Column<'s>) -> Result<Self, DecodeError> {
        compatible!(column, ColumnType::Float | ColumnType::Integer);
        Ok(column.as_double())
    }
}
