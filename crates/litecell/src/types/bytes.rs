use crate::{Column, ColumnType, Value, decode::Decode, encode::Encode, error::DecodeError};

impl Encode for [u8] {
    fn encode(&self) -> Value {
        Value::Blob(self.to_owned())
    }
}

impl<const N: usize> Encode for [u8; N] {
    fn encode(&self) -> Value {
        Value::Blob(self.to_vec())
    }
}

impl<'s> Decode<'s> for &'s [u8] {
    fn decode(column: &Column<'s>) -> Result<Self, DecodeError> {
        compatible!(column, ColumnType::Blob | ColumnType::Text);
        Ok(column.as_blob())
    }
}

impl Encode for Vec<u8> {
    fn encode(&self) -> Value {
        Value::Blob(self.clone())
    }
}

impl<'s> Decode<'s> for Vec<u8> {
    fn decode(column: &Column<'s>) -> Result<Self, DecodeError> {
        <&[u8]>::decode(column).map(ToOwned::to_owned)
    }
}
