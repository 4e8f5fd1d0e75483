use crate::{Column, ColumnType, Value, decode::Decode, encode::Encode, error::DecodeError};

impl Encode for str {
    fn encode(&self) -> Value {
        Value::Text(self.to_owned())
    }
}

impl<'s> Decode<'s> for &'s str {
    fn decode(column: &Column<'s>) -> Result<Self, DecodeError> {
        compatible!(column, ColumnType::Text);
        Ok(std::str::from_utf8(column.as_text_bytes())?)
    }
}

impl Encode for String {
    fn encode(&self) -> Value {
        Value::Text(self.clone())
    }
}

impl<'s> Decode<'s> for String {
    fn decode(column: &Column<'s>) -> Result<Self, DecodeError> {
        <&str>::decode(column).map(ToOwned::to_owned)
    }
}
