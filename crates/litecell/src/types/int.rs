use crate::{Column, ColumnType, Value, decode::Decode, encode::Encode, error::DecodeError};

macro_rules! impl_int {
    ($($ty:ty),+) => {
        $(
            impl Encode for $ty {
                fn encode(&self) -> Value {
                    Value::Integer(i64::from(*self))
                }
            }

            impl<'s> Decode<'s> for $ty {
                fn decode(column: &Column<'s>) -> Result<Self, DecodeError> {
                    compatible!(column, ColumnType::Integer);
                    Ok(<$ty>::try_from(column.as_int64())?)
                }
            }
        )+
    };
}

impl_int!(i8, i16, i32, u8, u16, u32);

impl Encode for i64 {
    fn encode(&self) -> Value {
        Value::Integer(*self)
    }
}

impl<'s> Decode<'s> for i64 {
    fn decode(column: &Column<'s>) -> Result<Self, DecodeError> {
        compatible!(column, ColumnType::Integer);
        Ok(column.as_int64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_widens() {
        assert_eq!((&42i32).encode(), Value::Integer(42));
        assert_eq!(127i8.encode(), Value::Integer(127));
        assert_eq!(u32::MAX.encode(), Value::Integer(4_294_967_295));
    }
}
