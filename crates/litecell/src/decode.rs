//! Provides [`Decode`] for strict, fallible reads from a [`Column`].
use std::result::Result as StdResult;

use crate::{Column, Value, error::DecodeError};

/// A type that can be decoded from a result cell.
///
/// Unlike the `Column::as_*` getters, implementations check the cell's
/// storage type and fail instead of coercing. `'s` is the statement borrow,
/// so borrowed types like `&'s str` can point straight into the row.
pub trait Decode<'s>: Sized {
    /// Decode a new value of this type from the cell under `column`.
    fn decode(column: &Column<'s>) -> StdResult<Self, DecodeError>;
}

// implement `Decode` for Option<T> for all SQL types
impl<'s, T> Decode<'s> for Option<T>
where
    T: Decode<'s>,
{
    fn decode(column: &Column<'s>) -> StdResult<Self, DecodeError> {
        if column.is_null() {
            Ok(None)
        } else {
            Ok(Some(T::decode(column)?))
        }
    }
}

impl<'s> Decode<'s> for Value {
    fn decode(column: &Column<'s>) -> StdResult<Self, DecodeError> {
        Ok(column.to_value())
    }
}
