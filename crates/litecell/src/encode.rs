//! Provides [`Encode`] for binding values to statement parameters.
use crate::Value;

/// Encode a single value to be bound to a statement parameter.
pub trait Encode {
    fn encode(&self) -> Value;
}

impl<T> Encode for &T
where
    T: Encode + ?Sized,
{
    fn encode(&self) -> Value {
        (**self).encode()
    }
}

impl<T> Encode for Option<T>
where
    T: Encode,
{
    fn encode(&self) -> Value {
        match self {
            Some(v) => v.encode(),
            None => Value::Null,
        }
    }
}

impl Encode for Value {
    fn encode(&self) -> Value {
        self.clone()
    }
}
