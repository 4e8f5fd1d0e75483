//! Conversions between Rust and **SQLite** types.
//!
//! # Types
//!
//! | Rust type               | Encodes as | Decodes from     |
//! |-------------------------|------------|------------------|
//! | `bool`                  | INTEGER    | INTEGER          |
//! | `i8`, `i16`, `i32`      | INTEGER    | INTEGER          |
//! | `i64`                   | INTEGER    | INTEGER          |
//! | `u8`, `u16`, `u32`      | INTEGER    | INTEGER          |
//! | `f32`, `f64`            | REAL       | INTEGER, REAL    |
//! | `&str`, [`String`]      | TEXT       | TEXT             |
//! | `&[u8]`, `Vec<u8>`      | BLOB       | BLOB, TEXT       |
//! | [`Value`](crate::Value) | any        | any              |
//!
//! Decoding checks the cell's storage class and never coerces: a TEXT cell
//! holding `"12"` does not decode as an integer. Integers are range checked
//! against the target type.
//!
//! #### Note: Unsigned Integers
//!
//! There is no SQLite type that can hold every `u64`, so it is not
//! supported. Bit-casting it to `i64` or storing it as `REAL`, `BLOB` or
//! `TEXT` would change the semantics of the value in SQL.
//!
//! # Nullable
//!
//! `Option<T>` is supported where `T` implements `Encode` or `Decode`. An
//! `Option<T>` represents a potentially `NULL` value; a bare `T` fails with
//! [`DecodeError::UnexpectedNull`](crate::DecodeError::UnexpectedNull).

/// Check the storage class of a column before decoding it.
macro_rules! compatible {
    ($x:expr, $($y:path)|+) => {
        match $x.declared_type() {
            $crate::ColumnType::Null => return Err(DecodeError::UnexpectedNull),
            $($y)|+ => {}
            t => return Err(DecodeError::DataType(t)),
        }
    };
}

mod bool;
mod bytes;
mod float;
mod int;
mod str;
