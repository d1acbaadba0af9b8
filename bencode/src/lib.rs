//! Bencode codec over the Serde data model.
//!
//! Besides the plain Serde shapes, it supports:
//!
//! * Records (`#[derive(Record)]`), whose fields are mapped to dictionary entries through field
//!   tags, with `omitempty` and lenient decoding options.
//! * Custom marshal and unmarshal hooks ([`Marshal`] and [`Unmarshal`]).
//! * Arbitrary-precision integers ([`BigInt`]) and the dynamic [`Value`].

// The derived code refers to this crate by name.
extern crate self as bencode;

pub mod error;
pub mod hook;
pub mod record;
pub mod value;

mod bigint;
mod cache;
mod de;
mod de_ext;
mod empty;
mod fmt;
mod int;
mod ser;
mod tag;

#[cfg(test)]
mod testing;

//
// Implementer's Notes:
//
// * Bencode is specified in BEP 3.
//
// * We represent the Serde data model in Bencode as follows:
//
//   | Serde                        | Bencode                      |
//   |------------------------------|------------------------------|
//   | bool                         | 0 or 1 (decoded: != 0)       |
//   | i8 ... u128                  | integer                      |
//   | f32, f64                     | unsupported                  |
//   | char                         | UTF-8 byte string            |
//   |------------------------------|------------------------------|
//   | Some(v)                      | v                            |
//   | None                         | unsupported                  |
//   |------------------------------|------------------------------|
//   | ()                           | []                           |
//   | Unit                         | []                           |
//   | Enum::Unit                   | "Unit"                       |
//   |------------------------------|------------------------------|
//   | NewType(v)                   | v                            |
//   | Enum::NewType(v)             | {"NewType": v}               |
//   |------------------------------|------------------------------|
//   | Tuple(u, v)                  | [u, v]                       |
//   | Enum::Tuple(u, v)            | {"Tuple": [u, v]}            |
//   |------------------------------|------------------------------|
//   | Struct { x: v }              | {"x": v}                     |
//   | Enum::Struct { x: v }        | {"Struct": {"x": v}}         |
//
// * Records encode an absent `Option` slot as the zero value of its type, and the decoder pads a
//   short list with zero values when it fills a tuple or an array.
//
// * The encoder sorts dictionary keys by their raw bytes.  The decoder accepts any key order
//   unless it is in strict mode.
//
// * We divided the interface into pure-memory and I/O functions, which resulted in one error type
//   for each group of functions.
//

#[doc(hidden)]
pub mod private {
    pub use serde;
}

pub use bencode_derive::Record;

pub use crate::bigint::BigInt;
pub use crate::de::{from_slice, from_slice_strict, unmarshal, unmarshal_strict};
pub use crate::empty::{IsEmpty, is_empty};
pub use crate::error::Error;
pub use crate::hook::{Marshal, Unmarshal};
pub use crate::record::Record;
pub use crate::ser::{marshal, to_buf, to_bytes, to_writer};
pub use crate::value::{Value, from_value, to_value};
