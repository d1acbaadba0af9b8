pub mod io;
pub mod ser;

use std::fmt;

use bytes::Bytes;
use serde::de::{Expected, Unexpected};
use snafu::prelude::*;

#[derive(Clone, Debug, Eq, PartialEq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    //
    // Wire format errors.
    //

    // `Eof` (empty input) is a special case of `Syntax { cause: Incomplete }` (partial input).
    #[snafu(display("end of file"))]
    Eof,
    #[snafu(display("syntax error at offset {offset}: {cause}"))]
    Syntax { offset: usize, cause: Cause },
    #[snafu(display("unknown value type at offset {offset}: '{}'", byte.escape_ascii()))]
    UnknownValueType { offset: usize, byte: u8 },

    #[snafu(display("malformed integer: {integer:?}"))]
    MalformedInteger { integer: Bytes },
    #[snafu(display("missing dictionary value: {key:?}"))]
    MissingValue { key: Bytes },

    //
    // Shape errors.
    //
    #[snafu(display("cannot decode {value} into {target}"))]
    TypeMismatch { value: String, target: String },
    #[snafu(display("unknown dictionary key: {key:?}"))]
    UnknownKey { key: String },
    #[snafu(display("unsupported shape: {shape}"))]
    UnsupportedShape { shape: &'static str },

    //
    // Strict decoding errors.
    //
    #[snafu(display("expect strict integer: {integer:?}"))]
    StrictInteger { integer: Bytes },
    #[snafu(display("expect strictly increasing dictionary keys: {last_key:?} >= {key:?}"))]
    StrictDictionaryKey { last_key: Bytes, key: Bytes },

    //
    // `de` and `ser` errors.
    //
    #[snafu(display("{message}"))]
    Custom { message: String },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Cause {
    Incomplete,
    UnexpectedEnd,
    ByteStringLength,
}

impl fmt::Display for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Incomplete => "incomplete bencode data",
            Self::UnexpectedEnd => "unexpected 'e'",
            Self::ByteStringLength => "invalid byte string length",
        })
    }
}

impl Error {
    pub fn is_eof(&self) -> bool {
        self == &Self::Eof
    }

    pub fn is_incomplete(&self) -> bool {
        matches!(
            self,
            Self::Syntax {
                cause: Cause::Incomplete,
                ..
            },
        )
    }

    pub fn is_strict(&self) -> bool {
        matches!(
            self,
            Self::StrictInteger { .. } | Self::StrictDictionaryKey { .. },
        )
    }

    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, Self::TypeMismatch { .. })
    }
}

impl serde::de::Error for Error {
    fn custom<T>(message: T) -> Self
    where
        T: fmt::Display,
    {
        Error::Custom {
            message: message.to_string(),
        }
    }

    fn invalid_type(unexpected: Unexpected, expected: &dyn Expected) -> Self {
        Error::TypeMismatch {
            value: unexpected.to_string(),
            target: expected.to_string(),
        }
    }

    fn invalid_value(unexpected: Unexpected, expected: &dyn Expected) -> Self {
        Error::TypeMismatch {
            value: unexpected.to_string(),
            target: expected.to_string(),
        }
    }

    fn unknown_field(field: &str, _expected: &'static [&'static str]) -> Self {
        Error::UnknownKey {
            key: field.to_string(),
        }
    }
}

impl serde::ser::Error for Error {
    fn custom<T>(message: T) -> Self
    where
        T: fmt::Display,
    {
        Error::Custom {
            message: message.to_string(),
        }
    }
}
