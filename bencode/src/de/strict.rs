use std::any;

use bytes::Bytes;
use snafu::prelude::*;

use crate::error::{Error, StrictDictionaryKeySnafu, StrictIntegerSnafu, TypeMismatchSnafu};
use crate::fmt::EscapeAscii;
use crate::int::Int;

pub(crate) trait Strictness {
    fn ensure_integer(integer: &[u8]) -> Result<(), Error>;

    fn ensure_dictionary_key(last_key: &[u8], key: &[u8]) -> Result<(), Error>;
}

pub(crate) struct Strict;

impl Strictness for Strict {
    fn ensure_integer(integer: &[u8]) -> Result<(), Error> {
        ensure!(
            lazy_regex::regex_is_match!(r#"(?x-u) ^ (?: 0 | -? [1-9] \d* ) $ "#B, integer),
            StrictIntegerSnafu {
                integer: Bytes::copy_from_slice(integer),
            },
        );
        Ok(())
    }

    fn ensure_dictionary_key(last_key: &[u8], key: &[u8]) -> Result<(), Error> {
        ensure!(
            last_key < key,
            StrictDictionaryKeySnafu {
                last_key: Bytes::copy_from_slice(last_key),
                key: Bytes::copy_from_slice(key),
            },
        );
        Ok(())
    }
}

pub(crate) struct NonStrict;

impl Strictness for NonStrict {
    fn ensure_integer(_integer: &[u8]) -> Result<(), Error> {
        Ok(())
    }

    fn ensure_dictionary_key(_last_key: &[u8], _key: &[u8]) -> Result<(), Error> {
        Ok(())
    }
}

/// Parses integer text into a native integer; overflow, sign mismatch, and non-numeric text are
/// all reported as a type mismatch.
pub(crate) fn parse_integer<I>(integer: &[u8]) -> Result<I, Error>
where
    I: Int,
{
    str::from_utf8(integer)
        .ok()
        .and_then(|integer| integer.parse::<I>().ok())
        .with_context(|| TypeMismatchSnafu {
            value: format!("integer {}", EscapeAscii(integer)),
            target: any::type_name::<I>(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_integer() {
        for testdata in [b"0".as_slice(), b"1", b"23456789", b"-1", b"-9876543210"] {
            assert_eq!(Strict::ensure_integer(testdata), Ok(()));
            assert_eq!(NonStrict::ensure_integer(testdata), Ok(()));
        }

        for testdata in [b"".as_slice(), b" ", b"\x00", b" 1", b"1 ", b"1,0", b"- 1"] {
            assert!(matches!(
                Strict::ensure_integer(testdata),
                Err(Error::StrictInteger { .. }),
            ));
            assert_eq!(NonStrict::ensure_integer(testdata), Ok(()));
        }

        for testdata in [b"00".as_slice(), b"-0", b"01", b"-02", b"+1"] {
            assert!(matches!(
                Strict::ensure_integer(testdata),
                Err(Error::StrictInteger { .. }),
            ));
            assert_eq!(NonStrict::ensure_integer(testdata), Ok(()));
        }
    }

    #[test]
    fn parse_integer() {
        assert_eq!(super::parse_integer(b"0"), Ok(0u8));
        assert_eq!(super::parse_integer(b"123"), Ok(123u8));
        assert_eq!(super::parse_integer(b"012"), Ok(12i8));
        assert_eq!(super::parse_integer(b"-0"), Ok(0i8));

        assert_eq!(
            super::parse_integer::<u8>(b"-5"),
            Err(Error::TypeMismatch {
                value: "integer -5".to_string(),
                target: "u8".to_string(),
            }),
        );
        for testdata in [b"456".as_slice(), b"", b"1x", b"\x80"] {
            assert!(super::parse_integer::<u8>(testdata).unwrap_err().is_type_mismatch());
        }
        assert!(
            super::parse_integer::<i8>(b"-789")
                .unwrap_err()
                .is_type_mismatch()
        );
    }

    #[test]
    fn ensure_dictionary_key() {
        let key0 = b"aaa".as_slice();
        let key1 = b"bb".as_slice();

        assert_eq!(Strict::ensure_dictionary_key(key0, key1), Ok(()));
        assert_eq!(NonStrict::ensure_dictionary_key(key0, key1), Ok(()));

        assert!(matches!(
            Strict::ensure_dictionary_key(key1, key0),
            Err(Error::StrictDictionaryKey { .. }),
        ));
        assert_eq!(NonStrict::ensure_dictionary_key(key1, key0), Ok(()));

        assert!(matches!(
            Strict::ensure_dictionary_key(key0, key0),
            Err(Error::StrictDictionaryKey { .. }),
        ));
        assert_eq!(NonStrict::ensure_dictionary_key(key0, key0), Ok(()));
    }
}
