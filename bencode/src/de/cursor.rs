use serde::de::Unexpected;
use snafu::prelude::*;

use crate::error::{Cause, Error, SyntaxSnafu};

use super::strict::{NonStrict, Strictness};

/// Zero-copy reader over the whole input, tracking the offset for error reporting.
#[derive(Debug)]
pub(crate) struct Cursor<'de> {
    data: &'de [u8],
    offset: usize,
}

impl<'de> Cursor<'de> {
    pub(crate) fn new(data: &'de [u8]) -> Self {
        Self { data, offset: 0 }
    }

    pub(crate) fn offset(&self) -> usize {
        self.offset
    }

    pub(crate) fn remaining(&self) -> &'de [u8] {
        &self.data[self.offset..]
    }

    pub(crate) fn slice_from(&self, start: usize) -> &'de [u8] {
        &self.data[start..self.offset]
    }

    fn incomplete(&self) -> Error {
        Error::Syntax {
            offset: self.data.len(),
            cause: Cause::Incomplete,
        }
    }

    pub(crate) fn read_byte(&mut self) -> Result<u8, Error> {
        let byte = *self
            .data
            .get(self.offset)
            .ok_or_else(|| self.incomplete())?;
        self.offset += 1;
        Ok(byte)
    }

    pub(crate) fn unread_byte(&mut self) {
        assert!(self.offset > 0);
        self.offset -= 1;
    }

    /// Reads up to the delimiter, consuming but not returning it.
    pub(crate) fn read_until(&mut self, delimiter: u8) -> Result<&'de [u8], Error> {
        let remaining = self.remaining();
        let n = remaining
            .iter()
            .position(|&b| b == delimiter)
            .ok_or_else(|| self.incomplete())?;
        self.offset += n + 1;
        Ok(&remaining[..n])
    }

    pub(crate) fn read_bytes(&mut self, size: usize) -> Result<&'de [u8], Error> {
        let remaining = self.remaining();
        ensure!(
            size <= remaining.len(),
            SyntaxSnafu {
                offset: self.data.len(),
                cause: Cause::Incomplete,
            },
        );
        self.offset += size;
        Ok(&remaining[..size])
    }

    //
    // Bencode helpers.
    //

    pub(crate) fn read_token(&mut self) -> Result<Token, Error> {
        let offset = self.offset;
        match self.read_byte()? {
            b'e' => Err(Error::Syntax {
                offset,
                cause: Cause::UnexpectedEnd,
            }),
            prefix => Token::new(prefix, offset),
        }
    }

    pub(crate) fn read_item_token(&mut self) -> Result<Option<Token>, Error> {
        let offset = self.offset;
        match self.read_byte()? {
            b'e' => Ok(None),
            prefix => Token::new(prefix, offset).map(Some),
        }
    }

    /// Reads the rest of a byte string whose first length digit `b0` was already consumed.
    pub(crate) fn read_byte_string<S>(&mut self, b0: u8) -> Result<&'de [u8], Error>
    where
        S: Strictness,
    {
        let start = self.offset - 1;
        let n = self.read_until(b':')?.len();
        let data = self.data;
        let length = &data[start..start + 1 + n];
        ensure!(
            length[0] == b0,
            SyntaxSnafu {
                offset: start,
                cause: Cause::ByteStringLength,
            },
        );
        ensure!(
            length.iter().all(u8::is_ascii_digit),
            SyntaxSnafu {
                offset: start,
                cause: Cause::ByteStringLength,
            },
        );
        S::ensure_integer(length)?;
        let size = str::from_utf8(length)
            .ok()
            .and_then(|length| length.parse::<usize>().ok())
            .context(SyntaxSnafu {
                offset: start,
                cause: Cause::ByteStringLength,
            })?;
        self.read_bytes(size)
    }

    /// Reads the text of an integer whose `i` prefix was already consumed.
    pub(crate) fn read_integer<S>(&mut self) -> Result<&'de [u8], Error>
    where
        S: Strictness,
    {
        let integer = self.read_until(b'e')?;
        S::ensure_integer(integer)?;
        Ok(integer)
    }

    /// Skips the next value without interpreting it beyond its framing.
    pub(crate) fn skip_value(&mut self) -> Result<(), Error> {
        let token = self.read_token()?;
        self.skip_rest(token)
    }

    fn skip_rest(&mut self, token: Token) -> Result<(), Error> {
        match token {
            Token::ByteString(b0) => {
                self.read_byte_string::<NonStrict>(b0)?;
            }
            Token::Integer => {
                self.read_until(b'e')?;
            }
            Token::List | Token::Dictionary => {
                while let Some(token) = self.read_item_token()? {
                    self.skip_rest(token)?;
                }
            }
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Token {
    ByteString(u8),
    Integer,
    List,
    Dictionary,
}

impl Token {
    fn new(prefix: u8, offset: usize) -> Result<Self, Error> {
        match prefix {
            b'0'..=b'9' => Ok(Self::ByteString(prefix)),
            b'i' => Ok(Self::Integer),
            b'l' => Ok(Self::List),
            b'd' => Ok(Self::Dictionary),
            _ => Err(Error::UnknownValueType {
                offset,
                byte: prefix,
            }),
        }
    }

    pub(crate) fn to_type_name(self) -> &'static str {
        match self {
            Self::ByteString(_) => "byte string",
            Self::Integer => "integer",
            Self::List => "list",
            Self::Dictionary => "dictionary",
        }
    }

    pub(crate) fn to_unexpected(self) -> Unexpected<'static> {
        match self {
            Self::ByteString(_) => Unexpected::Other("byte string"),
            Self::Integer => Unexpected::Other("integer"),
            Self::List => Unexpected::Seq,
            Self::Dictionary => Unexpected::Map,
        }
    }
}
