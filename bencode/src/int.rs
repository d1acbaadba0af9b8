use std::fmt;
use std::io::{self, Write as _};
use std::num::ParseIntError;
use std::str::FromStr;

use crate::error::Error;

pub(crate) trait Int: Copy + fmt::Display + FromStr<Err = ParseIntError> + Sized {}

impl Int for i8 {}
impl Int for i16 {}
impl Int for i32 {}
impl Int for i64 {}
impl Int for i128 {}
impl Int for isize {}
impl Int for u8 {}
impl Int for u16 {}
impl Int for u32 {}
impl Int for u64 {}
impl Int for u128 {}
impl Int for usize {}

// Larger than enough for `i128`.
pub(crate) const INTEGER_BUF_SIZE: usize = 64;

pub(crate) fn format_into<'a>(
    buf: &'a mut [u8; INTEGER_BUF_SIZE],
    args: fmt::Arguments<'_>,
) -> Result<&'a [u8], Error> {
    let mut cursor = io::Cursor::new(&mut buf[..]);
    cursor.write_fmt(args).map_err(|error| Error::Custom {
        message: error.to_string(),
    })?;
    let n = usize::try_from(cursor.position()).unwrap_or(INTEGER_BUF_SIZE);
    Ok(&buf[..n])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_into() {
        let mut buf = [0u8; INTEGER_BUF_SIZE];
        assert_eq!(
            super::format_into(&mut buf, format_args!("i{}e", i128::MIN)),
            Ok(b"i-170141183460469231731687303715884105728e".as_slice()),
        );
        assert_eq!(
            super::format_into(&mut buf, format_args!("{}:", 0)),
            Ok(b"0:".as_slice()),
        );
    }
}
