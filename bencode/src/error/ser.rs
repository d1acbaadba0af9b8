use serde::ser;

/// Error types that the encoder can produce, which are the in-memory error and the I/O error.
pub trait Error: ser::Error + From<super::Error> {}

impl<E> Error for E where E: ser::Error + From<super::Error> {}
