use crate::codec::{FieldKind, Prefix, Value};
use thiserror::Error;

/// Result type used throughout this crate.
pub type Result<T> = core::result::Result<T, Error>;

/// Error type for `Reader`, `Writer` and the codecs they use.
///
/// Every operation that returns an error leaves its cursor exactly where it was: a reader's
/// offset is unchanged and a writer has appended nothing.
#[derive(Clone, PartialEq, Debug, Error)]
pub enum Error {
    /// Moving the cursor by `delta` bytes from `offset` would leave the `available` bytes of the
    /// source, either past the end or before the start.
    #[error("cannot move {delta} bytes from offset {offset}: source holds {available} bytes")]
    OutOfBounds {
        /// Cursor offset at the start of the failing operation.
        offset: usize,
        /// Requested displacement, relative to `offset`.
        delta: i128,
        /// Total length of the source.
        available: usize,
    },

    /// A value cannot be represented by the field it was written to.
    #[error("value {value} does not fit in a {field} field")]
    Range {
        /// The rejected value.
        value: Value,
        /// The field, or a description of the slot, it was meant for.
        field: String,
    },

    /// A format was given the wrong number of values to encode.
    #[error("format takes {expected} values, {actual} given")]
    ValueCount {
        /// Values the format encodes.
        expected: usize,
        /// Values supplied.
        actual: usize,
    },

    /// A length-prefixed array has more elements than its prefix can count.
    #[error("{count} elements cannot be counted by a {prefix} length prefix")]
    LengthOverflow {
        /// Number of elements supplied.
        count: usize,
        /// Width of the length field.
        prefix: Prefix,
    },

    /// Bytes read as text are not valid under the requested encoding.
    #[error("invalid {encoding} data at byte {position}: {reason}")]
    Decode {
        /// Name of the codec that rejected the bytes.
        encoding: String,
        /// Byte position of the failure, relative to the start of the text.
        position: usize,
        /// What was wrong.
        reason: String,
    },

    /// An unrecognized name was supplied for a setting.
    #[error("unrecognized {setting} {value:?}; expected one of: {accepted}")]
    Config {
        /// Which setting was being parsed.
        setting: &'static str,
        /// The offending input.
        value: String,
        /// The accepted forms.
        accepted: String,
    },
}

/// The four broad categories of [`Error`].
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum ErrorKind {
    /// A read or jump would leave the source.
    OutOfBounds,
    /// A value or element count does not fit its field.
    Range,
    /// Text bytes are invalid under their encoding.
    Decode,
    /// An unrecognized byte order, field width or encoding name.
    Config,
}

impl Error {
    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::OutOfBounds { .. } => ErrorKind::OutOfBounds,
            Self::Range { .. } | Self::ValueCount { .. } | Self::LengthOverflow { .. } => {
                ErrorKind::Range
            }
            Self::Decode { .. } => ErrorKind::Decode,
            Self::Config { .. } => ErrorKind::Config,
        }
    }

    pub(crate) fn range(value: impl Into<Value>, field: FieldKind) -> Self {
        Self::Range {
            value: value.into(),
            field: field.to_string(),
        }
    }
}
