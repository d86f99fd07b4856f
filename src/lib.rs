//! Cursor-based readers and writers for fixed-width binary fields.
//!
//! A [`Reader`] walks a byte slice with a mutable offset; a [`Writer`] appends to a growable
//! buffer. Both read and write 8/16/32/64-bit integers, 32/64-bit floats, raw bytes and text in
//! a selectable [`Endian`] mode, and both understand two conventions layered on top of plain
//! fields:
//!
//! * **Length-prefixed arrays**: an unsigned count of a chosen width, followed by that many
//!   fixed-width elements.
//! * **Offset jumps** (read side only): an unsigned length `n`, after which the reader skips
//!   `multiplier * n + tweak` bytes without decoding them.
//!
//! Every operation either completes entirely or has no effect.
//!
//! ```
//! use cursor_pack::{Endian, Reader, Writer};
//!
//! let mut w = Writer::new(Endian::Big);
//! w.u8(&[5]);
//! w.u16(&[10, 20]);
//! w.string("ascii", &["AB"]).unwrap();
//! assert_eq!(w.data(), [0x05, 0x00, 0x0a, 0x00, 0x14, 0x41, 0x42]);
//!
//! let mut r = Reader::new(w.data(), Endian::Big);
//! assert_eq!(r.u8().unwrap(), 5);
//! assert_eq!(r.read_n::<u16>(2).unwrap(), [10, 20]);
//! assert_eq!(r.string(2, "ascii").unwrap(), "AB");
//! assert_eq!(r.offset(), 7);
//! ```

#![forbid(unsafe_code)]
#![forbid(unused_must_use)]
#![warn(missing_docs)]

mod codec;
mod endian;
mod error;
mod reader;
mod text;
mod writer;

#[cfg(test)]
mod tests;

pub use codec::{FieldKind, Format, Prefix, Scalar, Token, Value};
pub use endian::Endian;
pub use error::{Error, ErrorKind, Result};
pub use reader::{Fields, Reader};
pub use text::{Codecs, TextCodec};
pub use writer::{LenPrefixed, Writer};
