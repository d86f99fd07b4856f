use crate::codec::{FieldKind, Format, Prefix, Scalar, Value};
use crate::endian::Endian;
use crate::error::Result;
use crate::text::Codecs;
use std::sync::Arc;

/// Encodes fixed-width fields into a growable buffer.
///
/// Bytes are only ever appended. Every `write_*` method validates all of its input before
/// appending anything, so a failed call leaves the buffer unchanged, and most of them return
/// the bytes they just appended.
#[derive(Clone, Debug)]
pub struct Writer {
    out: Vec<u8>,
    endian: Endian,
    codecs: Arc<Codecs>,
}

/// The bytes appended by [`Writer::len_prefixed`].
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct LenPrefixed<'a> {
    /// The encoded count.
    pub length: &'a [u8],
    /// The encoded elements.
    pub elements: &'a [u8],
}

impl Writer {
    /// Creates a new, empty `Writer`.
    pub fn new(endian: Endian) -> Self {
        Self::with_capacity(0, endian)
    }

    /// Creates a new, empty `Writer` with the given capacity.
    pub fn with_capacity(len: usize, endian: Endian) -> Self {
        Self {
            out: Vec::with_capacity(len),
            endian,
            codecs: Codecs::shared(),
        }
    }

    /// Uses `codecs` to look up the encodings named by [`Writer::string`].
    pub fn with_codecs(mut self, codecs: Arc<Codecs>) -> Self {
        self.codecs = codecs;
        self
    }

    /// The byte order used by subsequent writes.
    pub fn endian(&self) -> Endian {
        self.endian
    }

    /// Changes the byte order used by subsequent writes. Bytes already written are unaffected.
    pub fn set_endian(&mut self, endian: Endian) {
        log::trace!("byte order {} -> {endian} at length {}", self.endian, self.out.len());
        self.endian = endian;
    }

    /// Everything written so far. Calling this does not consume anything.
    pub fn data(&self) -> &[u8] {
        &self.out
    }

    /// Number of bytes written so far.
    pub fn len(&self) -> usize {
        self.out.len()
    }

    /// Returns `true` if nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.out.is_empty()
    }

    /// Extracts the inner buffer
    pub fn into_inner(self) -> Vec<u8> {
        self.out
    }

    fn since(&self, start: usize) -> &[u8] {
        &self.out[start..]
    }

    /// Encodes `values` as described by `format` and returns the bytes appended.
    ///
    /// Under [`Endian::Native`], alignment padding is measured from the start of this call.
    pub fn pack(&mut self, format: &Format, values: &[Value]) -> Result<&[u8]> {
        let start = self.out.len();
        format.encode(values, self.endian, &mut self.out)?;
        Ok(self.since(start))
    }

    /// Encodes each of `values` as a field of `kind` and returns the bytes appended.
    ///
    /// Fails with `Error::Range` if any value does not fit in `kind`; integers are never
    /// truncated.
    pub fn write_field(&mut self, kind: FieldKind, values: &[Value]) -> Result<&[u8]> {
        self.pack(&Format::new().field(kind, values.len()), values)
    }

    /// Encodes each of `values` and returns the bytes appended.
    pub fn write<T: Scalar>(&mut self, values: &[T]) -> &[u8] {
        let start = self.out.len();
        self.out.reserve(values.len() * T::KIND.size());
        for &value in values {
            value.encode(self.endian, &mut self.out);
        }
        self.since(start)
    }

    /// Writes `u8` values
    pub fn u8(&mut self, values: &[u8]) -> &[u8] {
        self.write(values)
    }

    /// Writes `u16` values
    pub fn u16(&mut self, values: &[u16]) -> &[u8] {
        self.write(values)
    }

    /// Writes `u32` values
    pub fn u32(&mut self, values: &[u32]) -> &[u8] {
        self.write(values)
    }

    /// Writes `u64` values
    pub fn u64(&mut self, values: &[u64]) -> &[u8] {
        self.write(values)
    }

    /// Writes `i8` values
    pub fn i8(&mut self, values: &[i8]) -> &[u8] {
        self.write(values)
    }

    /// Writes `i16` values
    pub fn i16(&mut self, values: &[i16]) -> &[u8] {
        self.write(values)
    }

    /// Writes `i32` values
    pub fn i32(&mut self, values: &[i32]) -> &[u8] {
        self.write(values)
    }

    /// Writes `i64` values
    pub fn i64(&mut self, values: &[i64]) -> &[u8] {
        self.write(values)
    }

    /// Writes `f32` values
    pub fn f32(&mut self, values: &[f32]) -> &[u8] {
        self.write(values)
    }

    /// Writes `f64` values
    pub fn f64(&mut self, values: &[f64]) -> &[u8] {
        self.write(values)
    }

    /// Appends `count` zero bytes.
    pub fn pad(&mut self, count: usize) {
        self.out.resize(self.out.len() + count, 0);
    }

    /// Writes each of `blocks` as-is and returns them as they now appear in the buffer.
    pub fn bytes(&mut self, blocks: &[&[u8]]) -> Vec<&[u8]> {
        let mut bounds = Vec::with_capacity(blocks.len());
        for block in blocks {
            let start = self.out.len();
            self.out.extend_from_slice(block);
            bounds.push(start..self.out.len());
        }
        bounds.into_iter().map(|r| &self.out[r]).collect()
    }

    /// Encodes each of `texts` in `encoding` and writes them back to back, with no length or
    /// terminator. Returns the encoded block for each argument.
    ///
    /// Every argument is encoded before anything is written, so if one of them cannot be
    /// represented in `encoding` (`Error::Range`), nothing is written.
    pub fn string(&mut self, encoding: &str, texts: &[&str]) -> Result<Vec<&[u8]>> {
        let codec = self.codecs.get(encoding)?;
        let encoded = texts
            .iter()
            .map(|text| codec.encode(text, self.endian))
            .collect::<Result<Vec<Vec<u8>>>>()?;
        let blocks: Vec<&[u8]> = encoded.iter().map(Vec::as_slice).collect();
        Ok(self.bytes(&blocks))
    }

    /// Writes a length-prefixed array: the number of `values` as an unsigned field of width
    /// `prefix`, then each value as a field of `kind`.
    ///
    /// Fails with `Error::LengthOverflow` if the count does not fit in `prefix`, or with
    /// `Error::Range` if a value does not fit in `kind`. Nothing is written in either case.
    pub fn len_prefixed(
        &mut self,
        prefix: Prefix,
        kind: FieldKind,
        values: &[Value],
    ) -> Result<LenPrefixed<'_>> {
        let mut length = Vec::with_capacity(prefix.size());
        prefix.encode(values.len(), self.endian, &mut length)?;
        let mut elements = Vec::with_capacity(values.len() * kind.size());
        Format::new()
            .field(kind, values.len())
            .encode(values, self.endian, &mut elements)?;
        Ok(self.append_prefixed(&length, &elements))
    }

    /// Typed form of [`Writer::len_prefixed`].
    pub fn len_prefixed_of<T: Scalar>(
        &mut self,
        prefix: Prefix,
        values: &[T],
    ) -> Result<LenPrefixed<'_>> {
        let mut length = Vec::with_capacity(prefix.size());
        prefix.encode(values.len(), self.endian, &mut length)?;
        let mut elements = Vec::with_capacity(values.len() * T::KIND.size());
        for &value in values {
            value.encode(self.endian, &mut elements);
        }
        Ok(self.append_prefixed(&length, &elements))
    }

    fn append_prefixed(&mut self, length: &[u8], elements: &[u8]) -> LenPrefixed<'_> {
        let start = self.out.len();
        self.out.extend_from_slice(length);
        self.out.extend_from_slice(elements);
        let (length, elements) = self.out[start..].split_at(length.len());
        LenPrefixed { length, elements }
    }
}
