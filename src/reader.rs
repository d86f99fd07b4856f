use crate::codec::{FieldKind, Format, Prefix, Scalar, Value};
use crate::endian::Endian;
use crate::error::{Error, Result};
use crate::text::Codecs;
use std::sync::Arc;

/// Reads fixed-width fields from a slice of bytes, advancing an offset as it goes.
///
/// Every read first computes the exact span of bytes it needs. If the span does not fit in the
/// source, the read fails with `Error::OutOfBounds` and the offset is left where it was; there
/// are no partial reads.
///
/// The byte order can be changed at any time with [`Reader::set_endian`]. It only affects reads
/// made after the change.
///
/// This type only supports reading values from a slice of bytes. If you need to read values from
/// a file or `Read` implementation, then you should copy the data into an in-memory buffer first.
#[derive(Clone, Debug)]
pub struct Reader<'a> {
    data: &'a [u8],
    offset: usize,
    endian: Endian,
    codecs: Arc<Codecs>,
}

/// The result of [`Reader::read_field`].
#[derive(Clone, PartialEq, Debug)]
pub enum Fields {
    /// A single value, returned when exactly one field was requested.
    Scalar(Value),
    /// The values, in order, when any other number of fields was requested (including zero).
    Sequence(Vec<Value>),
}

impl Fields {
    /// Returns the values as a sequence, wrapping a scalar in a one-element vector.
    pub fn into_vec(self) -> Vec<Value> {
        match self {
            Self::Scalar(v) => vec![v],
            Self::Sequence(v) => v,
        }
    }
}

impl<'a> Reader<'a> {
    /// Creates a reader positioned at the start of `data`.
    pub fn new(data: &'a [u8], endian: Endian) -> Self {
        Self {
            data,
            offset: 0,
            endian,
            codecs: Codecs::shared(),
        }
    }

    /// Creates a reader positioned at `offset` within `data`.
    pub fn at(data: &'a [u8], offset: usize, endian: Endian) -> Result<Self> {
        let mut r = Self::new(data, endian);
        r.set_offset(offset)?;
        Ok(r)
    }

    /// Uses `codecs` to look up the encodings named by [`Reader::string`].
    pub fn with_codecs(mut self, codecs: Arc<Codecs>) -> Self {
        self.codecs = codecs;
        self
    }

    /// The whole source, including bytes already read.
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// The current offset within the source.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Moves to `offset`. Fails with `Error::OutOfBounds` if it is past the end of the source.
    pub fn set_offset(&mut self, offset: usize) -> Result<()> {
        if offset > self.data.len() {
            return Err(self.out_of_bounds(offset as i128 - self.offset as i128));
        }
        log::trace!("seek {} -> {offset}", self.offset);
        self.offset = offset;
        Ok(())
    }

    /// Number of bytes between the offset and the end of the source.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    /// Returns `true` if the offset is at the end of the source.
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// The byte order used by subsequent reads.
    pub fn endian(&self) -> Endian {
        self.endian
    }

    /// Changes the byte order used by subsequent reads.
    pub fn set_endian(&mut self, endian: Endian) {
        log::trace!("byte order {} -> {endian} at offset {}", self.endian, self.offset);
        self.endian = endian;
    }

    fn out_of_bounds(&self, delta: i128) -> Error {
        Error::OutOfBounds {
            offset: self.offset,
            delta,
            available: self.data.len(),
        }
    }

    /// Returns the next `len` bytes and advances past them, or fails without moving.
    #[inline(always)]
    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        if self.remaining() < len {
            return Err(self.out_of_bounds(len as i128));
        }
        let span = &self.data[self.offset..self.offset + len];
        self.offset += len;
        Ok(span)
    }

    /// Decodes `format` at the offset and advances past it, including any alignment padding.
    pub fn unpack(&mut self, format: &Format) -> Result<Vec<Value>> {
        let len = format.size(self.endian);
        let start = self.offset;
        let span = self.take(len)?;
        match format.decode(span, self.endian) {
            Some(values) => Ok(values),
            None => {
                self.offset = start;
                Err(self.out_of_bounds(len as i128))
            }
        }
    }

    /// Reads `count` fields of `kind`.
    ///
    /// When `count` is 1 the value is returned as [`Fields::Scalar`]; for any other count,
    /// including 0, the values are returned in order as [`Fields::Sequence`].
    pub fn read_field(&mut self, kind: FieldKind, count: usize) -> Result<Fields> {
        let mut values = self.unpack(&Format::new().field(kind, count))?;
        if count == 1 {
            if let Some(value) = values.pop() {
                return Ok(Fields::Scalar(value));
            }
        }
        Ok(Fields::Sequence(values))
    }

    /// Reads one value of type `T`.
    #[inline(always)]
    pub fn read<T: Scalar>(&mut self) -> Result<T> {
        let size = T::KIND.size();
        let start = self.offset;
        let bytes = self.take(size)?;
        match T::decode(bytes, self.endian) {
            Some(value) => Ok(value),
            None => {
                self.offset = start;
                Err(self.out_of_bounds(size as i128))
            }
        }
    }

    /// Reads `count` consecutive values of type `T`.
    pub fn read_n<T: Scalar>(&mut self, count: usize) -> Result<Vec<T>> {
        let size = T::KIND.size();
        let len = count.saturating_mul(size);
        let start = self.offset;
        let span = self.take(len)?;
        let values: Option<Vec<T>> = span
            .chunks_exact(size)
            .map(|chunk| T::decode(chunk, self.endian))
            .collect();
        values.ok_or_else(|| {
            self.offset = start;
            self.out_of_bounds(len as i128)
        })
    }

    /// Reads a single `u8` value.
    pub fn u8(&mut self) -> Result<u8> {
        self.read()
    }

    /// Reads a single `u16` value.
    pub fn u16(&mut self) -> Result<u16> {
        self.read()
    }

    /// Reads a single `u32` value.
    pub fn u32(&mut self) -> Result<u32> {
        self.read()
    }

    /// Reads a single `u64` value.
    pub fn u64(&mut self) -> Result<u64> {
        self.read()
    }

    /// Reads a single `i8` value.
    pub fn i8(&mut self) -> Result<i8> {
        self.read()
    }

    /// Reads a single `i16` value.
    pub fn i16(&mut self) -> Result<i16> {
        self.read()
    }

    /// Reads a single `i32` value.
    pub fn i32(&mut self) -> Result<i32> {
        self.read()
    }

    /// Reads a single `i64` value.
    pub fn i64(&mut self) -> Result<i64> {
        self.read()
    }

    /// Reads a single `f32` value.
    pub fn f32(&mut self) -> Result<f32> {
        self.read()
    }

    /// Reads a single `f64` value.
    pub fn f64(&mut self) -> Result<f64> {
        self.read()
    }

    /// Skips `count` bytes.
    pub fn pad(&mut self, count: usize) -> Result<()> {
        self.take(count)?;
        Ok(())
    }

    /// Reads a slice of bytes whose length is `len`. This function returns a slice reference
    /// to the bytes; it does not copy them.
    pub fn bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        self.take(len)
    }

    /// Reads `len` bytes and returns them as a `bstr::BStr`, without copying or validating them.
    #[cfg(feature = "bstr")]
    pub fn bstr(&mut self, len: usize) -> Result<&'a bstr::BStr> {
        Ok(bstr::BStr::new(self.take(len)?))
    }

    /// Reads `len` bytes and decodes them as text in `encoding`.
    ///
    /// `len` is a byte count, not a character count. If the bytes are not valid in `encoding`,
    /// this fails with `Error::Decode`, but the bytes are still consumed. An unknown encoding
    /// name fails with `Error::Config` before anything is read.
    pub fn string(&mut self, len: usize, encoding: &str) -> Result<String> {
        let codecs = self.codecs.clone();
        let codec = codecs.get(encoding)?;
        let bytes = self.take(len)?;
        codec.decode(bytes, self.endian)
    }

    /// Reads a length-prefixed array: a count of width `prefix`, then that many fields of
    /// `kind`. Only the elements are returned.
    ///
    /// If the elements do not fit in the source, the count is not consumed either.
    pub fn len_prefixed(&mut self, prefix: Prefix, kind: FieldKind) -> Result<Vec<Value>> {
        self.atomically(|r| {
            let count = r.count(prefix)?;
            Ok(r.read_field(kind, count)?.into_vec())
        })
    }

    /// Typed form of [`Reader::len_prefixed`].
    pub fn len_prefixed_of<T: Scalar>(&mut self, prefix: Prefix) -> Result<Vec<T>> {
        self.atomically(|r| {
            let count = r.count(prefix)?;
            r.read_n(count)
        })
    }

    /// Reads a length `n` of width `prefix`, then skips `multiplier * n + tweak` bytes without
    /// reading them. Returns `n`.
    ///
    /// `multiplier` is usually the size of the elements being skipped; `tweak` accounts for a
    /// fixed amount of extra data and may be negative. If the resulting offset would be before
    /// the start or past the end of the source, this fails with `Error::OutOfBounds` and the
    /// length is not consumed either.
    pub fn jump(&mut self, prefix: Prefix, multiplier: u64, tweak: i64) -> Result<u64> {
        self.atomically(|r| {
            let n = r.read_prefix(prefix)?;
            let delta = i128::from(n)
                .checked_mul(i128::from(multiplier))
                .and_then(|d| d.checked_add(i128::from(tweak)))
                .ok_or_else(|| r.out_of_bounds(i128::MAX))?;
            let target = r.offset as i128 + delta;
            if target < 0 || target > r.data.len() as i128 {
                return Err(r.out_of_bounds(delta));
            }
            log::trace!("jump {n} * {multiplier} + {tweak} -> offset {target}");
            r.offset = target as usize;
            Ok(n)
        })
    }

    fn read_prefix(&mut self, prefix: Prefix) -> Result<u64> {
        let start = self.offset;
        let bytes = self.take(prefix.size())?;
        prefix.decode(bytes, self.endian).ok_or_else(|| {
            self.offset = start;
            self.out_of_bounds(prefix.size() as i128)
        })
    }

    /// Reads a prefix as an element count. A count that does not fit in `usize` can never fit
    /// in the source either.
    fn count(&mut self, prefix: Prefix) -> Result<usize> {
        let n = self.read_prefix(prefix)?;
        usize::try_from(n).map_err(|_| self.out_of_bounds(i128::from(n)))
    }

    /// Runs `f`, restoring the offset if it fails.
    fn atomically<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let start = self.offset;
        let result = f(self);
        if result.is_err() {
            self.offset = start;
        }
        result
    }
}
