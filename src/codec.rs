//! Fixed-width field codecs and struct-style composite formats.
//!
//! This module knows nothing about cursors. It lays out a [`Format`] over an exact-size span of
//! bytes, converting each field with the `zerocopy` byte-order types, and reports how many bytes
//! the span covers. `Reader` and `Writer` do the offset bookkeeping on top of it.

use crate::endian::Endian;
use crate::error::{Error, Result};
use core::fmt;
use core::str::FromStr;
use zerocopy::byteorder::{
    BigEndian, LittleEndian, NativeEndian, F32, F64, I16, I32, I64, U16, U32, U64,
};
use zerocopy::{FromBytes, IntoBytes};

/// The type of a single fixed-width field.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum FieldKind {
    /// Unsigned 8-bit integer.
    U8,
    /// Signed 8-bit integer.
    I8,
    /// Unsigned 16-bit integer.
    U16,
    /// Signed 16-bit integer.
    I16,
    /// Unsigned 32-bit integer.
    U32,
    /// Signed 32-bit integer.
    I32,
    /// Unsigned 64-bit integer.
    U64,
    /// Signed 64-bit integer.
    I64,
    /// IEEE-754 single precision float.
    F32,
    /// IEEE-754 double precision float.
    F64,
}

/// Runs `$body` with `$t` bound to the Rust type of a `FieldKind`.
macro_rules! with_scalar {
    ($kind:expr, $t:ident => $body:expr) => {
        match $kind {
            FieldKind::U8 => {
                type $t = u8;
                $body
            }
            FieldKind::I8 => {
                type $t = i8;
                $body
            }
            FieldKind::U16 => {
                type $t = u16;
                $body
            }
            FieldKind::I16 => {
                type $t = i16;
                $body
            }
            FieldKind::U32 => {
                type $t = u32;
                $body
            }
            FieldKind::I32 => {
                type $t = i32;
                $body
            }
            FieldKind::U64 => {
                type $t = u64;
                $body
            }
            FieldKind::I64 => {
                type $t = i64;
                $body
            }
            FieldKind::F32 => {
                type $t = f32;
                $body
            }
            FieldKind::F64 => {
                type $t = f64;
                $body
            }
        }
    };
}

impl FieldKind {
    /// Selects an integer field by bit width and signedness.
    pub fn int(bits: u32, signed: bool) -> Result<Self> {
        Ok(match (bits, signed) {
            (8, false) => Self::U8,
            (8, true) => Self::I8,
            (16, false) => Self::U16,
            (16, true) => Self::I16,
            (32, false) => Self::U32,
            (32, true) => Self::I32,
            (64, false) => Self::U64,
            (64, true) => Self::I64,
            _ => return Err(bad_width("integer width", bits, "8, 16, 32, 64")),
        })
    }

    /// Selects a float field by bit width.
    pub fn float(bits: u32) -> Result<Self> {
        match bits {
            32 => Ok(Self::F32),
            64 => Ok(Self::F64),
            _ => Err(bad_width("float width", bits, "32, 64")),
        }
    }

    /// Size of one field, in bytes. This does not depend on byte order.
    pub fn size(self) -> usize {
        with_scalar!(self, T => core::mem::size_of::<T>())
    }

    /// Alignment of the field on the host, used by [`Endian::Native`].
    pub fn native_align(self) -> usize {
        with_scalar!(self, T => core::mem::align_of::<T>())
    }

    /// Whether this is a signed integer field. Floats report `false`.
    pub fn is_signed(self) -> bool {
        matches!(self, Self::I8 | Self::I16 | Self::I32 | Self::I64)
    }

    /// Whether this is a floating point field.
    pub fn is_float(self) -> bool {
        matches!(self, Self::F32 | Self::F64)
    }

    /// The struct-style format code for this field.
    pub fn code(self) -> char {
        match self {
            Self::I8 => 'b',
            Self::U8 => 'B',
            Self::I16 => 'h',
            Self::U16 => 'H',
            Self::I32 => 'i',
            Self::U32 => 'I',
            Self::I64 => 'q',
            Self::U64 => 'Q',
            Self::F32 => 'f',
            Self::F64 => 'd',
        }
    }

    fn from_code(c: char) -> Option<Self> {
        Some(match c {
            'b' => Self::I8,
            'B' => Self::U8,
            'h' => Self::I16,
            'H' => Self::U16,
            'i' => Self::I32,
            'I' => Self::U32,
            'q' => Self::I64,
            'Q' => Self::U64,
            'f' => Self::F32,
            'd' => Self::F64,
            _ => return None,
        })
    }

    /// Decodes one field from exactly `self.size()` bytes.
    pub(crate) fn decode(self, bytes: &[u8], endian: Endian) -> Option<Value> {
        with_scalar!(self, T => T::decode(bytes, endian).map(Value::from))
    }

    /// Validates `value` against this field and appends its encoding to `out`.
    pub(crate) fn encode(self, value: &Value, endian: Endian, out: &mut Vec<u8>) -> Result<()> {
        with_scalar!(self, T => {
            T::from_value(value)?.encode(endian, out);
            Ok(())
        })
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::U8 => "u8",
            Self::I8 => "i8",
            Self::U16 => "u16",
            Self::I16 => "i16",
            Self::U32 => "u32",
            Self::I32 => "i32",
            Self::U64 => "u64",
            Self::I64 => "i64",
            Self::F32 => "f32",
            Self::F64 => "f64",
        })
    }
}

fn bad_width(setting: &'static str, bits: u32, accepted: &str) -> Error {
    Error::Config {
        setting,
        value: bits.to_string(),
        accepted: accepted.to_string(),
    }
}

/// Width of the unsigned count field in front of a length-prefixed array, or of the length
/// field read by a jump.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Prefix {
    /// 8-bit count.
    U8,
    /// 16-bit count.
    U16,
    /// 32-bit count.
    U32,
    /// 64-bit count.
    U64,
}

impl Prefix {
    /// Selects a prefix by bit width.
    pub fn from_bits(bits: u32) -> Result<Self> {
        Ok(match bits {
            8 => Self::U8,
            16 => Self::U16,
            32 => Self::U32,
            64 => Self::U64,
            _ => return Err(bad_width("length prefix width", bits, "8, 16, 32, 64")),
        })
    }

    /// The unsigned field kind of this prefix.
    pub fn kind(self) -> FieldKind {
        match self {
            Self::U8 => FieldKind::U8,
            Self::U16 => FieldKind::U16,
            Self::U32 => FieldKind::U32,
            Self::U64 => FieldKind::U64,
        }
    }

    /// Size of the prefix, in bytes.
    pub fn size(self) -> usize {
        self.kind().size()
    }

    /// The largest count this prefix can hold.
    pub fn max(self) -> u64 {
        match self {
            Self::U8 => u8::MAX.into(),
            Self::U16 => u16::MAX.into(),
            Self::U32 => u32::MAX.into(),
            Self::U64 => u64::MAX,
        }
    }

    pub(crate) fn decode(self, bytes: &[u8], endian: Endian) -> Option<u64> {
        match self {
            Self::U8 => u8::decode(bytes, endian).map(u64::from),
            Self::U16 => u16::decode(bytes, endian).map(u64::from),
            Self::U32 => u32::decode(bytes, endian).map(u64::from),
            Self::U64 => u64::decode(bytes, endian),
        }
    }

    pub(crate) fn encode(self, count: usize, endian: Endian, out: &mut Vec<u8>) -> Result<()> {
        let overflow = || Error::LengthOverflow {
            count,
            prefix: self,
        };
        let n = u64::try_from(count).map_err(|_| overflow())?;
        match self {
            Self::U8 => u8::try_from(n).map_err(|_| overflow())?.encode(endian, out),
            Self::U16 => u16::try_from(n).map_err(|_| overflow())?.encode(endian, out),
            Self::U32 => u32::try_from(n).map_err(|_| overflow())?.encode(endian, out),
            Self::U64 => n.encode(endian, out),
        }
        Ok(())
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.kind(), f)
    }
}

/// A decoded field, or a value to be encoded.
///
/// Integers of every width are carried as `i128`, which holds both `u64::MAX` and `i64::MIN`.
/// Floats are carried as `f64`, which holds every `f32` exactly.
#[derive(Clone, PartialEq, Debug)]
pub enum Value {
    /// An integer.
    Int(i128),
    /// A floating point number.
    Float(f64),
    /// A fixed-length block of bytes.
    Bytes(Vec<u8>),
}

impl Value {
    /// Returns the integer, if this is one.
    pub fn as_int(&self) -> Option<i128> {
        match *self {
            Self::Int(i) => Some(i),
            _ => None,
        }
    }

    /// Returns the number as `f64`. Integers are converted, possibly losing precision.
    pub fn as_float(&self) -> Option<f64> {
        match *self {
            Self::Int(i) => Some(i as f64),
            Self::Float(x) => Some(x),
            Self::Bytes(_) => None,
        }
    }

    /// Returns the byte block, if this is one.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Bytes(b) => write!(f, "b\"{}\"", b.escape_ascii()),
        }
    }
}

macro_rules! value_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Self::Int(v.into())
                }
            }
        )*
    };
}

value_from_int!(u8, i8, u16, i16, u32, i32, u64, i64, i128);

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::Float(v.into())
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Self::Bytes(v)
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Self::Bytes(v.to_vec())
    }
}

/// A Rust primitive type that maps onto one [`FieldKind`].
pub trait Scalar: Copy + Into<Value> {
    /// The field this type reads and writes.
    const KIND: FieldKind;

    /// Decodes a value from exactly `Self::KIND.size()` bytes. Returns `None` if `bytes` has
    /// the wrong length.
    fn decode(bytes: &[u8], endian: Endian) -> Option<Self>;

    /// Appends the encoding of `self` to `out`.
    fn encode(self, endian: Endian, out: &mut Vec<u8>);

    /// Converts a dynamic value into this type, rejecting values outside its range.
    fn from_value(value: &Value) -> Result<Self>;
}

macro_rules! byte_scalar {
    ($t:ty, $kind:ident) => {
        impl Scalar for $t {
            const KIND: FieldKind = FieldKind::$kind;

            #[inline(always)]
            fn decode(bytes: &[u8], _endian: Endian) -> Option<Self> {
                <$t>::read_from_bytes(bytes).ok()
            }

            #[inline(always)]
            fn encode(self, _endian: Endian, out: &mut Vec<u8>) {
                out.extend_from_slice(self.as_bytes());
            }

            fn from_value(value: &Value) -> Result<Self> {
                int_from_value(value, Self::KIND)
            }
        }
    };
}

macro_rules! wide_scalar {
    ($t:ty, $kind:ident, $wire:ident, $from_value:ident) => {
        impl Scalar for $t {
            const KIND: FieldKind = FieldKind::$kind;

            #[inline(always)]
            fn decode(bytes: &[u8], endian: Endian) -> Option<Self> {
                Some(match endian {
                    Endian::Little => $wire::<LittleEndian>::read_from_bytes(bytes).ok()?.get(),
                    Endian::Big | Endian::Network => {
                        $wire::<BigEndian>::read_from_bytes(bytes).ok()?.get()
                    }
                    Endian::Native | Endian::NativeUnaligned => {
                        $wire::<NativeEndian>::read_from_bytes(bytes).ok()?.get()
                    }
                })
            }

            #[inline(always)]
            fn encode(self, endian: Endian, out: &mut Vec<u8>) {
                match endian {
                    Endian::Little => {
                        out.extend_from_slice($wire::<LittleEndian>::new(self).as_bytes())
                    }
                    Endian::Big | Endian::Network => {
                        out.extend_from_slice($wire::<BigEndian>::new(self).as_bytes())
                    }
                    Endian::Native | Endian::NativeUnaligned => {
                        out.extend_from_slice($wire::<NativeEndian>::new(self).as_bytes())
                    }
                }
            }

            fn from_value(value: &Value) -> Result<Self> {
                $from_value(value, Self::KIND)
            }
        }
    };
}

byte_scalar!(u8, U8);
byte_scalar!(i8, I8);
wide_scalar!(u16, U16, U16, int_from_value);
wide_scalar!(i16, I16, I16, int_from_value);
wide_scalar!(u32, U32, U32, int_from_value);
wide_scalar!(i32, I32, I32, int_from_value);
wide_scalar!(u64, U64, U64, int_from_value);
wide_scalar!(i64, I64, I64, int_from_value);
wide_scalar!(f32, F32, F32, f32_from_value);
wide_scalar!(f64, F64, F64, f64_from_value);

fn int_from_value<T: TryFrom<i128>>(value: &Value, kind: FieldKind) -> Result<T> {
    match *value {
        Value::Int(i) => T::try_from(i).map_err(|_| Error::range(value.clone(), kind)),
        _ => Err(Error::range(value.clone(), kind)),
    }
}

fn f64_from_value(value: &Value, kind: FieldKind) -> Result<f64> {
    value
        .as_float()
        .ok_or_else(|| Error::range(value.clone(), kind))
}

fn f32_from_value(value: &Value, kind: FieldKind) -> Result<f32> {
    let x = f64_from_value(value, kind)?;
    let narrowed = x as f32;
    if x.is_finite() && narrowed.is_infinite() {
        return Err(Error::range(value.clone(), kind));
    }
    Ok(narrowed)
}

/// One element of a [`Format`].
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Token {
    /// `count` consecutive fields of one kind.
    Field(FieldKind, usize),
    /// Filler bytes. Skipped when decoding, written as zeros when encoding.
    Pad(usize),
    /// A byte block of the given length, decoded as one [`Value::Bytes`].
    Bytes(usize),
}

/// A flat sequence of fields, laid out back to back.
///
/// Formats can be built with the chained constructors or parsed from a struct-style
/// descriptor such as `"B2Hx4s"`: an optional repeat count followed by one of `x` (pad byte),
/// `b B h H i I q Q` (8, 16, 32 and 64-bit integers, lowercase is signed), `f d` (32 and 64-bit
/// floats) or `s` (a byte block whose length is the count).
///
/// Under [`Endian::Native`], each field is preceded by enough zero bytes to align it to its host
/// alignment, measured from the start of the format. Pad bytes and byte blocks are never
/// aligned, and nothing is added after the last field.
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct Format {
    tokens: Vec<Token>,
}

impl Format {
    /// Creates an empty format.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `count` fields of `kind`.
    pub fn field(mut self, kind: FieldKind, count: usize) -> Self {
        self.tokens.push(Token::Field(kind, count));
        self
    }

    /// Appends `count` pad bytes.
    pub fn pad(mut self, count: usize) -> Self {
        self.tokens.push(Token::Pad(count));
        self
    }

    /// Appends a byte block of `len` bytes.
    pub fn bytes(mut self, len: usize) -> Self {
        self.tokens.push(Token::Bytes(len));
        self
    }

    /// The tokens of this format, in order.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Number of values produced by decoding this format.
    pub fn value_count(&self) -> usize {
        self.tokens
            .iter()
            .map(|t| match *t {
                Token::Field(_, count) => count,
                Token::Pad(_) => 0,
                Token::Bytes(_) => 1,
            })
            .sum()
    }

    /// Number of bytes covered by this format under `endian`, including padding.
    ///
    /// Saturates at `usize::MAX` rather than overflowing, which no buffer can satisfy.
    pub fn size(&self, endian: Endian) -> usize {
        let mut pos: usize = 0;
        for token in &self.tokens {
            pos = match *token {
                Token::Pad(n) | Token::Bytes(n) => pos.saturating_add(n),
                Token::Field(_, 0) => pos,
                Token::Field(kind, count) => {
                    align(pos, kind, endian).saturating_add(count.saturating_mul(kind.size()))
                }
            };
        }
        pos
    }

    /// Decodes `src`, which must be exactly `self.size(endian)` bytes long.
    pub(crate) fn decode(&self, src: &[u8], endian: Endian) -> Option<Vec<Value>> {
        let mut values = Vec::with_capacity(self.value_count());
        let mut pos = 0;
        for token in &self.tokens {
            match *token {
                Token::Pad(n) => pos += n,
                Token::Bytes(n) => {
                    values.push(Value::Bytes(src.get(pos..pos + n)?.to_vec()));
                    pos += n;
                }
                Token::Field(_, 0) => {}
                Token::Field(kind, count) => {
                    pos = align(pos, kind, endian);
                    let size = kind.size();
                    for _ in 0..count {
                        values.push(kind.decode(src.get(pos..pos + size)?, endian)?);
                        pos += size;
                    }
                }
            }
        }
        Some(values)
    }

    /// Encodes `values` and appends them to `out`. Every value is validated before anything is
    /// appended.
    pub(crate) fn encode(&self, values: &[Value], endian: Endian, out: &mut Vec<u8>) -> Result<()> {
        let expected = self.value_count();
        if values.len() != expected {
            return Err(Error::ValueCount {
                expected,
                actual: values.len(),
            });
        }

        let mut buf = Vec::with_capacity(self.size(endian));
        let mut remaining = values.iter();
        for token in &self.tokens {
            match *token {
                Token::Pad(n) => buf.resize(buf.len() + n, 0),
                Token::Bytes(n) => match remaining.next() {
                    Some(Value::Bytes(b)) if b.len() == n => buf.extend_from_slice(b),
                    Some(other) => {
                        return Err(Error::Range {
                            value: other.clone(),
                            field: format!("{n}s"),
                        })
                    }
                    None => {
                        return Err(Error::ValueCount {
                            expected,
                            actual: values.len(),
                        })
                    }
                },
                Token::Field(_, 0) => {}
                Token::Field(kind, count) => {
                    buf.resize(align(buf.len(), kind, endian), 0);
                    for value in remaining.by_ref().take(count) {
                        kind.encode(value, endian, &mut buf)?;
                    }
                }
            }
        }

        out.extend_from_slice(&buf);
        Ok(())
    }
}

fn align(pos: usize, kind: FieldKind, endian: Endian) -> usize {
    if endian.aligns() {
        pos.checked_next_multiple_of(kind.native_align())
            .unwrap_or(usize::MAX)
    } else {
        pos
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in &self.tokens {
            let (count, code) = match *token {
                Token::Field(kind, count) => (count, kind.code()),
                Token::Pad(n) => (n, 'x'),
                Token::Bytes(n) => (n, 's'),
            };
            if count == 1 && code != 's' {
                write!(f, "{code}")?;
            } else {
                write!(f, "{count}{code}")?;
            }
        }
        Ok(())
    }
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let bad = |what: String| Error::Config {
            setting: "format code",
            value: what,
            accepted: "an optional count followed by one of x b B h H i I q Q f d s".to_string(),
        };

        let mut format = Format::new();
        let mut count: Option<usize> = None;
        for c in s.chars() {
            if let Some(digit) = c.to_digit(10) {
                let n = count
                    .unwrap_or(0)
                    .checked_mul(10)
                    .and_then(|n| n.checked_add(digit as usize))
                    .ok_or_else(|| bad(s.to_string()))?;
                count = Some(n);
                continue;
            }
            if c.is_whitespace() {
                if count.is_some() {
                    return Err(bad(s.to_string()));
                }
                continue;
            }

            let n = count.take().unwrap_or(1);
            format = match c {
                'x' => format.pad(n),
                's' => format.bytes(n),
                _ => match FieldKind::from_code(c) {
                    Some(kind) => format.field(kind, n),
                    None => return Err(bad(c.to_string())),
                },
            };
        }

        if count.is_some() {
            return Err(bad(s.to_string()));
        }
        Ok(format)
    }
}
