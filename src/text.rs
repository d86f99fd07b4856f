//! Text codecs, looked up by name.

use crate::codec::{Scalar, Value};
use crate::endian::Endian;
use crate::error::{Error, Result};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Converts between text and bytes for one named encoding.
///
/// The `endian` argument is the byte order of the cursor doing the conversion. Codecs with a
/// fixed byte order, or with single-byte code units, ignore it.
pub trait TextCodec: Send + Sync {
    /// Canonical name of the encoding, used in error messages.
    fn name(&self) -> &str;

    /// Encodes `text`. Fails with `Error::Range` if the encoding cannot represent it.
    fn encode(&self, text: &str, endian: Endian) -> Result<Vec<u8>>;

    /// Decodes `bytes`. Fails with `Error::Decode` if they are not valid in this encoding.
    fn decode(&self, bytes: &[u8], endian: Endian) -> Result<String>;
}

/// A registry of text codecs keyed by name.
///
/// Names are matched without regard to case, and `-`, `_` and spaces are ignored, so `UTF-8`,
/// `utf_8` and `utf8` all find the same codec.
#[derive(Clone)]
pub struct Codecs {
    map: HashMap<String, Arc<dyn TextCodec>>,
}

impl Codecs {
    /// Creates a registry with no codecs in it.
    pub fn empty() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    /// Creates a registry holding the built-in codecs: `ascii`, `latin-1`, `utf-8`, and
    /// `utf-16` / `utf-32` in cursor order, little-endian (`le` suffix) and big-endian (`be`
    /// suffix) variants.
    pub fn new() -> Self {
        let mut codecs = Self::empty();
        codecs.insert(&["ascii", "us-ascii"], Arc::new(Ascii));
        codecs.insert(&["latin-1", "latin1", "iso-8859-1"], Arc::new(Latin1));
        codecs.insert(&["utf-8", "utf8"], Arc::new(Utf8));
        for (name, order) in [
            ("utf-16", None),
            ("utf-16le", Some(Endian::Little)),
            ("utf-16be", Some(Endian::Big)),
        ] {
            codecs.insert(&[name], Arc::new(Utf16 { name, order }));
        }
        for (name, order) in [
            ("utf-32", None),
            ("utf-32le", Some(Endian::Little)),
            ("utf-32be", Some(Endian::Big)),
        ] {
            codecs.insert(&[name], Arc::new(Utf32 { name, order }));
        }
        codecs
    }

    /// The process-wide registry of built-in codecs, used by readers and writers that were not
    /// given their own.
    pub fn shared() -> Arc<Codecs> {
        static SHARED: OnceLock<Arc<Codecs>> = OnceLock::new();
        SHARED.get_or_init(|| Arc::new(Codecs::new())).clone()
    }

    /// Adds `codec` under `name`, replacing any codec already registered under that name.
    pub fn register(&mut self, name: &str, codec: impl TextCodec + 'static) {
        log::debug!("registering text codec {name:?} ({})", codec.name());
        self.insert(&[name], Arc::new(codec));
    }

    fn insert(&mut self, names: &[&str], codec: Arc<dyn TextCodec>) {
        for name in names {
            self.map.insert(normalize(name), codec.clone());
        }
    }

    /// Looks up a codec by name.
    pub fn get(&self, name: &str) -> Result<&dyn TextCodec> {
        match self.map.get(&normalize(name)) {
            Some(codec) => Ok(codec.as_ref()),
            None => Err(Error::Config {
                setting: "text encoding",
                value: name.to_string(),
                accepted: self.names().join(", "),
            }),
        }
    }

    /// The normalized names of every registered codec, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.map.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for Codecs {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Codecs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '-' | '_' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

fn unencodable(name: &str, c: char) -> Error {
    Error::Range {
        value: Value::Int(u32::from(c).into()),
        field: format!("{name} text"),
    }
}

fn invalid(name: &str, position: usize, reason: String) -> Error {
    Error::Decode {
        encoding: name.to_string(),
        position,
        reason,
    }
}

struct Ascii;

impl TextCodec for Ascii {
    fn name(&self) -> &str {
        "ascii"
    }

    fn encode(&self, text: &str, _endian: Endian) -> Result<Vec<u8>> {
        match text.chars().find(|c| !c.is_ascii()) {
            Some(c) => Err(unencodable(self.name(), c)),
            None => Ok(text.as_bytes().to_vec()),
        }
    }

    fn decode(&self, bytes: &[u8], _endian: Endian) -> Result<String> {
        if let Some(position) = bytes.iter().position(|b| !b.is_ascii()) {
            let reason = format!("byte 0x{:02x} is not ASCII", bytes[position]);
            return Err(invalid(self.name(), position, reason));
        }
        Ok(bytes.iter().map(|&b| char::from(b)).collect())
    }
}

struct Latin1;

impl TextCodec for Latin1 {
    fn name(&self) -> &str {
        "latin-1"
    }

    fn encode(&self, text: &str, _endian: Endian) -> Result<Vec<u8>> {
        text.chars()
            .map(|c| u8::try_from(c).map_err(|_| unencodable(self.name(), c)))
            .collect()
    }

    fn decode(&self, bytes: &[u8], _endian: Endian) -> Result<String> {
        Ok(bytes.iter().map(|&b| char::from(b)).collect())
    }
}

struct Utf8;

impl TextCodec for Utf8 {
    fn name(&self) -> &str {
        "utf-8"
    }

    fn encode(&self, text: &str, _endian: Endian) -> Result<Vec<u8>> {
        Ok(text.as_bytes().to_vec())
    }

    fn decode(&self, bytes: &[u8], _endian: Endian) -> Result<String> {
        match core::str::from_utf8(bytes) {
            Ok(s) => Ok(s.to_string()),
            Err(e) => Err(invalid(self.name(), e.valid_up_to(), e.to_string())),
        }
    }
}

/// Resolves the byte order of a multi-byte codec, honoring and skipping a leading byte order
/// mark when the codec has no fixed order.
fn resolve_order<'a>(
    order: Option<Endian>,
    endian: Endian,
    bytes: &'a [u8],
    little_bom: &[u8],
    big_bom: &[u8],
) -> (Endian, &'a [u8], usize) {
    if let Some(order) = order {
        return (order, bytes, 0);
    }
    if let Some(rest) = bytes.strip_prefix(little_bom) {
        (Endian::Little, rest, little_bom.len())
    } else if let Some(rest) = bytes.strip_prefix(big_bom) {
        (Endian::Big, rest, big_bom.len())
    } else {
        (endian, bytes, 0)
    }
}

struct Utf16 {
    name: &'static str,
    order: Option<Endian>,
}

impl TextCodec for Utf16 {
    fn name(&self) -> &str {
        self.name
    }

    fn encode(&self, text: &str, endian: Endian) -> Result<Vec<u8>> {
        let order = self.order.unwrap_or(endian);
        let mut out = Vec::with_capacity(text.len() * 2);
        for unit in text.encode_utf16() {
            unit.encode(order, &mut out);
        }
        Ok(out)
    }

    fn decode(&self, bytes: &[u8], endian: Endian) -> Result<String> {
        let (order, body, skipped) =
            resolve_order(self.order, endian, bytes, &[0xff, 0xfe], &[0xfe, 0xff]);

        let chunks = body.chunks_exact(2);
        if !chunks.remainder().is_empty() {
            let reason = format!("length {} is not a multiple of 2", bytes.len());
            return Err(invalid(self.name, bytes.len() - 1, reason));
        }
        let units = chunks.filter_map(|c| u16::decode(c, order));

        let mut text = String::with_capacity(body.len() / 2);
        let mut position = skipped;
        for decoded in char::decode_utf16(units) {
            match decoded {
                Ok(c) => {
                    text.push(c);
                    position += c.len_utf16() * 2;
                }
                Err(e) => {
                    let reason = format!("unpaired surrogate 0x{:04x}", e.unpaired_surrogate());
                    return Err(invalid(self.name, position, reason));
                }
            }
        }
        Ok(text)
    }
}

struct Utf32 {
    name: &'static str,
    order: Option<Endian>,
}

impl TextCodec for Utf32 {
    fn name(&self) -> &str {
        self.name
    }

    fn encode(&self, text: &str, endian: Endian) -> Result<Vec<u8>> {
        let order = self.order.unwrap_or(endian);
        let mut out = Vec::with_capacity(text.len() * 4);
        for c in text.chars() {
            u32::from(c).encode(order, &mut out);
        }
        Ok(out)
    }

    fn decode(&self, bytes: &[u8], endian: Endian) -> Result<String> {
        let (order, body, skipped) = resolve_order(
            self.order,
            endian,
            bytes,
            &[0xff, 0xfe, 0x00, 0x00],
            &[0x00, 0x00, 0xfe, 0xff],
        );

        let chunks = body.chunks_exact(4);
        if !chunks.remainder().is_empty() {
            let reason = format!("length {} is not a multiple of 4", bytes.len());
            return Err(invalid(self.name, bytes.len() - chunks.remainder().len(), reason));
        }

        let mut text = String::with_capacity(body.len() / 4);
        for (i, chunk) in chunks.enumerate() {
            let code = u32::decode(chunk, order).unwrap_or(u32::MAX);
            match char::from_u32(code) {
                Some(c) => text.push(c),
                None => {
                    let reason = format!("0x{code:08x} is not a Unicode scalar value");
                    return Err(invalid(self.name, skipped + i * 4, reason));
                }
            }
        }
        Ok(text)
    }
}
