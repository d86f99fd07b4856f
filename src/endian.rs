use crate::error::Error;
use core::fmt;
use core::str::FromStr;

/// Byte order and alignment mode used by `Reader` and `Writer`.
///
/// The mode can be changed between operations; a change only affects fields read or written
/// afterwards.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub enum Endian {
    /// Host byte order. Multi-byte fields of a composite format are padded to their host
    /// alignment, measured from the start of the format.
    #[default]
    Native,
    /// Host byte order, never padded.
    NativeUnaligned,
    /// Least significant byte first, never padded.
    Little,
    /// Most significant byte first, never padded.
    Big,
    /// Network byte order. Identical to `Big`.
    Network,
}

const ACCEPTED: &str = "'@', '=', '<', '>', '!', native, native-unaligned, native-no-align, \
     standard, little, little-endian, le, big, big-endian, be, network";

impl Endian {
    /// Every mode, in declaration order.
    pub const ALL: [Endian; 5] = [
        Self::Native,
        Self::NativeUnaligned,
        Self::Little,
        Self::Big,
        Self::Network,
    ];

    /// The single-character code for this mode, as used by struct-style format strings.
    pub fn code(self) -> char {
        match self {
            Self::Native => '@',
            Self::NativeUnaligned => '=',
            Self::Little => '<',
            Self::Big => '>',
            Self::Network => '!',
        }
    }

    /// Whether fields are padded to their natural alignment in this mode.
    pub fn aligns(self) -> bool {
        self == Self::Native
    }

    /// Whether multi-byte fields are stored most significant byte first.
    pub fn is_big(self) -> bool {
        match self {
            Self::Big | Self::Network => true,
            Self::Little => false,
            Self::Native | Self::NativeUnaligned => cfg!(target_endian = "big"),
        }
    }
}

impl fmt::Display for Endian {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Native => "native",
            Self::NativeUnaligned => "native-unaligned",
            Self::Little => "little",
            Self::Big => "big",
            Self::Network => "network",
        })
    }
}

impl FromStr for Endian {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        let name: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .flat_map(char::to_lowercase)
            .collect();

        Ok(match name.as_str() {
            "@" | "native" => Self::Native,
            "=" | "nativeunaligned" | "nativenoalign" | "standard" => Self::NativeUnaligned,
            "<" | "little" | "littleendian" | "le" => Self::Little,
            ">" | "big" | "bigendian" | "be" => Self::Big,
            "!" | "network" => Self::Network,
            _ => {
                return Err(Error::Config {
                    setting: "byte order",
                    value: s.to_string(),
                    accepted: ACCEPTED.to_string(),
                })
            }
        })
    }
}

impl TryFrom<char> for Endian {
    type Error = Error;

    fn try_from(c: char) -> Result<Self, Error> {
        let mut buf = [0u8; 4];
        c.encode_utf8(&mut buf).parse()
    }
}
