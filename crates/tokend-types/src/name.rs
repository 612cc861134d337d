//! Account and action names.

use crate::abi::{AbiDecode, AbiEncode, Decoder, Encoder};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use tokend_error::{Result, TokenError};

const CHARMAP: &[u8; 32] = b".12345abcdefghijklmnopqrstuvwxyz";

/// Maximum length of a name in characters
pub const MAX_NAME_LEN: usize = 13;

/// A ledger name: up to 13 characters packed into 64 bits.
///
/// Characters 1 through 12 use five bits each and come from
/// `.12345abcdefghijklmnopqrstuvwxyz`; the optional 13th character uses the
/// remaining four bits and is limited to `.12345abcdefghij`. Trailing dots
/// carry no information, so `"abc."` does not survive a round trip and is
/// rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Name(u64);

impl Name {
    /// The empty name (value 0)
    pub const EMPTY: Name = Name(0);

    /// Creates a name from its raw 64-bit value
    pub const fn from_raw(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw 64-bit value
    pub const fn raw(&self) -> u64 {
        self.0
    }

    /// Parses and validates a name
    pub fn new(s: &str) -> Result<Self> {
        s.parse()
    }

    /// True for the empty name
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

fn char_to_value(c: u8) -> Option<u64> {
    match c {
        b'a'..=b'z' => Some(u64::from(c - b'a') + 6),
        b'1'..=b'5' => Some(u64::from(c - b'1') + 1),
        b'.' => Some(0),
        _ => None,
    }
}

fn invalid(name: &str, reason: impl Into<String>) -> TokenError {
    TokenError::InvalidAccountName {
        name: name.to_string(),
        reason: reason.into(),
    }
}

impl FromStr for Name {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self> {
        if s.len() > MAX_NAME_LEN {
            return Err(invalid(s, format!("longer than {MAX_NAME_LEN} characters")));
        }

        let mut value = 0u64;
        for (i, c) in s.bytes().enumerate() {
            let v = char_to_value(c)
                .ok_or_else(|| invalid(s, format!("character '{}' is not allowed", c as char)))?;
            if i < 12 {
                value |= (v & 0x1f) << (64 - 5 * (i + 1));
            } else {
                if v > 0x0f {
                    return Err(invalid(s, "13th character must be one of .12345abcdefghij"));
                }
                value |= v;
            }
        }

        let name = Name(value);
        if name.to_string() != s {
            return Err(invalid(s, "trailing dots are not allowed"));
        }
        Ok(name)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = [b'.'; MAX_NAME_LEN];
        let mut tmp = self.0;
        for i in 0..MAX_NAME_LEN {
            let (mask, shift) = if i == 0 { (0x0f, 4) } else { (0x1f, 5) };
            out[12 - i] = CHARMAP[(tmp & mask) as usize];
            tmp >>= shift;
        }
        let end = out.iter().rposition(|&c| c != b'.').map_or(0, |p| p + 1);
        // CHARMAP is ASCII
        f.write_str(std::str::from_utf8(&out[..end]).map_err(|_| fmt::Error)?)
    }
}

impl TryFrom<&str> for Name {
    type Error = TokenError;

    fn try_from(s: &str) -> Result<Self> {
        s.parse()
    }
}

impl From<Name> for u64 {
    fn from(name: Name) -> Self {
        name.0
    }
}

impl AbiEncode for Name {
    fn abi_encode(&self, encoder: &mut Encoder) {
        encoder.write_u64(self.0);
    }
}

impl AbiDecode for Name {
    fn abi_decode(decoder: &mut Decoder<'_>) -> Result<Self> {
        Ok(Name(decoder.read_u64()?))
    }
}

impl Serialize for Name {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Name {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
