//! Currency symbols.

use crate::abi::{AbiDecode, AbiEncode, Decoder, Encoder};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use tokend_error::{Result, TokenError};

/// Maximum length of a symbol code
pub const MAX_SYMBOL_CODE_LEN: usize = 7;

/// Maximum number of decimal places a symbol may carry
pub const MAX_PRECISION: u8 = 18;

/// A currency code such as `EOS`, independent of precision.
///
/// Stored as up to seven ASCII uppercase letters packed little-endian into
/// the low 56 bits of a `u64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SymbolCode(u64);

impl SymbolCode {
    /// Parses and validates a symbol code
    pub fn new(s: &str) -> Result<Self> {
        s.parse()
    }

    /// Creates a symbol code from its raw value, validating the packed letters
    pub fn from_raw(raw: u64) -> Result<Self> {
        let code = SymbolCode(raw);
        let text = code.to_string();
        // raw values with embedded zero bytes or non-letters do not survive
        if text.parse::<SymbolCode>().ok().map(|c| c.0) != Some(raw) {
            return Err(TokenError::InvalidSymbolCode {
                code: format!("{raw:#x}"),
                reason: "raw value does not hold 1-7 uppercase letters".to_string(),
            });
        }
        Ok(code)
    }

    /// Returns the raw packed value
    pub const fn raw(&self) -> u64 {
        self.0
    }
}

impl FromStr for SymbolCode {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = |reason: &str| TokenError::InvalidSymbolCode {
            code: s.to_string(),
            reason: reason.to_string(),
        };
        if s.is_empty() {
            return Err(invalid("empty"));
        }
        if s.len() > MAX_SYMBOL_CODE_LEN {
            return Err(invalid("longer than 7 characters"));
        }
        let mut raw = 0u64;
        for (i, c) in s.bytes().enumerate() {
            if !c.is_ascii_uppercase() {
                return Err(invalid("only uppercase letters A-Z are allowed"));
            }
            raw |= u64::from(c) << (8 * i);
        }
        Ok(SymbolCode(raw))
    }
}

impl fmt::Display for SymbolCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tmp = self.0;
        while tmp != 0 {
            let c = (tmp & 0xff) as u8;
            write!(f, "{}", c as char)?;
            tmp >>= 8;
        }
        Ok(())
    }
}

impl PartialEq<str> for SymbolCode {
    fn eq(&self, other: &str) -> bool {
        other.parse::<SymbolCode>().map_or(false, |c| c == *self)
    }
}

impl PartialEq<&str> for SymbolCode {
    fn eq(&self, other: &&str) -> bool {
        *self == **other
    }
}

impl AbiEncode for SymbolCode {
    fn abi_encode(&self, encoder: &mut Encoder) {
        encoder.write_u64(self.0);
    }
}

impl AbiDecode for SymbolCode {
    fn abi_decode(decoder: &mut Decoder<'_>) -> Result<Self> {
        SymbolCode::from_raw(decoder.read_u64()?).map_err(|e| TokenError::AbiError(e.to_string()))
    }
}

impl Serialize for SymbolCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SymbolCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A symbol: precision plus code, written `4,EOS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Symbol {
    precision: u8,
    code: SymbolCode,
}

impl Symbol {
    /// Creates a symbol, rejecting precisions above [`MAX_PRECISION`]
    pub fn new(precision: u8, code: SymbolCode) -> Result<Self> {
        if precision > MAX_PRECISION {
            return Err(TokenError::InvalidSymbol {
                symbol: format!("{precision},{code}"),
                reason: format!("precision must not exceed {MAX_PRECISION}"),
            });
        }
        Ok(Self { precision, code })
    }

    /// The system token symbol, `4,EOS`
    pub fn system() -> Self {
        Self {
            precision: 4,
            // 'E' | 'O' << 8 | 'S' << 16
            code: SymbolCode(0x53_4f_45),
        }
    }

    /// Number of decimal places
    pub fn precision(&self) -> u8 {
        self.precision
    }

    /// The currency code
    pub fn code(&self) -> SymbolCode {
        self.code
    }

    /// Raw binary value, `code << 8 | precision`
    pub fn raw(&self) -> u64 {
        (self.code.0 << 8) | u64::from(self.precision)
    }

    /// Creates a symbol from its raw binary value
    pub fn from_raw(raw: u64) -> Result<Self> {
        let code = SymbolCode::from_raw(raw >> 8)?;
        Symbol::new((raw & 0xff) as u8, code)
    }

    /// `10^precision`, the number of units in one whole token
    pub fn unit_scale(&self) -> i64 {
        10i64.pow(u32::from(self.precision))
    }
}

impl Default for Symbol {
    fn default() -> Self {
        Self::system()
    }
}

impl FromStr for Symbol {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = |reason: String| TokenError::InvalidSymbol {
            symbol: s.to_string(),
            reason,
        };
        let (precision, code) = s
            .split_once(',')
            .ok_or_else(|| invalid("expected 'precision,CODE'".to_string()))?;
        let precision = precision
            .trim()
            .parse::<u8>()
            .map_err(|e| invalid(format!("bad precision: {e}")))?;
        let code = code
            .trim()
            .parse::<SymbolCode>()
            .map_err(|e| invalid(e.to_string()))?;
        Symbol::new(precision, code).map_err(|e| invalid(e.to_string()))
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.precision, self.code)
    }
}

impl AbiEncode for Symbol {
    fn abi_encode(&self, encoder: &mut Encoder) {
        encoder.write_u64(self.raw());
    }
}

impl AbiDecode for Symbol {
    fn abi_decode(decoder: &mut Decoder<'_>) -> Result<Self> {
        Symbol::from_raw(decoder.read_u64()?).map_err(|e| TokenError::AbiError(e.to_string()))
    }
}

impl Serialize for Symbol {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Symbol {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_code_parse() {
        let code = SymbolCode::new("EOS").unwrap();
        assert_eq!(code.raw(), 0x53_4f_45);
        assert_eq!(code.to_string(), "EOS");
        assert_eq!(code, "EOS");
        assert_ne!(code, "NOT");
    }

    #[test]
    fn test_symbol_code_rejects() {
        for bad in ["", "eos", "EOS1", "ABCDEFGH", "E S"] {
            let err = SymbolCode::new(bad).unwrap_err();
            assert!(matches!(err, TokenError::InvalidSymbolCode { .. }), "{bad}");
        }
    }

    #[test]
    fn test_symbol_code_from_raw() {
        assert!(SymbolCode::from_raw(0x53_4f_45).is_ok());
        assert!(SymbolCode::from_raw(0).is_err());
        // gap between letters
        assert!(SymbolCode::from_raw(0x53_00_45).is_err());
    }

    #[test]
    fn test_symbol_parse_and_display() {
        let sym: Symbol = "4,EOS".parse().unwrap();
        assert_eq!(sym.precision(), 4);
        assert_eq!(sym.code().to_string(), "EOS");
        assert_eq!(sym.to_string(), "4,EOS");
        assert_eq!(sym, Symbol::system());
    }

    #[test]
    fn test_symbol_raw() {
        // well-known value of 4,EOS
        assert_eq!(Symbol::system().raw(), 0x0000_0000_534f_4504);
        assert_eq!(Symbol::from_raw(0x534f_4504).unwrap(), Symbol::system());
    }

    #[test]
    fn test_symbol_rejects() {
        assert!("EOS".parse::<Symbol>().is_err());
        assert!("19,EOS".parse::<Symbol>().is_err());
        assert!("x,EOS".parse::<Symbol>().is_err());
        assert!("4,eos".parse::<Symbol>().is_err());
    }

    #[test]
    fn test_symbol_errors_name_the_input() {
        let err = "4,eos".parse::<Symbol>().unwrap_err();
        assert!(matches!(err, TokenError::InvalidSymbol { ref symbol, .. } if symbol == "4,eos"));

        let spaced: Symbol = " 2 , TKN ".parse().unwrap();
        assert_eq!(spaced.to_string(), "2,TKN");

        let err = "x,EOS".parse::<Symbol>().unwrap_err();
        assert!(err.to_string().contains("bad precision"));
    }

    #[test]
    fn test_unit_scale() {
        assert_eq!(Symbol::system().unit_scale(), 10_000);
        let zero = Symbol::new(0, SymbolCode::new("NFT").unwrap()).unwrap();
        assert_eq!(zero.unit_scale(), 1);
    }
}
