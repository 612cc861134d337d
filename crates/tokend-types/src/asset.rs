//! Token quantities.

use crate::abi::{AbiDecode, AbiEncode, Decoder, Encoder};
use crate::symbol::{Symbol, SymbolCode, MAX_PRECISION};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use tokend_error::{Result, TokenError};

/// Largest magnitude an asset amount may hold, `2^62 - 1`
pub const MAX_AMOUNT: i64 = (1 << 62) - 1;

/// A signed fixed-point quantity of a token, e.g. `1.3200 EOS`.
///
/// The amount is held in the smallest unit (`units / 10^precision` whole
/// tokens). The symbol is fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Asset {
    units: i64,
    symbol: Symbol,
}

fn invalid(input: impl Into<String>, reason: impl Into<String>) -> TokenError {
    TokenError::InvalidAssetQuantity {
        input: input.into(),
        reason: reason.into(),
    }
}

fn check_range(input: &str, units: i128) -> Result<i64> {
    if units.unsigned_abs() > MAX_AMOUNT as u128 {
        return Err(invalid(input, "magnitude exceeds 2^62 - 1"));
    }
    Ok(units as i64)
}

/// Parses `[-]digits[.digits]` into units of `precision` decimals.
///
/// With `precision = None` the fractional digit count defines the precision.
fn parse_decimal(input: &str, text: &str, precision: Option<u8>) -> Result<(i128, u8)> {
    let (negative, body) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let (int_part, frac_part) = match body.split_once('.') {
        Some((i, f)) => (i, f),
        None => (body, ""),
    };
    if int_part.is_empty() || !int_part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid(input, "amount must start with a digit"));
    }
    if body.contains('.') && frac_part.is_empty() {
        return Err(invalid(input, "missing digits after decimal point"));
    }
    if !frac_part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid(input, "amount contains non-digit characters"));
    }

    let frac_len = frac_part.len();
    let precision = match precision {
        Some(p) if frac_len > usize::from(p) => {
            return Err(invalid(
                input,
                format!("{frac_len} decimal places exceed symbol precision {p}"),
            ));
        }
        Some(p) => p,
        None if frac_len > usize::from(MAX_PRECISION) => {
            return Err(invalid(input, format!("precision must not exceed {MAX_PRECISION}")));
        }
        None => frac_len as u8,
    };

    let overflow = || invalid(input, "magnitude exceeds 2^62 - 1");
    let mut units: i128 = 0;
    for b in int_part.bytes().chain(frac_part.bytes()) {
        units = units
            .checked_mul(10)
            .and_then(|u| u.checked_add(i128::from(b - b'0')))
            .ok_or_else(overflow)?;
    }
    for _ in frac_len..usize::from(precision) {
        units = units.checked_mul(10).ok_or_else(overflow)?;
    }
    Ok((if negative { -units } else { units }, precision))
}

impl Asset {
    /// Creates an asset from smallest-unit amount and symbol
    pub fn from_units(units: i64, symbol: Symbol) -> Result<Self> {
        let units = check_range(&units.to_string(), i128::from(units))?;
        Ok(Self { units, symbol })
    }

    /// Creates an asset from a floating point amount, rounding to the
    /// symbol's precision
    pub fn from_float(value: f64, symbol: Symbol) -> Result<Self> {
        if !value.is_finite() {
            return Err(invalid(value.to_string(), "amount must be finite"));
        }
        let scaled = (value * symbol.unit_scale() as f64).round();
        // `as i128` saturates, and 2^62 itself is representable
        let units = check_range(&value.to_string(), scaled as i128)?;
        Ok(Self { units, symbol })
    }

    /// Parses a bare decimal such as `1.32` in the given symbol.
    ///
    /// Fewer decimals than the symbol precision are padded; more are rejected
    /// rather than rounded.
    pub fn from_decimal(text: &str, symbol: Symbol) -> Result<Self> {
        let (units, _) = parse_decimal(text, text.trim(), Some(symbol.precision()))?;
        Ok(Self {
            units: check_range(text, units)?,
            symbol,
        })
    }

    /// Zero of the given symbol
    pub fn zero(symbol: Symbol) -> Self {
        Self { units: 0, symbol }
    }

    /// Amount in the smallest unit
    pub fn units(&self) -> i64 {
        self.units
    }

    /// The asset's symbol
    pub fn symbol(&self) -> Symbol {
        self.symbol
    }

    /// Shorthand for `symbol().code()`
    pub fn code(&self) -> SymbolCode {
        self.symbol.code()
    }

    /// True for amounts below zero
    pub fn is_negative(&self) -> bool {
        self.units < 0
    }

    /// Approximate value in whole tokens. Lossy; use for display only.
    pub fn to_float(&self) -> f64 {
        self.units as f64 / self.symbol.unit_scale() as f64
    }

    /// Adds two assets of the same symbol
    pub fn checked_add(&self, other: &Asset) -> Result<Asset> {
        self.same_symbol(other)?;
        let sum = i128::from(self.units) + i128::from(other.units);
        Ok(Asset {
            units: check_range(&format!("{self} + {other}"), sum)?,
            symbol: self.symbol,
        })
    }

    /// Subtracts an asset of the same symbol
    pub fn checked_sub(&self, other: &Asset) -> Result<Asset> {
        self.same_symbol(other)?;
        let diff = i128::from(self.units) - i128::from(other.units);
        Ok(Asset {
            units: check_range(&format!("{self} - {other}"), diff)?,
            symbol: self.symbol,
        })
    }

    fn same_symbol(&self, other: &Asset) -> Result<()> {
        if self.symbol != other.symbol {
            return Err(TokenError::SymbolMismatch {
                expected: self.symbol.to_string(),
                got: other.symbol.to_string(),
            });
        }
        Ok(())
    }
}

impl FromStr for Asset {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.split_whitespace();
        let (amount, code) = match (parts.next(), parts.next(), parts.next()) {
            (Some(amount), Some(code), None) => (amount, code),
            _ => return Err(invalid(s, "expected '<amount> <SYMBOL>'")),
        };
        let code: SymbolCode = code.parse().map_err(|e: TokenError| invalid(s, e.to_string()))?;
        let (units, precision) = parse_decimal(s, amount, None)?;
        let symbol = Symbol::new(precision, code).map_err(|e| invalid(s, e.to_string()))?;
        Ok(Self {
            units: check_range(s, units)?,
            symbol,
        })
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = usize::from(self.symbol.precision());
        let scale = self.symbol.unit_scale().unsigned_abs();
        let magnitude = self.units.unsigned_abs();
        let sign = if self.units < 0 { "-" } else { "" };
        let whole = magnitude / scale;
        if precision == 0 {
            write!(f, "{sign}{whole} {}", self.symbol.code())
        } else {
            let frac = magnitude % scale;
            write!(
                f,
                "{sign}{whole}.{frac:0precision$} {}",
                self.symbol.code()
            )
        }
    }
}

impl AbiEncode for Asset {
    fn abi_encode(&self, encoder: &mut Encoder) {
        encoder.write_i64(self.units);
        self.symbol.abi_encode(encoder);
    }
}

impl AbiDecode for Asset {
    fn abi_decode(decoder: &mut Decoder<'_>) -> Result<Self> {
        let units = decoder.read_i64()?;
        let symbol = Symbol::abi_decode(decoder)?;
        Asset::from_units(units, symbol).map_err(|e| TokenError::AbiError(e.to_string()))
    }
}

impl Serialize for Asset {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Asset {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
