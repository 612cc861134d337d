//! Explicit conversions from caller input to validated ledger types.
//!
//! Each conversion returns a `Result`, so malformed input is reported before
//! any contract or network call is made.

use crate::asset::Asset;
use crate::name::Name;
use crate::symbol::{Symbol, SymbolCode};
use tokend_error::{Result, TokenError};

/// Values that can be validated into a [`Name`]
pub trait ToName {
    /// Converts, failing with `InvalidAccountName`
    fn to_name(&self) -> Result<Name>;
}

impl ToName for Name {
    fn to_name(&self) -> Result<Name> {
        Ok(*self)
    }
}

impl ToName for str {
    fn to_name(&self) -> Result<Name> {
        self.parse()
    }
}

impl ToName for String {
    fn to_name(&self) -> Result<Name> {
        self.parse()
    }
}

impl<T: ToName + ?Sized> ToName for &T {
    fn to_name(&self) -> Result<Name> {
        (**self).to_name()
    }
}

/// Values that can be validated into a [`SymbolCode`]
pub trait ToSymbolCode {
    /// Converts, failing with `InvalidSymbolCode`
    fn to_symbol_code(&self) -> Result<SymbolCode>;
}

impl ToSymbolCode for SymbolCode {
    fn to_symbol_code(&self) -> Result<SymbolCode> {
        Ok(*self)
    }
}

impl ToSymbolCode for Symbol {
    fn to_symbol_code(&self) -> Result<SymbolCode> {
        Ok(self.code())
    }
}

impl ToSymbolCode for str {
    fn to_symbol_code(&self) -> Result<SymbolCode> {
        self.parse()
    }
}

impl ToSymbolCode for String {
    fn to_symbol_code(&self) -> Result<SymbolCode> {
        self.parse()
    }
}

impl<T: ToSymbolCode + ?Sized> ToSymbolCode for &T {
    fn to_symbol_code(&self) -> Result<SymbolCode> {
        (**self).to_symbol_code()
    }
}

/// The shapes a transfer amount may be given in.
///
/// ```
/// use tokend_types::{AmountInput, Symbol};
///
/// let asset = AmountInput::from(1.32).resolve(Symbol::system()).unwrap();
/// assert_eq!(asset.to_string(), "1.3200 EOS");
///
/// let asset = AmountInput::from("2.5 EOS").resolve(Symbol::system());
/// assert_eq!(asset.unwrap().to_string(), "2.5 EOS");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum AmountInput {
    /// Whole-token amount in the default symbol, rounded to its precision
    Units(f64),
    /// Either a full asset string (`"1.0000 EOS"`) or a bare decimal in the
    /// default symbol (`"1.32"`)
    Text(String),
    /// A quantity that is already built
    Quantity(Asset),
}

impl AmountInput {
    /// Resolves to an [`Asset`], filling in `default` where no symbol is given.
    ///
    /// Every failure is reported as `InvalidAssetQuantity`.
    pub fn resolve(self, default: Symbol) -> Result<Asset> {
        match self {
            AmountInput::Units(value) => Asset::from_float(value, default),
            AmountInput::Text(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return Err(TokenError::InvalidAssetQuantity {
                        input: text,
                        reason: "empty amount".to_string(),
                    });
                }
                if trimmed.contains(char::is_whitespace) {
                    trimmed.parse()
                } else {
                    Asset::from_decimal(trimmed, default)
                }
            }
            AmountInput::Quantity(asset) => Ok(asset),
        }
    }
}

impl From<f64> for AmountInput {
    fn from(value: f64) -> Self {
        AmountInput::Units(value)
    }
}

impl From<f32> for AmountInput {
    fn from(value: f32) -> Self {
        AmountInput::Units(f64::from(value))
    }
}

impl From<u32> for AmountInput {
    fn from(value: u32) -> Self {
        AmountInput::Units(f64::from(value))
    }
}

impl From<i32> for AmountInput {
    fn from(value: i32) -> Self {
        AmountInput::Text(value.to_string())
    }
}

impl From<i64> for AmountInput {
    fn from(value: i64) -> Self {
        // exact for any magnitude an asset can hold at precision 0
        AmountInput::Text(value.to_string())
    }
}

impl From<&str> for AmountInput {
    fn from(value: &str) -> Self {
        AmountInput::Text(value.to_string())
    }
}

impl From<String> for AmountInput {
    fn from(value: String) -> Self {
        AmountInput::Text(value)
    }
}

impl From<Asset> for AmountInput {
    fn from(value: Asset) -> Self {
        AmountInput::Quantity(value)
    }
}

impl From<&Asset> for AmountInput {
    fn from(value: &Asset) -> Self {
        AmountInput::Quantity(*value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_name_variants() {
        let expected = Name::new("teamgreymass").unwrap();
        assert_eq!("teamgreymass".to_name().unwrap(), expected);
        assert_eq!(String::from("teamgreymass").to_name().unwrap(), expected);
        assert_eq!(expected.to_name().unwrap(), expected);
        assert_eq!((&expected).to_name().unwrap(), expected);
        assert!("Not Valid".to_name().is_err());
    }

    #[test]
    fn test_to_symbol_code_variants() {
        let eos = SymbolCode::new("EOS").unwrap();
        assert_eq!("EOS".to_symbol_code().unwrap(), eos);
        assert_eq!(Symbol::system().to_symbol_code().unwrap(), eos);
        assert!("eos".to_symbol_code().is_err());
    }

    #[test]
    fn test_resolve_number() {
        let asset = AmountInput::from(10_000_000u32).resolve(Symbol::system()).unwrap();
        assert_eq!(asset.to_string(), "10000000.0000 EOS");

        let err = AmountInput::from(f64::NAN).resolve(Symbol::system()).unwrap_err();
        assert!(matches!(err, TokenError::InvalidAssetQuantity { .. }));
    }

    #[test]
    fn test_resolve_integer_is_exact() {
        let asset = AmountInput::from(-3i64).resolve(Symbol::system()).unwrap();
        assert_eq!(asset.to_string(), "-3.0000 EOS");
    }

    #[test]
    fn test_resolve_text() {
        let bare = AmountInput::from("1.32").resolve(Symbol::system()).unwrap();
        assert_eq!(bare.to_string(), "1.3200 EOS");

        let full = AmountInput::from("5.000 TKN").resolve(Symbol::system()).unwrap();
        assert_eq!(full.symbol().to_string(), "3,TKN");

        for bad in ["", "   ", "1.32.1", "1.00001", "1.0000 eos", "lots"] {
            let err = AmountInput::from(bad).resolve(Symbol::system()).unwrap_err();
            assert!(matches!(err, TokenError::InvalidAssetQuantity { .. }), "{bad}");
        }
    }

    #[test]
    fn test_resolve_quantity_passthrough() {
        let asset: Asset = "0.0001 EOS".parse().unwrap();
        assert_eq!(AmountInput::from(&asset).resolve(Symbol::system()).unwrap(), asset);
    }
}
