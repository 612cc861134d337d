//! # tokend Testing Infrastructure
//!
//! Testing utilities for the tokend workspace:
//! - [`MemoryContract`], an offline contract binding with call counters
//! - Edge case inputs for names, symbols and amounts
//! - Property-based testing strategies
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tokend_testing::*;
//!
//! let contract = MemoryContract::system_token()
//!     .with_balance(fixtures::holder(), fixtures::eos("1.0000"));
//!
//! proptest! {
//!     #[test]
//!     fn test_transfer_round_trip(from in valid_name(), quantity in valid_asset()) {
//!         // ...
//!     }
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod memory;

pub use memory::{MemoryContract, MemoryTable};

use proptest::prelude::*;
use tokend_types::{Asset, Name, Symbol, SymbolCode, MAX_AMOUNT};

// ============================================================================
// Edge Case Names
// ============================================================================

/// Edge case account names
pub struct EdgeCaseNames;

impl EdgeCaseNames {
    /// Longest name whose 13th character is still legal
    pub const MAX_LENGTH: &'static str = "zzzzzzzzzzzzj";

    /// Single character
    pub const SINGLE_CHAR: &'static str = "a";

    /// Name containing a dot
    pub const DOTTED: &'static str = "eosio.token";

    /// Names that must parse
    pub fn valid() -> Vec<&'static str> {
        vec![
            "",
            Self::SINGLE_CHAR,
            Self::DOTTED,
            Self::MAX_LENGTH,
            "teamgreymass",
            "111111111111",
            "a.b.c",
        ]
    }

    /// Names that must be rejected
    pub fn invalid() -> Vec<&'static str> {
        vec![
            "Alice",          // Uppercase
            "toolongname1234", // Over 13 characters
            "zzzzzzzzzzzzz",  // 13th character out of range
            "bad!",           // Illegal character
            "alice6",         // Digit outside 1-5
            "trailing.",      // Trailing dot
            "has space",      // Whitespace
        ]
    }
}

// ============================================================================
// Edge Case Symbols
// ============================================================================

/// Edge case symbol codes and symbols
pub struct EdgeCaseSymbols;

impl EdgeCaseSymbols {
    /// Symbol codes that must parse
    pub fn valid_codes() -> Vec<&'static str> {
        vec!["A", "EOS", "TKN", "ABCDEFG"]
    }

    /// Symbol codes that must be rejected
    pub fn invalid_codes() -> Vec<&'static str> {
        vec!["", "eos", "ABCDEFGH", "EO5", "E S", "€UR"]
    }

    /// Symbols that must be rejected
    pub fn invalid_symbols() -> Vec<&'static str> {
        vec!["", "EOS", "4,", ",EOS", "19,EOS", "-1,EOS", "4,eos", "4 EOS"]
    }
}

// ============================================================================
// Edge Case Amounts
// ============================================================================

/// Edge case asset quantities
pub struct EdgeCaseAmounts;

impl EdgeCaseAmounts {
    /// Largest representable amount in units
    pub const MAX_UNITS: i64 = MAX_AMOUNT;

    /// Asset strings that must parse
    pub fn valid() -> Vec<&'static str> {
        vec![
            "0 EOS",
            "0.0000 EOS",
            "1.0000 EOS",
            "-1.0000 EOS",
            "0.0001 EOS",
            "461168601842738.7903 EOS",
            "1 TKN",
        ]
    }

    /// Asset strings that must be rejected
    pub fn invalid() -> Vec<&'static str> {
        vec![
            "",
            "1.0000",
            "EOS",
            "1.0000 eos",
            "1.00.00 EOS",
            "abc EOS",
            "461168601842738.7904 EOS", // One unit over the limit
            "+-1 EOS",
        ]
    }
}

// ============================================================================
// Property-Based Testing Strategies
// ============================================================================

/// Generates valid account names of 1 to 12 characters
pub fn valid_name() -> impl Strategy<Value = Name> {
    "[a-z1-5]([a-z1-5.]{0,10}[a-z1-5])?".prop_filter_map("valid name", |s| Name::new(&s).ok())
}

/// Generates valid symbol codes
pub fn valid_symbol_code() -> impl Strategy<Value = SymbolCode> {
    "[A-Z]{1,7}".prop_filter_map("valid symbol code", |s| SymbolCode::new(&s).ok())
}

/// Generates symbols with precision 0 to 8
pub fn valid_symbol() -> impl Strategy<Value = Symbol> {
    (0u8..=8, valid_symbol_code())
        .prop_filter_map("valid symbol", |(precision, code)| {
            Symbol::new(precision, code).ok()
        })
}

/// Generates assets over the full amount range
pub fn valid_asset() -> impl Strategy<Value = Asset> {
    (-MAX_AMOUNT..=MAX_AMOUNT, valid_symbol())
        .prop_filter_map("valid asset", |(units, symbol)| {
            Asset::from_units(units, symbol).ok()
        })
}

/// Generates non-negative assets in the system symbol
pub fn system_asset() -> impl Strategy<Value = Asset> {
    (0..=MAX_AMOUNT).prop_filter_map("system asset", |units| {
        Asset::from_units(units, Symbol::system()).ok()
    })
}

/// Generates memos, including non-ASCII text
pub fn memo() -> impl Strategy<Value = String> {
    "\\PC{0,64}"
}

// ============================================================================
// Fixtures
// ============================================================================

/// Common values for facade tests
pub mod fixtures {
    use tokend_types::{Asset, Name, Symbol};

    /// `teamgreymass`
    pub fn holder() -> Name {
        Name::from_raw(0xCA8D_265D_5E91_B180)
    }

    /// `amount` (e.g. `"1.0000"`) in the system symbol
    ///
    /// # Panics
    ///
    /// Panics if `amount` is not a valid decimal at precision 4.
    pub fn eos(amount: &str) -> Asset {
        Asset::from_decimal(amount, Symbol::system()).expect("valid fixture amount")
    }

    /// Contract seeded with `teamgreymass` holding `1.0000 EOS` and `5.00 TKN`
    pub fn seeded_contract() -> crate::MemoryContract {
        let tkn: Asset = "5.00 TKN".parse().expect("valid fixture amount");
        crate::MemoryContract::system_token()
            .with_balance(holder(), eos("1.0000"))
            .with_balance(holder(), tkn)
    }
}

// ============================================================================
// Tests
// ============================================================================
