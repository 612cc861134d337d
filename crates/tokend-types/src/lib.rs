//! # tokend Types
//!
//! Ledger primitives and the contract binding seam for the tokend token
//! client.
//!
//! ## Core Types
//!
//! - [`Name`] - 64-bit encoded account and action names
//! - [`SymbolCode`] / [`Symbol`] - currency codes with precision
//! - [`Asset`] - signed fixed-point token quantities
//! - [`Action`] - an unsigned, binary-encoded contract action
//!
//! ## Traits
//!
//! - [`ContractBinding`] - builds actions and opens tables for one contract
//! - [`TableHandle`] - reads rows from a scoped table
//! - [`AbiEncode`] / [`AbiDecode`] - the ledger's binary format
//! - [`ToName`] / [`ToSymbolCode`] - validated input conversion
//!
//! ## Example
//!
//! ```
//! use tokend_types::prelude::*;
//!
//! let account: Name = "teamgreymass".parse().unwrap();
//! let quantity: Asset = "1.3200 EOS".parse().unwrap();
//! assert_eq!(quantity.symbol(), Symbol::system());
//! assert_eq!(account.to_string(), "teamgreymass");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod abi;
pub mod action;
pub mod asset;
pub mod binding;
pub mod input;
pub mod name;
pub mod symbol;

pub use abi::{AbiDecode, AbiEncode, Decoder, Encoder};
pub use action::{Action, ActionOptions, PermissionLevel};
pub use asset::{Asset, MAX_AMOUNT};
pub use binding::{ContractBinding, IndexPosition, QueryOptions, TableHandle};
pub use input::{AmountInput, ToName, ToSymbolCode};
pub use name::Name;
pub use symbol::{Symbol, SymbolCode};
pub use tokend_error::{Result, TokenError};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        AbiDecode, AbiEncode, Action, ActionOptions, AmountInput, Asset, ContractBinding,
        IndexPosition, Name, PermissionLevel, QueryOptions, Symbol, SymbolCode, TableHandle,
        ToName, ToSymbolCode,
    };
}

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_name_text_round_trip(s in "[a-z1-5]{1,12}") {
            let name = Name::new(&s).unwrap();
            prop_assert_eq!(name.to_string(), s);
        }

        #[test]
        fn test_asset_text_round_trip(
            units in -crate::MAX_AMOUNT..=crate::MAX_AMOUNT,
            precision in 0u8..=8,
        ) {
            let symbol = Symbol::new(precision, SymbolCode::new("TKN").unwrap()).unwrap();
            let asset = Asset::from_units(units, symbol).unwrap();
            let parsed: Asset = asset.to_string().parse().unwrap();
            prop_assert_eq!(parsed, asset);
        }
    }
}
