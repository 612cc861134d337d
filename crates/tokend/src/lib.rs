//! # tokend - Antelope Token Client
//!
//! A small client-side facade for fungible-token contracts on Antelope
//! (EOSIO) chains. [`Token`] does two things:
//!
//! - builds unsigned `transfer` actions, ready for a signer
//! - reads an account's balance from the contract's `accounts` table
//!
//! Signing, broadcasting and confirmation are out of scope.
//!
//! ## Crates
//!
//! | Crate | Contents |
//! |-------|----------|
//! | [`types`] | `Name`, `Symbol`, `Asset`, `Action`, the binary codec and the binding traits |
//! | [`provider`] | `ChainApi`, the HTTP chain API client |
//! | [`contract`] | `Contract`, the binding over `ChainApi`, and `eosio.token` types |
//! | [`error`] | `TokenError` |
//!
//! ## Example
//!
//! ```ignore
//! use tokend::prelude::*;
//!
//! let token = Token::from_config(&TokenConfig::jungle4())?;
//!
//! let balance = token.balance("teamgreymass", None).await?;
//! println!("{balance}");
//!
//! let action = token
//!     .transfer("teamgreymass", "alice", 1.32, Some("thanks"))
//!     .await?;
//! assert_eq!(action.name.to_string(), "transfer");
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
mod token;

pub use config::{TokenConfig, CONFIG_FILE};
pub use token::Token;

pub use tokend_contract as contract;
pub use tokend_error as error;
pub use tokend_provider as provider;
pub use tokend_types as types;

pub use tokend_error::{Result, TokenError};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{Token, TokenConfig};
    pub use tokend_contract::system_token::{Account, Transfer};
    pub use tokend_contract::Contract;
    pub use tokend_error::{Result, TokenError};
    pub use tokend_provider::{presets, ChainApi, ProviderConfig};
    pub use tokend_types::prelude::*;
}

/// Version information
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }

    #[test]
    fn test_prelude_imports() {
        use crate::prelude::*;
        let _config = TokenConfig::default();
        let _symbol = Symbol::system();
    }
}
