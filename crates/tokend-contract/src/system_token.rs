//! Actions and tables of the `eosio.token` contract.

use serde::{Deserialize, Serialize};
use tokend_types::{AbiDecode, AbiEncode, Asset, Decoder, Encoder, Name, Result};

/// `eosio.token`
pub const SYSTEM_TOKEN_ACCOUNT: Name = Name::from_raw(0x5530_EA03_3482_A600);

/// Transfer action name
pub const TRANSFER: &str = "transfer";

/// Balance table name, scoped by holder
pub const ACCOUNTS: &str = "accounts";

/// Payload of the `transfer` action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    /// Sender
    pub from: Name,
    /// Recipient
    pub to: Name,
    /// Amount moved
    pub quantity: Asset,
    /// Free-form note
    pub memo: String,
}

impl Transfer {
    /// Transfer of `quantity` from `from` to `to`
    pub fn new(from: Name, to: Name, quantity: Asset, memo: impl Into<String>) -> Self {
        Self {
            from,
            to,
            quantity,
            memo: memo.into(),
        }
    }
}

impl AbiEncode for Transfer {
    fn abi_encode(&self, encoder: &mut Encoder) {
        self.from.abi_encode(encoder);
        self.to.abi_encode(encoder);
        self.quantity.abi_encode(encoder);
        self.memo.abi_encode(encoder);
    }
}

impl AbiDecode for Transfer {
    fn abi_decode(decoder: &mut Decoder<'_>) -> Result<Self> {
        Ok(Self {
            from: Name::abi_decode(decoder)?,
            to: Name::abi_decode(decoder)?,
            quantity: Asset::abi_decode(decoder)?,
            memo: String::abi_decode(decoder)?,
        })
    }
}

/// Row of the `accounts` table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Holder's balance in one symbol
    pub balance: Asset,
}
