//! The token facade.

use std::sync::Arc;
use tokend_contract::system_token::{Account, Transfer, ACCOUNTS, TRANSFER};
use tokend_contract::Contract;
use tokend_error::{Result, TokenError};
use tokend_provider::ChainApi;
use tokend_types::{
    Action, AmountInput, Asset, ContractBinding, Name, QueryOptions, Symbol, SymbolCode,
    TableHandle, ToName, ToSymbolCode,
};

use crate::config::TokenConfig;

/// Builds transfers for, and reads balances from, one token contract.
///
/// Holds a [`ContractBinding`] and the symbol that bare numeric amounts are
/// expressed in. No state is kept between calls.
#[derive(Debug, Clone)]
pub struct Token<C = Contract> {
    contract: C,
    symbol: Symbol,
}

impl Token<Contract> {
    /// `eosio.token` reached through `api`, amounts in `4,EOS`
    pub fn new(api: Arc<ChainApi>) -> Self {
        Self::with_contract(Contract::system_token(api), Symbol::system())
    }

    /// Builds the chain API client and contract binding from configuration
    pub fn from_config(config: &TokenConfig) -> Result<Self> {
        config.validate()?;
        let api = ChainApi::with_config(config.provider_config())?;
        let contract = Contract::new(config.contract.as_str(), Arc::new(api))?;
        Ok(Self::with_contract(contract, config.symbol()?))
    }
}

impl<C: ContractBinding> Token<C> {
    /// Facade over any contract binding
    pub fn with_contract(contract: C, symbol: Symbol) -> Self {
        Self { contract, symbol }
    }

    /// The contract binding
    pub fn contract(&self) -> &C {
        &self.contract
    }

    /// Symbol used for amounts given without one
    pub fn symbol(&self) -> Symbol {
        self.symbol
    }

    /// Builds an unsigned `transfer` action.
    ///
    /// Names and the amount are validated before the binding is touched. A
    /// missing memo is sent as the empty string. Errors from the binding are
    /// returned as they are.
    pub async fn transfer(
        &self,
        from: impl ToName,
        to: impl ToName,
        amount: impl Into<AmountInput>,
        memo: Option<&str>,
    ) -> Result<Action> {
        let from = from.to_name()?;
        let to = to.to_name()?;
        let quantity = amount.into().resolve(self.symbol)?;
        let transfer = Transfer::new(from, to, quantity, memo.unwrap_or_default());

        tracing::debug!(
            contract = %self.contract.account(),
            %from,
            %to,
            %quantity,
            "building transfer"
        );
        self.contract.action(TRANSFER, &transfer).await
    }

    /// Reads the balance of `account`.
    ///
    /// Without `symbol` the first row of the account's balances is returned.
    /// With `symbol` only that token's row is considered.
    ///
    /// # Errors
    ///
    /// - `AccountNotFound` when no symbol was given and the account has no rows
    /// - `SymbolNotFound` when the requested symbol has no row
    /// - `BalanceFetchFailed` wrapping any failure of the lookup itself
    pub async fn balance(&self, account: impl ToName, symbol: Option<SymbolCode>) -> Result<Asset> {
        let account = account.to_name()?;
        tracing::debug!(
            contract = %self.contract.account(),
            %account,
            symbol = ?symbol.map(|s| s.to_string()),
            "fetching balance"
        );

        let row = self
            .balance_row(account, symbol)
            .await
            .map_err(|e| TokenError::balance_fetch_failed(account.to_string(), e))?;

        match (row, symbol) {
            (None, None) => Err(TokenError::AccountNotFound {
                account: account.to_string(),
            }),
            (None, Some(code)) => Err(TokenError::SymbolNotFound {
                symbol: code.to_string(),
            }),
            (Some(row), Some(code)) if row.balance.code() != code => {
                Err(TokenError::SymbolNotFound {
                    symbol: code.to_string(),
                })
            }
            (Some(row), _) => Ok(row.balance),
        }
    }

    /// [`Token::balance`] with a symbol code parsed from `symbol`
    pub async fn balance_of(
        &self,
        account: impl ToName,
        symbol: impl ToSymbolCode,
    ) -> Result<Asset> {
        let symbol = symbol.to_symbol_code()?;
        self.balance(account, Some(symbol)).await
    }

    async fn balance_row(
        &self,
        account: Name,
        symbol: Option<SymbolCode>,
    ) -> Result<Option<Account>> {
        let table = self.contract.table(ACCOUNTS, account)?;
        match symbol {
            Some(code) => table.get(&code.to_string(), QueryOptions::primary()).await,
            None => table.first().await,
        }
    }
}
