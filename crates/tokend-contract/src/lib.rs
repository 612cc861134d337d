//! # tokend Contract
//!
//! [`ContractBinding`] implementation backed by a node's chain API.
//!
//! Actions are built locally: the payload is binary encoded and the
//! authorization is left as a placeholder for the signer to fill in.
//! Table reads go through [`ChainApi::get_table_rows`] with JSON decoding
//! on the node side.
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use tokend_contract::{system_token::Account, Contract};
//! use tokend_provider::{presets, ChainApi};
//! use tokend_types::prelude::*;
//!
//! let api = Arc::new(ChainApi::with_config(presets::jungle4())?);
//! let token = Contract::system_token(api);
//! let accounts = token.table("accounts", "teamgreymass".parse()?)?;
//! let row: Option<Account> = accounts.get("EOS", QueryOptions::primary()).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod system_token;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokend_error::{Result, TokenError};
use tokend_provider::{ChainApi, GetTableRowsParams, TableRows};
use tokend_types::{
    AbiEncode, Action, ActionOptions, ContractBinding, Name, QueryOptions, TableHandle, ToName,
};

pub use system_token::SYSTEM_TOKEN_ACCOUNT;

/// A contract account reached through a [`ChainApi`]
#[derive(Debug, Clone)]
pub struct Contract {
    account: Name,
    api: Arc<ChainApi>,
}

impl Contract {
    /// Binds to the contract deployed at `account`
    pub fn new(account: impl ToName, api: Arc<ChainApi>) -> Result<Self> {
        Ok(Self {
            account: account.to_name()?,
            api,
        })
    }

    /// Binds to `eosio.token`
    pub fn system_token(api: Arc<ChainApi>) -> Self {
        Self {
            account: SYSTEM_TOKEN_ACCOUNT,
            api,
        }
    }

    /// The chain API this contract reads through
    pub fn api(&self) -> &Arc<ChainApi> {
        &self.api
    }
}

#[async_trait]
impl ContractBinding for Contract {
    type Table = Table;

    fn account(&self) -> Name {
        self.account
    }

    async fn action_with<T>(&self, name: &str, data: &T, options: ActionOptions) -> Result<Action>
    where
        T: AbiEncode + Sync + ?Sized,
    {
        let name = name.to_name()?;
        tracing::debug!(account = %self.account, action = %name, "building action");
        Ok(Action::new(
            self.account,
            name,
            options.resolved_authorization(),
            data,
        ))
    }

    fn table(&self, table: &str, scope: Name) -> Result<Table> {
        Ok(Table {
            code: self.account,
            table: table.to_name()?,
            scope,
            api: Arc::clone(&self.api),
        })
    }
}

/// One scope of a contract table
#[derive(Debug, Clone)]
pub struct Table {
    code: Name,
    table: Name,
    scope: Name,
    api: Arc<ChainApi>,
}

impl Table {
    /// Table name
    pub fn name(&self) -> Name {
        self.table
    }

    /// Scope the handle reads
    pub fn scope(&self) -> Name {
        self.scope
    }

    fn params(&self) -> GetTableRowsParams {
        GetTableRowsParams::new(self.code, self.scope.to_string(), self.table).limit(1)
    }

    async fn first_row<R>(&self, params: GetTableRowsParams) -> Result<Option<R>>
    where
        R: DeserializeOwned + Send,
    {
        let rows: TableRows = self.api.get_table_rows(&params).await?;
        rows.rows
            .into_iter()
            .next()
            .map(|row| {
                serde_json::from_value(row).map_err(|e| {
                    TokenError::AbiError(format!("malformed {} row: {}", self.table, e))
                })
            })
            .transpose()
    }
}

#[async_trait]
impl TableHandle for Table {
    async fn first<R>(&self) -> Result<Option<R>>
    where
        R: DeserializeOwned + Send,
    {
        tracing::debug!(table = %self.table, scope = %self.scope, "reading first row");
        self.first_row(self.params()).await
    }

    async fn get<R>(&self, key: &str, options: QueryOptions) -> Result<Option<R>>
    where
        R: DeserializeOwned + Send,
    {
        tracing::debug!(
            table = %self.table,
            scope = %self.scope,
            key,
            index = options.index_position.as_str(),
            "reading keyed row"
        );
        let params = self
            .params()
            .key(key)
            .index_position(options.index_position)
            .key_type(options.key_type);
        self.first_row(params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use system_token::{Account, Transfer, ACCOUNTS, TRANSFER};
    use tokend_provider::ProviderConfig;
    use tokend_types::{IndexPosition, PermissionLevel};
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn offline() -> Contract {
        let api = ChainApi::with_config(ProviderConfig::new("http://127.0.0.1:1")).unwrap();
        Contract::system_token(Arc::new(api))
    }

    fn bound(server: &MockServer) -> Contract {
        let config = ProviderConfig::new(server.uri()).without_rate_limit();
        Contract::system_token(Arc::new(ChainApi::with_config(config).unwrap()))
    }

    fn teamgreymass() -> Name {
        Name::new("teamgreymass").unwrap()
    }

    #[tokio::test]
    async fn test_action_building() {
        let contract = offline();
        let transfer = Transfer::new(
            Name::new("alice").unwrap(),
            Name::new("bob").unwrap(),
            "1.3200 EOS".parse().unwrap(),
            "",
        );
        let action = contract.action(TRANSFER, &transfer).await.unwrap();

        assert_eq!(action.account, SYSTEM_TOKEN_ACCOUNT);
        assert_eq!(action.name.to_string(), "transfer");
        assert_eq!(action.authorization, vec![PermissionLevel::placeholder()]);
        assert_eq!(action.decode_data::<Transfer>().unwrap(), transfer);
        // nothing was sent
        assert_eq!(contract.api().request_count(), 0);
    }

    #[tokio::test]
    async fn test_action_with_authorization() {
        let contract = offline();
        let auth = PermissionLevel::new(Name::new("alice").unwrap(), Name::new("active").unwrap());
        let options = ActionOptions::default().authorize(auth);
        let action = contract.action_with(TRANSFER, &0u64, options).await.unwrap();
        assert_eq!(action.authorization, vec![auth]);

        assert!(matches!(
            contract.action("Transfer", &0u64).await,
            Err(TokenError::InvalidAccountName { .. })
        ));
    }

    #[tokio::test]
    async fn test_custom_contract_account() {
        let api = Arc::new(ChainApi::new("http://127.0.0.1:1").unwrap());
        let contract = Contract::new("tethertether", api).unwrap();
        assert_eq!(contract.account().to_string(), "tethertether");

        let table = contract.table(ACCOUNTS, teamgreymass()).unwrap();
        assert_eq!(table.name().to_string(), "accounts");
        assert_eq!(table.scope(), teamgreymass());
    }

    #[tokio::test]
    async fn test_keyed_lookup() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chain/get_table_rows"))
            .and(body_partial_json(serde_json::json!({
                "code": "eosio.token",
                "scope": "teamgreymass",
                "table": "accounts",
                "limit": 1,
                "lower_bound": "EOS",
                "upper_bound": "EOS",
                "index_position": "primary",
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "rows": [{"balance": "2.5000 EOS"}],
                "more": false
            })))
            .expect(1)
            .mount(&server)
            .await;

        let contract = bound(&server);
        let table = contract.table(ACCOUNTS, teamgreymass()).unwrap();
        let row: Option<Account> = table.get("EOS", QueryOptions::primary()).await.unwrap();
        assert_eq!(row.unwrap().balance.to_string(), "2.5000 EOS");
    }

    #[tokio::test]
    async fn test_secondary_index_lookup() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(serde_json::json!({
                "index_position": "secondary",
                "key_type": "name",
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"rows": []})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let contract = bound(&server);
        let table = contract.table(ACCOUNTS, teamgreymass()).unwrap();
        let options = QueryOptions::index(IndexPosition::Secondary).with_key_type("name");
        let row: Option<Account> = table.get("alice", options).await.unwrap();
        assert!(row.is_none());
    }

    #[tokio::test]
    async fn test_first_row() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "rows": [{"balance": "1.0000 EOS"}, {"balance": "3 TKN"}],
                "more": true
            })))
            .mount(&server)
            .await;

        let contract = bound(&server);
        let table = contract.table(ACCOUNTS, teamgreymass()).unwrap();
        let row: Option<Account> = table.first().await.unwrap();
        assert_eq!(row.unwrap().balance.to_string(), "1.0000 EOS");
    }

    #[tokio::test]
    async fn test_malformed_row() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "rows": [{"amount": 12}]
            })))
            .mount(&server)
            .await;

        let contract = bound(&server);
        let table = contract.table(ACCOUNTS, teamgreymass()).unwrap();
        let err = table.first::<Account>().await.unwrap_err();
        assert!(matches!(err, TokenError::AbiError(ref m) if m.contains("accounts")));
    }

    #[tokio::test]
    async fn test_transport_failure_propagates() {
        let contract = offline();
        let table = contract.table(ACCOUNTS, teamgreymass()).unwrap();
        let err = table.first::<Account>().await.unwrap_err();
        assert!(matches!(err, TokenError::RpcConnectionError { .. }));
    }
}
