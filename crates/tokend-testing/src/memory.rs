//! In-memory [`ContractBinding`] for exercising the token facade offline.

use async_trait::async_trait;
use dashmap::DashMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokend_error::{Result, TokenError};
use tokend_types::{
    AbiEncode, Action, ActionOptions, Asset, ContractBinding, Name, QueryOptions, TableHandle,
    ToName,
};

/// `eosio.token`
const SYSTEM_TOKEN: Name = Name::from_raw(0x5530_EA03_3482_A600);

/// `accounts`
const ACCOUNTS: Name = Name::from_raw(0x3211_4D4F_3800_0000);

type Rows = DashMap<(Name, Name), Vec<(String, serde_json::Value)>>;

#[derive(Debug, Default)]
struct Counters {
    actions: AtomicUsize,
    tables: AtomicUsize,
    queries: AtomicUsize,
}

/// Contract binding backed by an in-memory row store.
///
/// Rows are kept per `(table, scope)` in insertion order, each under a string
/// key matched by [`TableHandle::get`]. Clones share storage and counters.
#[derive(Debug, Clone)]
pub struct MemoryContract {
    account: Name,
    rows: Arc<Rows>,
    offline: Arc<AtomicBool>,
    counters: Arc<Counters>,
}

impl Default for MemoryContract {
    fn default() -> Self {
        Self::new(SYSTEM_TOKEN)
    }
}

impl MemoryContract {
    /// Empty contract at `account`
    pub fn new(account: Name) -> Self {
        Self {
            account,
            rows: Arc::new(DashMap::new()),
            offline: Arc::new(AtomicBool::new(false)),
            counters: Arc::new(Counters::default()),
        }
    }

    /// Empty `eosio.token` contract
    pub fn system_token() -> Self {
        Self::default()
    }

    /// Adds an `accounts` row for `holder`, keyed by the balance's symbol code
    pub fn with_balance(self, holder: Name, balance: Asset) -> Self {
        self.rows
            .entry((ACCOUNTS, holder))
            .or_default()
            .push((balance.code().to_string(), serde_json::json!({ "balance": balance })));
        self
    }

    /// Stores `row` under `key` in `table`/`scope`
    pub fn insert_row<T: Serialize>(
        &self,
        table: impl ToName,
        scope: Name,
        key: impl Into<String>,
        row: &T,
    ) -> Result<()> {
        let row = serde_json::to_value(row).map_err(|e| TokenError::JsonError(e.to_string()))?;
        self.rows
            .entry((table.to_name()?, scope))
            .or_default()
            .push((key.into(), row));
        Ok(())
    }

    /// Makes every table query fail with a connection error
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of actions built
    pub fn action_count(&self) -> usize {
        self.counters.actions.load(Ordering::SeqCst)
    }

    /// Number of tables opened
    pub fn table_count(&self) -> usize {
        self.counters.tables.load(Ordering::SeqCst)
    }

    /// Number of row queries made
    pub fn query_count(&self) -> usize {
        self.counters.queries.load(Ordering::SeqCst)
    }

    /// Total binding calls of any kind
    pub fn call_count(&self) -> usize {
        self.action_count() + self.table_count() + self.query_count()
    }
}

#[async_trait]
impl ContractBinding for MemoryContract {
    type Table = MemoryTable;

    fn account(&self) -> Name {
        self.account
    }

    async fn action_with<T>(&self, name: &str, data: &T, options: ActionOptions) -> Result<Action>
    where
        T: AbiEncode + Sync + ?Sized,
    {
        self.counters.actions.fetch_add(1, Ordering::SeqCst);
        Ok(Action::new(
            self.account,
            name.to_name()?,
            options.resolved_authorization(),
            data,
        ))
    }

    fn table(&self, table: &str, scope: Name) -> Result<MemoryTable> {
        self.counters.tables.fetch_add(1, Ordering::SeqCst);
        Ok(MemoryTable {
            table: table.to_name()?,
            scope,
            contract: self.clone(),
        })
    }
}

/// One scope of a [`MemoryContract`] table
#[derive(Debug, Clone)]
pub struct MemoryTable {
    table: Name,
    scope: Name,
    contract: MemoryContract,
}

impl MemoryTable {
    fn lookup<R, F>(&self, pick: F) -> Result<Option<R>>
    where
        R: DeserializeOwned,
        F: Fn(&(String, serde_json::Value)) -> bool,
    {
        self.contract.counters.queries.fetch_add(1, Ordering::SeqCst);
        if self.contract.offline.load(Ordering::SeqCst) {
            return Err(TokenError::RpcConnectionError {
                url: "memory://".to_string(),
                reason: "contract is offline".to_string(),
            });
        }

        let row = self
            .contract
            .rows
            .get(&(self.table, self.scope))
            .and_then(|rows| rows.iter().find(|r| pick(r)).map(|(_, v)| v.clone()));

        row.map(|value| {
            serde_json::from_value(value)
                .map_err(|e| TokenError::AbiError(format!("malformed {} row: {}", self.table, e)))
        })
        .transpose()
    }
}

#[async_trait]
impl TableHandle for MemoryTable {
    async fn first<R>(&self) -> Result<Option<R>>
    where
        R: DeserializeOwned + Send,
    {
        self.lookup(|_| true)
    }

    async fn get<R>(&self, key: &str, _options: QueryOptions) -> Result<Option<R>>
    where
        R: DeserializeOwned + Send,
    {
        self.lookup(|(k, _)| k == key)
    }
}
