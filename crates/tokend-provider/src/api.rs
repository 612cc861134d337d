//! Request and response shapes of the chain API (`/v1/chain/*`).

use serde::{Deserialize, Serialize};
use tokend_types::{IndexPosition, Name};

/// `POST /v1/chain/get_info`
pub const GET_INFO: &str = "/v1/chain/get_info";

/// `POST /v1/chain/get_table_rows`
pub const GET_TABLE_ROWS: &str = "/v1/chain/get_table_rows";

/// Response of `get_info`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetInfo {
    /// Node software version
    #[serde(default)]
    pub server_version: String,
    /// Chain ID as hex
    pub chain_id: String,
    /// Head block number
    pub head_block_num: u32,
    /// Last irreversible block number
    pub last_irreversible_block_num: u32,
    /// Head block ID as hex
    #[serde(default)]
    pub head_block_id: String,
    /// Head block timestamp
    #[serde(default)]
    pub head_block_time: String,
    /// Producer of the head block
    #[serde(default)]
    pub head_block_producer: Option<Name>,
}

/// Request body of `get_table_rows`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GetTableRowsParams {
    /// Contract account owning the table
    pub code: Name,
    /// Table scope
    pub scope: String,
    /// Table name
    pub table: Name,
    /// Ask the node to decode rows to JSON
    pub json: bool,
    /// Maximum rows to return
    pub limit: u32,
    /// Inclusive lower bound on the chosen index
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lower_bound: Option<String>,
    /// Inclusive upper bound on the chosen index
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upper_bound: Option<String>,
    /// Index to search
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_position: Option<IndexPosition>,
    /// Key type hint for the bounds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_type: Option<String>,
}

impl GetTableRowsParams {
    /// Rows of `table` in `scope` of contract `code`, JSON decoded
    pub fn new(code: Name, scope: impl Into<String>, table: Name) -> Self {
        Self {
            code,
            scope: scope.into(),
            table,
            json: true,
            limit: 10,
            lower_bound: None,
            upper_bound: None,
            index_position: None,
            key_type: None,
        }
    }

    /// Sets the row limit
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// Restricts the query to exactly `key`
    pub fn key(mut self, key: impl Into<String>) -> Self {
        let key = key.into();
        self.lower_bound = Some(key.clone());
        self.upper_bound = Some(key);
        self
    }

    /// Sets the index to search
    pub fn index_position(mut self, index: IndexPosition) -> Self {
        self.index_position = Some(index);
        self
    }

    /// Sets the key type hint
    pub fn key_type(mut self, key_type: Option<String>) -> Self {
        self.key_type = key_type;
        self
    }
}

/// Response of `get_table_rows`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TableRows<T = serde_json::Value> {
    /// Returned rows
    pub rows: Vec<T>,
    /// Whether more rows follow
    #[serde(default)]
    pub more: bool,
    /// Key to continue from when `more` is set
    #[serde(default)]
    pub next_key: String,
}

/// Error body returned by nodes on failure
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    /// HTTP-ish code, usually 500
    pub code: i64,
    /// Short message, e.g. "Internal Service Error"
    pub message: String,
    /// Structured chain error
    pub error: ApiErrorDetail,
}

/// Structured part of [`ApiErrorBody`]
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorDetail {
    /// Chain error code
    pub code: i64,
    /// Chain error name
    pub name: String,
    /// Error summary
    #[serde(default)]
    pub what: String,
    /// Individual messages
    #[serde(default)]
    pub details: Vec<ApiErrorMessage>,
}

/// One entry of [`ApiErrorDetail::details`]
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorMessage {
    /// Message text
    pub message: String,
}

impl ApiErrorBody {
    /// Most specific human readable message in the body
    pub fn best_message(&self) -> String {
        self.error
            .details
            .first()
            .map(|d| d.message.clone())
            .filter(|m| !m.is_empty())
            .or_else(|| Some(self.error.what.clone()).filter(|w| !w.is_empty()))
            .unwrap_or_else(|| self.message.clone())
    }
}
