//! Seam between the token facade and whatever talks to the contract.

use crate::abi::AbiEncode;
use crate::action::{Action, ActionOptions};
use crate::name::Name;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokend_error::Result;

/// Which index of a table a keyed lookup goes through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexPosition {
    /// The table's primary key
    #[default]
    Primary,
    /// First secondary index
    Secondary,
    /// Second secondary index
    Tertiary,
    /// Third secondary index
    Fourth,
    /// Fourth secondary index
    Fifth,
    /// Fifth secondary index
    Sixth,
    /// Sixth secondary index
    Seventh,
    /// Seventh secondary index
    Eighth,
    /// Eighth secondary index
    Ninth,
    /// Ninth secondary index
    Tenth,
}

impl IndexPosition {
    /// Name used by the chain API
    pub fn as_str(&self) -> &'static str {
        match self {
            IndexPosition::Primary => "primary",
            IndexPosition::Secondary => "secondary",
            IndexPosition::Tertiary => "tertiary",
            IndexPosition::Fourth => "fourth",
            IndexPosition::Fifth => "fifth",
            IndexPosition::Sixth => "sixth",
            IndexPosition::Seventh => "seventh",
            IndexPosition::Eighth => "eighth",
            IndexPosition::Ninth => "ninth",
            IndexPosition::Tenth => "tenth",
        }
    }
}

/// Options for a keyed table lookup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryOptions {
    /// Index to search
    pub index_position: IndexPosition,
    /// Key type hint for the chain API (`name`, `i64`, `sha256`, ...)
    pub key_type: Option<String>,
}

impl QueryOptions {
    /// Lookup on the primary index
    pub fn primary() -> Self {
        Self::default()
    }

    /// Lookup on the given index
    pub fn index(index_position: IndexPosition) -> Self {
        Self {
            index_position,
            key_type: None,
        }
    }

    /// Sets the key type hint
    pub fn with_key_type(mut self, key_type: impl Into<String>) -> Self {
        self.key_type = Some(key_type.into());
        self
    }
}

/// A contract table scoped to one account
#[async_trait]
pub trait TableHandle: Send + Sync {
    /// Returns the first row of the scope, or `None` when the scope is empty
    async fn first<R>(&self) -> Result<Option<R>>
    where
        R: DeserializeOwned + Send;

    /// Returns the row matching `key` on the chosen index, or `None`
    async fn get<R>(&self, key: &str, options: QueryOptions) -> Result<Option<R>>
    where
        R: DeserializeOwned + Send;
}

/// Builds actions for, and reads tables of, one contract account.
///
/// Implementations own their transport. Building an action never touches
/// ledger state; table reads may go over the network.
#[async_trait]
pub trait ContractBinding: Send + Sync {
    /// Table handle type returned by [`ContractBinding::table`]
    type Table: TableHandle;

    /// The contract account
    fn account(&self) -> Name;

    /// Builds an unsigned action with placeholder authorization
    async fn action<T>(&self, name: &str, data: &T) -> Result<Action>
    where
        T: AbiEncode + Sync + ?Sized,
    {
        self.action_with(name, data, ActionOptions::default()).await
    }

    /// Builds an unsigned action with explicit options
    async fn action_with<T>(&self, name: &str, data: &T, options: ActionOptions) -> Result<Action>
    where
        T: AbiEncode + Sync + ?Sized;

    /// Opens `table` scoped to `scope`
    fn table(&self, table: &str, scope: Name) -> Result<Self::Table>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_position_names() {
        assert_eq!(IndexPosition::default(), IndexPosition::Primary);
        assert_eq!(IndexPosition::Primary.as_str(), "primary");
        assert_eq!(IndexPosition::Tenth.as_str(), "tenth");
        assert_eq!(
            serde_json::to_string(&IndexPosition::Secondary).unwrap(),
            "\"secondary\""
        );
    }

    #[test]
    fn test_query_options() {
        let options = QueryOptions::primary();
        assert_eq!(options.index_position, IndexPosition::Primary);
        assert!(options.key_type.is_none());

        let options = QueryOptions::index(IndexPosition::Secondary).with_key_type("name");
        assert_eq!(options.key_type.as_deref(), Some("name"));
    }
}
