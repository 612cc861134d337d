//! # tokend Error
//!
//! Unified error types for the tokend token client. Every crate in the
//! workspace reports failures through [`TokenError`], so callers can match on
//! a single taxonomy whether the failure came from input parsing, the binary
//! codec, the chain API transport, or the token facade itself.
//!
//! ## Error Categories
//!
//! - Input normalization: [`TokenError::InvalidAccountName`],
//!   [`TokenError::InvalidSymbolCode`], [`TokenError::InvalidSymbol`],
//!   [`TokenError::InvalidAssetQuantity`]
//! - Balance lookups: [`TokenError::AccountNotFound`],
//!   [`TokenError::SymbolNotFound`], [`TokenError::BalanceFetchFailed`]
//! - Transport: [`TokenError::RpcConnectionError`],
//!   [`TokenError::RpcRequestError`], [`TokenError::ApiError`], ...
//!
//! ## Example
//!
//! ```
//! use tokend_error::{TokenError, Result};
//!
//! fn require_account(name: &str) -> Result<()> {
//!     if name.len() > 13 {
//!         return Err(TokenError::InvalidAccountName {
//!             name: name.to_string(),
//!             reason: "longer than 13 characters".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use thiserror::Error;

/// The main error type for tokend operations.
#[derive(Error, Debug)]
pub enum TokenError {
    // ============ Input Errors ============
    /// Account name does not follow the ledger's name encoding rules
    #[error("Invalid account name '{name}': {reason}")]
    InvalidAccountName {
        /// The rejected input
        name: String,
        /// Reason for invalidity
        reason: String,
    },

    /// Symbol code is not 1-7 uppercase letters
    #[error("Invalid symbol code '{code}': {reason}")]
    InvalidSymbolCode {
        /// The rejected input
        code: String,
        /// Reason for invalidity
        reason: String,
    },

    /// Symbol is not of the form `precision,CODE`
    #[error("Invalid symbol '{symbol}': {reason}")]
    InvalidSymbol {
        /// The rejected input
        symbol: String,
        /// Reason for invalidity
        reason: String,
    },

    /// Amount could not be turned into an asset quantity
    #[error("Invalid asset quantity '{input}': {reason}")]
    InvalidAssetQuantity {
        /// The rejected input
        input: String,
        /// Reason for invalidity
        reason: String,
    },

    /// Arithmetic across assets with different symbols
    #[error("Symbol mismatch: expected {expected}, got {got}")]
    SymbolMismatch {
        /// Symbol of the left operand
        expected: String,
        /// Symbol of the right operand
        got: String,
    },

    // ============ Balance Errors ============
    /// Balance table has no row for the account
    #[error("Account {account} does not exist.")]
    AccountNotFound {
        /// The requested account
        account: String,
    },

    /// Account has no balance row for the requested symbol
    #[error("Symbol '{symbol}' does not exist.")]
    SymbolNotFound {
        /// The requested symbol code
        symbol: String,
    },

    /// The balance query itself failed
    #[error("Failed to fetch balance for {account}: {source}")]
    BalanceFetchFailed {
        /// The requested account
        account: String,
        /// Underlying transport or decoding failure
        source: Box<TokenError>,
    },

    // ============ Codec Errors ============
    /// Binary ABI encoding/decoding error
    #[error("ABI error: {0}")]
    AbiError(String),

    /// JSON parse error
    #[error("JSON error: {0}")]
    JsonError(String),

    // ============ Network Errors ============
    /// Connection to the chain API failed
    #[error("RPC connection failed: {url} - {reason}")]
    RpcConnectionError {
        /// Endpoint URL
        url: String,
        /// Error reason
        reason: String,
    },

    /// Chain API answered with a non-success HTTP status
    #[error("RPC request failed: {endpoint} ({status}) - {reason}")]
    RpcRequestError {
        /// API path, e.g. `/v1/chain/get_table_rows`
        endpoint: String,
        /// HTTP status code
        status: u16,
        /// Error reason
        reason: String,
    },

    /// Chain API returned a structured error body
    #[error("API error {code} ({name}): {message}")]
    ApiError {
        /// Chain error code, e.g. 3050003
        code: i64,
        /// Chain error name, e.g. `eosio_assert_message_exception`
        name: String,
        /// Human readable detail
        message: String,
    },

    /// Network timeout
    #[error("Network timeout after {seconds}s")]
    NetworkTimeout {
        /// Timeout duration
        seconds: u64,
    },

    /// Rate limited by provider
    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited {
        /// Suggested retry delay
        retry_after_secs: u64,
    },

    // ============ Configuration ============
    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// File IO error
    #[error("IO error: {0}")]
    IoError(String),
}

/// Convenient Result type using TokenError
pub type Result<T> = std::result::Result<T, TokenError>;

// ============ From implementations for common error types ============

impl From<std::io::Error> for TokenError {
    fn from(err: std::io::Error) -> Self {
        TokenError::IoError(err.to_string())
    }
}

impl From<std::string::FromUtf8Error> for TokenError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        TokenError::AbiError(format!("invalid utf-8: {err}"))
    }
}

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u32)]
pub enum ErrorCode {
    /// Unknown error
    Unknown = 0,
    /// Invalid account name
    InvalidAccountName = 1001,
    /// Invalid symbol code
    InvalidSymbolCode = 1002,
    /// Invalid symbol
    InvalidSymbol = 1003,
    /// Invalid asset quantity
    InvalidAssetQuantity = 1004,
    /// Symbol mismatch in arithmetic
    SymbolMismatch = 1005,
    /// Account not found
    AccountNotFound = 2001,
    /// Symbol not found
    SymbolNotFound = 2002,
    /// Balance fetch failed
    BalanceFetchFailed = 2003,
    /// ABI codec error
    AbiError = 3001,
    /// JSON decoding error
    DecodeError = 3002,
    /// RPC connection error
    RpcConnectionError = 4001,
    /// RPC request error
    RpcRequestError = 4002,
    /// Network timeout
    NetworkTimeout = 4003,
    /// Rate limited
    RateLimited = 4004,
    /// Structured chain API error
    ApiError = 5001,
    /// Configuration error
    ConfigError = 6001,
}

impl TokenError {
    /// Returns the error code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            TokenError::InvalidAccountName { .. } => ErrorCode::InvalidAccountName,
            TokenError::InvalidSymbolCode { .. } => ErrorCode::InvalidSymbolCode,
            TokenError::InvalidSymbol { .. } => ErrorCode::InvalidSymbol,
            TokenError::InvalidAssetQuantity { .. } => ErrorCode::InvalidAssetQuantity,
            TokenError::SymbolMismatch { .. } => ErrorCode::SymbolMismatch,
            TokenError::AccountNotFound { .. } => ErrorCode::AccountNotFound,
            TokenError::SymbolNotFound { .. } => ErrorCode::SymbolNotFound,
            TokenError::BalanceFetchFailed { .. } => ErrorCode::BalanceFetchFailed,
            TokenError::AbiError(_) => ErrorCode::AbiError,
            TokenError::JsonError(_) => ErrorCode::DecodeError,
            TokenError::RpcConnectionError { .. } => ErrorCode::RpcConnectionError,
            TokenError::RpcRequestError { .. } => ErrorCode::RpcRequestError,
            TokenError::NetworkTimeout { .. } => ErrorCode::NetworkTimeout,
            TokenError::RateLimited { .. } => ErrorCode::RateLimited,
            TokenError::ApiError { .. } => ErrorCode::ApiError,
            TokenError::ConfigError(_) => ErrorCode::ConfigError,
            _ => ErrorCode::Unknown,
        }
    }

    /// Returns true if this error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            TokenError::NetworkTimeout { .. }
            | TokenError::RateLimited { .. }
            | TokenError::RpcConnectionError { .. } => true,
            TokenError::RpcRequestError { status, .. } => *status >= 500,
            TokenError::BalanceFetchFailed { source, .. } => source.is_retryable(),
            _ => false,
        }
    }

    /// Returns suggested retry delay in seconds, if applicable
    pub fn retry_after(&self) -> Option<u64> {
        match self {
            TokenError::RateLimited { retry_after_secs } => Some(*retry_after_secs),
            TokenError::NetworkTimeout { seconds } => Some(*seconds / 2),
            TokenError::BalanceFetchFailed { source, .. } => source.retry_after(),
            _ if self.is_retryable() => Some(5),
            _ => None,
        }
    }

    /// Wraps a balance query failure, naming the account it was for
    pub fn balance_fetch_failed(account: impl Into<String>, source: TokenError) -> Self {
        TokenError::BalanceFetchFailed {
            account: account.into(),
            source: Box::new(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_error_display() {
        let err = TokenError::InvalidAccountName {
            name: "Bad.Name".to_string(),
            reason: "uppercase characters".to_string(),
        };
        assert!(err.to_string().contains("Bad.Name"));
        assert!(err.to_string().contains("uppercase"));
    }

    #[test]
    fn test_balance_messages() {
        let err = TokenError::AccountNotFound {
            account: "notanaccount".to_string(),
        };
        assert_eq!(err.to_string(), "Account notanaccount does not exist.");

        let err = TokenError::SymbolNotFound {
            symbol: "NOT".to_string(),
        };
        assert_eq!(err.to_string(), "Symbol 'NOT' does not exist.");
    }

    #[test]
    fn test_balance_fetch_failed_keeps_source() {
        let cause = TokenError::RpcConnectionError {
            url: "https://jungle4.greymass.com".into(),
            reason: "connection refused".into(),
        };
        let err = TokenError::balance_fetch_failed("teamgreymass", cause);

        assert!(err.to_string().starts_with("Failed to fetch balance for teamgreymass:"));
        assert!(err.to_string().contains("connection refused"));
        let source = err.source().expect("source should be set");
        assert!(source.to_string().contains("RPC connection failed"));
        assert_eq!(err.code(), ErrorCode::BalanceFetchFailed);
    }

    #[test]
    fn test_error_code() {
        let err = TokenError::SymbolNotFound { symbol: "NOT".into() };
        assert_eq!(err.code(), ErrorCode::SymbolNotFound);
        assert_eq!(err.code() as u32, 2002);
    }

    #[test]
    fn test_retryable() {
        let timeout = TokenError::NetworkTimeout { seconds: 30 };
        assert!(timeout.is_retryable());
        assert_eq!(timeout.retry_after(), Some(15));

        let rate_limit = TokenError::RateLimited { retry_after_secs: 60 };
        assert!(rate_limit.is_retryable());
        assert_eq!(rate_limit.retry_after(), Some(60));

        let server = TokenError::RpcRequestError {
            endpoint: "/v1/chain/get_table_rows".into(),
            status: 502,
            reason: "bad gateway".into(),
        };
        assert!(server.is_retryable());

        let client = TokenError::RpcRequestError {
            endpoint: "/v1/chain/get_table_rows".into(),
            status: 400,
            reason: "bad request".into(),
        };
        assert!(!client.is_retryable());

        let missing = TokenError::AccountNotFound { account: "x".into() };
        assert!(!missing.is_retryable());
        assert_eq!(missing.retry_after(), None);
    }

    #[test]
    fn test_wrapped_retryable_follows_source() {
        let wrapped = TokenError::balance_fetch_failed(
            "teamgreymass",
            TokenError::NetworkTimeout { seconds: 10 },
        );
        assert!(wrapped.is_retryable());
        assert_eq!(wrapped.retry_after(), Some(5));

        let wrapped = TokenError::balance_fetch_failed(
            "teamgreymass",
            TokenError::AbiError("truncated".into()),
        );
        assert!(!wrapped.is_retryable());
    }

    #[test]
    fn test_foreign_conversions() {
        let io: TokenError = std::io::Error::new(std::io::ErrorKind::NotFound, "missing").into();
        assert!(matches!(io, TokenError::IoError(ref m) if m.contains("missing")));
        assert_eq!(io.code(), ErrorCode::Unknown);

        let utf8: TokenError = String::from_utf8(vec![0xff]).unwrap_err().into();
        assert!(matches!(utf8, TokenError::AbiError(ref m) if m.starts_with("invalid utf-8")));
    }
}
