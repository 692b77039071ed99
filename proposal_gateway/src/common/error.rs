//! Error taxonomy shared by the ledger client, the payload builders and the
//! HTTP layer.

use std::time::Duration;
use thiserror::Error;

/// Errors raised while building proposal and project transactions
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Transport or protocol failure talking to the ledger RPC
    #[error("ledger RPC unavailable: {0}")]
    RpcUnavailable(String),

    /// The ledger has no access key for the signer
    #[error("access key {public_key} not found for account {account_id}")]
    AccountOrKeyNotFound {
        account_id: String,
        public_key: String,
    },

    /// Ledger response bytes that are not the expected UTF-8/JSON/base58
    #[error("invalid view result: {0}")]
    InvalidViewResult(String),

    /// A request parameter failed percent-decoding or is missing
    #[error("malformed parameter `{field}`: {reason}")]
    MalformedParameter { field: String, reason: String },

    /// The caller cancelled the composition before both queries resolved
    #[error("transaction composition cancelled")]
    Cancelled,

    /// Ledger queries did not resolve within the composition deadline
    #[error("ledger queries exceeded the {0:?} deadline")]
    DeadlineExceeded(Duration),

    /// Draft generation service failure
    #[error("draft generation failed: {0}")]
    Upstream(String),

    /// Start-up configuration failure
    #[error("configuration error: {0}")]
    Config(String),
}

impl GatewayError {
    pub fn malformed(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedParameter {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<::config::ConfigError> for GatewayError {
    fn from(err: ::config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, GatewayError>;
