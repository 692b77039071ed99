//! Ledger access: read-only JSON-RPC queries against the NEAR-style node

pub mod rpc;

pub use rpc::{JsonRpcLedgerClient, LedgerQuery};

use crate::common::{GatewayError, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Base64 encoding of view-call arguments, as `call_function` expects them
pub fn encode_view_args(args: &serde_json::Value) -> String {
    STANDARD.encode(args.to_string())
}

/// Check caller-supplied base64 arguments before they reach the node
pub fn check_view_args(args_base64: &str) -> Result<()> {
    STANDARD
        .decode(args_base64)
        .map(|_| ())
        .map_err(|e| GatewayError::malformed("args", format!("not base64: {}", e)))
}
