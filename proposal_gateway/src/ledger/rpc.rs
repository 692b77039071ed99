//! JSON-RPC client for the ledger's `query` and `status` methods
//!
//! Every call is a single round-trip with no retries. Queries use optimistic
//! finality, so results may reflect state that is not yet final.

use crate::common::{GatewayError, Result};
use crate::transaction::{BlockReference, CryptoHash, Nonce};
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Read-only ledger queries needed to build a transaction
#[async_trait]
pub trait LedgerQuery: Send + Sync {
    /// Next usable nonce for the access key `(account_id, public_key)`
    async fn fetch_nonce(&self, account_id: &str, public_key: &str) -> Result<Nonce>;

    /// Most recent block known to the RPC node
    async fn fetch_latest_block(&self) -> Result<BlockReference>;

    /// Run a contract view method and parse its result as JSON
    async fn call_view(&self, account_id: &str, method_name: &str, args_base64: &str) -> Result<Value>;
}

const FINALITY: &str = "optimistic";

#[derive(Debug, Serialize)]
struct JsonRpcRequest<P> {
    jsonrpc: &'static str,
    id: &'static str,
    method: &'static str,
    params: P,
}

#[derive(Debug, Serialize)]
#[serde(tag = "request_type", rename_all = "snake_case")]
enum QueryRequest<'a> {
    ViewAccessKey {
        finality: &'static str,
        account_id: &'a str,
        public_key: &'a str,
    },
    CallFunction {
        finality: &'static str,
        account_id: &'a str,
        method_name: &'a str,
        args_base64: &'a str,
    },
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcError {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    cause: Option<ErrorCause>,
}

#[derive(Debug, Deserialize)]
struct ErrorCause {
    #[serde(default)]
    name: String,
}

impl JsonRpcError {
    fn is_unknown_key(&self) -> bool {
        matches!(
            self.cause.as_ref().map(|c| c.name.as_str()),
            Some("UNKNOWN_ACCESS_KEY") | Some("UNKNOWN_ACCOUNT")
        )
    }

    fn into_unavailable(self) -> GatewayError {
        let mut message = format!("RPC error {}: {}", self.code, self.message);
        if let Some(cause) = self.cause.filter(|c| !c.name.is_empty()) {
            message.push_str(&format!(" ({})", cause.name));
        }
        if let Some(data) = self.data {
            message.push_str(&format!(": {}", data));
        }
        GatewayError::RpcUnavailable(message)
    }
}

#[derive(Debug, Deserialize)]
struct AccessKeyView {
    nonce: u64,
}

#[derive(Debug, Deserialize)]
struct CallResult {
    result: Vec<u8>,
}

#[derive(Debug, Deserialize)]
struct StatusView {
    sync_info: SyncInfo,
}

#[derive(Debug, Deserialize)]
struct SyncInfo {
    latest_block_hash: String,
    latest_block_height: u64,
}

/// Outcome of one JSON-RPC exchange
enum RpcReply {
    Result(Value),
    Error(JsonRpcError),
}

/// [`LedgerQuery`] over HTTP JSON-RPC
pub struct JsonRpcLedgerClient {
    client: Client,
    rpc_url: String,
}

impl JsonRpcLedgerClient {
    /// Create a client for `rpc_url`; `timeout` bounds each round-trip
    pub fn new(rpc_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Config(format!("failed to create RPC client: {}", e)))?;

        Ok(Self {
            client,
            rpc_url: rpc_url.into(),
        })
    }

    async fn send<P: Serialize>(&self, method: &'static str, params: P) -> Result<RpcReply> {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            id: "dontcare",
            method,
            params,
        };

        let response = self
            .client
            .post(&self.rpc_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| GatewayError::RpcUnavailable(format!("{} request failed: {}", method, e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GatewayError::RpcUnavailable(format!("failed to read {} response: {}", method, e)))?;

        // Some providers answer handler errors with a non-2xx status and a
        // JSON-RPC error body, so parse before looking at the status.
        match serde_json::from_str::<JsonRpcResponse>(&body) {
            Ok(JsonRpcResponse { error: Some(error), .. }) => Ok(RpcReply::Error(error)),
            Ok(JsonRpcResponse { result: Some(result), .. }) if status.is_success() => Ok(RpcReply::Result(result)),
            _ if !status.is_success() => Err(GatewayError::RpcUnavailable(format!("HTTP error: {}", status))),
            Ok(_) => Err(GatewayError::InvalidViewResult(format!("{} response has no result", method))),
            Err(e) => Err(GatewayError::InvalidViewResult(format!("failed to parse {} response: {}", method, e))),
        }
    }
}

/// Legacy nodes report a missing key inside `result` instead of `error`
fn legacy_error(result: &Value) -> Option<&str> {
    result.get("error").and_then(Value::as_str)
}

#[async_trait]
impl LedgerQuery for JsonRpcLedgerClient {
    async fn fetch_nonce(&self, account_id: &str, public_key: &str) -> Result<Nonce> {
        debug!("view_access_key {} {}", account_id, public_key);

        let not_found = || GatewayError::AccountOrKeyNotFound {
            account_id: account_id.to_string(),
            public_key: public_key.to_string(),
        };

        let query = QueryRequest::ViewAccessKey {
            finality: FINALITY,
            account_id,
            public_key,
        };
        let result = match self.send("query", query).await? {
            RpcReply::Result(result) => result,
            RpcReply::Error(error) if error.is_unknown_key() => return Err(not_found()),
            RpcReply::Error(error) => return Err(error.into_unavailable()),
        };

        if let Some(message) = legacy_error(&result) {
            if message.contains("does not exist") {
                return Err(not_found());
            }
            return Err(GatewayError::RpcUnavailable(message.to_string()));
        }

        let view: AccessKeyView = serde_json::from_value(result)
            .map_err(|e| GatewayError::InvalidViewResult(format!("malformed access key view: {}", e)))?;

        view.nonce
            .checked_add(1)
            .ok_or_else(|| GatewayError::InvalidViewResult("access key nonce is exhausted".to_string()))
    }

    async fn fetch_latest_block(&self) -> Result<BlockReference> {
        debug!("status");

        let result = match self.send("status", Vec::<Value>::new()).await? {
            RpcReply::Result(result) => result,
            RpcReply::Error(error) => return Err(error.into_unavailable()),
        };

        let status: StatusView = serde_json::from_value(result)
            .map_err(|e| GatewayError::InvalidViewResult(format!("malformed status response: {}", e)))?;
        let hash: CryptoHash = status.sync_info.latest_block_hash.parse()?;

        Ok(BlockReference {
            hash,
            height: status.sync_info.latest_block_height,
        })
    }

    async fn call_view(&self, account_id: &str, method_name: &str, args_base64: &str) -> Result<Value> {
        debug!("call_function {}.{}", account_id, method_name);

        let query = QueryRequest::CallFunction {
            finality: FINALITY,
            account_id,
            method_name,
            args_base64,
        };
        let result = match self.send("query", query).await? {
            RpcReply::Result(result) => result,
            RpcReply::Error(error) => return Err(error.into_unavailable()),
        };

        if let Some(message) = legacy_error(&result) {
            warn!("view call {}.{} failed: {}", account_id, method_name, message);
            return Err(GatewayError::RpcUnavailable(message.to_string()));
        }

        let call: CallResult = serde_json::from_value(result)
            .map_err(|e| GatewayError::InvalidViewResult(format!("malformed call result: {}", e)))?;
        let text = String::from_utf8(call.result)
            .map_err(|e| GatewayError::InvalidViewResult(format!("view result is not UTF-8: {}", e)))?;

        serde_json::from_str(&text)
            .map_err(|e| GatewayError::InvalidViewResult(format!("view result is not JSON: {}", e)))
    }
}
