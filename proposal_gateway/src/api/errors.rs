//! API error responses for the gateway

use crate::common::GatewayError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt;

/// JSON error body returned by every failing route
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: u16,
    pub message: String,
    pub details: Option<serde_json::Value>,
    pub timestamp: u64,
    pub request_id: Option<String>,
}

impl ApiError {
    pub fn new(code: u16, message: String) -> Self {
        Self {
            code,
            message,
            details: None,
            timestamp: chrono::Utc::now().timestamp() as u64,
            request_id: None,
        }
    }

    pub fn with_details(code: u16, message: String, details: serde_json::Value) -> Self {
        Self {
            details: Some(details),
            ..Self::new(code, message)
        }
    }

    pub fn with_request_id(mut self, request_id: String) -> Self {
        self.request_id = Some(request_id);
        self
    }

    // Common error constructors
    pub fn internal_server_error(message: &str) -> Self {
        Self::new(500, message.to_string())
    }

    pub fn bad_gateway(message: &str) -> Self {
        Self::new(502, message.to_string())
    }

    pub fn service_unavailable(message: &str) -> Self {
        Self::new(503, message.to_string())
    }

    pub fn gateway_timeout(message: &str) -> Self {
        Self::new(504, message.to_string())
    }

    // Gateway-specific errors
    pub fn malformed_parameter(field: &str, reason: &str) -> Self {
        Self::with_details(
            400,
            "Malformed parameter".to_string(),
            serde_json::json!({
                "field": field,
                "reason": reason
            }),
        )
    }

    pub fn access_key_not_found(account_id: &str, public_key: &str) -> Self {
        Self::with_details(
            404,
            "Access key not found".to_string(),
            serde_json::json!({
                "account_id": account_id,
                "public_key": public_key
            }),
        )
    }

    pub fn ledger_error(reason: &str) -> Self {
        Self::with_details(
            502,
            "Ledger RPC error".to_string(),
            serde_json::json!({
                "reason": reason
            }),
        )
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "API Error {}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        let request_id = uuid::Uuid::new_v4().to_string();
        warn!("request {} failed: {}", request_id, err);

        let api_error = match &err {
            GatewayError::MalformedParameter { field, reason } => Self::malformed_parameter(field, reason),
            GatewayError::AccountOrKeyNotFound {
                account_id,
                public_key,
            } => Self::access_key_not_found(account_id, public_key),
            GatewayError::RpcUnavailable(reason) | GatewayError::InvalidViewResult(reason) => {
                Self::ledger_error(reason)
            }
            GatewayError::Upstream(_) => Self::bad_gateway(&err.to_string()),
            GatewayError::DeadlineExceeded(_) => Self::gateway_timeout(&err.to_string()),
            GatewayError::Cancelled => Self::service_unavailable(&err.to_string()),
            GatewayError::Config(_) => Self::internal_server_error(&err.to_string()),
        };
        api_error.with_request_id(request_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (GatewayError::malformed("title", "bad escape"), 400),
            (
                GatewayError::AccountOrKeyNotFound {
                    account_id: "a.near".into(),
                    public_key: "ed25519:x".into(),
                },
                404,
            ),
            (GatewayError::RpcUnavailable("down".into()), 502),
            (GatewayError::InvalidViewResult("junk".into()), 502),
            (GatewayError::Upstream("500".into()), 502),
            (GatewayError::DeadlineExceeded(Duration::from_secs(1)), 504),
            (GatewayError::Cancelled, 503),
            (GatewayError::Config("missing".into()), 500),
        ];

        for (err, code) in cases {
            let api_error = ApiError::from(err);
            assert_eq!(api_error.code, code);
            assert!(api_error.request_id.is_some());
        }
    }

    #[test]
    fn test_malformed_details() {
        let api_error = ApiError::from(GatewayError::malformed("summary", "invalid percent escape at byte 3"));
        let details = api_error.details.unwrap();
        assert_eq!(details["field"], "summary");
    }
}
