use crate::api::errors::ApiResult;
use crate::api::extract::EncodedRequest;
use crate::api::server::AppState;
use crate::common::GatewayError;
use crate::ledger::{check_view_args, encode_view_args};
use crate::utils::{decode_component, decode_optional};
use axum::{extract::State, response::Json};
use log::debug;
use serde_json::{json, Value};

/// Run a contract view method: `/api/view/<contract>/<method>?args=<base64>`
pub async fn call_view(State(state): State<AppState>, request: EncodedRequest) -> ApiResult<Json<Value>> {
    let contract = request
        .segment(2)
        .ok_or_else(|| GatewayError::malformed("contract", "missing path segment"))?;
    let method = request
        .segment(3)
        .ok_or_else(|| GatewayError::malformed("method", "missing path segment"))?;

    let contract = decode_component("contract", contract)?;
    let method = decode_component("method", method)?;
    let args = decode_optional("args", request.query_param("args"))?.unwrap_or_else(|| encode_view_args(&json!({})));
    check_view_args(&args)?;

    debug!("view {}.{}", contract, method);
    Ok(Json(state.ledger.call_view(&contract, &method, &args).await?))
}
