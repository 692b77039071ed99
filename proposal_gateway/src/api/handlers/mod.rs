pub mod catalog;
pub mod drafts;
pub mod status;
pub mod transactions;
pub mod view;

use crate::api::extract::EncodedRequest;
use crate::api::server::AppState;
use crate::common::{GatewayError, Result};
use crate::transaction::{FunctionCallPayload, TransactionEnvelope};
use serde::Serialize;

/// Raw segments named by `names`, starting at path index `start`
fn path_fields<'a>(request: &'a EncodedRequest, start: usize, names: &[&str]) -> Result<Vec<&'a str>> {
    names
        .iter()
        .enumerate()
        .map(|(offset, name)| {
            request
                .segment(start + offset)
                .ok_or_else(|| GatewayError::malformed(*name, "missing path segment"))
        })
        .collect()
}

/// Compose a single-action envelope for `payload`, signed by the gateway identity
async fn compose_envelope<A: Serialize>(
    state: &AppState,
    payload: &FunctionCallPayload<A>,
) -> Result<TransactionEnvelope> {
    let action = payload.to_action()?;
    state
        .composer
        .compose(
            &state.signer,
            &payload.contract_name,
            vec![action],
            &state.shutdown.child_token(),
            state.config.compose_deadline(),
        )
        .await
}
