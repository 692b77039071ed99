//! Proposal routes under `/api/get/{transaction,payload}/<portal>/...`

use super::{compose_envelope, path_fields};
use crate::api::errors::ApiResult;
use crate::api::extract::EncodedRequest;
use crate::api::server::AppState;
use crate::common::{GatewayError, Result};
use crate::governance::{lookup, proposal_call, Portal, ProposalArgs, ProposalParams, ProposalVariant};
use crate::transaction::{CallPath, FunctionCallPayload, TransactionEnvelope};
use axum::{extract::State, response::Json};
use log::debug;

/// Index of the portal name in `/api/get/<kind>/<portal>/...`
const PORTAL_SEGMENT: usize = 3;

const PROPOSAL_FIELDS: [&str; 7] = [
    "title",
    "description",
    "category",
    "summary",
    "requestedSponsorshipAmount",
    "requestedSponsorshipToken",
    "receiverAccount",
];

fn proposal_request(state: &AppState, request: &EncodedRequest) -> Result<(Portal, ProposalParams, ProposalVariant)> {
    let name = request
        .segment(PORTAL_SEGMENT)
        .ok_or_else(|| GatewayError::malformed("portal", "missing path segment"))?;
    let portal = lookup(&state.config.portals, name)?.clone();

    let start = PORTAL_SEGMENT + 1;
    let fields = path_fields(request, start, &PROPOSAL_FIELDS)?;
    let params = ProposalParams {
        title: fields[0].to_string(),
        description: fields[1].to_string(),
        category: fields[2].to_string(),
        summary: fields[3].to_string(),
        requested_sponsorship_amount: fields[4].to_string(),
        requested_sponsorship_token: fields[5].to_string(),
        receiver_account: fields[6].to_string(),
        supervisor: request.segment(start + PROPOSAL_FIELDS.len()).map(str::to_string),
    };

    let variant = portal.variant(request.query_param("linkedRfp").map(str::to_string));
    Ok((portal, params, variant))
}

/// Unsigned `add_proposal` transaction for the requested portal
pub async fn proposal_transaction(
    State(state): State<AppState>,
    request: EncodedRequest,
) -> ApiResult<Json<TransactionEnvelope>> {
    let (portal, params, variant) = proposal_request(&state, &request)?;
    let payload = proposal_call(&params, &portal, &variant, CallPath::Transaction)?;
    debug!("proposal transaction for {} ({:?})", portal.contract, portal.kind);

    Ok(Json(compose_envelope(&state, &payload).await?))
}

/// `add_proposal` call description without ledger lookups
pub async fn proposal_payload(
    State(state): State<AppState>,
    request: EncodedRequest,
) -> ApiResult<Json<FunctionCallPayload<ProposalArgs>>> {
    let (portal, params, variant) = proposal_request(&state, &request)?;
    debug!("proposal payload for {}", portal.contract);

    Ok(Json(proposal_call(&params, &portal, &variant, CallPath::ViewOnly)?))
}
