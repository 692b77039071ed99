//! `add_proposal` argument construction
//!
//! Two body schemas exist. Standard portals (devhub, events) take a V0 body
//! with no labels; the infrastructure portal takes a V1 body that links an
//! RFP and carries the category as its only label. Field order below is the
//! serialized key order and therefore part of the signed bytes.

use super::portal::Portal;
use crate::common::Result;
use crate::transaction::{CallPath, FunctionCallPayload};
use crate::utils::{decode_component, decode_optional};
use serde::{Deserialize, Serialize};

pub const ADD_PROPOSAL_METHOD: &str = "add_proposal";

/// Raw, still percent-encoded proposal fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalParams {
    pub title: String,
    pub description: String,
    pub summary: String,
    pub requested_sponsorship_amount: String,
    pub requested_sponsorship_token: String,
    pub receiver_account: String,
    #[serde(default)]
    pub supervisor: Option<String>,
    pub category: String,
}

/// Body schema selected by the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProposalVariant {
    Standard,
    Infrastructure { linked_rfp: Option<String> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BodyVersion {
    V0,
    V1,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Timeline {
    pub status: String,
}

impl Timeline {
    pub fn draft() -> Self {
        Self {
            status: "DRAFT".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProposalBody {
    pub proposal_body_version: BodyVersion,
    pub name: String,
    pub description: String,
    pub summary: String,
    pub linked_proposals: Vec<u64>,
    pub requested_sponsorship_usd_amount: String,
    pub requested_sponsorship_paid_in_currency: String,
    pub receiver_account: String,
    pub supervisor: Option<String>,
    pub timeline: Timeline,
    pub category: String,
    pub requested_sponsor: String,
    // Outer None: V0, key omitted. Some(None): V1 without an RFP, emitted as null.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linked_rfp: Option<Option<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProposalArgs {
    pub labels: Vec<String>,
    pub body: ProposalBody,
}

/// Build `{labels, body}` for `add_proposal`.
///
/// Every string field is percent-decoded; an empty supervisor becomes null.
pub fn build_proposal_args(
    params: &ProposalParams,
    requested_sponsor: &str,
    variant: &ProposalVariant,
) -> Result<ProposalArgs> {
    let category = decode_component("category", &params.category)?;

    let mut body = ProposalBody {
        proposal_body_version: BodyVersion::V0,
        name: decode_component("title", &params.title)?,
        description: decode_component("description", &params.description)?,
        summary: decode_component("summary", &params.summary)?,
        linked_proposals: Vec::new(),
        requested_sponsorship_usd_amount: decode_component(
            "requestedSponsorshipAmount",
            &params.requested_sponsorship_amount,
        )?,
        requested_sponsorship_paid_in_currency: decode_component(
            "requestedSponsorshipToken",
            &params.requested_sponsorship_token,
        )?,
        receiver_account: decode_component("receiverAccount", &params.receiver_account)?,
        supervisor: decode_optional("supervisor", params.supervisor.as_deref())?,
        timeline: Timeline::draft(),
        category: category.clone(),
        requested_sponsor: requested_sponsor.to_string(),
        linked_rfp: None,
    };

    let labels = match variant {
        ProposalVariant::Standard => Vec::new(),
        ProposalVariant::Infrastructure { linked_rfp } => {
            body.proposal_body_version = BodyVersion::V1;
            body.linked_rfp = Some(decode_optional("linkedRfp", linked_rfp.as_deref())?);
            vec![category]
        }
    };

    Ok(ProposalArgs { labels, body })
}

/// Wrap proposal arguments into the `add_proposal` call for `portal`
pub fn proposal_call(
    params: &ProposalParams,
    portal: &Portal,
    variant: &ProposalVariant,
    path: CallPath,
) -> Result<FunctionCallPayload<ProposalArgs>> {
    let args = build_proposal_args(params, &portal.requested_sponsor, variant)?;

    Ok(FunctionCallPayload {
        method_name: ADD_PROPOSAL_METHOD.to_string(),
        args,
        gas: path.gas(),
        deposit: 0,
        contract_name: portal.contract.clone(),
    })
}
