//! Draft generation routes under `/api/create/...`

use super::path_fields;
use crate::ai_services::{ProjectDraftInputs, ProposalDraftInputs};
use crate::api::errors::ApiResult;
use crate::api::extract::EncodedRequest;
use crate::api::server::AppState;
use crate::common::Result;
use crate::utils::decode_component;
use axum::{extract::State, response::Json};
use serde_json::Value;

const FIELDS_START: usize = 3;

const PROPOSAL_FIELDS: [&str; 5] = [
    "proposalDetails",
    "requestedSponsorshipAmount",
    "requestedSponsorshipToken",
    "receiverAccount",
    "supervisor",
];

const PROJECT_FIELDS: [&str; 7] = [
    "projectDetails",
    "discord",
    "medium",
    "twitter",
    "logo",
    "websiteLink",
    "whitepaper",
];

fn decoded_fields(request: &EncodedRequest, names: &[&str]) -> Result<Vec<String>> {
    path_fields(request, FIELDS_START, names)?
        .into_iter()
        .zip(names)
        .map(|(raw, name)| decode_component(name, raw))
        .collect()
}

/// Rewrite free-text proposal details into a structured draft
pub async fn create_proposal(State(state): State<AppState>, request: EncodedRequest) -> ApiResult<Json<Value>> {
    let fields = decoded_fields(&request, &PROPOSAL_FIELDS)?;
    let inputs = ProposalDraftInputs {
        proposal_details: fields[0].clone(),
        requested_sponsorship_amount: fields[1].clone(),
        requested_sponsorship_token: fields[2].clone(),
        receiver_account: fields[3].clone(),
        supervisor: fields[4].clone(),
    };

    Ok(Json(state.drafts.generate_proposal(&inputs).await?))
}

/// Turn project details and links into a catalog-ready description
pub async fn create_project(State(state): State<AppState>, request: EncodedRequest) -> ApiResult<Json<Value>> {
    let fields = decoded_fields(&request, &PROJECT_FIELDS)?;
    let inputs = ProjectDraftInputs {
        project_details: fields[0].clone(),
        discord: fields[1].clone(),
        medium: fields[2].clone(),
        twitter: fields[3].clone(),
        logo: fields[4].clone(),
        website_link: fields[5].clone(),
        whitepaper: fields[6].clone(),
    };

    Ok(Json(state.drafts.generate_project(&inputs).await?))
}
