//! Near catalog routes under `/api/get/{transaction,payload}/nearcatalog/...`

use super::{compose_envelope, path_fields};
use crate::api::errors::ApiResult;
use crate::api::extract::EncodedRequest;
use crate::api::server::AppState;
use crate::catalog::{project_call, ProjectArgs, ProjectParams};
use crate::common::Result;
use crate::transaction::{CallPath, FunctionCallPayload, TransactionEnvelope};
use axum::{extract::State, response::Json};
use log::debug;

const FIELDS_START: usize = 4;

const PROJECT_FIELDS: [&str; 10] = [
    "title",
    "description",
    "categories",
    "oneliner",
    "logo",
    "website",
    "twitter",
    "medium",
    "discord",
    "whitepaper",
];

fn project_params(request: &EncodedRequest) -> Result<ProjectParams> {
    let fields = path_fields(request, FIELDS_START, &PROJECT_FIELDS)?;
    Ok(ProjectParams {
        title: fields[0].to_string(),
        description: fields[1].to_string(),
        categories: fields[2].to_string(),
        oneliner: fields[3].to_string(),
        logo: fields[4].to_string(),
        website: fields[5].to_string(),
        twitter: fields[6].to_string(),
        medium: fields[7].to_string(),
        discord: fields[8].to_string(),
        whitepaper: fields[9].to_string(),
    })
}

pub async fn project_transaction(
    State(state): State<AppState>,
    request: EncodedRequest,
) -> ApiResult<Json<TransactionEnvelope>> {
    let params = project_params(&request)?;
    let payload = project_call(&params, &state.signer.account_id, CallPath::Transaction)?;
    debug!("catalog listing transaction for {}", state.signer.account_id);

    Ok(Json(compose_envelope(&state, &payload).await?))
}

pub async fn project_payload(
    State(state): State<AppState>,
    request: EncodedRequest,
) -> ApiResult<Json<FunctionCallPayload<ProjectArgs>>> {
    let params = project_params(&request)?;
    Ok(Json(project_call(&params, &state.signer.account_id, CallPath::ViewOnly)?))
}
