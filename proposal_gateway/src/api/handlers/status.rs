use axum::{extract::State, response::Json};
use serde::Serialize;

use crate::api::server::AppState;

/// Response for `/health`
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always `healthy` while the server answers
    pub status: String,
    /// Crate version
    pub version: String,
    /// Account that signs generated transactions
    pub signer: String,
    /// Configured network name
    pub network: String,
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        signer: state.signer.account_id.clone(),
        network: state.config.network.clone(),
    })
}
