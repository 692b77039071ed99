use anyhow::Result;
use axum::{http::Method, routing::get, Router};
use log::info;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};

use crate::ai_services::WordwareClient;
use crate::api::handlers::{catalog, drafts, status, transactions, view};
use crate::api::manifest;
use crate::config::GatewayConfig;
use crate::ledger::{JsonRpcLedgerClient, LedgerQuery};
use crate::transaction::{SignerIdentity, TransactionComposer};

const PROPOSAL_SEGMENTS: &str =
    "/:title/:description/:category/:summary/:requestedSponsorshipAmount/:requestedSponsorshipToken/:receiverAccount";
const PROJECT_SEGMENTS: &str = "/:title/:description/:categories/:oneliner/:logo/:website/:twitter/:medium/:discord/:whitepaper";

// Application State
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GatewayConfig>,
    pub signer: Arc<SignerIdentity>,
    pub ledger: Arc<dyn LedgerQuery>,
    pub composer: Arc<TransactionComposer>,
    pub drafts: Arc<WordwareClient>,
    /// Cancelled on shutdown; in-flight compositions hold child tokens
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(config: GatewayConfig, ledger: Arc<dyn LedgerQuery>) -> crate::Result<Self> {
        let signer = config.signer()?;
        let drafts = WordwareClient::new(config.wordware.clone())?;

        Ok(Self {
            signer: Arc::new(signer),
            composer: Arc::new(TransactionComposer::new(ledger.clone())),
            ledger,
            drafts: Arc::new(drafts),
            config: Arc::new(config),
            shutdown: CancellationToken::new(),
        })
    }
}

// API Router
pub fn create_router(state: AppState) -> Router {
    let mut router = Router::new()
        // Health and manifest
        .route("/health", get(status::health_check))
        .route("/api/ai-plugin", get(manifest::ai_plugin))
        .route("/.well-known/ai-plugin.json", get(manifest::ai_plugin))
        // Draft generation
        .route(
            "/api/create/proposal/:proposalDetails/:requestedSponsorshipAmount/:requestedSponsorshipToken/:receiverAccount/:supervisor",
            get(drafts::create_proposal),
        )
        .route(
            "/api/create/project/:projectDetails/:discord/:medium/:twitter/:logo/:websiteLink/:whitepaper",
            get(drafts::create_project),
        )
        // Near catalog listings
        .route(
            &format!("/api/get/transaction/nearcatalog{}", PROJECT_SEGMENTS),
            get(catalog::project_transaction),
        )
        .route(
            &format!("/api/get/payload/nearcatalog{}", PROJECT_SEGMENTS),
            get(catalog::project_payload),
        )
        // Contract views
        .route("/api/view/:contract/:method", get(view::call_view));

    // One static prefix per portal. The supervisor segment may be absent, empty or set.
    for name in state.config.portals.keys() {
        let transaction = format!("/api/get/transaction/{}{}", name, PROPOSAL_SEGMENTS);
        let payload = format!("/api/get/payload/{}{}", name, PROPOSAL_SEGMENTS);
        router = router
            .route(&transaction, get(transactions::proposal_transaction))
            .route(&format!("{}/", transaction), get(transactions::proposal_transaction))
            .route(&format!("{}/:supervisor", transaction), get(transactions::proposal_transaction))
            .route(&payload, get(transactions::proposal_payload))
            .route(&format!("{}/", payload), get(transactions::proposal_payload))
            .route(&format!("{}/:supervisor", payload), get(transactions::proposal_payload));
        info!("serving proposals for portal {}", name);
    }

    router
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST])
                .allow_headers(Any),
        )
        .with_state(state)
}

async fn shutdown_signal(shutdown: CancellationToken) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("failed to listen for shutdown signal: {}", e);
    }
    info!("shutdown requested, cancelling in-flight requests");
    shutdown.cancel();
}

// Server startup
pub async fn start_api_server(config: GatewayConfig) -> Result<()> {
    let ledger = Arc::new(JsonRpcLedgerClient::new(&config.rpc.url, config.rpc_timeout())?);
    let bind = config.server.bind.clone();
    let state = AppState::new(config, ledger)?;
    let shutdown = state.shutdown.clone();

    info!(
        "signer {} on {} via {}",
        state.signer.account_id, state.config.network, state.config.rpc.url
    );

    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(&bind).await?;
    info!("Proposal gateway listening on http://{}", bind);
    info!("API Documentation: GET /api/ai-plugin");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await?;

    Ok(())
}
