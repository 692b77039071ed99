use anyhow::Result;
use clap::Parser;
use log::info;
use proposal_gateway::{api::start_api_server, config::GatewayConfig};
use std::path::PathBuf;

/// Proposal Gateway Arguments
#[derive(Parser)]
#[clap(name = "proposal-gateway")]
#[clap(about = "Builds unsigned proposal and catalog transactions for NEAR agents")]
struct Args {
    /// Optional configuration file (TOML, YAML or JSON)
    #[clap(long)]
    config: Option<PathBuf>,

    /// Address to bind the HTTP server to, overrides server.bind
    #[clap(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    info!("Starting proposal gateway...");
    if let Some(path) = &args.config {
        info!("Config path: {:?}", path);
    }

    let config = GatewayConfig::load(args.config.as_deref(), args.bind)?;
    info!("Configured portals: {:?}", config.portals.keys().collect::<Vec<_>>());

    start_api_server(config).await
}
