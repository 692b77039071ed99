//! Gateway configuration
//!
//! Layers, lowest precedence first: built-in defaults, the legacy deployment
//! variables (`BITTE_KEY`, `BITTE_CONFIG`, `WORDWARE_API_KEY`), an optional
//! config file, `GATEWAY_*` environment variables, then command-line flags.

use crate::common::{GatewayError, Result};
use crate::governance::{default_portals, Portal, ProposalKind};
use crate::transaction::SignerIdentity;
use ::config::builder::DefaultState;
use ::config::{Config, ConfigBuilder, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

pub const ENV_PREFIX: &str = "GATEWAY";
pub const DEFAULT_BIND: &str = "0.0.0.0:3000";
pub const DEFAULT_PUBLIC_URL: &str = "http://localhost:3000";
pub const DEFAULT_RPC_URL: &str = "https://free.rpc.fastnear.com/";
pub const DEFAULT_WORDWARE_URL: &str = "https://app.wordware.ai";
pub const DEFAULT_PROPOSAL_APP: &str = "9be6bbf8-6964-4430-97b8-a71b1a3aab76";
pub const DEFAULT_PROJECT_APP: &str = "3fa70666-cda8-4f47-8d34-2c5618ec92f7";

/// Route segment reserved for catalog listings
const RESERVED_PORTAL: &str = "nearcatalog";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Socket address the HTTP server binds to
    pub bind: String,
    /// Externally reachable base URL, advertised in the plugin manifest
    pub public_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcConfig {
    pub url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignerConfig {
    #[serde(default)]
    pub account_id: Option<String>,
    #[serde(default)]
    pub public_key: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComposeConfig {
    /// Upper bound on the nonce and block queries of one composition
    #[serde(default)]
    pub deadline_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordwareConfig {
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    pub proposal_app: String,
    pub project_app: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    pub server: ServerConfig,
    pub rpc: RpcConfig,
    #[serde(default)]
    pub signer: SignerConfig,
    #[serde(default)]
    pub compose: ComposeConfig,
    pub portals: BTreeMap<String, Portal>,
    pub wordware: WordwareConfig,
    pub network: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyKey {
    account_id: Option<String>,
    public_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LegacyServer {
    url: Option<String>,
}

impl GatewayConfig {
    /// Load from the process environment and an optional file
    pub fn load(path: Option<&Path>, bind: Option<String>) -> Result<Self> {
        Self::load_with(
            path,
            bind,
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__"),
            |name| std::env::var(name).ok(),
        )
    }

    /// Load with explicit environment sources
    pub fn load_with(
        path: Option<&Path>,
        bind: Option<String>,
        env: Environment,
        legacy: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let mut builder = with_legacy(defaults()?, &legacy)?;

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }

        let config: GatewayConfig = builder
            .add_source(env)
            .set_override_option("server.bind", bind)?
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        self.signer()?;

        if self.portals.contains_key(RESERVED_PORTAL) {
            return Err(GatewayError::Config(format!(
                "portal name `{}` is reserved for catalog listings",
                RESERVED_PORTAL
            )));
        }
        for (name, portal) in &self.portals {
            if portal.contract.is_empty() || portal.requested_sponsor.is_empty() {
                return Err(GatewayError::Config(format!(
                    "portal `{}` needs a contract and a requested sponsor",
                    name
                )));
            }
        }
        Ok(())
    }

    /// Identity that signs every generated transaction
    pub fn signer(&self) -> Result<SignerIdentity> {
        let account_id = non_empty(self.signer.account_id.as_deref())
            .ok_or_else(|| GatewayError::Config("signer.account_id is not set".to_string()))?;
        let public_key = non_empty(self.signer.public_key.as_deref())
            .ok_or_else(|| GatewayError::Config("signer.public_key is not set".to_string()))?;

        Ok(SignerIdentity::new(account_id, public_key))
    }

    pub fn rpc_timeout(&self) -> Duration {
        Duration::from_secs(self.rpc.timeout_secs)
    }

    pub fn compose_deadline(&self) -> Option<Duration> {
        self.compose.deadline_secs.map(Duration::from_secs)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn defaults() -> Result<ConfigBuilder<DefaultState>> {
    let mut builder = Config::builder()
        .set_default("server.bind", DEFAULT_BIND)?
        .set_default("server.public_url", DEFAULT_PUBLIC_URL)?
        .set_default("rpc.url", DEFAULT_RPC_URL)?
        .set_default("rpc.timeout_secs", 30_i64)?
        .set_default("wordware.base_url", DEFAULT_WORDWARE_URL)?
        .set_default("wordware.proposal_app", DEFAULT_PROPOSAL_APP)?
        .set_default("wordware.project_app", DEFAULT_PROJECT_APP)?
        .set_default("wordware.timeout_secs", 120_i64)?
        .set_default("network", "mainnet")?;

    for (name, portal) in default_portals() {
        let kind = match portal.kind {
            ProposalKind::Standard => "standard",
            ProposalKind::Infrastructure => "infrastructure",
        };
        builder = builder
            .set_default(format!("portals.{}.contract", name), portal.contract)?
            .set_default(format!("portals.{}.requested_sponsor", name), portal.requested_sponsor)?
            .set_default(format!("portals.{}.kind", name), kind)?;
    }

    Ok(builder)
}

fn with_legacy(
    mut builder: ConfigBuilder<DefaultState>,
    lookup: &impl Fn(&str) -> Option<String>,
) -> Result<ConfigBuilder<DefaultState>> {
    if let Some(raw) = lookup("BITTE_KEY") {
        let key: LegacyKey = serde_json::from_str(&raw)
            .map_err(|e| GatewayError::Config(format!("BITTE_KEY is not valid JSON: {}", e)))?;
        if let Some(account_id) = key.account_id {
            builder = builder.set_default("signer.account_id", account_id)?;
        }
        if let Some(public_key) = key.public_key {
            builder = builder.set_default("signer.public_key", public_key)?;
        }
    }

    if let Some(raw) = lookup("BITTE_CONFIG") {
        let server: LegacyServer = serde_json::from_str(&raw)
            .map_err(|e| GatewayError::Config(format!("BITTE_CONFIG is not valid JSON: {}", e)))?;
        if let Some(url) = server.url {
            builder = builder.set_default("server.public_url", url)?;
        }
    }

    if let Some(api_key) = lookup("WORDWARE_API_KEY") {
        builder = builder.set_default("wordware.api_key", api_key)?;
    }

    Ok(builder)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(vars: &[(&str, &str)]) -> Environment {
        let source: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .source(Some(source))
    }

    fn legacy(vars: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |name| {
            vars.iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| v.to_string())
        }
    }

    const BITTE_KEY: &[(&str, &str)] = &[(
        "BITTE_KEY",
        r#"{"accountId":"agent.near","publicKey":"ed25519:6E8sCci9badyRkXb3JoRpBj5p8C6Tw41ELDZoiihKEtp"}"#,
    )];

    #[test]
    fn test_defaults_with_legacy_signer() {
        let config = GatewayConfig::load_with(None, None, env(&[]), legacy(BITTE_KEY)).unwrap();

        assert_eq!(config.server.bind, DEFAULT_BIND);
        assert_eq!(config.rpc.url, DEFAULT_RPC_URL);
        assert_eq!(config.rpc_timeout(), Duration::from_secs(30));
        assert_eq!(config.compose_deadline(), None);
        assert_eq!(config.network, "mainnet");
        assert_eq!(config.portals.len(), 3);
        assert_eq!(config.portals["devhub"].requested_sponsor, "neardevdao.near");
        assert_eq!(config.signer().unwrap().account_id, "agent.near");
    }

    #[test]
    fn test_missing_signer_is_config_error() {
        let result = GatewayConfig::load_with(None, None, env(&[]), legacy(&[]));
        assert!(matches!(result, Err(GatewayError::Config(_))));
    }

    #[test]
    fn test_invalid_legacy_json() {
        let result = GatewayConfig::load_with(None, None, env(&[]), legacy(&[("BITTE_KEY", "{not json")]));
        assert!(matches!(result, Err(GatewayError::Config(_))));
    }

    #[test]
    fn test_env_overrides_legacy_and_flag_overrides_env() {
        let config = GatewayConfig::load_with(
            None,
            Some("127.0.0.1:9000".to_string()),
            env(&[
                ("GATEWAY_SIGNER__ACCOUNT_ID", "other.near"),
                ("GATEWAY_RPC__URL", "http://localhost:3030"),
                ("GATEWAY_SERVER__BIND", "0.0.0.0:8080"),
                ("GATEWAY_COMPOSE__DEADLINE_SECS", "5"),
            ]),
            legacy(BITTE_KEY),
        )
        .unwrap();

        assert_eq!(config.signer().unwrap().account_id, "other.near");
        assert_eq!(config.rpc.url, "http://localhost:3030");
        assert_eq!(config.server.bind, "127.0.0.1:9000");
        assert_eq!(config.compose_deadline(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_file_layer() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
network = "testnet"

[signer]
account_id = "agent.testnet"
public_key = "ed25519:6E8sCci9badyRkXb3JoRpBj5p8C6Tw41ELDZoiihKEtp"

[portals.devhub]
contract = "devhub.testnet"
"#
        )
        .unwrap();

        let config = GatewayConfig::load_with(Some(file.path()), None, env(&[]), legacy(&[])).unwrap();

        assert_eq!(config.network, "testnet");
        assert_eq!(config.portals["devhub"].contract, "devhub.testnet");
        assert_eq!(config.portals["devhub"].requested_sponsor, "neardevdao.near");
        assert_eq!(config.signer().unwrap().account_id, "agent.testnet");
    }

    #[test]
    fn test_reserved_portal_name() {
        let result = GatewayConfig::load_with(
            None,
            None,
            env(&[
                ("GATEWAY_PORTALS__NEARCATALOG__CONTRACT", "x.near"),
                ("GATEWAY_PORTALS__NEARCATALOG__REQUESTED_SPONSOR", "x.near"),
                ("GATEWAY_PORTALS__NEARCATALOG__KIND", "standard"),
            ]),
            legacy(BITTE_KEY),
        );
        assert!(matches!(result, Err(GatewayError::Config(_))));
    }
}
