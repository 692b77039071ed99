use crate::common::Result;
use crate::transaction::{CallPath, FunctionCallPayload};
use crate::utils::decode_component;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const SOCIAL_CONTRACT: &str = "social.near";
pub const SET_METHOD: &str = "set";

/// Raw, still percent-encoded project fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProjectParams {
    pub title: String,
    pub description: String,
    pub categories: String,
    pub oneliner: String,
    pub logo: String,
    pub website: String,
    pub twitter: String,
    pub medium: String,
    pub discord: String,
    pub whitepaper: String,
}

/// Catalog listing as stored under `<account>/nearcatalog`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogRecord {
    pub categories: String,
    pub title: String,
    pub oneliner: String,
    pub logo: String,
    pub description: String,
    pub website: String,
    pub dapp: String,
    pub twitter: String,
    pub medium: String,
    pub discord: String,
    pub whitepaper: String,
    /// Always empty, no token lookup is done
    pub token_address: String,
    /// Always empty, no token lookup is done
    pub cgc_address: String,
    pub uid: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub nearcatalog: CatalogRecord,
}

/// `{<account>: {"nearcatalog": record}}`
pub type ProjectArgs = BTreeMap<String, CatalogEntry>;

/// Build the `set` arguments for `account_id`'s catalog listing
pub fn build_project_args(params: &ProjectParams, account_id: &str) -> Result<ProjectArgs> {
    let record = CatalogRecord {
        categories: decode_component("categories", &params.categories)?,
        title: decode_component("title", &params.title)?,
        oneliner: decode_component("oneliner", &params.oneliner)?,
        logo: decode_component("logo", &params.logo)?,
        description: decode_component("description", &params.description)?,
        website: decode_component("website", &params.website)?,
        dapp: String::new(),
        twitter: decode_component("twitter", &params.twitter)?,
        medium: decode_component("medium", &params.medium)?,
        discord: decode_component("discord", &params.discord)?,
        whitepaper: decode_component("whitepaper", &params.whitepaper)?,
        token_address: String::new(),
        cgc_address: String::new(),
        uid: account_id.to_string(),
    };

    let mut args = ProjectArgs::new();
    args.insert(account_id.to_string(), CatalogEntry { nearcatalog: record });
    Ok(args)
}

pub fn project_call(
    params: &ProjectParams,
    account_id: &str,
    path: CallPath,
) -> Result<FunctionCallPayload<ProjectArgs>> {
    Ok(FunctionCallPayload {
        method_name: SET_METHOD.to_string(),
        args: build_project_args(params, account_id)?,
        gas: path.gas(),
        deposit: 0,
        contract_name: SOCIAL_CONTRACT.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::GatewayError;

    fn sample() -> ProjectParams {
        ProjectParams {
            title: "Lantern".to_string(),
            description: "Indexer%20for%20proposals".to_string(),
            categories: "infrastructure".to_string(),
            oneliner: "Light%20it%20up".to_string(),
            logo: "https%3A%2F%2Fexample.org%2Flogo.png".to_string(),
            website: "https%3A%2F%2Flantern.example".to_string(),
            twitter: "%40lantern".to_string(),
            medium: "lantern".to_string(),
            discord: "lantern%23123".to_string(),
            whitepaper: "".to_string(),
        }
    }

    #[test]
    fn test_project_args_shape() {
        let args = build_project_args(&sample(), "agent.near").unwrap();
        let record = &args["agent.near"].nearcatalog;

        assert_eq!(record.description, "Indexer for proposals");
        assert_eq!(record.logo, "https://example.org/logo.png");
        assert_eq!(record.twitter, "@lantern");
        assert_eq!(record.uid, "agent.near");
        assert!(record.dapp.is_empty());
        assert!(record.token_address.is_empty());
        assert!(record.cgc_address.is_empty());
    }

    #[test]
    fn test_record_key_order() {
        let args = build_project_args(&sample(), "agent.near").unwrap();
        let encoded = serde_json::to_string(&args).unwrap();

        assert!(encoded.starts_with(r#"{"agent.near":{"nearcatalog":{"categories":"infrastructure","title":"Lantern","oneliner""#));
        assert!(encoded.ends_with(r#""whitepaper":"","tokenAddress":"","cgcAddress":"","uid":"agent.near"}}}"#));
    }

    #[test]
    fn test_project_call() {
        let payload = project_call(&sample(), "agent.near", CallPath::ViewOnly).unwrap();
        let value = serde_json::to_value(&payload).unwrap();

        assert_eq!(value["methodName"], "set");
        assert_eq!(value["contractName"], "social.near");
        assert_eq!(value["gas"], "50000000000000");
        assert_eq!(value["deposit"], "0");
        assert_eq!(value["args"]["agent.near"]["nearcatalog"]["website"], "https://lantern.example");
    }

    #[test]
    fn test_invalid_escape() {
        let mut params = sample();
        params.discord = "%FF".to_string();

        let err = build_project_args(&params, "agent.near").unwrap_err();
        assert!(matches!(err, GatewayError::MalformedParameter { ref field, .. } if field == "discord"));
    }
}
