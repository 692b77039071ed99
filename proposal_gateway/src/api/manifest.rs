//! OpenAPI plugin manifest with the `x-mb` agent extension

use crate::api::server::AppState;
use crate::config::GatewayConfig;
use crate::governance::ProposalKind;
use axum::{extract::State, response::Json};
use serde_json::{json, Map, Value};

const TITLE: &str = "Project and Proposal Gateway API";

fn path_param(name: &str, description: &str) -> Value {
    json!({
        "in": "path",
        "name": name,
        "required": true,
        "schema": { "type": "string" },
        "description": description,
    })
}

fn proposal_params() -> Vec<Value> {
    vec![
        path_param("title", "Title of the proposal."),
        path_param("description", "Detailed description of the proposal."),
        path_param("category", "Category of the proposal."),
        path_param("summary", "Short summary of the proposal."),
        path_param("requestedSponsorshipAmount", "Amount of sponsorship requested."),
        path_param("requestedSponsorshipToken", "Token for the requested sponsorship."),
        path_param("receiverAccount", "NEAR account that will receive the sponsorship."),
        path_param("supervisor", "NEAR account of the supervisor responsible for the proposal."),
    ]
}

fn project_params() -> Vec<Value> {
    vec![
        path_param("title", "Name of the project."),
        path_param("description", "Description of the project."),
        path_param("categories", "Catalog categories of the project."),
        path_param("oneliner", "One line pitch of the project."),
        path_param("logo", "URL of the project logo."),
        path_param("website", "Project website."),
        path_param("twitter", "Project twitter handle."),
        path_param("medium", "Project medium account."),
        path_param("discord", "Project discord invite."),
        path_param("whitepaper", "URL of the project whitepaper."),
    ]
}

fn envelope_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "signerId": { "type": "string" },
            "publicKey": { "type": "string" },
            "nonce": { "type": "string", "description": "Decimal nonce." },
            "receiverId": { "type": "string" },
            "actions": { "type": "array", "items": { "type": "object" } },
            "blockHash": { "type": "object", "description": "Block hash bytes keyed by index." }
        },
        "required": ["signerId", "publicKey", "nonce", "receiverId", "actions", "blockHash"]
    })
}

fn payload_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "methodName": { "type": "string" },
            "args": { "type": "object" },
            "gas": { "type": "string" },
            "deposit": { "type": "string" },
            "contractName": { "type": "string" }
        },
        "required": ["methodName", "args", "gas", "deposit", "contractName"]
    })
}

fn operation(
    operation_id: &str,
    tag: &str,
    description: &str,
    parameters: Vec<Value>,
    schema: Value,
) -> Value {
    json!({
        "get": {
            "description": description,
            "tags": [tag],
            "operationId": operation_id,
            "parameters": parameters,
            "responses": {
                "200": {
                    "description": "Successful response.",
                    "content": { "application/json": { "schema": schema } }
                },
                "400": { "description": "Malformed path parameter." }
            }
        }
    })
}

fn template(names: &[Value]) -> String {
    names
        .iter()
        .filter_map(|param| param["name"].as_str())
        .map(|name| format!("/{{{}}}", name))
        .collect()
}

fn paths(config: &GatewayConfig) -> Map<String, Value> {
    let mut paths = Map::new();

    paths.insert(
        "/api/create/proposal/{proposalDetails}/{requestedSponsorshipAmount}/{requestedSponsorshipToken}/{receiverAccount}/{supervisor}".to_string(),
        operation(
            "createProposal",
            "create proposal",
            "Generate a structured proposal draft from free-text details.",
            vec![
                path_param("proposalDetails", "Details of the project for the proposal."),
                path_param("requestedSponsorshipAmount", "Amount of sponsorship requested."),
                path_param("requestedSponsorshipToken", "Token for the requested sponsorship."),
                path_param("receiverAccount", "NEAR account that will receive the sponsorship."),
                path_param("supervisor", "NEAR account of the supervisor responsible for the proposal."),
            ],
            json!({
                "type": "object",
                "properties": {
                    "Supervisor": { "type": "string" },
                    "Receiver": { "type": "string" },
                    "Requested Sponsorship Token": { "type": "string" },
                    "proposalDetails": { "type": "object" }
                }
            }),
        ),
    );

    for (name, portal) in &config.portals {
        let params = proposal_params();
        let mut description = format!(
            "Create an add_proposal transaction for {} sponsored by {}.",
            portal.contract, portal.requested_sponsor
        );
        let mut parameters = params.clone();
        if portal.kind == ProposalKind::Infrastructure {
            description.push_str(" Pass linkedRfp to link the proposal to an RFP.");
            parameters.push(json!({
                "in": "query",
                "name": "linkedRfp",
                "required": false,
                "schema": { "type": "string" },
                "description": "Identifier of the RFP this proposal answers."
            }));
        }

        paths.insert(
            format!("/api/get/transaction/{}{}", name, template(&params)),
            operation(
                &format!("{}ProposalTransaction", name),
                &format!("{} proposal", name),
                &description,
                parameters.clone(),
                envelope_schema(),
            ),
        );
        paths.insert(
            format!("/api/get/payload/{}{}", name, template(&params)),
            operation(
                &format!("{}ProposalPayload", name),
                &format!("{} proposal", name),
                &description,
                parameters,
                payload_schema(),
            ),
        );
    }

    paths.insert(
        "/api/create/project/{projectDetails}/{discord}/{medium}/{twitter}/{logo}/{websiteLink}/{whitepaper}".to_string(),
        operation(
            "createProject",
            "create project",
            "Generate a project description from free-text details and links.",
            vec![
                path_param("projectDetails", "Details of the project."),
                path_param("discord", "Project discord invite."),
                path_param("medium", "Project medium account."),
                path_param("twitter", "Project twitter handle."),
                path_param("logo", "URL of the project logo."),
                path_param("websiteLink", "Project website."),
                path_param("whitepaper", "URL of the project whitepaper."),
            ],
            json!({
                "type": "object",
                "properties": {
                    "discord": { "type": "string" },
                    "medium": { "type": "string" },
                    "twitter": { "type": "string" },
                    "logo": { "type": "string" },
                    "website": { "type": "string" },
                    "whitepaper": { "type": "string" },
                    "project": { "type": "object" }
                }
            }),
        ),
    );

    let catalog = project_params();
    paths.insert(
        format!("/api/get/transaction/nearcatalog{}", template(&catalog)),
        operation(
            "nearcatalogTransaction",
            "near catalog",
            "Create a social.near set transaction listing the project in the near catalog.",
            catalog.clone(),
            envelope_schema(),
        ),
    );
    paths.insert(
        format!("/api/get/payload/nearcatalog{}", template(&catalog)),
        operation(
            "nearcatalogPayload",
            "near catalog",
            "Describe the social.near set call listing the project in the near catalog.",
            catalog,
            payload_schema(),
        ),
    );

    let mut view = operation(
        "callView",
        "view",
        "Run a read-only contract method and return its JSON result.",
        vec![
            path_param("contract", "Contract account id."),
            path_param("method", "View method name."),
        ],
        json!({}),
    );
    if let Some(parameters) = view["get"]["parameters"].as_array_mut() {
        parameters.push(json!({
            "in": "query",
            "name": "args",
            "required": false,
            "schema": { "type": "string" },
            "description": "base64 encoded JSON arguments."
        }));
    }
    paths.insert("/api/view/{contract}/{method}".to_string(), view);

    paths
}

/// Build the manifest advertised to agent runtimes
pub fn plugin_manifest(config: &GatewayConfig, account_id: &str) -> Value {
    json!({
        "openapi": "3.0.0",
        "info": {
            "title": TITLE,
            "description": "API for creating proposals on the devhub, events and infrastructure portals and for listing projects in the near catalog.",
            "version": "1.0.0"
        },
        "servers": [{ "url": config.server.public_url }],
        "x-mb": {
            "account-id": account_id,
            "assistant": {
                "name": "Project and Proposal Agent",
                "description": "Facilitates the creation and submission of projects and proposals for various sponsorship opportunities.",
                "instructions": "Use this API to submit project details and sponsorship requests to the relevant portals.",
                "tools": [{ "type": "generate-transaction" }]
            }
        },
        "paths": paths(config)
    })
}

pub async fn ai_plugin(State(state): State<AppState>) -> Json<Value> {
    Json(plugin_manifest(&state.config, &state.signer.account_id))
}
