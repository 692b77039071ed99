//! Draft generation through released Wordware apps
//!
//! A run streams NDJSON. Progress chunks are skipped until one reports
//! `state == "complete"`; its `output` carries the generated fields.

use crate::common::{GatewayError, Result};
use crate::config::WordwareConfig;
use log::{debug, info, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;

const APP_VERSION: &str = "^2.0";

/// Fields forwarded to the proposal generation app
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalDraftInputs {
    #[serde(rename = "Supervisor")]
    pub supervisor: String,
    #[serde(rename = "Requested Sponsorship Amount")]
    pub requested_sponsorship_amount: String,
    #[serde(rename = "Receiver")]
    pub receiver_account: String,
    #[serde(rename = "Requested Sponsorship Token")]
    pub requested_sponsorship_token: String,
    #[serde(rename = "Proposal Details")]
    pub proposal_details: String,
}

/// Fields forwarded to the project generation app
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectDraftInputs {
    #[serde(rename = "project details")]
    pub project_details: String,
    pub discord: String,
    pub medium: String,
    pub twitter: String,
    pub logo: String,
    #[serde(rename = "website")]
    pub website_link: String,
    pub whitepaper: String,
}

#[derive(Debug, Serialize)]
struct RunRequest<'a, I> {
    inputs: &'a I,
    version: &'static str,
}

/// Result of one app run
#[derive(Debug, Clone, PartialEq)]
pub enum DraftOutcome {
    /// `output` of the first completed chunk
    Complete(Value),
    /// The stream ended without a completed chunk
    Incomplete { raw: String },
}

impl DraftOutcome {
    fn into_response(self, shape: fn(&Value) -> Value) -> Value {
        match self {
            DraftOutcome::Complete(output) => shape(&output),
            DraftOutcome::Incomplete { raw } => json!({
                "error": "No complete state found",
                "rawData": raw,
            }),
        }
    }
}

/// Pick `value.output` from the first NDJSON line that is a completed chunk.
///
/// Lines that are blank or fail to parse are skipped.
pub fn extract_complete_output(raw: &str) -> Option<Value> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| match serde_json::from_str::<Value>(line) {
            Ok(chunk) => Some(chunk),
            Err(e) => {
                debug!("skipping unparsable stream line: {}", e);
                None
            }
        })
        .find(|chunk| chunk["type"] == "chunk" && chunk["value"]["state"] == "complete")
        .and_then(|chunk| chunk["value"].get("output").cloned())
        .filter(|output| !output.is_null())
}

fn proposal_response(output: &Value) -> Value {
    json!({
        "Supervisor": output["Supervisor"],
        "Receiver": output["Receiver"],
        "Requested Sponsorship Token": output["Requested Sponsorship Token"],
        "proposalDetails": output["new_generation"],
    })
}

fn project_response(output: &Value) -> Value {
    json!({
        "discord": output["discord"],
        "medium": output["medium"],
        "twitter": output["twitter"],
        "logo": output["logo"],
        "website": output["websiteLink"],
        "whitepaper": output["whitepaper"],
        "project": output["new_generation"],
    })
}

/// Client for the proposal and project generation apps
pub struct WordwareClient {
    client: Client,
    settings: WordwareConfig,
}

impl WordwareClient {
    pub fn new(settings: WordwareConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| GatewayError::Config(format!("failed to create Wordware client: {}", e)))?;

        Ok(Self { client, settings })
    }

    /// Generate a proposal draft and shape it for the caller
    pub async fn generate_proposal(&self, inputs: &ProposalDraftInputs) -> Result<Value> {
        let outcome = self.run(&self.settings.proposal_app, inputs).await?;
        Ok(outcome.into_response(proposal_response))
    }

    /// Generate a project description and shape it for the caller
    pub async fn generate_project(&self, inputs: &ProjectDraftInputs) -> Result<Value> {
        let outcome = self.run(&self.settings.project_app, inputs).await?;
        Ok(outcome.into_response(project_response))
    }

    async fn run<I: Serialize>(&self, app_id: &str, inputs: &I) -> Result<DraftOutcome> {
        let api_key = self
            .settings
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| GatewayError::Config("wordware.api_key is not set".to_string()))?;

        let url = format!(
            "{}/api/released-app/{}/run",
            self.settings.base_url.trim_end_matches('/'),
            app_id
        );
        info!("running Wordware app {}", app_id);

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&RunRequest {
                inputs,
                version: APP_VERSION,
            })
            .send()
            .await
            .map_err(|e| GatewayError::Upstream(format!("request to app {} failed: {}", app_id, e)))?;

        let status = response.status();
        if !status.is_success() {
            warn!("Wordware app {} answered {}", app_id, status);
            return Err(GatewayError::Upstream(format!("HTTP error: {}", status)));
        }

        let raw = response
            .text()
            .await
            .map_err(|e| GatewayError::Upstream(format!("failed to read app {} stream: {}", app_id, e)))?;

        Ok(match extract_complete_output(&raw) {
            Some(output) => DraftOutcome::Complete(output),
            None => {
                warn!("Wordware app {} stream has no completed chunk", app_id);
                DraftOutcome::Incomplete { raw }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const STREAM: &str = concat!(
        "{\"type\":\"chunk\",\"value\":{\"state\":\"start\"}}\n",
        "not json\n",
        "\n",
        "{\"type\":\"chunk\",\"value\":{\"state\":\"complete\",\"output\":{\"Supervisor\":\"bob.near\",\"Receiver\":\"alice.near\",\"Requested Sponsorship Token\":\"USDC\",\"new_generation\":\"A better proposal\"}}}\n",
        "{\"type\":\"chunk\",\"value\":{\"state\":\"complete\",\"output\":{\"new_generation\":\"later\"}}}\n",
    );

    fn settings(server: &MockServer, api_key: Option<&str>) -> WordwareConfig {
        WordwareConfig {
            base_url: server.uri(),
            api_key: api_key.map(str::to_string),
            proposal_app: "proposal-app".to_string(),
            project_app: "project-app".to_string(),
            timeout_secs: 5,
        }
    }

    #[test]
    fn test_extract_first_complete_chunk() {
        let output = extract_complete_output(STREAM).unwrap();
        assert_eq!(output["new_generation"], "A better proposal");
    }

    #[test]
    fn test_extract_without_complete_chunk() {
        assert!(extract_complete_output("{\"type\":\"chunk\",\"value\":{\"state\":\"start\"}}\n").is_none());
        assert!(extract_complete_output("").is_none());
        assert!(extract_complete_output("{\"type\":\"chunk\",\"value\":{\"state\":\"complete\"}}").is_none());
    }

    #[tokio::test]
    async fn test_generate_proposal() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/released-app/proposal-app/run"))
            .and(header("authorization", "Bearer secret"))
            .and(body_json(json!({
                "inputs": {
                    "Supervisor": "bob.near",
                    "Requested Sponsorship Amount": "500",
                    "Receiver": "alice.near",
                    "Requested Sponsorship Token": "USDC",
                    "Proposal Details": "Fund a meetup"
                },
                "version": "^2.0"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_string(STREAM))
            .mount(&server)
            .await;

        let client = WordwareClient::new(settings(&server, Some("secret"))).unwrap();
        let draft = client
            .generate_proposal(&ProposalDraftInputs {
                supervisor: "bob.near".to_string(),
                requested_sponsorship_amount: "500".to_string(),
                receiver_account: "alice.near".to_string(),
                requested_sponsorship_token: "USDC".to_string(),
                proposal_details: "Fund a meetup".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(
            draft,
            json!({
                "Supervisor": "bob.near",
                "Receiver": "alice.near",
                "Requested Sponsorship Token": "USDC",
                "proposalDetails": "A better proposal"
            })
        );
    }

    #[tokio::test]
    async fn test_generate_project_incomplete_stream() {
        let server = MockServer::start().await;
        let partial = "{\"type\":\"chunk\",\"value\":{\"state\":\"start\"}}\n";
        Mock::given(method("POST"))
            .and(path("/api/released-app/project-app/run"))
            .respond_with(ResponseTemplate::new(200).set_body_string(partial))
            .mount(&server)
            .await;

        let client = WordwareClient::new(settings(&server, Some("secret"))).unwrap();
        let draft = client.generate_project(&ProjectDraftInputs::default()).await.unwrap();

        assert_eq!(draft["error"], "No complete state found");
        assert_eq!(draft["rawData"], partial);
    }

    #[tokio::test]
    async fn test_project_output_shape() {
        let server = MockServer::start().await;
        let stream = "{\"type\":\"chunk\",\"value\":{\"state\":\"complete\",\"output\":{\"discord\":\"d\",\"medium\":\"m\",\"twitter\":\"t\",\"logo\":\"l\",\"websiteLink\":\"https://x.example\",\"whitepaper\":\"w\",\"new_generation\":\"Project text\"}}}\n";
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string(stream))
            .mount(&server)
            .await;

        let client = WordwareClient::new(settings(&server, Some("secret"))).unwrap();
        let draft = client.generate_project(&ProjectDraftInputs::default()).await.unwrap();

        assert_eq!(draft["website"], "https://x.example");
        assert_eq!(draft["project"], "Project text");
    }

    #[tokio::test]
    async fn test_upstream_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = WordwareClient::new(settings(&server, Some("secret"))).unwrap();
        let result = client.generate_proposal(&ProposalDraftInputs::default()).await;
        assert!(matches!(result, Err(GatewayError::Upstream(_))));
    }

    #[tokio::test]
    async fn test_missing_api_key() {
        let server = MockServer::start().await;
        let client = WordwareClient::new(settings(&server, None)).unwrap();

        let result = client.generate_proposal(&ProposalDraftInputs::default()).await;
        assert!(matches!(result, Err(GatewayError::Config(_))));
    }
}
