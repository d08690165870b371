//! # REST Gateway Adapter
//!
//! Talks to a gateway service that fronts an organization's peers:
//!
//! - `POST {endpoint}/channels/{channel}/contracts/{contract}/evaluate`
//!   with `{"function", "args"}`; the response body is the raw result.
//! - `POST {endpoint}/channels/{channel}/contracts/{contract}/submit`
//!   with `{"function", "args", "transient", "endorsingOrganizations"}`;
//!   transient values are base64. The response is
//!   `{"transactionId", "result", "blockNumber"}`.
//!
//! The caller's identity travels in `x-gepx-*` headers.

use super::invocation::{CommitReceipt, PendingInvocation};
use super::wallet::Identity;
use super::{GatewayConnector, LedgerGateway};
use crate::config::{ClientConfig, OrganizationProfile};
use crate::constants::CONFLICT_VALIDATION_CODES;
use crate::error::{GepxError, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::Utc;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

const MSP_ID_HEADER: &str = "x-gepx-msp-id";
const USER_HEADER: &str = "x-gepx-user";
const IDENTITY_HEADER: &str = "x-gepx-identity";

#[derive(Debug, Serialize)]
struct EvaluateRequest<'a> {
    function: &'a str,
    args: &'a [String],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SubmitRequest<'a> {
    function: &'a str,
    args: &'a [String],
    transient: BTreeMap<&'a str, String>,
    endorsing_organizations: &'a [String],
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubmitResponse {
    transaction_id: String,
    #[serde(default)]
    result: Option<String>,
    #[serde(default)]
    block_number: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(alias = "error")]
    message: String,
    #[serde(default)]
    code: Option<String>,
}

/// Builds [`HttpGateway`]s for the configured channel and contract
#[derive(Debug, Clone)]
pub struct HttpConnector {
    channel: String,
    contract: String,
    timeout: Duration,
}

impl HttpConnector {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            channel: config.channel.clone(),
            contract: config.contract.clone(),
            timeout: config.gateway.request_timeout(),
        }
    }
}

#[async_trait]
impl GatewayConnector for HttpConnector {
    async fn connect(
        &self,
        organization: &OrganizationProfile,
        identity: &Identity,
    ) -> Result<Arc<dyn LedgerGateway>> {
        let gateway = HttpGateway::new(
            &organization.gateway_endpoint,
            &self.channel,
            &self.contract,
            identity,
            self.timeout,
        )?;
        Ok(Arc::new(gateway))
    }
}

#[derive(Debug)]
pub struct HttpGateway {
    client: Client,
    contract_url: String,
    msp_id: String,
    user: String,
    identity: String,
}

impl HttpGateway {
    pub fn new(
        endpoint: &str,
        channel: &str,
        contract: &str,
        identity: &Identity,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GepxError::Connectivity(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            contract_url: format!(
                "{}/channels/{channel}/contracts/{contract}",
                endpoint.trim_end_matches('/')
            ),
            msp_id: identity.msp_id.clone(),
            user: identity.label.clone(),
            identity: STANDARD.encode(identity.certificate.as_bytes()),
        })
    }

    pub fn contract_url(&self) -> &str {
        &self.contract_url
    }

    async fn post<T: Serialize + ?Sized>(&self, action: &str, body: &T) -> Result<reqwest::Response> {
        let url = format!("{}/{action}", self.contract_url);
        debug!(url = %url, "Gateway request");
        self.client
            .post(&url)
            .header(MSP_ID_HEADER, &self.msp_id)
            .header(USER_HEADER, &self.user)
            .header(IDENTITY_HEADER, &self.identity)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GepxError::Connectivity(format!("Gateway request to {url} timed out"))
                } else {
                    GepxError::Connectivity(format!("Gateway request to {url} failed: {e}"))
                }
            })
    }
}

#[async_trait]
impl LedgerGateway for HttpGateway {
    fn transport_name(&self) -> &'static str {
        "REST"
    }

    async fn evaluate(&self, function: &str, args: &[String]) -> Result<Vec<u8>> {
        let response = self.post("evaluate", &EvaluateRequest { function, args }).await?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| GepxError::Connectivity(format!("Failed to read {function} response: {e}")))?;

        if !status.is_success() {
            return Err(evaluate_error(status, &body, function, args));
        }
        Ok(body.to_vec())
    }

    async fn submit(&self, invocation: &PendingInvocation) -> Result<CommitReceipt> {
        let request = SubmitRequest {
            function: invocation.function(),
            args: invocation.args(),
            transient: invocation
                .transient()
                .iter()
                .map(|(key, value)| (key.as_str(), STANDARD.encode(value)))
                .collect(),
            endorsing_organizations: invocation.endorsing_organizations().as_slice(),
        };

        let response = self.post("submit", &request).await?;
        let status = response.status();
        let body = response.bytes().await.map_err(|e| {
            GepxError::Connectivity(format!(
                "Failed to read {} response: {e}",
                invocation.function()
            ))
        })?;

        if !status.is_success() {
            return Err(submit_error(status, &body, invocation));
        }

        let parsed: SubmitResponse = serde_json::from_slice(&body)
            .map_err(|e| GepxError::malformed(format!("{} submit", invocation.function()), e.to_string()))?;
        let result = match parsed.result {
            Some(encoded) if !encoded.is_empty() => STANDARD.decode(encoded).map_err(|e| {
                GepxError::malformed(format!("{} submit result", invocation.function()), e.to_string())
            })?,
            _ => Vec::new(),
        };

        Ok(CommitReceipt {
            transaction_id: parsed.transaction_id,
            result,
            block_number: parsed.block_number,
            committed_at: Utc::now(),
        })
    }
}

fn parse_error_body(body: &[u8]) -> (String, Option<String>) {
    match serde_json::from_slice::<ErrorBody>(body) {
        Ok(parsed) => (parsed.message, parsed.code),
        Err(_) => (String::from_utf8_lossy(body).trim().to_string(), None),
    }
}

fn looks_missing(message: &str) -> bool {
    let lower = message.to_ascii_lowercase();
    lower.contains("does not exist") || lower.contains("not found")
}

fn evaluate_error(status: StatusCode, body: &[u8], function: &str, args: &[String]) -> GepxError {
    let (message, _) = parse_error_body(body);
    let record_id = args.first().cloned().unwrap_or_default();
    warn!(function = %function, status = %status, message = %message, "Evaluate rejected");

    if status == StatusCode::NOT_FOUND || looks_missing(&message) {
        return GepxError::not_found(record_id);
    }
    match status {
        StatusCode::UNAUTHORIZED => GepxError::Identity(message),
        StatusCode::FORBIDDEN => GepxError::Endorsement(message),
        _ => GepxError::Connectivity(format!("{function} evaluation failed ({status}): {message}")),
    }
}

fn submit_error(status: StatusCode, body: &[u8], invocation: &PendingInvocation) -> GepxError {
    let (message, code) = parse_error_body(body);
    warn!(
        function = %invocation.function(),
        status = %status,
        code = ?code,
        message = %message,
        "Submit rejected"
    );

    let conflict_code = code
        .as_deref()
        .is_some_and(|c| CONFLICT_VALIDATION_CODES.contains(&c));
    if status == StatusCode::CONFLICT || conflict_code {
        return GepxError::commit_conflict(message);
    }
    match status {
        StatusCode::NOT_FOUND => {
            GepxError::not_found(invocation.args().first().cloned().unwrap_or_default())
        }
        StatusCode::UNAUTHORIZED => GepxError::Identity(message),
        StatusCode::FORBIDDEN | StatusCode::UNPROCESSABLE_ENTITY => GepxError::Endorsement(message),
        StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT => {
            GepxError::Connectivity(format!("Gateway unavailable ({status}): {message}"))
        }
        _ => GepxError::commit(format!("{} ({status}): {message}", invocation.function())),
    }
}
