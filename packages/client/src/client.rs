// ABOUTME: reqwest client for the ASB backend REST API
// ABOUTME: Fetches proposal records and performs verifier actions once the role gate allows them

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use asb_core::{can_role_act, GateAction, Proposal, Role};

use crate::error::{ClientError, ClientResult};

/// The backend answers either `{ "data": ... }` or the bare record
#[derive(Deserialize)]
#[serde(untagged)]
enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Envelope<T> {
    fn into_inner(self) -> T {
        match self {
            Envelope::Wrapped { data } => data,
            Envelope::Bare(data) => data,
        }
    }
}

#[derive(Deserialize)]
struct BackendErrorBody {
    message: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ActionRequest<'a> {
    role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    reject_reason: Option<&'a str>,
}

#[derive(Clone)]
pub struct BackendClient {
    http_client: Client,
    base_url: String,
    token: Option<String>,
}

impl BackendClient {
    pub fn new(base_url: &str, token: Option<String>, timeout: Duration) -> ClientResult<Self> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ClientError::Configuration(
                "Backend URL must not be empty".to_string(),
            ));
        }

        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Configuration(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url,
            token: token.filter(|t| !t.is_empty()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Fetch one proposal record
    pub async fn get_proposal(&self, id: i64) -> ClientResult<Proposal> {
        let url = self.url(&format!("/asb/{}", id));
        debug!("Fetching proposal from {}", url);

        let response = self.authorize(self.http_client.get(&url)).send().await?;
        read_envelope(response).await
    }

    /// Fetch every proposal visible to the token
    pub async fn list_proposals(&self) -> ClientResult<Vec<Proposal>> {
        let url = self.url("/asb");
        debug!("Listing proposals from {}", url);

        let response = self.authorize(self.http_client.get(&url)).send().await?;
        read_envelope(response).await
    }

    /// Perform `action` on `proposal` as `role`. The gate is checked locally
    /// first; a closed gate never reaches the backend. Returns the updated
    /// record.
    pub async fn perform(
        &self,
        proposal: &Proposal,
        role: Role,
        action: GateAction,
        reject_reason: Option<&str>,
    ) -> ClientResult<Proposal> {
        if !can_role_act(proposal.status_code, role, action, &proposal.approvals()) {
            warn!(
                "Gate closed: {} cannot {} proposal {:?} at status {}",
                role, action, proposal.id, proposal.status_code
            );
            return Err(ClientError::GateClosed {
                action,
                role,
                status_code: proposal.status_code,
            });
        }

        let reject_reason = match action {
            GateAction::Reject => {
                let reason = reject_reason
                    .map(str::trim)
                    .filter(|reason| !reason.is_empty())
                    .ok_or(ClientError::MissingRejectReason)?;
                Some(reason)
            }
            _ => None,
        };

        let id = proposal.id.ok_or(ClientError::MissingProposalId)?;
        let url = self.url(&format!("/asb/{}/{}", id, action.as_str()));
        debug!("Performing {} on proposal {} as {}", action, id, role);

        let response = self
            .authorize(self.http_client.post(&url))
            .json(&ActionRequest {
                role,
                reject_reason,
            })
            .send()
            .await?;

        read_envelope(response).await
    }
}

async fn read_envelope<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    let status = response.status();

    if status == StatusCode::UNAUTHORIZED {
        warn!("Backend rejected the credentials");
        return Err(ClientError::Unauthorized);
    }

    let body = response.text().await?;

    if !status.is_success() {
        let message = serde_json::from_str::<BackendErrorBody>(&body)
            .ok()
            .and_then(|parsed| parsed.message.or(parsed.error))
            .unwrap_or_else(|| {
                if body.is_empty() {
                    status.to_string()
                } else {
                    body.clone()
                }
            });
        warn!("Backend returned {}: {}", status, message);
        return Err(ClientError::Status {
            status: status.as_u16(),
            message,
        });
    }

    serde_json::from_str::<Envelope<T>>(&body)
        .map(Envelope::into_inner)
        .map_err(|e| ClientError::InvalidResponse(e.to_string()))
}
